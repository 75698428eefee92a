use proptest::prelude::*;

use jobsearch::matching::SkillMatcher;
use jobsearch::storage::{Database, SqliteJobRepository};
use jobsearch::test_utils::{seed_company, seed_job};

const LABELS: [&str; 6] = ["Go", "Rust", "SQL", "Python", "Kafka", "AWS"];

fn label_sets() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0usize..LABELS.len(), 0..5), 1..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_overlap_is_non_increasing_with_id_tiebreak(
        jobs in label_sets(),
        query in prop::collection::vec(0usize..LABELS.len(), 1..4),
    ) {
        let db = Database::open_in_memory().unwrap();
        let company = seed_company(&db, "Acme");
        for (i, labels) in jobs.iter().enumerate() {
            let skills: Vec<&str> = labels.iter().map(|l| LABELS[*l]).collect();
            seed_job(&db, company.id, &format!("Job {i}"), (1, 2), &skills);
        }
        let repo = SqliteJobRepository::new(&db);
        let query: Vec<String> = query.iter().map(|l| LABELS[*l].to_string()).collect();

        let results = SkillMatcher::new(&repo, 100).match_skills(&query, 100, 0).unwrap();

        for pair in results.windows(2) {
            prop_assert!(pair[0].overlap >= pair[1].overlap);
            if pair[0].overlap == pair[1].overlap {
                prop_assert!(pair[0].job_id < pair[1].job_id);
            }
        }
        let distinct_query: std::collections::HashSet<_> = query.iter().collect();
        for result in &results {
            prop_assert!(result.overlap >= 1);
            prop_assert!(result.overlap as usize <= distinct_query.len());
        }
    }

    #[test]
    fn test_match_pages_concatenate(
        jobs in label_sets(),
        size in 1i64..5,
    ) {
        let db = Database::open_in_memory().unwrap();
        let company = seed_company(&db, "Acme");
        for (i, labels) in jobs.iter().enumerate() {
            let skills: Vec<&str> = labels.iter().map(|l| LABELS[*l]).collect();
            seed_job(&db, company.id, &format!("Job {i}"), (1, 2), &skills);
        }
        let repo = SqliteJobRepository::new(&db);
        let matcher = SkillMatcher::new(&repo, 100);
        let query: Vec<String> = LABELS.iter().take(3).map(ToString::to_string).collect();

        let full = matcher.match_skills(&query, 100, 0).unwrap();
        let mut paged = Vec::new();
        let mut offset = 0;
        loop {
            let batch = matcher.match_skills(&query, size, offset).unwrap();
            if batch.is_empty() {
                break;
            }
            paged.extend(batch);
            offset += size;
        }
        prop_assert_eq!(paged, full);
    }
}
