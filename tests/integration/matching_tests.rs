use jobsearch::matching::{MatchResult, SkillMatcher};
use jobsearch::test_utils::{seed_company, seed_job};

use super::fixture::TestStores;

fn skills(labels: &[&str]) -> Vec<String> {
    labels.iter().map(ToString::to_string).collect()
}

#[test]
fn test_skill_overlap_scenario() {
    let stores = TestStores::new();
    let company = seed_company(&stores.db, "Acme");
    let j1 = seed_job(&stores.db, company.id, "Backend", (1, 2), &["Go", "SQL"]);
    let j2 = seed_job(&stores.db, company.id, "Platform", (1, 2), &["Go", "Rust"]);
    let j3 = seed_job(&stores.db, company.id, "Analyst", (1, 2), &["SQL"]);

    let repo = stores.repo();
    let results = SkillMatcher::new(&repo, 100)
        .match_skills(&skills(&["Go", "SQL"]), 10, 0)
        .unwrap();

    assert_eq!(
        results,
        vec![
            MatchResult { job_id: j1.id, overlap: 2 },
            MatchResult { job_id: j2.id, overlap: 1 },
            MatchResult { job_id: j3.id, overlap: 1 },
        ]
    );
}

#[test]
fn test_duplicate_job_skill_rows_count_once() {
    let stores = TestStores::new();
    let company = seed_company(&stores.db, "Acme");
    let job = seed_job(&stores.db, company.id, "Backend", (1, 2), &["Go", "Go", "SQL"]);

    let repo = stores.repo();
    let results = SkillMatcher::new(&repo, 100)
        .match_skills(&skills(&["Go"]), 10, 0)
        .unwrap();
    assert_eq!(results, vec![MatchResult { job_id: job.id, overlap: 1 }]);
}

#[test]
fn test_deleted_job_no_longer_matches() {
    let stores = TestStores::new();
    let company = seed_company(&stores.db, "Acme");
    let job = seed_job(&stores.db, company.id, "Backend", (1, 2), &["Go"]);

    let repo = stores.repo();
    repo.delete_job(job.id).unwrap();
    let results = SkillMatcher::new(&repo, 100)
        .match_skills(&skills(&["Go"]), 10, 0)
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_matching_pages_with_offset() {
    let stores = TestStores::new();
    let company = seed_company(&stores.db, "Acme");
    let ids: Vec<_> = (0..5)
        .map(|i| seed_job(&stores.db, company.id, &format!("Job {i}"), (1, 2), &["Go"]).id)
        .collect();

    let repo = stores.repo();
    let matcher = SkillMatcher::new(&repo, 100);
    let second_page: Vec<_> = matcher
        .match_skills(&skills(&["Go"]), 2, 2)
        .unwrap()
        .into_iter()
        .map(|m| m.job_id)
        .collect();
    assert_eq!(second_page, ids[2..4].to_vec());
}
