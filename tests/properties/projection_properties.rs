use chrono::Utc;
use proptest::prelude::*;

use jobsearch::search::{JobDocument, build_document};
use jobsearch::storage::{Company, Job, JobSkill};

fn job(id: i64, company_id: i64, title: String, salary: (i64, i64)) -> Job {
    Job {
        id,
        title,
        industry: "Software".to_string(),
        company_id,
        description: "desc".to_string(),
        location: "Berlin".to_string(),
        salary_min: salary.0,
        salary_max: salary.1,
        requirements: String::new(),
        created_at: Utc::now(),
    }
}

proptest! {
    #[test]
    fn test_projection_is_deterministic(
        id in 1i64..10_000,
        title in "[A-Za-z ]{0,40}",
        labels in prop::collection::vec("[A-Za-z+#]{1,10}", 0..12),
        min in 0i64..100_000,
        span in 0i64..100_000,
    ) {
        let job = job(id, 7, title, (min, min + span));
        let company = Company {
            id: 7,
            name: "Acme".to_string(),
            industry: "Software".to_string(),
            location: "Berlin".to_string(),
        };
        let skills: Vec<JobSkill> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| JobSkill { id: i as i64 + 1, job_id: id, skill: label.clone() })
            .collect();

        let first = build_document(&job, Some(&company), &skills).unwrap();
        let second = build_document(&job, Some(&company), &skills).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first.job_skills, &labels);

        let source = first.to_source().unwrap();
        prop_assert_eq!(JobDocument::from_source(&source).unwrap(), first);
    }

    #[test]
    fn test_projection_without_company_always_fails(id in 1i64..10_000, company_id in 1i64..100) {
        let job = job(id, company_id, "t".to_string(), (1, 2));
        prop_assert!(build_document(&job, None, &[]).is_err());
    }
}
