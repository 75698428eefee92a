use jobsearch::search::{FilteredSearch, IndexSynchronizer, SearchCriteria};
use jobsearch::test_utils::{seed_company, seed_job};
use jobsearch::utils::CancelToken;

use super::fixture::{TestStores, small_pages};

fn indexed(stores: &TestStores) {
    let repo = stores.repo();
    IndexSynchronizer::new(&repo, &stores.index, small_pages())
        .reindex_all(&CancelToken::new())
        .unwrap();
}

#[test]
fn test_salary_range_scenario() {
    let stores = TestStores::new();
    let company = seed_company(&stores.db, "Acme");
    seed_job(&stores.db, company.id, "Junior Analyst", (20_000, 40_000), &[]);
    let senior = seed_job(&stores.db, company.id, "Senior Analyst", (60_000, 90_000), &[]);
    indexed(&stores);

    let criteria = SearchCriteria {
        salary_floor: Some(50_000),
        salary_ceiling: Some(80_000),
        ..SearchCriteria::default()
    };
    let hits = FilteredSearch::new(&stores.index, 100)
        .search(criteria, 10, 0)
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].job_id, senior.id);
    assert_eq!(hits[0].company_name, "Acme");
}

#[test]
fn test_criteria_are_and_combined() {
    let stores = TestStores::new();
    let company = seed_company(&stores.db, "Acme");
    let rust = seed_job(&stores.db, company.id, "Rust Engineer", (50_000, 70_000), &[]);
    seed_job(&stores.db, company.id, "Rust Intern", (10_000, 15_000), &[]);
    seed_job(&stores.db, company.id, "Go Engineer", (50_000, 70_000), &[]);
    indexed(&stores);

    let criteria = SearchCriteria {
        text: Some("rust".to_string()),
        industry: Some("Software".to_string()),
        location: Some("Berlin".to_string()),
        salary_floor: Some(40_000),
        salary_ceiling: None,
    };
    let hits = FilteredSearch::new(&stores.index, 100)
        .search(criteria, 10, 0)
        .unwrap();
    let ids: Vec<_> = hits.iter().map(|h| h.job_id).collect();
    assert_eq!(ids, vec![rust.id]);
}

#[test]
fn test_pages_concatenate_to_full_result() {
    let stores = TestStores::new();
    let company = seed_company(&stores.db, "Acme");
    for i in 0..7 {
        seed_job(&stores.db, company.id, &format!("Engineer {i}"), (1, 2), &[]);
    }
    indexed(&stores);

    let search = FilteredSearch::new(&stores.index, 100);
    let full = search.search(SearchCriteria::default(), 100, 0).unwrap();
    let mut paged = Vec::new();
    for offset in (0..7).step_by(3) {
        paged.extend(search.search(SearchCriteria::default(), 3, offset).unwrap());
    }

    assert_eq!(full.len(), 7);
    let full_ids: Vec<_> = full.iter().map(|h| h.job_id).collect();
    let paged_ids: Vec<_> = paged.iter().map(|h| h.job_id).collect();
    assert_eq!(paged_ids, full_ids);
}

#[test]
fn test_offset_past_end_is_empty() {
    let stores = TestStores::new();
    let company = seed_company(&stores.db, "Acme");
    seed_job(&stores.db, company.id, "Engineer", (1, 2), &[]);
    indexed(&stores);

    let hits = FilteredSearch::new(&stores.index, 100)
        .search(SearchCriteria::default(), 10, 50)
        .unwrap();
    assert!(hits.is_empty());
}

#[test]
fn test_huge_offset_is_empty_not_fatal() {
    let stores = TestStores::new();
    let company = seed_company(&stores.db, "Acme");
    seed_job(&stores.db, company.id, "Engineer", (1, 2), &[]);
    indexed(&stores);

    let search = FilteredSearch::new(&stores.index, 100);
    for offset in [1_000_000_000_000, i64::MAX] {
        let hits = search.search(SearchCriteria::default(), 10, offset).unwrap();
        assert!(hits.is_empty(), "offset={offset}");
    }
}

#[test]
fn test_invalid_parameters_are_caller_errors() {
    let stores = TestStores::new();
    let search = FilteredSearch::new(&stores.index, 20);

    for (limit, offset) in [(-1, 0), (5, -3), (21, 0)] {
        let err = search
            .search(SearchCriteria::default(), limit, offset)
            .unwrap_err();
        assert!(err.is_caller_error(), "limit={limit} offset={offset}");
    }
    let inverted = SearchCriteria {
        salary_floor: Some(90_000),
        salary_ceiling: Some(10_000),
        ..SearchCriteria::default()
    };
    assert!(search.search(inverted, 10, 0).unwrap_err().is_caller_error());
}

#[test]
fn test_no_match_yields_empty_list() {
    let stores = TestStores::new();
    let company = seed_company(&stores.db, "Acme");
    seed_job(&stores.db, company.id, "Engineer", (1, 2), &[]);
    indexed(&stores);

    let criteria = SearchCriteria {
        location: Some("Tokyo".to_string()),
        ..SearchCriteria::default()
    };
    let hits = FilteredSearch::new(&stores.index, 100)
        .search(criteria, 10, 0)
        .unwrap();
    assert!(hits.is_empty());
}
