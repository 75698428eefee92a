use jobsearch::JobSearchError;
use jobsearch::search::{IndexClient, IndexSynchronizer};
use jobsearch::storage::{Database, JobRepository, SqliteJobRepository};
use jobsearch::test_utils::fixtures::orphan_company;
use jobsearch::test_utils::{MemoryIndex, seed_company, seed_job};
use jobsearch::utils::CancelToken;

use super::fixture::{TestStores, small_pages};

fn seed_catalog(db: &Database, jobs: usize) -> Vec<i64> {
    let acme = seed_company(db, "Acme");
    let globex = seed_company(db, "Globex");
    (0..jobs)
        .map(|i| {
            let company = if i % 2 == 0 { acme.id } else { globex.id };
            let skills: &[&str] = if i % 3 == 0 { &["Rust", "SQL"] } else { &["Go"] };
            seed_job(db, company, &format!("Engineer {i}"), (10_000, 20_000), skills).id
        })
        .collect()
}

#[test]
fn test_full_sync_is_idempotent() {
    let stores = TestStores::new();
    let ids = seed_catalog(&stores.db, 11);
    let repo = stores.repo();
    let sync = IndexSynchronizer::new(&repo, &stores.index, small_pages());

    let first = sync.reindex_all(&CancelToken::new()).unwrap();
    let after_first: Vec<_> = ids.iter().map(|id| stores.index.get(*id).unwrap()).collect();
    let second = sync.reindex_all(&CancelToken::new()).unwrap();
    let after_second: Vec<_> = ids.iter().map(|id| stores.index.get(*id).unwrap()).collect();

    assert_eq!(first.stats.indexed, 11);
    assert_eq!(second.stats.indexed, 11);
    assert_eq!(after_first, after_second);
    assert!(after_second.iter().all(Option::is_some));
    assert_eq!(stores.index.count().unwrap(), 11);
}

#[test]
fn test_sync_reflects_relational_state() {
    let stores = TestStores::new();
    let ids = seed_catalog(&stores.db, 4);
    let repo = stores.repo();
    let sync = IndexSynchronizer::new(&repo, &stores.index, small_pages());
    sync.reindex_all(&CancelToken::new()).unwrap();

    let doc = stores.index.get(ids[0]).unwrap().unwrap();
    let job = repo.get_job(ids[0]).unwrap().unwrap();
    assert_eq!(doc.title, job.title);
    assert_eq!(doc.company_name, "Acme");
    assert_eq!(doc.industry, "Software");
    assert_eq!(doc.job_skills, vec!["Rust", "SQL"]);
    assert_eq!((doc.salary_min, doc.salary_max), (10_000, 20_000));
}

#[test]
fn test_partial_failure_accounts_for_every_job() {
    let db = Database::open_in_memory().unwrap();
    let ids = seed_catalog(&db, 10);
    let repo = SqliteJobRepository::new(&db);
    let index = MemoryIndex::new().failing_on([ids[2], ids[5]]);

    let report = IndexSynchronizer::new(&repo, &index, small_pages())
        .reindex_all(&CancelToken::new())
        .unwrap();

    assert_eq!(report.stats.added, 10);
    assert_eq!(report.stats.indexed, 8);
    assert_eq!(report.stats.failed_ids(), vec![ids[2], ids[5]]);
    assert!(report.stats.not_attempted.is_empty());
    assert_eq!(index.len(), 8);
    assert!(index.get(ids[2]).unwrap().is_none());
    assert_eq!(report.retry_ids(), vec![ids[2], ids[5]]);
}

#[test]
fn test_orphaned_job_never_reaches_index() {
    let stores = TestStores::new();
    let kept = seed_company(&stores.db, "Acme");
    let gone = seed_company(&stores.db, "Gone");
    seed_job(&stores.db, kept.id, "Kept", (1, 2), &[]);
    let orphan = seed_job(&stores.db, gone.id, "Orphan", (1, 2), &["Rust"]);
    orphan_company(&stores.db, gone.id);

    let repo = stores.repo();
    let report = IndexSynchronizer::new(&repo, &stores.index, small_pages())
        .reindex_all(&CancelToken::new())
        .unwrap();

    assert_eq!(report.stats.indexed, 1);
    assert_eq!(report.skipped[0].job_id, orphan.id);
    assert!(stores.index.get(orphan.id).unwrap().is_none());
}

#[test]
fn test_deleted_job_is_removed_from_index() {
    let stores = TestStores::new();
    let ids = seed_catalog(&stores.db, 3);
    let repo = stores.repo();
    let sync = IndexSynchronizer::new(&repo, &stores.index, small_pages());
    sync.reindex_all(&CancelToken::new()).unwrap();

    assert!(repo.delete_job(ids[1]).unwrap());
    assert!(sync.remove_job(ids[1]).unwrap());
    assert!(matches!(
        sync.reindex_job(ids[1], &CancelToken::new()),
        Err(JobSearchError::JobNotFound(_))
    ));
    assert_eq!(stores.index.count().unwrap(), 2);
}

#[test]
fn test_index_survives_reopen() {
    let stores = TestStores::new();
    let ids = seed_catalog(&stores.db, 5);
    let repo = stores.repo();
    IndexSynchronizer::new(&repo, &stores.index, small_pages())
        .reindex_all(&CancelToken::new())
        .unwrap();

    let reopened = stores.reopen_index();
    assert_eq!(reopened.count().unwrap(), 5);
    assert_eq!(reopened.get(ids[4]).unwrap(), stores.index.get(ids[4]).unwrap());
}
