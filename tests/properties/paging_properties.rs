use proptest::prelude::*;

use jobsearch::core::Pagination;
use jobsearch::search::{IndexClient, SearchCriteria};
use jobsearch::test_utils::{MemoryIndex, sample_document};

proptest! {
    #[test]
    fn test_pages_concatenate_to_whole(items in prop::collection::vec(any::<u16>(), 0..60), size in 1usize..15) {
        let mut page = Pagination::first(size);
        let mut collected = Vec::new();
        loop {
            let batch = page.slice(&items);
            if batch.is_empty() {
                break;
            }
            collected.extend(batch);
            page = page.next();
        }
        prop_assert_eq!(collected, items);
    }

    #[test]
    fn test_validated_page_never_exceeds_max(limit in -50i64..150, offset in -50i64..150, max in 1usize..100) {
        match Pagination::new(limit, offset, max) {
            Ok(page) => {
                prop_assert!(page.limit() <= max);
                prop_assert!(limit >= 0 && offset >= 0);
            }
            Err(err) => prop_assert!(err.is_caller_error()),
        }
    }

    #[test]
    fn test_index_search_pages_concatenate(docs in 0i64..25, size in 1i64..8) {
        let index = MemoryIndex::new();
        let session = index.open_session().unwrap();
        for id in 1..=docs {
            session.upsert(&sample_document(id)).unwrap();
        }
        session.commit().unwrap();

        let criteria = SearchCriteria::default();
        let full = index.search(&criteria, Pagination::new(100, 0, 100).unwrap()).unwrap();
        let mut paged = Vec::new();
        let mut offset = 0;
        while offset < docs + size {
            paged.extend(index.search(&criteria, Pagination::new(size, offset, 100).unwrap()).unwrap());
            offset += size;
        }
        prop_assert_eq!(paged, full);
    }

    #[test]
    fn test_widening_salary_range_never_drops_hits(
        min in 0i64..100_000,
        span in 0i64..100_000,
        floor in 1i64..200_000,
        widen in 0i64..50_000,
    ) {
        let mut doc = sample_document(1);
        doc.salary_min = min;
        doc.salary_max = min + span;
        let narrow = SearchCriteria {
            salary_floor: Some(floor),
            salary_ceiling: Some(floor + 10_000),
            ..SearchCriteria::default()
        };
        let wide = SearchCriteria {
            salary_floor: Some((floor - widen).max(1)),
            salary_ceiling: Some(floor + 10_000 + widen),
            ..SearchCriteria::default()
        };
        if narrow.matches(&doc) {
            prop_assert!(wide.matches(&doc));
        }
    }
}
