//! Paginating record store
//!
//! Records are held in fixed-size chunks; page `n` is chunk `n - 1`. The
//! total count is computed once at construction.

use url::form_urlencoded;

use crate::app::fields::{Field, FieldAccess, FieldValue};
use crate::app::models::Page;
use crate::constants::query;
use crate::errors::{FilterError, FilterResult};

#[derive(Debug, Clone, PartialEq)]
pub struct PaginatingStore<T> {
    chunks: Vec<Vec<T>>,
    count: usize,
}

impl<T: Clone> PaginatingStore<T> {
    /// Build a store over pre-chunked pages
    pub fn new(chunks: Vec<Vec<T>>) -> Self {
        let count = chunks.iter().map(Vec::len).sum();
        Self { chunks, count }
    }

    /// Chunk `records` into pages of `page_size`
    pub fn from_records(records: Vec<T>, page_size: usize) -> Self {
        let chunks = records
            .chunks(page_size.max(1))
            .map(<[T]>::to_vec)
            .collect();
        Self::new(chunks)
    }

    /// Total number of records across all pages
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn num_pages(&self) -> usize {
        self.chunks.len()
    }

    /// Page `page_num` (1-indexed) with links relative to `base_url`
    pub fn page(&self, base_url: &str, page_num: i64) -> FilterResult<Page<T>> {
        self.page_with_query(base_url, page_num, &[])
    }

    /// Like [`PaginatingStore::page`], with `carried` appended to each link
    /// after the page number.
    ///
    /// A store of exactly one chunk always answers with that chunk, whatever
    /// the page number. Otherwise a page below one is an error and a page past
    /// the end is empty.
    pub fn page_with_query(
        &self,
        base_url: &str,
        page_num: i64,
        carried: &[(String, String)],
    ) -> FilterResult<Page<T>> {
        let index = if self.chunks.len() == 1 {
            0
        } else {
            if page_num < 1 {
                return Err(FilterError::PageRange { page: page_num });
            }
            let index = (page_num - 1) as usize;
            if index >= self.chunks.len() {
                return Ok(Page::empty(self.count));
            }
            index
        };

        let link = |target: usize| {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .append_pair(query::PAGE, &target.to_string())
                .extend_pairs(carried)
                .finish();
            format!("{base_url}?{encoded}")
        };

        let next = (index + 1 < self.chunks.len()).then(|| link(index + 2));
        let prev = (index > 0).then(|| link(index));

        Ok(Page {
            next,
            prev,
            count: self.count,
            records: self.chunks[index].clone(),
        })
    }
}

impl<T: FieldAccess> PaginatingStore<T> {
    /// First record whose facility id matches
    pub fn get_one(&self, facility_id: i64) -> Option<&T> {
        self.chunks.iter().flatten().find(|record| {
            record.field(Field::FacilityId) == Some(FieldValue::Int(facility_id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{Agency, FacilityRecord};

    const BASE: &str = "http://localhost:8080/data/";

    fn facilities(n: i64) -> Vec<FacilityRecord> {
        (1..=n)
            .map(|facility_id| FacilityRecord {
                facility_id,
                name: format!("builing_{facility_id}"),
                address: "state st, Albany, NY, 12207".to_string(),
                longitude: -73.75,
                latitude: 42.65,
                agency: Agency::C,
                sqft: 1000 * facility_id,
                energy_records: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn test_pagination_boundaries() {
        let store = PaginatingStore::from_records(facilities(100), 12);
        assert_eq!(store.num_pages(), 9);
        assert_eq!(store.count(), 100);

        let first = store.page(BASE, 1).unwrap();
        assert_eq!(first.prev, None);
        assert_eq!(first.next.as_deref(), Some("http://localhost:8080/data/?page=2"));
        assert_eq!(first.records.len(), 12);

        let last = store.page(BASE, 9).unwrap();
        assert_eq!(last.next, None);
        assert_eq!(last.prev.as_deref(), Some("http://localhost:8080/data/?page=8"));
        assert_eq!(last.records.len(), 4);

        assert_eq!(store.page(BASE, 10).unwrap(), Page::empty(100));
        assert_eq!(store.page(BASE, 0), Err(FilterError::PageRange { page: 0 }));
    }

    #[test]
    fn test_single_chunk_ignores_page_number() {
        let store = PaginatingStore::from_records(facilities(5), 12);
        for page_num in [-3, 0, 1, 7] {
            let page = store.page(BASE, page_num).unwrap();
            assert_eq!(page.records.len(), 5);
            assert_eq!(page.next, None);
            assert_eq!(page.prev, None);
        }
    }

    #[test]
    fn test_links_carry_filters() {
        let store = PaginatingStore::from_records(facilities(30), 12);
        let carried = vec![("address_contains".to_string(), "Albany, NY".to_string())];
        let page = store.page_with_query(BASE, 2, &carried).unwrap();

        assert_eq!(
            page.next.as_deref(),
            Some("http://localhost:8080/data/?page=3&address_contains=Albany%2C+NY")
        );
        assert_eq!(
            page.prev.as_deref(),
            Some("http://localhost:8080/data/?page=1&address_contains=Albany%2C+NY")
        );
    }

    #[test]
    fn test_get_one() {
        let store = PaginatingStore::from_records(facilities(30), 12);
        assert_eq!(store.get_one(25).map(|r| r.facility_id), Some(25));
        assert!(store.get_one(31).is_none());
    }
}
