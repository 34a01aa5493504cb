use crate::query::{ListQuery, DEFAULT_SIZE};
use serde::{Deserialize, Deserializer, Serialize};

/// Normalized pagination block. `page` is always >= 1 and the page links
/// are `None` at the respective boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
    pub total: u64,
    pub prev_page: Option<u32>,
    pub next_page: Option<u32>,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination::new(1, DEFAULT_SIZE, 0)
    }
}

impl Pagination {
    /// Builds the block from the three counters, deriving the page links
    pub fn new(page: u32, size: u32, total: u64) -> Self {
        let page = page.max(1);
        let last_page = last_page(size, total);

        Pagination {
            page,
            size,
            total,
            prev_page: if page > 1 { Some(page - 1) } else { None },
            next_page: if page < last_page {
                Some(page + 1)
            } else {
                None
            },
        }
    }

    /// At least one page, even when nothing matched
    pub fn total_pages(&self) -> u32 {
        last_page(self.size, self.total)
    }
}

fn last_page(size: u32, total: u64) -> u32 {
    if size == 0 {
        return 1;
    }
    let pages = total.div_ceil(size as u64).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Pagination exactly as a backend sent it. Every field is optional because
/// older revisions omitted some of them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPagination {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "page_ref")]
    pub prev_page: Option<u32>,
    #[serde(default, deserialize_with = "page_ref")]
    pub next_page: Option<u32>,
}

/// Page links arrive as numbers, numeric strings, or links such as
/// `/api/users?page=2&size=10`.
fn page_ref<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PageRef {
        Number(u32),
        Text(String),
    }

    Ok(match Option::<PageRef>::deserialize(deserializer)? {
        None => None,
        Some(PageRef::Number(page)) => Some(page),
        Some(PageRef::Text(text)) => page_from_text(&text),
    })
}

fn page_from_text(text: &str) -> Option<u32> {
    let text = text.trim();
    if let Ok(page) = text.parse::<u32>() {
        return Some(page);
    }

    let query = text.split_once('?').map(|(_, q)| q).unwrap_or(text);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "page")
        .and_then(|(_, value)| value.parse::<u32>().ok())
}

/// One page of records
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<RawPagination>,
}

/// A list response body: the `{data, pagination}` envelope or a bare array
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListBody<T> {
    Envelope(ListEnvelope<T>),
    Bare(Vec<T>),
}

impl<T> ListBody<T> {
    /// Fills whatever the backend left out from the request that produced it
    pub fn into_page(self, query: &ListQuery) -> Page<T> {
        match self {
            ListBody::Envelope(ListEnvelope {
                data,
                pagination: Some(raw),
            }) => {
                let total = raw.total.unwrap_or(data.len() as u64);
                let pagination = Pagination {
                    page: raw.page.unwrap_or(query.page).max(1),
                    size: raw.size.unwrap_or(query.size),
                    total,
                    prev_page: raw.prev_page,
                    next_page: raw.next_page,
                };
                Page { data, pagination }
            }
            ListBody::Envelope(ListEnvelope {
                data,
                pagination: None,
            })
            | ListBody::Bare(data) => {
                let pagination = Pagination::new(query.page, query.size, data.len() as u64);
                Page { data, pagination }
            }
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            ListBody::Envelope(envelope) => envelope.data,
            ListBody::Bare(data) => data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_derives_links() {
        let first = Pagination::new(1, 10, 11);
        assert_eq!(first.prev_page, None);
        assert_eq!(first.next_page, Some(2));
        assert_eq!(first.total_pages(), 2);

        let last = Pagination::new(2, 10, 11);
        assert_eq!(last.prev_page, Some(1));
        assert_eq!(last.next_page, None);

        let empty = Pagination::new(0, 10, 0);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.total_pages(), 1);
        assert_eq!(empty.next_page, None);
    }

    #[test]
    fn test_envelope_with_string_links() {
        let body: ListBody<String> = serde_json::from_value(json!({
            "data": ["a", "b"],
            "pagination": {
                "page": 2, "size": 2, "total": 6,
                "prev_page": "1", "next_page": "/api/users?page=3&size=2"
            }
        }))
        .unwrap();

        let page = body.into_page(&ListQuery::new(2, 2));
        assert_eq!(page.data, vec!["a", "b"]);
        assert_eq!(page.pagination.prev_page, Some(1));
        assert_eq!(page.pagination.next_page, Some(3));
        assert_eq!(page.pagination.total, 6);
    }

    #[test]
    fn test_empty_envelope() {
        let body: ListBody<String> = serde_json::from_value(json!({
            "data": [],
            "pagination": {"page": 1, "size": 10, "total": 0, "prev_page": null, "next_page": null}
        }))
        .unwrap();

        let page = body.into_page(&ListQuery::new(1, 10));
        assert!(page.data.is_empty());
        assert_eq!(page.pagination, Pagination::new(1, 10, 0));
    }

    #[test]
    fn test_missing_pagination_is_synthesized() {
        let body: ListBody<String> = serde_json::from_value(json!({"data": ["a"]})).unwrap();
        let page = body.into_page(&ListQuery::new(1, 10));
        assert_eq!(page.pagination, Pagination::new(1, 10, 1));

        let bare: ListBody<String> = serde_json::from_value(json!(["a", "b", "c"])).unwrap();
        assert_eq!(bare.into_items().len(), 3);
    }
}
