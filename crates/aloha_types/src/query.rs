use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(format!("Unsupported sort order: {}", s)),
        }
    }
}

/// Parameters of one list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub size: u32,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    pub filters: BTreeMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery::new(DEFAULT_PAGE, DEFAULT_SIZE)
    }
}

impl ListQuery {
    pub fn new(page: u32, size: u32) -> Self {
        ListQuery {
            page,
            size,
            sort: None,
            order: None,
            filters: BTreeMap::new(),
        }
    }

    pub fn with_sort(mut self, sort: Option<String>, order: Option<SortOrder>) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }

    pub fn with_filter(mut self, key: &str, value: &str) -> Self {
        self.filters.insert(key.to_string(), value.to_string());
        self
    }

    /// Query string parameters in a stable order. Unset options are left
    /// out entirely.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ];

        if let Some(sort) = &self.sort {
            params.push(("sort".to_string(), sort.clone()));
        }

        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.to_string()));
        }

        for (key, value) in &self.filters {
            params.push((key.clone(), value.clone()));
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(params: &[(String, String)]) -> Vec<(&str, &str)> {
        params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn test_params_only_page_and_size() {
        let params = ListQuery::new(3, 20).to_params();
        assert_eq!(pairs(&params), vec![("page", "3"), ("size", "20")]);
    }

    #[test]
    fn test_params_with_sort_and_filter() {
        let params = ListQuery::new(1, 10)
            .with_sort(Some("created_at".to_string()), Some(SortOrder::Desc))
            .with_filter("user_id", "u-1")
            .to_params();

        assert_eq!(
            pairs(&params),
            vec![
                ("page", "1"),
                ("size", "10"),
                ("sort", "created_at"),
                ("order", "desc"),
                ("user_id", "u-1"),
            ]
        );
    }

    #[test]
    fn test_sort_order_from_str() {
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
