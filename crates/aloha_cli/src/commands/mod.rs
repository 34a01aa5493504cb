pub mod associations;
pub mod auth;
pub mod browse;
pub mod resources;

use aloha_settings::PAGE_SIZE_OPTIONS;
use aloha_types::{ListQuery, SortOrder};
use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Page to show, starting at 1
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,

    /// Rows per page (5, 10, 20, 50 or 100); defaults to ALOHA_PAGE_SIZE
    #[arg(short, long)]
    pub size: Option<u32>,

    /// Field to sort by
    #[arg(long)]
    pub sort: Option<String>,

    #[arg(long, value_parser = parse_order)]
    pub order: Option<SortOrder>,
}

impl ListArgs {
    pub fn query(&self, default_size: u32) -> ListQuery {
        ListQuery::new(self.page.max(1), self.size.unwrap_or(default_size).max(1))
            .with_sort(self.sort.clone(), self.order)
    }
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

fn parse_order(value: &str) -> Result<SortOrder, String> {
    value.parse()
}

/// Sizes outside the pager options are allowed but noted
pub fn is_offered_size(size: u32) -> bool {
    PAGE_SIZE_OPTIONS.contains(&size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_args_query() {
        let args = ListArgs {
            page: 0,
            size: None,
            sort: Some("username".to_string()),
            order: Some(SortOrder::Desc),
        };
        let query = args.query(20);

        assert_eq!(query.page, 1);
        assert_eq!(query.size, 20);
        assert_eq!(query.sort.as_deref(), Some("username"));
        assert_eq!(query.order, Some(SortOrder::Desc));
    }

    #[test]
    fn test_offered_sizes() {
        assert!(is_offered_size(50));
        assert!(!is_offered_size(7));
    }
}
