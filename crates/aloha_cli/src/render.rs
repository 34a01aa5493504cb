use aloha_client::UserService;
use aloha_types::*;
use aloha_utils::LogColors;
use async_trait::async_trait;
use futures::future::join_all;
use std::collections::{BTreeSet, HashMap};
use tabled::settings::object::{Columns, Rows};
use tabled::settings::{format::Format, Alignment, Color, Style, Width};
use tabled::builder::Builder;
use tabled::{Table, Tabled};
use tracing::warn;

/// Pages within this distance of the current one are always shown
const PAGER_DELTA: u32 = 2;
const MAX_COLUMN_WIDTH: usize = 60;

pub const NO_GROUP: &str = "None";
pub const UNKNOWN_GROUP: &str = "Unknown Group";
pub const UNKNOWN_AUTHOR: &str = "Unknown";
pub const UNKNOWN_PERMISSION: &str = "Unknown Permission";

/// How a record type shows up as a table row
pub trait Listing: Record {
    type Row: Tabled;

    const EMPTY_STATE: &'static str;
}

impl Listing for User {
    type Row = UserRow;
    const EMPTY_STATE: &'static str = "No users found. Create your first one!";
}

impl Listing for UserGroup {
    type Row = UserGroupRow;
    const EMPTY_STATE: &'static str = "No user groups found. Create your first one!";
}

impl Listing for Permission {
    type Row = PermissionRow;
    const EMPTY_STATE: &'static str = "No permissions found. Create your first one!";
}

impl Listing for Tweet {
    type Row = TweetRow;
    const EMPTY_STATE: &'static str = "No tweets found";
}

impl Listing for GroupPermission {
    type Row = GroupPermissionRow;
    const EMPTY_STATE: &'static str = "No group permissions found";
}

impl Listing for UserPermission {
    type Row = UserPermissionRow;
    const EMPTY_STATE: &'static str = "No user permissions found";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(u32),
    Ellipsis,
}

/// First, last and the pages around `current`. A gap of a single page is
/// filled in, wider gaps collapse into an ellipsis. `current` is always
/// part of the window, even past `total`.
pub fn visible_pages(current: u32, total: u32) -> Vec<PageMarker> {
    let current = current.max(1);
    let last = total.max(current);

    let window: Vec<u32> = (1..=last)
        .filter(|&page| {
            page == 1
                || page == last
                || (page + PAGER_DELTA >= current && page <= current + PAGER_DELTA)
        })
        .collect();

    let mut markers = Vec::with_capacity(window.len() + 2);
    let mut last: Option<u32> = None;

    for page in window {
        if let Some(previous) = last {
            if page - previous == 2 {
                markers.push(PageMarker::Page(previous + 1));
            } else if page - previous != 1 {
                markers.push(PageMarker::Ellipsis);
            }
        }
        markers.push(PageMarker::Page(page));
        last = Some(page);
    }

    markers
}

/// One line pager such as `< 1 ... 4 [5] 6 ... 9 >  page 5 of 9, 87 total`
pub fn pager_line(pagination: &Pagination) -> String {
    let total_pages = pagination.total_pages().max(pagination.page);
    let pages: Vec<String> = visible_pages(pagination.page, total_pages)
        .into_iter()
        .map(|marker| match marker {
            PageMarker::Page(page) if page == pagination.page => {
                LogColors::green(&format!("[{}]", page))
            }
            PageMarker::Page(page) => page.to_string(),
            PageMarker::Ellipsis => "...".to_string(),
        })
        .collect();

    let prev = if pagination.prev_page.is_some() { "<" } else { " " };
    let next = if pagination.next_page.is_some() { ">" } else { " " };

    format!(
        "{} {} {}  {}",
        prev,
        pages.join(" "),
        next,
        LogColors::dim(&format!(
            "page {} of {}, {} total, {} per page",
            pagination.page, total_pages, pagination.total, pagination.size
        ))
    )
}

fn styled(mut table: Table) -> String {
    table.with(Style::sharp());
    table.modify(Columns::new(..), Width::wrap(MAX_COLUMN_WIDTH));
    table.modify(
        Rows::first(),
        (
            Format::content(|s| LogColors::green(s)),
            Alignment::center(),
            Color::BOLD,
        ),
    );

    table.to_string()
}

pub fn table<R: Tabled>(rows: Vec<R>) -> String {
    styled(Table::new(rows))
}

/// Same as `table` with a leading `#` column counting rows from 1
pub fn numbered_table<R: Tabled>(rows: Vec<R>) -> String {
    let mut builder = Builder::default();

    let mut header = vec!["#".to_string()];
    header.extend(R::headers().into_iter().map(|h| h.into_owned()));
    builder.push_record(header);

    for (index, row) in rows.iter().enumerate() {
        let mut record = vec![(index + 1).to_string()];
        record.extend(row.fields().into_iter().map(|f| f.into_owned()));
        builder.push_record(record);
    }

    styled(builder.build())
}

/// Table of one page, or the empty message when nothing matched
pub fn page_view<R: Tabled>(
    title: &str,
    rows: Vec<R>,
    pagination: &Pagination,
    empty: &str,
    numbered: bool,
) -> String {
    let body = if rows.is_empty() {
        LogColors::dim(empty)
    } else if numbered {
        numbered_table(rows)
    } else {
        table(rows)
    };

    format!(
        "{}\n{}\n{}",
        LogColors::purple(title),
        body,
        pager_line(pagination)
    )
}

pub fn rows<T: Listing>(items: &[T]) -> Vec<T::Row>
where
    for<'a> T::Row: From<&'a T>,
{
    items.iter().map(|item| T::Row::from(item)).collect()
}

/// Builds the table rows for one page of records
#[async_trait]
pub trait PageRows<T: Sync>: Sync {
    type Row: Tabled + Send;

    async fn rows(&self, items: &[T]) -> Vec<Self::Row>;
}

/// Rows taken straight from the records
pub struct PlainRows;

#[async_trait]
impl<T> PageRows<T> for PlainRows
where
    T: Listing + Sync,
    T::Row: Send,
    for<'a> T::Row: From<&'a T>,
{
    type Row = T::Row;

    async fn rows(&self, items: &[T]) -> Vec<T::Row> {
        rows(items)
    }
}

/// Group id to name, built from one page of groups
#[derive(Debug, Clone, Default)]
pub struct GroupLookup {
    names: HashMap<String, String>,
}

impl GroupLookup {
    pub fn new(groups: &[UserGroup]) -> Self {
        GroupLookup {
            names: groups
                .iter()
                .map(|g| (g.id.clone(), g.group_name.clone()))
                .collect(),
        }
    }

    pub fn name(&self, group_id: Option<&str>) -> &str {
        match group_id {
            None => NO_GROUP,
            Some(id) => self
                .names
                .get(id)
                .map(String::as_str)
                .unwrap_or(UNKNOWN_GROUP),
        }
    }

    pub fn rows(&self, users: &[User]) -> Vec<UserRow> {
        users
            .iter()
            .map(|user| user.to_row(self.name(user.user_group_id.as_deref())))
            .collect()
    }
}

#[async_trait]
impl PageRows<User> for GroupLookup {
    type Row = UserRow;

    async fn rows(&self, items: &[User]) -> Vec<UserRow> {
        GroupLookup::rows(self, items)
    }
}

/// User id to username for the authors of a page of tweets
#[derive(Debug, Clone, Default)]
pub struct AuthorLookup {
    names: HashMap<String, String>,
}

impl AuthorLookup {
    pub fn new(users: &[User]) -> Self {
        AuthorLookup {
            names: users
                .iter()
                .map(|u| (u.id.clone(), u.username.clone()))
                .collect(),
        }
    }

    /// Loads every distinct author concurrently. Authors that fail to load
    /// are left out and show as unknown.
    pub async fn fetch(users: &UserService, tweets: &[Tweet]) -> Self {
        let ids: BTreeSet<&str> = tweets.iter().map(|t| t.user_id.as_str()).collect();
        let results = join_all(ids.iter().map(|id| users.get_by_id(id))).await;

        let mut found = Vec::with_capacity(results.len());
        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(user) => found.push(user),
                Err(e) => warn!("Failed to load author {}: {}", id, e),
            }
        }

        AuthorLookup::new(&found)
    }

    pub fn name(&self, user_id: &str) -> &str {
        self.names
            .get(user_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_AUTHOR)
    }

    pub fn rows(&self, tweets: &[Tweet]) -> Vec<TweetRow> {
        tweets
            .iter()
            .map(|tweet| tweet.to_row(self.name(&tweet.user_id)))
            .collect()
    }
}

/// Resolves the authors of each page as it is shown
pub struct TweetAuthors {
    users: UserService,
}

impl TweetAuthors {
    pub fn new(users: UserService) -> Self {
        TweetAuthors { users }
    }
}

#[async_trait]
impl PageRows<Tweet> for TweetAuthors {
    type Row = TweetRow;

    async fn rows(&self, items: &[Tweet]) -> Vec<TweetRow> {
        AuthorLookup::fetch(&self.users, items).await.rows(items)
    }
}

/// Permission id to name, built from the permission catalog
#[derive(Debug, Clone, Default)]
pub struct PermissionLookup {
    names: HashMap<String, String>,
}

impl PermissionLookup {
    pub fn new(permissions: &[Permission]) -> Self {
        PermissionLookup {
            names: permissions
                .iter()
                .map(|p| (p.id.clone(), p.name.clone()))
                .collect(),
        }
    }

    pub fn name(&self, permission_id: &str) -> &str {
        self.names
            .get(permission_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_PERMISSION)
    }

    pub fn rows<'a>(
        &self,
        permission_ids: impl IntoIterator<Item = &'a str>,
    ) -> Vec<AssignedPermissionRow> {
        permission_ids
            .into_iter()
            .map(|id| AssignedPermissionRow {
                name: self.name(id).to_string(),
                permission_id: id.to_string(),
            })
            .collect()
    }
}
