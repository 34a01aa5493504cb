use crate::commands::is_offered_size;
use crate::prompt::{read_line, StdinConfirm};
use crate::render::{page_view, Listing, PageRows};
use aloha_client::ListService;
use aloha_controller::ListController;
use aloha_error::ControllerError;
use aloha_settings::PAGE_SIZE_OPTIONS;
use aloha_utils::LogColors;
use anyhow::Result;

const HELP: &str = "n next, p prev, g N go to page, s N page size, d N delete row, r refresh, q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseAction {
    Next,
    Prev,
    Goto(u32),
    Size(u32),
    Delete(usize),
    Refresh,
    Quit,
}

impl BrowseAction {
    pub fn parse(input: &str) -> Option<BrowseAction> {
        let mut parts = input.split_whitespace();
        let command = parts.next()?;
        let argument = parts.next();

        if parts.next().is_some() {
            return None;
        }

        match (command, argument) {
            ("n", None) => Some(BrowseAction::Next),
            ("p", None) => Some(BrowseAction::Prev),
            ("r", None) => Some(BrowseAction::Refresh),
            ("q", None) => Some(BrowseAction::Quit),
            ("g", Some(n)) => n.parse().ok().map(BrowseAction::Goto),
            ("s", Some(n)) => n.parse().ok().map(BrowseAction::Size),
            ("d", Some(n)) => n.parse().ok().map(BrowseAction::Delete),
            _ => None,
        }
    }
}

async fn show<S, P>(controller: &ListController<S>, title: &str, page_rows: &P)
where
    S: ListService,
    S::Record: Listing,
    P: PageRows<S::Record>,
{
    let rows = page_rows.rows(controller.items()).await;

    println!(
        "{}",
        page_view(
            title,
            rows,
            controller.pagination(),
            <S::Record as Listing>::EMPTY_STATE,
            true,
        )
    );

    if let Some(error) = controller.error() {
        eprintln!("{}", LogColors::alert(error));
    }
}

async fn apply<S: ListService>(
    controller: &mut ListController<S>,
    action: BrowseAction,
) -> Result<(), ControllerError> {
    match action {
        BrowseAction::Next => match controller.pagination().next_page {
            Some(next) => {
                controller.change_page(next).await?;
            }
            None => println!("{}", LogColors::dim("Already on the last page")),
        },
        BrowseAction::Prev => match controller.pagination().prev_page {
            Some(prev) => {
                controller.change_page(prev).await?;
            }
            None => println!("{}", LogColors::dim("Already on the first page")),
        },
        BrowseAction::Goto(page) => {
            if !controller.change_page(page).await? && page != controller.page() {
                println!(
                    "{}",
                    LogColors::dim(&format!(
                        "Page {} is out of range (1 to {})",
                        page,
                        controller.total_pages()
                    ))
                );
            }
        }
        BrowseAction::Size(size) => {
            if is_offered_size(size) {
                controller.change_page_size(size).await?;
            } else {
                println!(
                    "{}",
                    LogColors::dim(&format!("Page size must be one of {:?}", PAGE_SIZE_OPTIONS))
                );
            }
        }
        BrowseAction::Delete(row) => {
            let item = row
                .checked_sub(1)
                .and_then(|index| controller.items().get(index))
                .cloned();

            match item {
                Some(item) => match controller.request_delete(&item, &StdinConfirm).await {
                    Err(ControllerError::Cancelled) => println!("{}", LogColors::dim("Cancelled")),
                    other => other?,
                },
                None => println!("{}", LogColors::dim(&format!("No row {}", row))),
            }
        }
        BrowseAction::Refresh => {
            controller.refresh().await?;
        }
        BrowseAction::Quit => {}
    }

    Ok(())
}

/// Interactive pager over one collection
pub async fn browse<S, P>(
    mut controller: ListController<S>,
    title: &str,
    page_rows: P,
) -> Result<()>
where
    S: ListService,
    S::Record: Listing,
    P: PageRows<S::Record>,
{
    controller.mount().await?;
    show(&controller, title, &page_rows).await;
    println!("{}", LogColors::dim(HELP));

    while let Some(input) = read_line("> ")? {
        if input.is_empty() {
            continue;
        }

        let action = match BrowseAction::parse(&input) {
            Some(action) => action,
            None => {
                println!("{}", LogColors::dim(HELP));
                continue;
            }
        };

        if action == BrowseAction::Quit {
            break;
        }

        // failures are already recorded on the controller and shown below
        if let Err(e) = apply(&mut controller, action).await {
            tracing::debug!("Browse action failed: {}", e);
        }

        show(&controller, title, &page_rows).await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions() {
        assert_eq!(BrowseAction::parse("n"), Some(BrowseAction::Next));
        assert_eq!(BrowseAction::parse(" g 4 "), Some(BrowseAction::Goto(4)));
        assert_eq!(BrowseAction::parse("s 20"), Some(BrowseAction::Size(20)));
        assert_eq!(BrowseAction::parse("d 2"), Some(BrowseAction::Delete(2)));
        assert_eq!(BrowseAction::parse("q"), Some(BrowseAction::Quit));
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert_eq!(BrowseAction::parse("g"), None);
        assert_eq!(BrowseAction::parse("g x"), None);
        assert_eq!(BrowseAction::parse("n 2"), None);
        assert_eq!(BrowseAction::parse("d 1 2"), None);
        assert_eq!(BrowseAction::parse("x"), None);
    }
}
