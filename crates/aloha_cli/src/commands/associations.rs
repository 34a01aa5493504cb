use crate::context::AppContext;
use crate::prompt::confirmer;
use crate::commands::browse::browse;
use crate::render::{page_view, rows, table, Listing, PermissionLookup, PlainRows};
use aloha_client::{Association, AssociationService, PermissionCatalog};
use aloha_controller::{AssociationSync, Confirm, ListController};
use aloha_error::SyncError;
use aloha_types::*;
use aloha_utils::LogColors;
use anyhow::{Context, Result};
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum AssociationCommand {
    /// List one page of assignments
    List {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short, long)]
        size: Option<u32>,
    },
    /// Permissions assigned to PARENT
    Assigned { parent: String },
    /// Assign PERMISSION to PARENT
    Add { parent: String, permission: String },
    /// Remove PERMISSION from PARENT
    Remove {
        parent: String,
        permission: String,
        #[arg(short, long)]
        yes: bool,
    },
    /// Make the permissions of PARENT exactly the given ids
    Sync {
        parent: String,
        permissions: Vec<String>,
    },
    /// Page through assignments interactively
    Browse {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        #[arg(short, long)]
        size: Option<u32>,
    },
}

fn page_query(ctx: &AppContext, page: u32, size: Option<u32>) -> ListQuery {
    ListQuery::new(page.max(1), size.unwrap_or(ctx.page_size()).max(1))
}

pub async fn run<A>(
    ctx: &AppContext,
    service: AssociationService<A>,
    title: &str,
    command: AssociationCommand,
) -> Result<()>
where
    A: Association,
    A::Record: Listing,
    <A::Record as Listing>::Row: Send,
    for<'a> <A::Record as Listing>::Row: From<&'a A::Record>,
{
    let noun = <A::Record as Record>::NOUN;

    match command {
        AssociationCommand::List { page, size } => {
            let page = service
                .list(&page_query(ctx, page, size))
                .await
                .with_context(|| format!("Failed to load {}", <A::Record as Record>::PLURAL))?;

            println!(
                "{}",
                page_view(
                    title,
                    rows(&page.data),
                    &page.pagination,
                    <A::Record as Listing>::EMPTY_STATE,
                    false
                )
            );
        }
        AssociationCommand::Assigned { parent } => {
            let assigned = service
                .list_by_parent(&parent)
                .await
                .with_context(|| format!("Failed to load permissions of {} {}", A::PARENT, parent))?;

            if assigned.is_empty() {
                println!("{}", LogColors::dim("No permissions found."));
            } else {
                let catalog = ctx
                    .permissions()
                    .catalog()
                    .await
                    .context("Failed to load permissions")?;
                let lookup = PermissionLookup::new(&catalog);

                println!(
                    "{}",
                    table(lookup.rows(assigned.iter().map(A::permission_id)))
                );
            }
        }
        AssociationCommand::Add { parent, permission } => {
            let form = A::create_form(&parent, &permission);
            form.validate().context("Invalid input")?;
            service
                .create(&form)
                .await
                .with_context(|| format!("Failed to create {}", noun))?;

            println!(
                "{}",
                LogColors::green(&format!("Assigned {} to {} {}", permission, A::PARENT, parent))
            );
        }
        AssociationCommand::Remove {
            parent,
            permission,
            yes,
        } => {
            let prompt = format!("Are you sure you want to delete this {}?", noun);
            if !confirmer(yes).confirm(&prompt) {
                println!("{}", LogColors::dim("Cancelled"));
                return Ok(());
            }

            service
                .delete(&parent, &permission)
                .await
                .with_context(|| format!("Failed to delete {}", noun))?;

            println!(
                "{}",
                LogColors::green(&format!(
                    "Removed {} from {} {}",
                    permission,
                    A::PARENT,
                    parent
                ))
            );
        }
        AssociationCommand::Sync {
            parent,
            permissions,
        } => sync(ctx, service, &parent, permissions).await?,
        AssociationCommand::Browse { page, size } => {
            let controller = ListController::with_query(service, page_query(ctx, page, size));
            browse(controller, title, PlainRows).await?;
        }
    }

    Ok(())
}

async fn sync<A: Association>(
    ctx: &AppContext,
    service: AssociationService<A>,
    parent: &str,
    permissions: Vec<String>,
) -> Result<()> {
    let mut editor = AssociationSync::new(service, ctx.permissions(), parent);
    editor.load().await?;

    let unknown: Vec<&String> = permissions
        .iter()
        .filter(|id| !editor.permissions().iter().any(|p| &p.id == *id))
        .collect();
    if !unknown.is_empty() {
        anyhow::bail!("Unknown permission id(s): {:?}", unknown);
    }

    editor.set_selected(permissions.iter().cloned());

    let planned = editor.diff();
    if planned.is_empty() {
        println!("{}", LogColors::dim("Permissions already up to date"));
        return Ok(());
    }

    match editor.save().await {
        Ok(plan) => {
            println!(
                "{}",
                LogColors::green(&format!(
                    "Updated permissions of {} {}: {} added, {} removed",
                    A::PARENT,
                    parent,
                    plan.to_add.len(),
                    plan.to_remove.len()
                ))
            );
            Ok(())
        }
        Err(SyncError::Partial {
            failed_adds,
            failed_removes,
            succeeded,
        }) => {
            for id in &failed_adds {
                eprintln!("{}", LogColors::alert(&format!("Failed to add {}", id)));
            }
            for id in &failed_removes {
                eprintln!("{}", LogColors::alert(&format!("Failed to remove {}", id)));
            }
            Err(SyncError::Partial {
                failed_adds,
                failed_removes,
                succeeded,
            }
            .into())
        }
        Err(e) => Err(e.into()),
    }
}
