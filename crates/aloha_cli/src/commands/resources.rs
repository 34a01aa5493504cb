use crate::commands::browse::browse;
use crate::commands::{DeleteArgs, ListArgs};
use crate::context::AppContext;
use crate::prompt::confirmer;
use crate::render::{
    page_view, rows, table, AuthorLookup, GroupLookup, Listing, PlainRows, TweetAuthors,
};
use aloha_client::{BulkDelete, Resource, ResourceService};
use aloha_controller::{Confirm, ListController};
use aloha_types::*;
use aloha_utils::LogColors;
use anyhow::{bail, Context, Result};
use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// List one page of users
    List(ListArgs),
    Get {
        id: String,
    },
    Create {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        /// User group id
        #[arg(short, long)]
        group: Option<String>,
    },
    Update {
        id: String,
        #[arg(short, long)]
        username: String,
        /// New password; the current one is kept when omitted
        #[arg(short, long)]
        password: Option<String>,
        #[arg(short, long)]
        group: Option<String>,
    },
    Delete(DeleteArgs),
    /// Delete several users in one request
    DeleteMany {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(short, long)]
        yes: bool,
    },
    /// Page through users interactively
    Browse(ListArgs),
}

#[derive(Subcommand, Debug)]
pub enum GroupCommand {
    /// List one page of user groups
    List(ListArgs),
    Get {
        id: String,
    },
    Create {
        #[arg(short, long)]
        name: String,
    },
    Update {
        id: String,
        #[arg(short, long)]
        name: String,
    },
    Delete(DeleteArgs),
    /// Page through user groups interactively
    Browse(ListArgs),
}

#[derive(Subcommand, Debug)]
pub enum PermissionCommand {
    /// List one page of permissions
    List(ListArgs),
    Get {
        id: String,
    },
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    Update {
        id: String,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    Delete(DeleteArgs),
    /// Page through permissions interactively
    Browse(ListArgs),
}

#[derive(Subcommand, Debug)]
pub enum TweetCommand {
    /// List one page of tweets
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Only tweets of this user
        #[arg(long)]
        user: Option<String>,
    },
    Get {
        id: String,
    },
    Create {
        #[arg(short, long)]
        content: String,
    },
    Update {
        id: String,
        #[arg(short, long)]
        content: String,
    },
    Delete(DeleteArgs),
    /// Delete several tweets in one request
    DeleteMany {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(short, long)]
        yes: bool,
    },
    /// Page through tweets interactively
    Browse {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        user: Option<String>,
    },
}

fn validated<F: Validate>(form: F) -> Result<F> {
    form.validate().context("Invalid input")?;
    Ok(form)
}

fn print_page<T>(title: &str, page: &Page<T>)
where
    T: Listing,
    for<'a> T::Row: From<&'a T>,
{
    println!(
        "{}",
        page_view(title, rows(&page.data), &page.pagination, T::EMPTY_STATE, false)
    );
}

async fn list_page<R: Resource>(
    service: &ResourceService<R>,
    title: &str,
    query: &ListQuery,
) -> Result<()>
where
    R::Record: Listing,
    for<'a> <R::Record as Listing>::Row: From<&'a R::Record>,
{
    let page = service
        .list(query)
        .await
        .with_context(|| format!("Failed to load {}", <R::Record as Record>::PLURAL))?;

    print_page(title, &page);
    Ok(())
}

async fn show_one<R: Resource>(service: &ResourceService<R>, id: &str) -> Result<()>
where
    R::Record: Listing,
    for<'a> <R::Record as Listing>::Row: From<&'a R::Record>,
{
    let record = service
        .get_by_id(id)
        .await
        .with_context(|| format!("Failed to load {} {}", <R::Record as Record>::NOUN, id))?;

    println!("{}", table(rows(std::slice::from_ref(&record))));
    Ok(())
}

async fn delete_one<R: Resource>(service: &ResourceService<R>, args: &DeleteArgs) -> Result<()> {
    let noun = <R::Record as Record>::NOUN;
    let prompt = format!("Are you sure you want to delete this {}?", noun);

    if !confirmer(args.yes).confirm(&prompt) {
        println!("{}", LogColors::dim("Cancelled"));
        return Ok(());
    }

    service
        .delete(&args.id)
        .await
        .with_context(|| format!("Failed to delete {} {}", noun, args.id))?;

    println!("{}", LogColors::green(&format!("Deleted {} {}", noun, args.id)));
    Ok(())
}

async fn delete_many<R: BulkDelete>(
    service: &ResourceService<R>,
    ids: &[String],
    yes: bool,
) -> Result<()> {
    let plural = <R::Record as Record>::PLURAL;
    let prompt = format!("Are you sure you want to delete {} {}?", ids.len(), plural);

    if !confirmer(yes).confirm(&prompt) {
        println!("{}", LogColors::dim("Cancelled"));
        return Ok(());
    }

    let deleted = service
        .delete_many(ids)
        .await
        .with_context(|| format!("Failed to delete {}", plural))?;

    println!("{}", LogColors::green(&format!("Deleted {} {}", deleted, plural)));
    Ok(())
}

fn created(noun: &str, label: &str) {
    println!("{}", LogColors::green(&format!("Created {} {}", noun, label)));
}

fn updated(noun: &str, id: &str) {
    println!("{}", LogColors::green(&format!("Updated {} {}", noun, id)));
}

pub async fn run_users(ctx: &AppContext, command: UserCommand) -> Result<()> {
    let service = ctx.users();

    match command {
        UserCommand::List(args) => {
            let query = args.query(ctx.page_size());
            let page = service.list(&query).await.context("Failed to load users")?;
            let lookup = ctx.group_lookup().await?;

            println!(
                "{}",
                page_view(
                    "Users",
                    lookup.rows(&page.data),
                    &page.pagination,
                    User::EMPTY_STATE,
                    false
                )
            );
        }
        UserCommand::Get { id } => {
            let user = service
                .get_by_id(&id)
                .await
                .with_context(|| format!("Failed to load user {}", id))?;
            let lookup = ctx.group_lookup().await?;

            println!("{}", table(lookup.rows(std::slice::from_ref(&user))));
        }
        UserCommand::Create {
            username,
            password,
            group,
        } => {
            let form = validated(CreateUser {
                username,
                password,
                user_group_id: group,
            })?;
            service.create(&form).await.context("Failed to create user")?;
            created(User::NOUN, &form.username);
        }
        UserCommand::Update {
            id,
            username,
            password,
            group,
        } => {
            let form = validated(UpdateUser {
                id: id.clone(),
                username,
                password,
                user_group_id: group,
            })?;
            service
                .update(&id, &form)
                .await
                .context("Failed to update user")?;
            updated(User::NOUN, &id);
        }
        UserCommand::Delete(args) => delete_one(&service, &args).await?,
        UserCommand::DeleteMany { ids, yes } => delete_many(&service, &ids, yes).await?,
        UserCommand::Browse(args) => {
            let lookup: GroupLookup = ctx.group_lookup().await?;
            let controller = ListController::with_query(service, args.query(ctx.page_size()));
            browse(controller, "Users", lookup).await?;
        }
    }

    Ok(())
}

pub async fn run_groups(ctx: &AppContext, command: GroupCommand) -> Result<()> {
    let service = ctx.user_groups();

    match command {
        GroupCommand::List(args) => {
            list_page(&service, "User Groups", &args.query(ctx.page_size())).await?
        }
        GroupCommand::Get { id } => show_one(&service, &id).await?,
        GroupCommand::Create { name } => {
            let form = validated(CreateUserGroup { group_name: name })?;
            service
                .create(&form)
                .await
                .context("Failed to create user group")?;
            created(UserGroup::NOUN, &form.group_name);
        }
        GroupCommand::Update { id, name } => {
            let form = validated(UpdateUserGroup {
                id: id.clone(),
                group_name: name,
            })?;
            service
                .update(&id, &form)
                .await
                .context("Failed to update user group")?;
            updated(UserGroup::NOUN, &id);
        }
        GroupCommand::Delete(args) => delete_one(&service, &args).await?,
        GroupCommand::Browse(args) => {
            let controller = ListController::with_query(service, args.query(ctx.page_size()));
            browse(controller, "User Groups", PlainRows).await?;
        }
    }

    Ok(())
}

pub async fn run_permissions(ctx: &AppContext, command: PermissionCommand) -> Result<()> {
    let service = ctx.permissions();

    match command {
        PermissionCommand::List(args) => {
            list_page(&service, "Permissions", &args.query(ctx.page_size())).await?
        }
        PermissionCommand::Get { id } => show_one(&service, &id).await?,
        PermissionCommand::Create { name, description } => {
            let form = validated(CreatePermission { name, description })?;
            service
                .create(&form)
                .await
                .context("Failed to create permission")?;
            created(Permission::NOUN, &form.name);
        }
        PermissionCommand::Update {
            id,
            name,
            description,
        } => {
            let form = validated(UpdatePermission {
                id: id.clone(),
                name,
                description,
            })?;
            service
                .update(&id, &form)
                .await
                .context("Failed to update permission")?;
            updated(Permission::NOUN, &id);
        }
        PermissionCommand::Delete(args) => delete_one(&service, &args).await?,
        PermissionCommand::Browse(args) => {
            let controller = ListController::with_query(service, args.query(ctx.page_size()));
            browse(controller, "Permissions", PlainRows).await?;
        }
    }

    Ok(())
}

fn tweet_query(ctx: &AppContext, list: &ListArgs, user: Option<&str>) -> Result<ListQuery> {
    let query = list.query(ctx.page_size());
    match user {
        Some(user) if user.trim().is_empty() => bail!("--user must not be empty"),
        Some(user) => Ok(query.with_filter("user_id", user)),
        None => Ok(query),
    }
}

pub async fn run_tweets(ctx: &AppContext, command: TweetCommand) -> Result<()> {
    let service = ctx.tweets();

    match command {
        TweetCommand::List { list, user } => {
            let page = match user.as_deref() {
                Some(user) => service.list_by_user(&list.query(ctx.page_size()), user).await,
                None => service.list(&list.query(ctx.page_size())).await,
            }
            .context("Failed to load tweets")?;
            let authors = AuthorLookup::fetch(&ctx.users(), &page.data).await;

            println!(
                "{}",
                page_view(
                    "Tweets",
                    authors.rows(&page.data),
                    &page.pagination,
                    Tweet::EMPTY_STATE,
                    false
                )
            );
        }
        TweetCommand::Get { id } => {
            let tweet = service
                .get_by_id(&id)
                .await
                .with_context(|| format!("Failed to load tweet {}", id))?;
            let authors = AuthorLookup::fetch(&ctx.users(), std::slice::from_ref(&tweet)).await;

            println!("{}", table(authors.rows(std::slice::from_ref(&tweet))));
        }
        TweetCommand::Create { content } => {
            let form = validated(CreateTweet { content })?;
            service.create(&form).await.context("Failed to create tweet")?;
            println!("{}", LogColors::green("Created tweet"));
        }
        TweetCommand::Update { id, content } => {
            let form = validated(UpdateTweet {
                id: id.clone(),
                content,
            })?;
            service
                .update(&id, &form)
                .await
                .context("Failed to update tweet")?;
            updated(Tweet::NOUN, &id);
        }
        TweetCommand::Delete(args) => delete_one(&service, &args).await?,
        TweetCommand::DeleteMany { ids, yes } => delete_many(&service, &ids, yes).await?,
        TweetCommand::Browse { list, user } => {
            let query = tweet_query(ctx, &list, user.as_deref())?;
            let controller = ListController::with_query(service, query);
            browse(controller, "Tweets", TweetAuthors::new(ctx.users())).await?;
        }
    }

    Ok(())
}
