use crate::context::AppContext;
use aloha_error::AuthError;
use aloha_types::LoginCredentials;
use aloha_utils::LogColors;
use anyhow::{bail, Result};

pub async fn health(ctx: &AppContext) -> Result<()> {
    if ctx.api().health_check().await {
        println!("{}", LogColors::green("API is healthy"));
        Ok(())
    } else {
        bail!("API is unreachable at {}", ctx.config.api_url)
    }
}

pub async fn login(ctx: &AppContext, username: String, password: String) -> Result<()> {
    let credentials = LoginCredentials { username, password };

    match ctx.gate().login(&credentials).await {
        Ok(session) => {
            println!(
                "{}",
                LogColors::green(&format!("Logged in as {}", session.username))
            );
            Ok(())
        }
        Err(AuthError::Login(e)) => bail!("Invalid username or password ({})", e),
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.gate().logout().await?;
    println!("{}", LogColors::green("Logged out"));
    Ok(())
}

pub fn whoami(ctx: &AppContext) -> Result<()> {
    let session = ctx.require_session()?;

    println!("{} {}", LogColors::purple("User:"), session.username);
    println!("{} {}", LogColors::purple("ID:"), session.user_id);
    println!(
        "{} {}",
        LogColors::purple("Group:"),
        session.user_group_id.as_deref().unwrap_or("None")
    );
    Ok(())
}
