use aloha_client::*;
use aloha_controller::{AuthGate, Session, SessionStore};
use aloha_settings::AlohaConfig;
use aloha_types::ListQuery;
use aloha_utils::LogColors;
use anyhow::{Context, Result};
use tracing::debug;

/// Groups fetched to resolve user group names
const GROUP_LOOKUP_SIZE: u32 = 100;

/// Everything a command needs, built once per invocation
pub struct AppContext {
    pub config: AlohaConfig,
    api: AlohaApiClient,
}

impl AppContext {
    pub fn new(config: AlohaConfig) -> Result<Self> {
        let settings = config.api_settings();
        let client = build_http_client(&settings)
            .context(LogColors::alert("Failed to build http client"))?;

        debug!("Using api at {}", settings.base_path());

        Ok(Self {
            api: AlohaApiClient::new(&settings, &client),
            config,
        })
    }

    pub fn api(&self) -> &AlohaApiClient {
        &self.api
    }

    pub fn page_size(&self) -> u32 {
        self.config.page_size
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.api.clone())
    }

    pub fn user_groups(&self) -> UserGroupService {
        UserGroupService::new(self.api.clone())
    }

    pub fn permissions(&self) -> PermissionService {
        PermissionService::new(self.api.clone())
    }

    pub fn tweets(&self) -> TweetService {
        TweetService::new(self.api.clone())
    }

    pub fn group_permissions(&self) -> GroupPermissionService {
        GroupPermissionService::new(self.api.clone())
    }

    pub fn user_permissions(&self) -> UserPermissionService {
        UserPermissionService::new(self.api.clone())
    }

    pub fn gate(&self) -> AuthGate<AuthClient> {
        AuthGate::new(
            AuthClient::new(self.api.clone()),
            SessionStore::new(self.config.session_path()),
        )
    }

    /// Fails with a hint to log in when there is no session
    pub fn require_session(&self) -> Result<Session> {
        self.gate()
            .require()
            .context("Run `aloha login` first")
    }

    /// Names of the first page of groups, for the users table
    pub async fn group_lookup(&self) -> Result<crate::render::GroupLookup> {
        let page = self
            .user_groups()
            .list(&ListQuery::new(1, GROUP_LOOKUP_SIZE))
            .await
            .context("Failed to load user groups")?;

        Ok(crate::render::GroupLookup::new(&page.data))
    }
}
