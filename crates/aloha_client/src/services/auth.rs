use crate::http::client::{AlohaApiClient, RequestType};
use crate::http::routes::Routes;
use crate::services::contracts::AuthService;
use crate::services::resource::to_body;
use aloha_error::ServiceError;
use aloha_types::{LoginCredentials, LoginResponse};
use async_trait::async_trait;
use tracing::info;

#[derive(Debug, Clone)]
pub struct AuthClient {
    client: AlohaApiClient,
}

impl AuthClient {
    pub fn new(client: AlohaApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthService for AuthClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginResponse, ServiceError> {
        let response = self
            .client
            .request_as::<LoginResponse>(
                Routes::Login,
                RequestType::Post,
                Some(to_body(credentials)?),
                None,
            )
            .await?;

        info!("Logged in as {}", response.username);
        Ok(response)
    }

    async fn logout(&self) -> Result<(), ServiceError> {
        self.client
            .request(Routes::Logout, RequestType::Post, None, None)
            .await?;
        Ok(())
    }
}
