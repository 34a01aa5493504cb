use aloha_client::AuthService;
use aloha_error::{AuthError, ServiceError};
use aloha_types::{LoginCredentials, LoginResponse, Validate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The signed in operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub user_group_id: Option<String>,
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Session {
            user_id: response.user_id,
            username: response.username,
            user_group_id: response.user_group_id,
        }
    }
}

/// Persists the session as a json file
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Session>, AuthError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AuthError::Store(e.to_string())),
        };

        let session: Session = serde_json::from_str(&contents)
            .map_err(|e| AuthError::Store(format!("Corrupt session file: {}", e)))?;

        if session.user_id.is_empty() {
            return Ok(None);
        }
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AuthError::Store(e.to_string()))?;
        }

        let contents =
            serde_json::to_string_pretty(session).map_err(|e| AuthError::Store(e.to_string()))?;
        fs::write(&self.path, contents).map_err(|e| AuthError::Store(e.to_string()))?;

        debug!("Saved session to {}", self.path.display());
        Ok(())
    }

    /// Removing a session that does not exist is fine
    pub fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::Store(e.to_string())),
        }
    }
}

/// Decides whether a command may run and owns sign in and sign out
pub struct AuthGate<A: AuthService> {
    auth: A,
    store: SessionStore,
}

impl<A: AuthService> AuthGate<A> {
    pub fn new(auth: A, store: SessionStore) -> Self {
        Self { auth, store }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// One request; on any failure a leftover session is removed
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Session, AuthError> {
        credentials.validate().map_err(AuthError::Validation)?;

        let response = match self.auth.login(credentials).await {
            Ok(response) if !response.user_id.is_empty() => response,
            Ok(_) => {
                self.discard_session();
                return Err(AuthError::Login(ServiceError::InvalidArgument(
                    "Login response did not include a user id".to_string(),
                )));
            }
            Err(e) => {
                self.discard_session();
                return Err(AuthError::Login(e));
            }
        };

        let session = Session::from(response);
        self.store.save(&session)?;

        info!("Signed in as {}", session.username);
        Ok(session)
    }

    /// Local state is cleared even when the server call fails
    pub async fn logout(&self) -> Result<(), AuthError> {
        if let Err(e) = self.auth.logout().await {
            warn!("Logout request failed: {}", e);
        }

        self.store.clear()?;
        info!("Signed out");
        Ok(())
    }

    /// An unreadable session file counts as signed out
    pub fn current(&self) -> Option<Session> {
        match self.store.load() {
            Ok(session) => session,
            Err(e) => {
                warn!("Ignoring session: {}", e);
                None
            }
        }
    }

    pub fn require(&self) -> Result<Session, AuthError> {
        self.current().ok_or(AuthError::NotAuthenticated)
    }

    fn discard_session(&self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear session: {}", e);
        }
    }
}
