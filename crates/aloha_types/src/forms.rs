use aloha_error::ValidationErrors;
use serde::{Deserialize, Serialize};

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_TWEET_LENGTH: usize = 280;

/// Local, field keyed checks run before a form is submitted
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

pub(crate) fn require(errors: &mut ValidationErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.add(field, message);
    }
}

fn check_password(errors: &mut ValidationErrors, password: &str) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            "password",
            &format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            ),
        );
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    pub user_group_id: Option<String>,
}

impl Validate for CreateUser {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "username", &self.username, "Username is required");

        if self.password.trim().is_empty() {
            errors.add("password", "Password is required");
        } else {
            check_password(&mut errors, &self.password);
        }

        errors.into_result()
    }
}

/// Edit form for a user. A missing password keeps the current one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateUser {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub user_group_id: Option<String>,
}

impl Validate for UpdateUser {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "username", &self.username, "Username is required");

        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            check_password(&mut errors, password);
        }

        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserGroup {
    pub group_name: String,
}

impl Validate for CreateUserGroup {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "group_name", &self.group_name, "Group name is required");
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateUserGroup {
    pub id: String,
    pub group_name: String,
}

impl Validate for UpdateUserGroup {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "group_name", &self.group_name, "Group name is required");
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePermission {
    pub name: String,
    pub description: Option<String>,
}

impl Validate for CreatePermission {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "name", &self.name, "Permission name is required");
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePermission {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

impl Validate for UpdatePermission {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "name", &self.name, "Permission name is required");
        errors.into_result()
    }
}

fn check_tweet(errors: &mut ValidationErrors, content: &str) {
    require(errors, "content", content, "Tweet content is required");
    if content.chars().count() > MAX_TWEET_LENGTH {
        errors.add(
            "content",
            &format!("Tweet must be at most {} characters", MAX_TWEET_LENGTH),
        );
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTweet {
    pub content: String,
}

impl Validate for CreateTweet {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_tweet(&mut errors, &self.content);
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTweet {
    pub id: String,
    pub content: String,
}

impl Validate for UpdateTweet {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_tweet(&mut errors, &self.content);
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGroupPermission {
    pub group_id: String,
    pub permission_id: String,
}

impl Validate for CreateGroupPermission {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "group_id", &self.group_id, "Group is required");
        require(&mut errors, "permission_id", &self.permission_id, "Permission is required");
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserPermission {
    pub user_id: String,
    pub permission_id: String,
}

impl Validate for CreateUserPermission {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "user_id", &self.user_id, "User is required");
        require(&mut errors, "permission_id", &self.permission_id, "Permission is required");
        errors.into_result()
    }
}
