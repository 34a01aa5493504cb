use crate::models::*;
use crate::timestamp::Timestamp;
use tabled::Tabled;

const MISSING: &str = "-";

fn display_time(timestamp: &Option<Timestamp>) -> String {
    timestamp
        .map(|t| t.to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

#[derive(Tabled)]
pub struct UserRow {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "Username")]
    pub username: String,

    #[tabled(rename = "User Group")]
    pub user_group: String,

    #[tabled(rename = "Created At")]
    pub created_at: String,
}

impl User {
    /// The group column shows a name, resolved by the caller
    pub fn to_row(&self, group_name: &str) -> UserRow {
        UserRow {
            id: self.id.clone(),
            username: self.username.clone(),
            user_group: group_name.to_string(),
            created_at: display_time(&self.created_at),
        }
    }
}

#[derive(Tabled)]
pub struct UserGroupRow {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "Group Name")]
    pub group_name: String,

    #[tabled(rename = "Created At")]
    pub created_at: String,
}

impl From<&UserGroup> for UserGroupRow {
    fn from(group: &UserGroup) -> Self {
        UserGroupRow {
            id: group.id.clone(),
            group_name: group.group_name.clone(),
            created_at: display_time(&group.created_at),
        }
    }
}

#[derive(Tabled)]
pub struct PermissionRow {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "Name")]
    pub name: String,

    #[tabled(rename = "Description")]
    pub description: String,

    #[tabled(rename = "Created At")]
    pub created_at: String,
}

impl From<&Permission> for PermissionRow {
    fn from(permission: &Permission) -> Self {
        PermissionRow {
            id: permission.id.clone(),
            name: permission.name.clone(),
            description: permission
                .description
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| MISSING.to_string()),
            created_at: display_time(&permission.created_at),
        }
    }
}

#[derive(Tabled)]
pub struct TweetRow {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "Content")]
    pub content: String,

    #[tabled(rename = "Author")]
    pub author: String,

    #[tabled(rename = "Created At")]
    pub created_at: String,

    #[tabled(rename = "Updated At")]
    pub updated_at: String,
}

impl Tweet {
    /// The author column shows a username, resolved by the caller
    pub fn to_row(&self, author: &str) -> TweetRow {
        TweetRow {
            id: self.id.clone(),
            content: self.content.clone(),
            author: author.to_string(),
            created_at: display_time(&self.created_at),
            updated_at: display_time(&self.updated_at),
        }
    }
}

/// A permission assigned to one group or user
#[derive(Tabled)]
pub struct AssignedPermissionRow {
    #[tabled(rename = "Permission")]
    pub name: String,

    #[tabled(rename = "Permission ID")]
    pub permission_id: String,
}

#[derive(Tabled)]
pub struct GroupPermissionRow {
    #[tabled(rename = "Group ID")]
    pub group_id: String,

    #[tabled(rename = "Permission ID")]
    pub permission_id: String,

    #[tabled(rename = "Created At")]
    pub created_at: String,
}

impl From<&GroupPermission> for GroupPermissionRow {
    fn from(record: &GroupPermission) -> Self {
        GroupPermissionRow {
            group_id: record.group_id.clone(),
            permission_id: record.permission_id.clone(),
            created_at: display_time(&record.created_at),
        }
    }
}

#[derive(Tabled)]
pub struct UserPermissionRow {
    #[tabled(rename = "User ID")]
    pub user_id: String,

    #[tabled(rename = "Permission ID")]
    pub permission_id: String,

    #[tabled(rename = "Created At")]
    pub created_at: String,
}

impl From<&UserPermission> for UserPermissionRow {
    fn from(record: &UserPermission) -> Self {
        UserPermissionRow {
            user_id: record.user_id.clone(),
            permission_id: record.permission_id.clone(),
            created_at: display_time(&record.created_at),
        }
    }
}
