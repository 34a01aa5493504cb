#[derive(Debug, Clone, PartialEq)]
pub enum Routes {
    Users,
    User(String),
    UserGroups,
    UserGroup(String),
    Permissions,
    Permission(String),
    Tweets,
    Tweet(String),
    GroupPermissions,
    GroupPermissionsByGroup(String),
    GroupPermissionsByPermission(String),
    UserPermissions,
    UserPermissionsByUser(String),
    UserPermissionsByPermission(String),
    Login,
    Logout,
}

impl Routes {
    /// Path segments relative to the api base path. Ids stay a single
    /// segment; encoding happens when the url is built.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Routes::Users => vec!["users"],
            Routes::User(id) => vec!["users", id.as_str()],
            Routes::UserGroups => vec!["user_groups"],
            Routes::UserGroup(id) => vec!["user_groups", id.as_str()],
            Routes::Permissions => vec!["permissions"],
            Routes::Permission(id) => vec!["permissions", id.as_str()],
            Routes::Tweets => vec!["tweets"],
            Routes::Tweet(id) => vec!["tweets", id.as_str()],
            Routes::GroupPermissions => vec!["group_permissions"],
            Routes::GroupPermissionsByGroup(id) => vec!["group_permissions", "group", id.as_str()],
            Routes::GroupPermissionsByPermission(id) => {
                vec!["group_permissions", "permission", id.as_str()]
            }
            Routes::UserPermissions => vec!["user_permissions"],
            Routes::UserPermissionsByUser(id) => vec!["user_permissions", "user", id.as_str()],
            Routes::UserPermissionsByPermission(id) => {
                vec!["user_permissions", "permission", id.as_str()]
            }
            Routes::Login => vec!["auth", "login"],
            Routes::Logout => vec!["auth", "logout"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments() {
        assert_eq!(
            Routes::UserGroup("g-1".to_string()).segments(),
            vec!["user_groups", "g-1"]
        );
        assert_eq!(
            Routes::GroupPermissionsByPermission("p-1".to_string()).segments(),
            vec!["group_permissions", "permission", "p-1"]
        );
        assert_eq!(
            Routes::UserPermissionsByUser("a/b".to_string()).segments(),
            vec!["user_permissions", "user", "a/b"]
        );
        assert_eq!(Routes::Logout.segments(), vec!["auth", "logout"]);
    }
}
