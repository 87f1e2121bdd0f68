use serde::{Deserialize, Serialize};

/// A registered account. The password is only present in the persisted
/// user list; anything that crosses a UI or wire boundary is a `PublicUser`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub squares_owned: u32,
}

/// A user with the password stripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub squares_owned: u32,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            squares_owned: user.squares_owned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_never_carries_a_password() {
        let user = User {
            username: "user1".into(),
            email: "user1@example.com".into(),
            password: Some("password1".into()),
            squares_owned: 3,
        };
        let public = PublicUser::from(&user);
        let json = serde_json::to_value(&public).expect("serialize public user");
        assert!(json.get("password").is_none());
        assert_eq!(json["squaresOwned"], 3);
    }
}
