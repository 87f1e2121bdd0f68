#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

use std::fmt;

use grid_shared::{PublicUser, User};

use gloo_storage::{LocalStorage, Storage};

const USERS_STORAGE_KEY: &str = "the-grid:users";
const CURRENT_USER_KEY: &str = "currentUser";

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 13;
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    InvalidCredentials,
    UsernameLength,
    InvalidEmail,
    PasswordTooShort,
    AlreadyExists,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::InvalidCredentials => "Invalid username or password",
            Self::UsernameLength => "Username must be 3-13 characters",
            Self::InvalidEmail => "Invalid email address",
            Self::PasswordTooShort => "Password must be at least 8 characters",
            Self::AlreadyExists => "Username or email already taken",
        };
        f.write_str(msg)
    }
}

/// Account seam for the UI. Plaintext credential matching against local
/// storage stands in for a real backend; the trait keeps the swap cheap.
pub trait UserStore {
    fn login(&self, username_or_email: &str, password: &str) -> Result<PublicUser, AuthError>;
    fn sign_up(&self, username: &str, email: &str, password: &str)
    -> Result<PublicUser, AuthError>;
    fn logout(&self);
    fn current_user(&self) -> Option<PublicUser>;
    fn all_users(&self) -> Vec<PublicUser>;
    /// Bump a user's owned-square count after a completed purchase.
    fn record_purchase(&self, username: &str) -> Option<PublicUser>;
}

pub fn validate_username(username: &str) -> Result<(), AuthError> {
    let len = username.chars().count();
    if (MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        Ok(())
    } else {
        Err(AuthError::UsernameLength)
    }
}

/// Same shape check the sign-up form applies: one `@`, no whitespace, and a
/// dot somewhere in the domain with characters on both sides.
pub fn validate_email(email: &str) -> Result<(), AuthError> {
    if email.chars().any(char::is_whitespace) {
        return Err(AuthError::InvalidEmail);
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(AuthError::InvalidEmail);
    };
    if local.is_empty() || domain.contains('@') {
        return Err(AuthError::InvalidEmail);
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(AuthError::InvalidEmail),
    }
}

pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(AuthError::PasswordTooShort)
    }
}

/// Two demo accounts so the app is explorable before anyone signs up.
fn seed_users() -> Vec<User> {
    vec![
        User {
            username: "user1".into(),
            email: "user1@example.com".into(),
            password: Some("password1".into()),
            squares_owned: 3,
        },
        User {
            username: "user2".into(),
            email: "user2@example.com".into(),
            password: Some("password2".into()),
            squares_owned: 5,
        },
    ]
}

#[derive(Clone, Copy, Default)]
pub struct LocalUserStore;

impl LocalUserStore {
    fn load_users(&self) -> Vec<User> {
        match LocalStorage::get(USERS_STORAGE_KEY) {
            Ok(users) => users,
            Err(_) => {
                let users = seed_users();
                self.write_users(&users);
                users
            }
        }
    }

    fn write_users(&self, users: &[User]) {
        if let Err(err) = LocalStorage::set(USERS_STORAGE_KEY, users) {
            web_sys::console::warn_1(&format!("failed to persist users: {err}").into());
        }
    }

    fn set_current(&self, user: &PublicUser) {
        if let Err(err) = LocalStorage::set(CURRENT_USER_KEY, user) {
            web_sys::console::warn_1(&format!("failed to persist session: {err}").into());
        }
    }
}

impl UserStore for LocalUserStore {
    fn login(&self, username_or_email: &str, password: &str) -> Result<PublicUser, AuthError> {
        let users = self.load_users();
        let user = users
            .iter()
            .find(|u| {
                (u.username == username_or_email || u.email == username_or_email)
                    && u.password.as_deref() == Some(password)
            })
            .ok_or(AuthError::InvalidCredentials)?;
        let public = PublicUser::from(user);
        self.set_current(&public);
        Ok(public)
    }

    fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<PublicUser, AuthError> {
        validate_username(username)?;
        validate_email(email)?;
        validate_password(password)?;

        let mut users = self.load_users();
        if users.iter().any(|u| u.username == username || u.email == email) {
            return Err(AuthError::AlreadyExists);
        }

        let user = User {
            username: username.to_string(),
            email: email.to_string(),
            password: Some(password.to_string()),
            squares_owned: 0,
        };
        let public = PublicUser::from(&user);
        users.push(user);
        self.write_users(&users);
        self.set_current(&public);
        Ok(public)
    }

    fn logout(&self) {
        LocalStorage::delete(CURRENT_USER_KEY);
    }

    fn current_user(&self) -> Option<PublicUser> {
        LocalStorage::get(CURRENT_USER_KEY).ok()
    }

    fn all_users(&self) -> Vec<PublicUser> {
        self.load_users().iter().map(PublicUser::from).collect()
    }

    fn record_purchase(&self, username: &str) -> Option<PublicUser> {
        let mut users = self.load_users();
        let user = users.iter_mut().find(|u| u.username == username)?;
        user.squares_owned += 1;
        let public = PublicUser::from(&*user);
        self.write_users(&users);
        if self
            .current_user()
            .is_some_and(|current| current.username == username)
        {
            self.set_current(&public);
        }
        Some(public)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_length_bounds() {
        assert!(validate_username("abc").is_ok());
        assert!(validate_username("thirteenchars").is_ok());
        assert_eq!(validate_username("ab"), Err(AuthError::UsernameLength));
        assert_eq!(
            validate_username("fourteen_chars"),
            Err(AuthError::UsernameLength)
        );
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("user1@example.com").is_ok());
        assert!(validate_email("a@b.co").is_ok());
        for bad in [
            "",
            "no-at-sign.com",
            "@example.com",
            "user@nodot",
            "user@.com",
            "user@example.",
            "two@@example.com",
            "has space@example.com",
        ] {
            assert_eq!(validate_email(bad), Err(AuthError::InvalidEmail), "{bad}");
        }
    }

    #[test]
    fn password_minimum_length() {
        assert!(validate_password("12345678").is_ok());
        assert_eq!(
            validate_password("1234567"),
            Err(AuthError::PasswordTooShort)
        );
    }

    #[test]
    fn seeded_demo_accounts() {
        let users = seed_users();
        assert_eq!(users.len(), 2);
        assert!(users.iter().all(|u| u.password.is_some()));
        assert_eq!(users[1].squares_owned, 5);
    }

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(
            AuthError::PasswordTooShort.to_string(),
            "Password must be at least 8 characters"
        );
    }
}
