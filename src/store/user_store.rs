use super::core::DbOperations;
use crate::error::{TextfoldError, TextfoldResult};
use serde::{Deserialize, Serialize};

/// A registered account as persisted in the users tree.
///
/// `username` doubles as the owner identity on analysis records; `email` is
/// the login key. Only the argon2 hash of the password is ever stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub fullname: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

impl DbOperations {
    /// Persists a new user. Fails when the email or the username is taken -
    /// the username is the ownership key for all records, so it must be
    /// unique too.
    pub fn insert_user(&self, user: &StoredUser) -> TextfoldResult<()> {
        if self.find_user_by_email(&user.email)?.is_some() {
            return Err(TextfoldError::Database(format!(
                "Email '{}' is already registered",
                user.email
            )));
        }
        if self.find_user_by_username(&user.username)?.is_some() {
            return Err(TextfoldError::Database(format!(
                "Username '{}' is already taken",
                user.username
            )));
        }
        self.store_in_tree(&self.users_tree, &user.email, user)
    }

    /// Looks a user up by login email.
    pub fn find_user_by_email(&self, email: &str) -> TextfoldResult<Option<StoredUser>> {
        self.get_from_tree(&self.users_tree, email)
    }

    /// Looks a user up by username, the identity carried in access tokens.
    pub fn find_user_by_username(&self, username: &str) -> TextfoldResult<Option<StoredUser>> {
        let users: Vec<StoredUser> = self.list_items_in_tree(&self.users_tree)?;
        Ok(users.into_iter().find(|u| u.username == username))
    }
}
