//! User accounts: creating a user together with its profile, and
//! checking credentials.

use secrecy::SecretString;

use crate::db::profile_repo::{self, ProfileRow};
use crate::db::user_repo::{self, NewUserRow, UserRow};
use crate::db::Database;
use crate::error::Result;
use crate::identity::PasswordHasher;

/// Attributes for a new user. Only `username` and `password` are required.
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub password: SecretString,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }
}

/// Creates a user and its profile in one transaction and returns the user.
///
/// A duplicate username fails with a `Unique` integrity error. If the
/// profile cannot be created the user row is rolled back as well.
pub fn create_user(db: &Database, hasher: &PasswordHasher, new: &NewUser) -> Result<UserRow> {
    let password_hash = hasher.hash(&new.password)?;
    let row = NewUserRow {
        username: new.username.clone(),
        password_hash,
        email: new.email.clone(),
        first_name: new.first_name.clone(),
        last_name: new.last_name.clone(),
    };

    let user = db.with_transaction(|tx| {
        let user = user_repo::insert_with(tx, &row)?;
        profile_repo::insert_with(tx, user.id)?;
        Ok(user)
    })?;

    log::info!("Created user {} (id {}) with profile", user.username, user.id);
    Ok(user)
}

/// Returns the active user matching `username` and `password`.
pub fn authenticate(
    db: &Database,
    hasher: &PasswordHasher,
    username: &str,
    password: &SecretString,
) -> Result<Option<UserRow>> {
    let Some(user) = user_repo::find_by_username(db, username)? else {
        return Ok(None);
    };
    if !user.is_active || !hasher.verify(password, &user.password) {
        log::debug!("Authentication failed for {}", username);
        return Ok(None);
    }
    Ok(Some(user))
}

/// Re-hashes and stores a new password. Returns `false` for an unknown user.
pub fn set_password(
    db: &Database,
    hasher: &PasswordHasher,
    user_id: i64,
    password: &SecretString,
) -> Result<bool> {
    let password_hash = hasher.hash(password)?;
    Ok(user_repo::set_password_hash(db, user_id, &password_hash)?)
}

/// Resolves the `profile` relation of a user.
pub fn profile_of(db: &Database, user_id: i64) -> Result<Option<ProfileRow>> {
    Ok(profile_repo::find_by_user(db, user_id)?)
}
