//! Local accounts and the current session.
//!
//! Passwords are stored as Argon2id PHC strings with a random per-account
//! salt. Only [`Session`] values ever leave this module; hashes stay in the
//! `accounts` table.

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::error::{AuthError, Result, ValidationError};
use crate::records::{new_id, ProfileUpdate, Session};
use crate::storage::RecordStore;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

const CURRENT_USER_KEY: &str = "current_user";

/// Hash a password with a fresh random salt.
///
/// # Errors
/// [`AuthError::Hashing`] if the hasher fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Check a password against a stored PHC hash.
///
/// # Errors
/// [`AuthError::Hashing`] if the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hashing(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "name".to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        });
    if !valid || email.contains(char::is_whitespace) {
        return Err(ValidationError::InvalidValue {
            field: "email".to_string(),
            message: format!("'{email}' is not an email address"),
        });
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Account operations over a record store's database.
pub struct Accounts<'a> {
    store: &'a RecordStore,
}

impl<'a> Accounts<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    fn find_by_email(&self, email: &str) -> Result<Option<(Session, String)>> {
        Ok(self
            .store
            .conn()
            .query_row(
                "SELECT id, name, email, password_hash FROM accounts WHERE email = ?1",
                params![email.trim()],
                |row| {
                    Ok((
                        Session {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            email: row.get(2)?,
                        },
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?)
    }

    fn password_hash(&self, user_id: &str) -> Result<Option<String>> {
        Ok(self
            .store
            .conn()
            .query_row(
                "SELECT password_hash FROM accounts WHERE id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn find_by_id(&self, user_id: &str) -> Result<Option<Session>> {
        Ok(self
            .store
            .conn()
            .query_row(
                "SELECT id, name, email FROM accounts WHERE id = ?1",
                params![user_id],
                |row| {
                    Ok(Session {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                    })
                },
            )
            .optional()?)
    }

    /// Create an account and log it in.
    ///
    /// # Errors
    /// Validation errors for an empty name, malformed email or short password;
    /// [`AuthError::EmailTaken`] when the email is already registered.
    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<Session> {
        let name = name.trim();
        let email = email.trim();
        validate_name(name)?;
        validate_email(email)?;
        validate_password(password)?;

        if self.find_by_email(email)?.is_some() {
            return Err(AuthError::EmailTaken(email.to_string()).into());
        }

        let session = Session {
            id: new_id(),
            name: name.to_string(),
            email: email.to_string(),
        };
        self.store.conn().execute(
            "INSERT INTO accounts (id, name, email, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session.id,
                session.name,
                session.email,
                hash_password(password)?,
                Utc::now().to_rfc3339(),
            ],
        )?;
        self.store.kv_set(CURRENT_USER_KEY, &session.id)?;
        tracing::info!(user_id = %session.id, "registered account");
        Ok(session)
    }

    /// Log in by email and password.
    ///
    /// # Errors
    /// [`AuthError::InvalidCredentials`] for an unknown email or wrong password.
    pub fn login(&self, email: &str, password: &str) -> Result<Session> {
        let (session, hash) = self
            .find_by_email(email)?
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, &hash)? {
            tracing::warn!(user_id = %session.id, "rejected login");
            return Err(AuthError::InvalidCredentials.into());
        }
        self.store.kv_set(CURRENT_USER_KEY, &session.id)?;
        tracing::info!(user_id = %session.id, "logged in");
        Ok(session)
    }

    pub fn logout(&self) -> Result<()> {
        self.store.kv_delete(CURRENT_USER_KEY)
    }

    /// The logged-in account, if any. A session pointing at a deleted account
    /// is cleared and reported as logged out.
    pub fn current_session(&self) -> Result<Option<Session>> {
        let Some(user_id) = self.store.kv_get(CURRENT_USER_KEY)? else {
            return Ok(None);
        };
        let session = self.find_by_id(&user_id)?;
        if session.is_none() {
            tracing::warn!(%user_id, "session refers to a missing account");
            self.logout()?;
        }
        Ok(session)
    }

    /// The logged-in account.
    ///
    /// # Errors
    /// [`AuthError::NotLoggedIn`] when no one is logged in.
    pub fn require_session(&self) -> Result<Session> {
        self.current_session()?
            .ok_or_else(|| AuthError::NotLoggedIn.into())
    }

    /// Apply a partial profile update and return the refreshed session.
    ///
    /// # Errors
    /// [`AuthError::AccountNotFound`] for an unknown id, validation errors as
    /// for [`Accounts::register`], [`AuthError::EmailTaken`] when the new email
    /// belongs to someone else. A new password needs the current one:
    /// [`AuthError::CurrentPasswordRequired`] when it is missing and
    /// [`AuthError::InvalidCredentials`] when it does not match.
    pub fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<Session> {
        let mut session = self
            .find_by_id(user_id)?
            .ok_or_else(|| AuthError::AccountNotFound(user_id.to_string()))?;
        let password_hash = match update.password.as_deref() {
            Some(password) => {
                let current = update
                    .current_password
                    .as_deref()
                    .ok_or(AuthError::CurrentPasswordRequired)?;
                let stored = self
                    .password_hash(user_id)?
                    .ok_or_else(|| AuthError::AccountNotFound(user_id.to_string()))?;
                if !verify_password(current, &stored)? {
                    tracing::warn!(%user_id, "rejected password change");
                    return Err(AuthError::InvalidCredentials.into());
                }
                validate_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        if let Some(name) = update.name {
            validate_name(&name)?;
            session.name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            let email = email.trim().to_string();
            validate_email(&email)?;
            if let Some((other, _)) = self.find_by_email(&email)? {
                if other.id != user_id {
                    return Err(AuthError::EmailTaken(email).into());
                }
            }
            session.email = email;
        }

        let tx = self.store.conn().unchecked_transaction()?;
        tx.execute(
            "UPDATE accounts SET name = ?2, email = ?3 WHERE id = ?1",
            params![user_id, session.name, session.email],
        )?;
        if let Some(hash) = password_hash {
            tx.execute(
                "UPDATE accounts SET password_hash = ?2 WHERE id = ?1",
                params![user_id, hash],
            )?;
        }
        tx.commit()?;
        tracing::info!(%user_id, "updated profile");
        Ok(session)
    }
}

impl RecordStore {
    pub fn accounts(&self) -> Accounts<'_> {
        Accounts::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_salted_and_verifiable() {
        let a = hash_password("correct horse").unwrap();
        let b = hash_password("correct horse").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
        assert!(!a.contains("correct horse"));
        assert!(verify_password("correct horse", &a).unwrap());
        assert!(!verify_password("wrong horse", &a).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(matches!(
            verify_password("x", "not-a-phc-string"),
            Err(AuthError::Hashing(_))
        ));
    }

    #[test]
    fn email_validation() {
        assert!(validate_email("ada@example.com").is_ok());
        for bad in ["", "ada", "@example.com", "ada@example", "ada@.com", "a da@example.com"] {
            assert!(validate_email(bad).is_err(), "{bad} should be rejected");
        }
    }
}
