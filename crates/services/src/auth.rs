//! Account sign-up/sign-in and bearer-token authentication.

use std::sync::Arc;

use domains::{
    clock, normalize_email, validate_password, Account, AccountRepository, DomainError, DomainResult,
    Identity, PasswordHasher, TokenService,
};
use serde::Deserialize;
use tracing::{info, warn};

pub const NOT_LOGGED_IN: &str = "You are not logged in! Please log in to get access.";
pub const INVALID_TOKEN: &str = "Invalid token. Please log in again!";
pub const ACCOUNT_GONE: &str = "The user belonging to this token no longer exists.";
/// Shared by unknown-email and wrong-password so callers cannot learn which
/// emails are registered.
pub const BAD_CREDENTIALS: &str = "Incorrect email or password";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordChange {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

/// A freshly issued bearer token and the account it speaks for.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub account: Account,
}

#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self { accounts, hasher, tokens }
    }

    /// Creates an account. The password is hashed here, before anything
    /// reaches the store.
    pub async fn signup(&self, credentials: Credentials) -> DomainResult<SessionToken> {
        let email = normalize_email(credentials.email.as_deref().unwrap_or_default())?;
        let password = credentials.password.unwrap_or_default();
        validate_password(&password)?;

        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "An account with email {} already exists",
                email
            )));
        }

        let password_hash = self.hasher.hash(&password).await?;
        let account = self
            .accounts
            .insert(Account::new(email, password_hash, clock::now()))
            .await?;
        info!(account_id = %account.id, "account created");

        let token = self.tokens.issue(account.id)?;
        Ok(SessionToken { token, account })
    }

    pub async fn signin(&self, credentials: Credentials) -> DomainResult<SessionToken> {
        let (Some(email), Some(password)) = (
            credentials.email.filter(|e| !e.trim().is_empty()),
            credentials.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(DomainError::validation("Please provide email and password!"));
        };

        let account = match normalize_email(&email) {
            Ok(email) => self.accounts.find_by_email(&email).await?,
            Err(_) => None,
        };
        let Some(account) = account else {
            warn!("sign-in rejected: unknown email");
            return Err(DomainError::unauthorized(BAD_CREDENTIALS));
        };

        if !self.hasher.verify(&password, &account.password_hash).await? {
            warn!(account_id = %account.id, "sign-in rejected: wrong password");
            return Err(DomainError::unauthorized(BAD_CREDENTIALS));
        }

        let token = self.tokens.issue(account.id)?;
        Ok(SessionToken { token, account })
    }

    /// Requires proof of the current password and returns a token for the
    /// new one.
    pub async fn change_password(
        &self,
        identity: &Identity,
        change: PasswordChange,
    ) -> DomainResult<SessionToken> {
        let (Some(old_password), Some(new_password)) = (change.old_password, change.new_password) else {
            return Err(DomainError::validation(
                "Please provide your current and new password",
            ));
        };

        let account = self
            .accounts
            .find_by_id(identity.account().id)
            .await?
            .ok_or_else(|| DomainError::not_found("User no longer exists."))?;

        if !self.hasher.verify(&old_password, &account.password_hash).await? {
            return Err(DomainError::unauthorized("Your current password is wrong"));
        }
        validate_password(&new_password)?;

        let password_hash = self.hasher.hash(&new_password).await?;
        let account = self
            .accounts
            .set_password_hash(account.id, password_hash, clock::now())
            .await?;
        info!(account_id = %account.id, "password changed");

        let token = self.tokens.issue(account.id)?;
        Ok(SessionToken { token, account })
    }

    /// Resolves a bearer token to an identity.
    ///
    /// `None` (no token) → not logged in; a token that fails verification →
    /// invalid token; a valid token whose account was removed → account gone.
    pub async fn authenticate(&self, bearer: Option<&str>) -> DomainResult<Identity> {
        let token = bearer
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DomainError::unauthorized(NOT_LOGGED_IN))?;

        let account_id = self.tokens.verify(token).map_err(|e| match e {
            DomainError::Unauthorized(_) => DomainError::unauthorized(INVALID_TOKEN),
            other => other,
        })?;

        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| DomainError::unauthorized(ACCOUNT_GONE))?;

        Ok(Identity::for_account(account))
    }
}
