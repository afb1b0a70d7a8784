use tracing::{debug, info};

use crate::error::{FinderError, Result};
use crate::models::{Account, SessionUser};
use crate::store::AccountStore;

/// Process-wide auth session over the account store.
///
/// Hydrated from the persisted session on construction; exactly one account
/// can be the current session at a time. Callers share it behind a lock and
/// pass it explicitly; there is no ambient global.
#[derive(Debug)]
pub struct SessionManager {
    pub(crate) store: AccountStore,
    pub(crate) current: Option<SessionUser>,
}

impl SessionManager {
    pub fn new(store: AccountStore) -> Self {
        let current = store.load_session();
        if let Some(user) = &current {
            info!("Restored session for {}", user.username);
        }
        Self { store, current }
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Log in with a username or email plus password.
    ///
    /// Comparison is an exact, case-sensitive string match on all fields;
    /// there is no lockout or throttling.
    pub fn login(&mut self, identifier: &str, password: &str) -> Result<SessionUser> {
        let accounts = self.store.list_accounts();
        let account = accounts
            .iter()
            .find(|a| (a.email == identifier || a.username == identifier) && a.password == password)
            .ok_or(FinderError::InvalidCredentials)?;

        let user = account.session_user();
        self.store.save_session(&user)?;
        info!("Logged in as {}", user.username);
        self.current = Some(user.clone());
        Ok(user)
    }

    /// Create an account and establish a session for it (auto-login).
    pub fn signup(&mut self, username: &str, email: &str, password: &str) -> Result<SessionUser> {
        let mut accounts = self.store.list_accounts();
        if accounts
            .iter()
            .any(|a| a.email == email || a.username == username)
        {
            return Err(FinderError::DuplicateAccount);
        }

        let account = Account {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            favorites: Vec::new(),
        };
        let user = account.session_user();
        accounts.push(account);
        self.store.save_accounts(&accounts)?;

        self.store.save_session(&user)?;
        info!("Created account {}", user.username);
        self.current = Some(user.clone());
        Ok(user)
    }

    /// Clear the in-memory session and its persisted copy. The account table
    /// is untouched.
    pub fn logout(&mut self) -> Result<()> {
        if let Some(user) = self.current.take() {
            debug!("Logged out {}", user.username);
        }
        self.store.clear_session()?;
        Ok(())
    }
}
