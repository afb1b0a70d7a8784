use tracing::debug;

use crate::auth::SessionManager;
use crate::error::Result;
use crate::models::SessionUser;

impl SessionManager {
    /// Mark a username as a favorite of the session user.
    ///
    /// A no-op without a session, and a no-op when already present.
    pub fn add_to_favorites(&mut self, username: &str) -> Result<()> {
        let Some(user) = self.current.as_mut() else {
            return Ok(());
        };
        if user.favorites.iter().any(|f| f == username) {
            debug!("{} is already a favorite", username);
            return Ok(());
        }
        user.favorites.push(username.to_string());
        let user = user.clone();
        self.persist_favorites(&user)
    }

    /// A no-op without a session or when the username is not a favorite.
    pub fn remove_from_favorites(&mut self, username: &str) -> Result<()> {
        let Some(user) = self.current.as_mut() else {
            return Ok(());
        };
        user.favorites.retain(|f| f != username);
        let user = user.clone();
        self.persist_favorites(&user)
    }

    pub fn is_favorite(&self, username: &str) -> bool {
        self.current
            .as_ref()
            .map(|u| u.favorites.iter().any(|f| f == username))
            .unwrap_or(false)
    }

    pub fn favorites(&self) -> &[String] {
        self.current
            .as_ref()
            .map(|u| u.favorites.as_slice())
            .unwrap_or(&[])
    }

    /// Every mutation writes both copies: the session record and the matching
    /// account record, matched by email.
    fn persist_favorites(&self, user: &SessionUser) -> Result<()> {
        self.store.save_session(user)?;

        let mut accounts = self.store.list_accounts();
        for account in accounts.iter_mut().filter(|a| a.email == user.email) {
            account.favorites = user.favorites.clone();
        }
        self.store.save_accounts(&accounts)?;
        Ok(())
    }
}
