use std::sync::Arc;

use skilldeck_types::User;
use tracing::{debug, info};

use crate::error::{BackendError, Result};
use crate::IdentityProvider;

/// Owner of the signed-in user.
///
/// Created inert; `init` restores whatever session the provider already has
/// and `teardown` drops local state. Between `teardown` and the next `init`
/// every operation fails with [`BackendError::NotInitialized`].
pub struct AuthContext {
    provider: Arc<dyn IdentityProvider>,
    user: Option<User>,
    active: bool,
}

impl AuthContext {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            user: None,
            active: false,
        }
    }

    pub async fn init(&mut self) -> Result<Option<&User>> {
        self.user = self.provider.current_user().await?;
        self.active = true;
        match &self.user {
            Some(user) => info!("Restored session for {}", user.id),
            None => debug!("No existing session"),
        }
        Ok(self.user.as_ref())
    }

    pub fn teardown(&mut self) {
        self.user = None;
        self.active = false;
        debug!("Auth context torn down");
    }

    pub fn is_initialized(&self) -> bool {
        self.active
    }

    pub fn user(&self) -> Result<Option<&User>> {
        self.ensure_active()?;
        Ok(self.user.as_ref())
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<&User> {
        self.ensure_active()?;
        let user = self.provider.sign_in(email, password).await?;
        Ok(self.user.insert(user))
    }

    /// Register an account. The user is signed in only if the provider opened
    /// a session for it.
    pub async fn sign_up(&mut self, email: &str, password: &str) -> Result<User> {
        self.ensure_active()?;
        let user = self.provider.sign_up(email, password).await?;
        self.user = self.provider.current_user().await?;
        Ok(user)
    }

    pub async fn sign_out(&mut self) -> Result<()> {
        self.ensure_active()?;
        self.provider.sign_out().await?;
        self.user = None;
        Ok(())
    }

    fn ensure_active(&self) -> Result<()> {
        if self.active {
            Ok(())
        } else {
            Err(BackendError::NotInitialized)
        }
    }
}
