//! Administrator session - who is logged in, and until when.

use crate::{
    core::directory::authenticate,
    entities::AdministratorModel,
    errors::{Error, Result},
};
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

/// How long a login stays valid.
pub const SESSION_TTL_HOURS: i64 = 24;

/// A successful login.
#[derive(Debug, Clone)]
pub struct AdminSession {
    admin: AdministratorModel,
    logged_in_at: DateTime<Utc>,
}

impl AdminSession {
    /// Checks credentials against `admins` and starts a session at `now`.
    pub fn login(
        admins: &[AdministratorModel],
        username: &str,
        pin: &str,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        match authenticate(admins, username, pin) {
            Ok(admin) => {
                info!("Administrator {} logged in", admin.username);
                Ok(Self {
                    admin: admin.clone(),
                    logged_in_at: now,
                })
            }
            Err(e) => {
                warn!("Failed login attempt for '{}'", username);
                Err(e)
            }
        }
    }

    /// The logged-in administrator as of login time.
    #[must_use]
    pub const fn admin(&self) -> &AdministratorModel {
        &self.admin
    }

    /// When the session started.
    #[must_use]
    pub const fn logged_in_at(&self) -> DateTime<Utc> {
        self.logged_in_at
    }

    /// End of the validity window.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.logged_in_at + Duration::hours(SESSION_TTL_HOURS)
    }

    /// True while `now` is inside the validity window.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at()
    }

    /// The administrator, or `SessionExpired` once the window has passed.
    pub fn require_valid(&self, now: DateTime<Utc>) -> Result<&AdministratorModel> {
        if self.is_valid_at(now) {
            Ok(&self.admin)
        } else {
            Err(Error::SessionExpired)
        }
    }
}
