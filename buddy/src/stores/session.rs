//! Session and identity store.
//!
//! Login, Google login and register each do one credential exchange, decode
//! the token's expiry locally, then fetch the three reference catalogs one
//! after another. They report success as a `bool` and leave a user-facing
//! message in [`SessionStore::error`] on failure.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{BuddyError, Result};
use crate::persist::{save_or_warn, SnapshotStore, AUTH_KEY};
use crate::rest::BuddyHttpClient;
use crate::token::decode_expiry;
use crate::types::{
    AuthResponse, Catalog, Currency, ExpenseType, GoogleLoginRequest, GroupType, LoginRequest,
    RegisterRequest,
};

/// The authenticated user and the reference catalogs fetched at login.
///
/// This whole struct is what gets persisted under `auth-storage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: Option<String>,
    /// Token expiry in epoch seconds, as decoded from the token itself.
    pub exp: Option<i64>,
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub avatar: String,
    pub group_types: Catalog<GroupType>,
    pub currencies: Catalog<Currency>,
    pub expense_types: Catalog<ExpenseType>,
}

impl Session {
    /// The logged-out state.
    pub fn signed_out(avatar_placeholder: &str) -> Self {
        Self {
            token: None,
            exp: None,
            user_id: None,
            email: None,
            name: None,
            given_name: None,
            family_name: None,
            avatar: avatar_placeholder.to_string(),
            group_types: Catalog::default(),
            currencies: Catalog::default(),
            expense_types: Catalog::default(),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    /// Whether the token has expired at `now` (epoch seconds). A session
    /// without an expiry counts as expired.
    pub fn is_expired(&self, now: i64) -> bool {
        self.exp.map_or(true, |exp| exp <= now)
    }
}

struct State {
    session: Session,
    error: Option<String>,
    is_loading: bool,
}

pub struct SessionStore {
    http: BuddyHttpClient,
    snapshots: Option<SnapshotStore>,
    avatar_placeholder: String,
    state: Mutex<State>,
}

impl SessionStore {
    /// Create the store, restoring a persisted session and re-attaching its
    /// token to `http`.
    pub fn new(
        http: BuddyHttpClient,
        avatar_placeholder: &str,
        snapshots: Option<SnapshotStore>,
    ) -> Self {
        let session = snapshots
            .as_ref()
            .and_then(|s| s.load::<Session>(AUTH_KEY))
            .unwrap_or_else(|| Session::signed_out(avatar_placeholder));
        http.set_token(session.token.clone());

        Self {
            http,
            snapshots,
            avatar_placeholder: avatar_placeholder.to_string(),
            state: Mutex::new(State {
                session,
                error: None,
                is_loading: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn session(&self) -> Session {
        self.lock().session.clone()
    }

    /// Message of the last failed authentication attempt.
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    pub async fn login(&self, email: &str, password: &str) -> bool {
        let req = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        self.authenticate(self.http.login(&req)).await
    }

    pub async fn login_with_google(&self, oauth_token: &str) -> bool {
        let req = GoogleLoginRequest {
            token: oauth_token.to_string(),
        };
        self.authenticate(self.http.login_google(&req)).await
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        given_name: &str,
        family_name: &str,
    ) -> bool {
        let req = RegisterRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
            given_name: given_name.trim().to_string(),
            family_name: family_name.trim().to_string(),
        };
        self.authenticate(self.http.register(&req)).await
    }

    /// Run a credential exchange and, if it succeeds, commit the new session.
    ///
    /// A signed-out store keeps its state on failure apart from the error
    /// marker. A signed-in store is signed out before the exchange starts, so
    /// a failed attempt leaves it signed out.
    async fn authenticate(
        &self,
        exchange: impl std::future::Future<Output = Result<AuthResponse>>,
    ) -> bool {
        let was_signed_in = {
            let mut state = self.lock();
            state.is_loading = true;
            state.error = None;
            let was_signed_in = state.session.token.is_some();
            if was_signed_in {
                state.session = Session::signed_out(&self.avatar_placeholder);
            }
            was_signed_in
        };
        if was_signed_in {
            info!("dropping current session before signing in again");
            self.http.set_token(None);
            self.forget_persisted();
        }

        let result = match exchange.await {
            Ok(auth) => self.establish(auth).await,
            Err(e) => Err(e),
        };

        let mut state = self.lock();
        state.is_loading = false;
        match result {
            Ok(session) => {
                info!(user_id = ?session.user_id, exp = ?session.exp, "signed in");
                state.session = session;
                save_or_warn(self.snapshots.as_ref(), AUTH_KEY, &state.session);
                true
            }
            Err(e) => {
                warn!(error = %e, "authentication failed");
                self.http.set_token(None);
                state.error = Some(e.user_message());
                false
            }
        }
    }

    async fn establish(&self, auth: AuthResponse) -> Result<Session> {
        let exp = decode_expiry(&auth.token)?;
        self.http.set_token(Some(auth.token.clone()));

        let group_types = self.http.get_group_types().await?;
        let currencies = self.http.get_currencies().await?;
        let expense_types = self.http.get_expense_types().await?;

        Ok(Session {
            token: Some(auth.token),
            exp: Some(exp),
            user_id: Some(auth.id),
            email: Some(auth.email),
            name: auth.name,
            given_name: auth.given_name,
            family_name: auth.family_name,
            avatar: auth
                .avatar
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| self.avatar_placeholder.clone()),
            group_types,
            currencies,
            expense_types,
        })
    }

    /// Reset every field to its logged-out default and delete the persisted
    /// copy. Cannot fail.
    pub fn logout(&self) {
        {
            let mut state = self.lock();
            state.session = Session::signed_out(&self.avatar_placeholder);
            state.error = None;
            state.is_loading = false;
        }
        self.http.set_token(None);
        self.forget_persisted();
        info!("signed out");
    }

    fn forget_persisted(&self) {
        if let Some(snapshots) = &self.snapshots {
            if let Err(e) = snapshots.remove(AUTH_KEY) {
                warn!(error = %e, "failed to remove persisted session");
            }
        }
    }

    /// Check the session at `now`, logging out if the token has expired.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without a token, `SessionExpired` once `exp` has passed.
    pub fn require_active(&self, now: DateTime<Utc>) -> Result<()> {
        let session = self.session();
        if !session.is_signed_in() {
            return Err(BuddyError::NotAuthenticated);
        }
        if session.is_expired(now.timestamp()) {
            warn!(exp = ?session.exp, "session expired");
            self.logout();
            return Err(BuddyError::SessionExpired);
        }
        Ok(())
    }

    /// Icon URL for a group type, via the fallback entry if needed.
    pub fn group_type_icon(&self, key: GroupType) -> Option<String> {
        self.lock().session.group_types.resolve(key).map(str::to_string)
    }

    pub fn currency_symbol(&self, key: Currency) -> Option<String> {
        self.lock().session.currencies.resolve(key).map(str::to_string)
    }

    pub fn expense_type_icon(&self, key: ExpenseType) -> Option<String> {
        self.lock().session.expense_types.resolve(key).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::temp_store;

    #[test]
    fn test_signed_out_session_is_expired() {
        let session = Session::signed_out("placeholder.png");
        assert!(!session.is_signed_in());
        assert!(session.is_expired(0));
        assert_eq!(session.avatar, "placeholder.png");
    }

    #[test]
    fn test_is_expired_boundary() {
        let mut session = Session::signed_out("p");
        session.token = Some("t".into());
        session.exp = Some(100);
        assert!(!session.is_expired(99));
        assert!(session.is_expired(100));
    }

    #[test]
    fn test_new_restores_persisted_session_and_token() {
        let snapshots = temp_store("session-restore");
        let mut session = Session::signed_out("p");
        session.token = Some("restored".into());
        session.exp = Some(i64::MAX);
        snapshots.save(AUTH_KEY, &session).unwrap();

        let http = BuddyHttpClient::new("http://localhost:1");
        let store = SessionStore::new(http.clone(), "p", Some(snapshots));
        assert_eq!(store.session(), session);
        assert_eq!(http.token().as_deref(), Some("restored"));
        assert!(store.require_active(Utc::now()).is_ok());
    }

    #[test]
    fn test_require_active_logs_out_expired_session() {
        let snapshots = temp_store("session-expired");
        let mut session = Session::signed_out("p");
        session.token = Some("old".into());
        session.exp = Some(1);
        snapshots.save(AUTH_KEY, &session).unwrap();

        let http = BuddyHttpClient::new("http://localhost:1");
        let store = SessionStore::new(http.clone(), "p", Some(snapshots.clone()));
        assert!(matches!(
            store.require_active(Utc::now()),
            Err(BuddyError::SessionExpired)
        ));
        assert!(!store.session().is_signed_in());
        assert!(http.token().is_none());
        assert!(snapshots.load::<Session>(AUTH_KEY).is_none());
        assert!(matches!(
            store.require_active(Utc::now()),
            Err(BuddyError::NotAuthenticated)
        ));
    }
}
