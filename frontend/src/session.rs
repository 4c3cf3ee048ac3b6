//! Signed-in identity and its token lifecycle.
//!
//! The session is created once by `App` and handed down through a Yew
//! context. Startup restores it from stored tokens, logout and any 401 tear
//! it down again.

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::user::User;
use crate::storage::{self, StoredTokens};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub enum SessionStatus {
    Checking,
    Anonymous,
    Authenticated(User),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub status: SessionStatus,
    /// Set when a request was rejected with 401; cleared by the next login.
    pub expired: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            status: SessionStatus::Checking,
            expired: false,
        }
    }
}

pub enum SessionAction {
    Restored(Option<User>),
    LoggedIn(User),
    LoggedOut,
    Expired,
}

impl Reducible for SessionState {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = match action {
            SessionAction::Restored(Some(user)) | SessionAction::LoggedIn(user) => SessionState {
                status: SessionStatus::Authenticated(user),
                expired: false,
            },
            SessionAction::Restored(None) | SessionAction::LoggedOut => SessionState {
                status: SessionStatus::Anonymous,
                expired: false,
            },
            SessionAction::Expired => SessionState {
                status: SessionStatus::Anonymous,
                expired: true,
            },
        };
        Rc::new(next)
    }
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match &self.status {
            SessionStatus::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn can_publish(&self) -> bool {
        self.user().is_some_and(|u| u.role.can_publish())
    }

    pub fn can_manage_users(&self) -> bool {
        self.user().is_some_and(|u| u.role.can_manage_users())
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenPair {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[allow(async_fn_in_trait)]
pub trait AuthBackend {
    async fn login(&self, email: &str, password: &str) -> Result<TokenPair, ApiError>;
    async fn refresh(&self, refresh: &str) -> Result<TokenPair, ApiError>;
    async fn me(&self) -> Result<User, ApiError>;
}

impl AuthBackend for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<TokenPair, ApiError> {
        self.post_json("auth/login/", &Credentials { email, password })
            .await
    }

    async fn refresh(&self, refresh: &str) -> Result<TokenPair, ApiError> {
        self.post_json("auth/refresh/", &RefreshRequest { refresh })
            .await
    }

    async fn me(&self) -> Result<User, ApiError> {
        self.get_json("auth/me/").await
    }
}

pub trait TokenStore {
    fn load(&self) -> StoredTokens;
    fn save(&self, access: &str, refresh: Option<&str>);
    fn clear(&self);
}

/// `localStorage`-backed token store.
pub struct BrowserTokens;

impl TokenStore for BrowserTokens {
    fn load(&self) -> StoredTokens {
        storage::load_tokens()
    }

    fn save(&self, access: &str, refresh: Option<&str>) {
        storage::save_tokens(access, refresh);
    }

    fn clear(&self) {
        storage::clear_tokens();
    }
}

/// Validates stored tokens by loading the profile. A rejected access token
/// gets exactly one refresh attempt; anything else signs the user out.
pub async fn restore<A: AuthBackend, S: TokenStore>(auth: &A, store: &S) -> Option<User> {
    let tokens = store.load();
    tokens.access.as_ref()?;

    match auth.me().await {
        Ok(user) => {
            info!("Restored session for {}", user.email);
            return Some(user);
        }
        Err(ApiError::Unauthorized) => {
            if let Some(refresh) = tokens.refresh.as_deref() {
                match auth.refresh(refresh).await {
                    Ok(pair) => {
                        store.save(&pair.access, pair.refresh.as_deref());
                        match auth.me().await {
                            Ok(user) => return Some(user),
                            Err(err) => warn!("Profile still unavailable after refresh: {err}"),
                        }
                    }
                    Err(err) => warn!("Token refresh failed: {err}"),
                }
            }
        }
        Err(err) => warn!("Could not validate stored session: {err}"),
    }

    store.clear();
    None
}

pub async fn login<A: AuthBackend, S: TokenStore>(
    auth: &A,
    store: &S,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    let pair = auth.login(email, password).await.map_err(|err| match err {
        ApiError::Unauthorized => ApiError::Status {
            status: 401,
            message: Some("Invalid email or password.".to_string()),
        },
        other => other,
    })?;
    store.save(&pair.access, pair.refresh.as_deref());

    match auth.me().await {
        Ok(user) => {
            info!("Signed in as {}", user.email);
            Ok(user)
        }
        Err(err) => {
            store.clear();
            Err(err)
        }
    }
}

pub fn logout<S: TokenStore>(store: &S) {
    store.clear();
}

/// Session context shared by every component below `App`.
#[derive(Clone, PartialEq)]
pub struct SessionHandle(UseReducerHandle<SessionState>);

impl SessionHandle {
    pub fn new(inner: UseReducerHandle<SessionState>) -> Self {
        Self(inner)
    }

    pub fn state(&self) -> &SessionState {
        &self.0
    }

    pub fn signed_in(&self, user: User) {
        self.0.dispatch(SessionAction::LoggedIn(user));
    }

    pub fn restored(&self, user: Option<User>) {
        self.0.dispatch(SessionAction::Restored(user));
    }

    pub fn logout(&self) {
        logout(&BrowserTokens);
        self.0.dispatch(SessionAction::LoggedOut);
    }

    /// Reaction to a 401 from any request.
    pub fn expire(&self) {
        warn!("Session rejected by the server, signing out");
        BrowserTokens.clear();
        self.0.dispatch(SessionAction::Expired);
    }
}

#[hook]
pub fn use_session() -> Option<SessionHandle> {
    use_context::<SessionHandle>()
}
