//! Bearer-token session shared by the admin surfaces.
//!
//! The token lives behind a [`TokenStore`] and redirects go through a
//! [`Navigator`], so the same [`Session`] value can be handed to the API
//! client and the controllers without any process-wide state.

use std::rc::Rc;

use log::{error, info, warn};

use crate::api::Backend;
use crate::config::TOKEN_STORAGE_KEY;

/// Top-level views the app can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Public,
    Login,
    Admin,
}

impl Route {
    /// Location hash that selects this view, so a reload stays put.
    pub fn hash(self) -> &'static str {
        match self {
            Route::Public => "",
            Route::Login => "#/login",
            Route::Admin => "#/admin",
        }
    }

    pub fn from_hash(hash: &str) -> Self {
        match hash.trim_start_matches('#').trim_matches('/') {
            "login" => Route::Login,
            "admin" => Route::Admin,
            _ => Route::Public,
        }
    }
}

pub trait TokenStore {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

pub trait Navigator {
    fn navigate(&self, route: Route);
}

/// Token persisted in the browser's `localStorage`.
pub struct LocalStorageTokens;

impl LocalStorageTokens {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|window| window.local_storage().ok().flatten())
    }
}

/// Logs a failed `localStorage` write; returns whether it went through.
fn storage_write<E>(result: Result<(), E>, action: &str) -> bool {
    if result.is_err() {
        error!("could not {} session token", action);
        return false;
    }
    true
}

impl TokenStore for LocalStorageTokens {
    fn load(&self) -> Option<String> {
        Self::storage()
            .and_then(|storage| storage.get_item(TOKEN_STORAGE_KEY).ok().flatten())
            .filter(|token| !token.is_empty())
    }

    fn save(&self, token: &str) {
        match Self::storage() {
            Some(storage) => {
                storage_write(storage.set_item(TOKEN_STORAGE_KEY, token), "persist");
            }
            None => error!("localStorage unavailable, session will not survive a reload"),
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            storage_write(storage.remove_item(TOKEN_STORAGE_KEY), "remove");
        }
    }
}

#[derive(Clone)]
pub struct Session {
    tokens: Rc<dyn TokenStore>,
    navigator: Rc<dyn Navigator>,
}

impl Session {
    pub fn new(tokens: Rc<dyn TokenStore>, navigator: Rc<dyn Navigator>) -> Self {
        Self { tokens, navigator }
    }

    pub fn token(&self) -> Option<String> {
        self.tokens.load()
    }

    pub fn tokens(&self) -> Rc<dyn TokenStore> {
        self.tokens.clone()
    }

    pub fn navigate(&self, route: Route) {
        self.navigator.navigate(route);
    }

    /// Returns the stored token, or sends the user to the login view.
    pub fn ensure_authenticated(&self) -> Option<String> {
        let token = self.tokens.load();
        if token.is_none() {
            info!("no session token, redirecting to login");
            self.navigator.navigate(Route::Login);
        }
        token
    }

    /// Asks the backend whether the stored token is still valid. A single
    /// failure ends the session.
    pub async fn verify(&self, backend: &dyn Backend) -> bool {
        match backend.verify().await {
            Ok(()) => true,
            Err(err) => {
                warn!("token verification failed: {}", err);
                self.invalidate();
                false
            }
        }
    }

    pub fn sign_in(&self, token: &str) {
        self.tokens.save(token);
    }

    pub fn sign_out(&self) {
        self.tokens.clear();
        self.navigator.navigate(Route::Public);
    }

    /// Drops a token the backend rejected and returns to the login view.
    pub fn invalidate(&self) {
        self.tokens.clear();
        self.navigator.navigate(Route::Login);
    }
}
