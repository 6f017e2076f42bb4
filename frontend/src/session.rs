use gloo_storage::{LocalStorage, Storage};
use workflow::SessionStore;

/// Reads the bearer token the sign-in page left in `localStorage`.
///
/// The token is stored as a bare string rather than JSON, so this goes
/// through the raw storage handle. Never writes.
pub struct LocalStorageSession {
    key: String,
}

impl LocalStorageSession {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl SessionStore for LocalStorageSession {
    fn token(&self) -> Option<String> {
        match LocalStorage::raw().get_item(&self.key) {
            Ok(token) => token
                .map(|token| token.trim().to_string())
                .filter(|token| !token.is_empty() && token != "null" && token != "undefined"),
            Err(e) => {
                log::warn!("Could not read `{}` from local storage: {:?}", self.key, e);
                None
            }
        }
    }
}
