use crate::config::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use log::warn;
use web_sys::Storage;

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn get_item(key: &str) -> Option<String> {
    local_storage()?
        .get_item(key)
        .ok()
        .flatten()
        .filter(|value| !value.is_empty())
}

fn set_item(key: &str, value: &str) {
    if let Some(storage) = local_storage() {
        if storage.set_item(key, value).is_err() {
            warn!("Could not persist {key}");
        }
    }
}

fn remove_item(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

/// Bearer token pair persisted across reloads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoredTokens {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

pub fn load_tokens() -> StoredTokens {
    StoredTokens {
        access: get_item(ACCESS_TOKEN_KEY),
        refresh: get_item(REFRESH_TOKEN_KEY),
    }
}

pub fn access_token() -> Option<String> {
    get_item(ACCESS_TOKEN_KEY)
}

pub fn save_tokens(access: &str, refresh: Option<&str>) {
    set_item(ACCESS_TOKEN_KEY, access);
    if let Some(refresh) = refresh {
        set_item(REFRESH_TOKEN_KEY, refresh);
    }
}

pub fn clear_tokens() {
    remove_item(ACCESS_TOKEN_KEY);
    remove_item(REFRESH_TOKEN_KEY);
}
