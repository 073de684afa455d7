//! Namespaced key/value storage
//!
//! Every key is prefixed with the game's namespace so several games can share
//! one origin's LocalStorage.

/// Namespace prepended to every key
pub const STORAGE_PREFIX: &str = "2020.highway-404";

/// Full storage key for `key`
pub fn storage_key(key: &str) -> String {
    format!("{STORAGE_PREFIX}.{key}")
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

/// Load a raw value from LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn load_from_storage(key: &str) -> Option<String> {
    let storage = local_storage()?;
    match storage.get_item(&storage_key(key)) {
        Ok(value) => value,
        Err(_) => {
            log::warn!("LocalStorage read of {} failed", key);
            None
        }
    }
}

/// Save a raw value to LocalStorage (WASM only). Returns false when storage is unavailable.
#[cfg(target_arch = "wasm32")]
pub fn save_to_storage(key: &str, value: &str) -> bool {
    let Some(storage) = local_storage() else {
        log::warn!("LocalStorage unavailable, {} not saved", key);
        return false;
    };
    if storage.set_item(&storage_key(key), value).is_err() {
        log::warn!("LocalStorage write of {} failed", key);
        return false;
    }
    true
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn load_from_storage(_key: &str) -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_to_storage(_key: &str, _value: &str) -> bool {
    // No-op for native
    false
}
