//! Avatar and wallpaper preferences persisted under `edutwin-user-preferences`.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::{Preferences, StoredPreferences};
use crate::error::StorageError;
use crate::seeds::{wallpaper_by_id, DEFAULT_AVATAR, DEFAULT_WALLPAPER_ID};
use crate::storage::{load_json, save_json, KeyValueStore, PREFERENCES_KEY};

fn resolve(avatar: &str, wallpaper_id: &str) -> Preferences {
  let avatar = if avatar.is_empty() { DEFAULT_AVATAR } else { avatar };
  let wallpaper_id = if wallpaper_id.is_empty() { DEFAULT_WALLPAPER_ID } else { wallpaper_id };
  Preferences {
    avatar: avatar.to_string(),
    wallpaper_id: wallpaper_id.to_string(),
    wallpaper: wallpaper_by_id(wallpaper_id).clone(),
  }
}

pub struct PreferencesStore {
  store: Arc<dyn KeyValueStore>,
  current: Preferences,
}

impl PreferencesStore {
  /// Defaults are used, not written back, when nothing valid is stored.
  #[instrument(level = "info", skip_all)]
  pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
    let stored = load_json::<StoredPreferences>(store.as_ref(), PREFERENCES_KEY).unwrap_or_default();
    let current = resolve(&stored.avatar, &stored.wallpaper_id);
    Self { store, current }
  }

  pub fn get(&self) -> &Preferences {
    &self.current
  }

  /// Stores exactly what was given; an unknown wallpaper id still resolves to
  /// the first catalog wallpaper.
  #[instrument(level = "info", skip(self, avatar))]
  pub fn save(&mut self, avatar: String, wallpaper_id: String) -> Result<Preferences, StorageError> {
    let stored = StoredPreferences { avatar, wallpaper_id };
    save_json(self.store.as_ref(), PREFERENCES_KEY, &stored)?;
    self.current = resolve(&stored.avatar, &stored.wallpaper_id);
    info!(target: "edutwin_backend", wallpaper = %self.current.wallpaper.id, "Preferences saved");
    Ok(self.current.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::MemoryStore;

  #[test]
  fn missing_or_malformed_blob_uses_defaults_without_writing() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let prefs = PreferencesStore::load(store.clone());
    assert_eq!(prefs.get().avatar, DEFAULT_AVATAR);
    assert_eq!(prefs.get().wallpaper.id, DEFAULT_WALLPAPER_ID);
    assert_eq!(store.get(PREFERENCES_KEY).unwrap(), None);

    store.set(PREFERENCES_KEY, "nope").unwrap();
    assert_eq!(PreferencesStore::load(store).get().wallpaper_id, DEFAULT_WALLPAPER_ID);
  }

  #[test]
  fn empty_fields_fall_back_individually() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    store.set(PREFERENCES_KEY, r#"{"avatar":"","wallpaperId":"midnight"}"#).unwrap();
    let prefs = PreferencesStore::load(store);
    assert_eq!(prefs.get().avatar, DEFAULT_AVATAR);
    assert_eq!(prefs.get().wallpaper.name, "Midnight");
  }

  #[test]
  fn save_round_trips_and_resolves_unknown_wallpaper() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut prefs = PreferencesStore::load(store.clone());
    let saved = prefs.save("https://example.com/a.svg".into(), "retro-wave".into()).unwrap();
    assert_eq!(saved.wallpaper_id, "retro-wave");
    assert_eq!(saved.wallpaper.id, DEFAULT_WALLPAPER_ID);
    let raw = store.get(PREFERENCES_KEY).unwrap().unwrap();
    assert_eq!(raw, r#"{"avatar":"https://example.com/a.svg","wallpaperId":"retro-wave"}"#);
    let reloaded = PreferencesStore::load(store);
    assert_eq!(reloaded.get(), prefs.get());
  }
}
