//! Saved roster: reusable player identities kept between sessions.
//!
//! The roster is a best-effort cache. Load and save failures are logged and
//! degrade to an empty roster / a skipped write; they never block a session.

use crate::models::SavedPlayer;
use std::path::PathBuf;
use std::sync::Mutex;

/// Errors from a roster store. Only seen by the store helpers in this module.
#[derive(Debug)]
pub enum RosterError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Io(e) => write!(f, "Roster storage error: {}", e),
            RosterError::Json(e) => write!(f, "Roster data is not valid JSON: {}", e),
        }
    }
}

impl std::error::Error for RosterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterError::Io(e) => Some(e),
            RosterError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for RosterError {
    fn from(e: std::io::Error) -> Self {
        RosterError::Io(e)
    }
}

impl From<serde_json::Error> for RosterError {
    fn from(e: serde_json::Error) -> Self {
        RosterError::Json(e)
    }
}

/// Key-value style storage for the saved roster.
pub trait RosterStore {
    fn load(&self) -> Result<Vec<SavedPlayer>, RosterError>;
    fn save(&self, players: &[SavedPlayer]) -> Result<(), RosterError>;
}

/// Roster kept in memory (tests, or when no file is configured).
#[derive(Debug, Default)]
pub struct MemoryRosterStore {
    players: Mutex<Vec<SavedPlayer>>,
}

impl MemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_players(players: Vec<SavedPlayer>) -> Self {
        Self {
            players: Mutex::new(players),
        }
    }
}

impl RosterStore for MemoryRosterStore {
    fn load(&self) -> Result<Vec<SavedPlayer>, RosterError> {
        Ok(self
            .players
            .lock()
            .map(|g| g.clone())
            .unwrap_or_default())
    }

    fn save(&self, players: &[SavedPlayer]) -> Result<(), RosterError> {
        if let Ok(mut g) = self.players.lock() {
            *g = players.to_vec();
        }
        Ok(())
    }
}

/// Roster stored as a JSON array in a single file. A missing file is an empty roster.
#[derive(Clone, Debug)]
pub struct JsonFileRosterStore {
    path: PathBuf,
}

impl JsonFileRosterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RosterStore for JsonFileRosterStore {
    fn load(&self) -> Result<Vec<SavedPlayer>, RosterError> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, players: &[SavedPlayer]) -> Result<(), RosterError> {
        let data = serde_json::to_string_pretty(players)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }
}

/// Load the roster, or an empty one if the store fails.
pub fn load_roster(store: &dyn RosterStore) -> Vec<SavedPlayer> {
    store.load().unwrap_or_else(|e| {
        log::warn!("Could not load saved players, continuing with none: {}", e);
        Vec::new()
    })
}

/// Save the roster; a failed write is logged and otherwise ignored.
pub fn save_roster(store: &dyn RosterStore, players: &[SavedPlayer]) {
    if let Err(e) = store.save(players) {
        log::warn!("Could not save {} saved player(s): {}", players.len(), e);
    }
}

/// Merge players into the roster by case-insensitive name.
///
/// A match takes the new (trimmed) name and the new photo only if one was given;
/// anything else is appended in order.
pub fn merge_saved_players(existing: &[SavedPlayer], to_save: &[SavedPlayer]) -> Vec<SavedPlayer> {
    let mut updated = existing.to_vec();
    for sp in to_save {
        let name = sp.name.trim();
        if name.is_empty() {
            continue;
        }
        let lower = name.to_lowercase();
        match updated.iter_mut().find(|s| s.name.to_lowercase() == lower) {
            Some(entry) => {
                entry.name = name.to_string();
                if sp.photo.is_some() {
                    entry.photo = sp.photo.clone();
                }
            }
            None => updated.push(SavedPlayer::new(name, sp.photo.clone())),
        }
    }
    updated
}

/// Load, merge and save in one step. Returns the merged roster (what was written).
pub fn remember_players(store: &dyn RosterStore, to_save: &[SavedPlayer]) -> Vec<SavedPlayer> {
    let current = load_roster(store);
    if to_save.is_empty() {
        return current;
    }
    let merged = merge_saved_players(&current, to_save);
    save_roster(store, &merged);
    merged
}

/// Remove the entry at `index`. Out of range leaves the roster unchanged.
pub fn delete_saved(players: &[SavedPlayer], index: usize) -> Vec<SavedPlayer> {
    players
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, p)| p.clone())
        .collect()
}

/// Rename the entry at `index` (trimmed). Out of range or a blank name leaves the roster unchanged.
pub fn update_saved_name(players: &[SavedPlayer], index: usize, name: &str) -> Vec<SavedPlayer> {
    let mut updated = players.to_vec();
    let name = name.trim();
    if name.is_empty() {
        return updated;
    }
    if let Some(entry) = updated.get_mut(index) {
        entry.name = name.to_string();
    }
    updated
}

/// Replace the photo of the entry at `index`. Out of range leaves the roster unchanged.
pub fn update_saved_photo(
    players: &[SavedPlayer],
    index: usize,
    photo: Option<String>,
) -> Vec<SavedPlayer> {
    let mut updated = players.to_vec();
    if let Some(entry) = updated.get_mut(index) {
        entry.photo = photo;
    }
    updated
}
