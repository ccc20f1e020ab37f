//! Player, setup input and saved-roster entries.

use serde::{Deserialize, Serialize};

/// Stable identifier for a player within one session (0-based, entry order).
pub type PlayerId = u32;

/// A player seated in a session. Identity and name are fixed for the session's lifetime.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Opaque image reference (e.g. a data URL). Owned copy, never shared with the roster.
    #[serde(default)]
    pub photo: Option<String>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, photo: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            photo,
        }
    }

    /// Name used when the setup slot was left blank (`position` is 0-based).
    pub fn default_name(position: usize) -> String {
        format!("Player {}", position + 1)
    }
}

/// One row of the setup form, before ids are assigned.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetupPlayer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub photo: Option<String>,
    /// Ask for this player to be remembered in the saved roster.
    #[serde(default)]
    pub save: bool,
}

impl SetupPlayer {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Fill a setup slot from a saved roster entry. The entry is already saved, so `save` is off.
    pub fn from_saved(saved: &SavedPlayer) -> Self {
        Self {
            name: saved.name.clone(),
            photo: saved.photo.clone(),
            save: false,
        }
    }
}

/// A reusable player identity kept in the saved roster between sessions.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SavedPlayer {
    pub name: String,
    #[serde(default)]
    pub photo: Option<String>,
}

impl SavedPlayer {
    pub fn new(name: impl Into<String>, photo: Option<String>) -> Self {
        Self {
            name: name.into(),
            photo,
        }
    }
}
