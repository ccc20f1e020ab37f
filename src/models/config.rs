//! Session configuration: ace rule, goal and the resolved, immutable SessionConfig.

use crate::models::player::Player;
use serde::{Deserialize, Serialize};

/// Fewest players a session can be started with.
pub const MIN_PLAYERS: usize = 2;
/// Most players a session can be started with.
pub const MAX_PLAYERS: usize = 5;
/// Session name used when setup leaves it blank.
pub const DEFAULT_SESSION_NAME: &str = "Gin Rummy";

/// Errors raised while turning setup input into a session configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// No players were supplied.
    NoPlayers,
    /// Fewer than MIN_PLAYERS players.
    TooFewPlayers { min: usize, count: usize },
    /// More than MAX_PLAYERS players.
    TooManyPlayers { max: usize, count: usize },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NoPlayers => write!(f, "A session needs players"),
            ConfigError::TooFewPlayers { min, count } => {
                write!(f, "Need at least {} players (got {})", min, count)
            }
            ConfigError::TooManyPlayers { max, count } => {
                write!(f, "At most {} players are supported (got {})", max, count)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// How many deadwood points an ace is worth this session.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AceRule {
    #[default]
    Low,
    High,
}

impl AceRule {
    /// Deadwood value of an ace under this rule.
    pub fn points(self) -> u32 {
        match self {
            AceRule::Low => 1,
            AceRule::High => 15,
        }
    }

    /// Reference rows shown next to score entry: (cards, value).
    /// Display only; the engine never computes card values.
    pub fn reference_table(self) -> Vec<(&'static str, String)> {
        vec![
            ("A", self.points().to_string()),
            ("2-9", "face value".to_string()),
            ("10, J, Q, K", "10".to_string()),
        ]
    }
}

impl std::str::FromStr for AceRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(AceRule::Low),
            "high" => Ok(AceRule::High),
            other => Err(format!("Unknown ace rule '{}'", other)),
        }
    }
}

/// Goal selection from setup, before the numeric target is resolved.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    #[default]
    Points,
    Rounds,
    Free,
}

/// The session-ending condition. Exactly one is active per session.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "target")]
pub enum Goal {
    /// First player (in player order) whose total reaches the target wins.
    PointTarget(u32),
    /// Highest total once this many rounds have been played wins.
    RoundLimit(u32),
    /// No automatic winner; only ending the session crowns one.
    FreePlay,
}

impl Goal {
    /// Numeric target, 0 for free play.
    pub fn target(&self) -> u32 {
        match *self {
            Goal::PointTarget(n) | Goal::RoundLimit(n) => n,
            Goal::FreePlay => 0,
        }
    }

    pub fn label(&self) -> String {
        match *self {
            Goal::PointTarget(n) => format!("Target: {} pts", n),
            Goal::RoundLimit(n) => format!("{} hands", n),
            Goal::FreePlay => "Free Play".to_string(),
        }
    }
}

/// Validated setup, fixed once the session starts.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub players: Vec<Player>,
    pub ace_rule: AceRule,
    pub goal: Goal,
    pub session_name: String,
}
