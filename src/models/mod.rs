//! Data structures for a Gin Rummy scoring session: players, configuration, rounds, session state.

mod config;
mod player;
mod session;

pub use config::{
    AceRule, ConfigError, Goal, GoalKind, SessionConfig, DEFAULT_SESSION_NAME, MAX_PLAYERS,
    MIN_PLAYERS,
};
pub use player::{Player, PlayerId, SavedPlayer, SetupPlayer};
pub use session::{
    Leader, Round, Session, SessionError, SessionId, SessionPhase, SessionSnapshot, Standing,
    Winner,
};
