//! Setup phase: resolve goals, build the session configuration, start the session.

use crate::logic::scoring::parse_leading_int;
use crate::models::{
    AceRule, ConfigError, Goal, GoalKind, Player, PlayerId, SavedPlayer, Session, SessionConfig,
    SetupPlayer, DEFAULT_SESSION_NAME, MAX_PLAYERS, MIN_PLAYERS,
};

/// Point targets offered as one-tap presets.
pub const POINT_GOAL_PRESETS: [u32; 3] = [100, 200, 300];
/// Used when a custom point target is missing or invalid.
pub const DEFAULT_POINT_GOAL: u32 = 100;
/// Hand counts offered as one-tap presets.
pub const ROUND_GOAL_PRESETS: [u32; 3] = [5, 10, 15];
/// Used when a custom hand count is missing or invalid.
pub const DEFAULT_ROUND_GOAL: u32 = 10;

fn resolve_goal(presets: &[u32], fallback: u32, selected: u32, custom: &str) -> u32 {
    if presets.contains(&selected) {
        return selected;
    }
    match parse_leading_int(custom) {
        Some(n) if n > 0 => u32::try_from(n).unwrap_or(fallback),
        _ => fallback,
    }
}

/// Preset point target if one was picked, otherwise the custom value (falling back to 100).
pub fn resolve_point_goal(selected: u32, custom: &str) -> u32 {
    resolve_goal(&POINT_GOAL_PRESETS, DEFAULT_POINT_GOAL, selected, custom)
}

/// Preset hand count if one was picked, otherwise the custom value (falling back to 10).
pub fn resolve_round_goal(selected: u32, custom: &str) -> u32 {
    resolve_goal(&ROUND_GOAL_PRESETS, DEFAULT_ROUND_GOAL, selected, custom)
}

/// Validate setup input and produce the immutable session configuration.
///
/// Ids are assigned 0..N-1 in input order, blank names become "Player {n}",
/// a blank session name becomes "Gin Rummy", and a zero goal takes the default target.
pub fn build_config(
    setup_players: &[SetupPlayer],
    ace_rule: AceRule,
    goal_kind: GoalKind,
    resolved_point_goal: u32,
    resolved_round_goal: u32,
    session_name: &str,
) -> Result<SessionConfig, ConfigError> {
    let count = setup_players.len();
    if count == 0 {
        return Err(ConfigError::NoPlayers);
    }
    if count < MIN_PLAYERS {
        return Err(ConfigError::TooFewPlayers {
            min: MIN_PLAYERS,
            count,
        });
    }
    if count > MAX_PLAYERS {
        return Err(ConfigError::TooManyPlayers {
            max: MAX_PLAYERS,
            count,
        });
    }

    let players = setup_players
        .iter()
        .enumerate()
        .map(|(i, sp)| {
            let trimmed = sp.name.trim();
            let name = if trimmed.is_empty() {
                Player::default_name(i)
            } else {
                trimmed.to_string()
            };
            Player::new(i as PlayerId, name, sp.photo.clone())
        })
        .collect();

    let positive_or = |n: u32, fallback: u32| if n == 0 { fallback } else { n };
    let goal = match goal_kind {
        GoalKind::Points => {
            Goal::PointTarget(positive_or(resolved_point_goal, DEFAULT_POINT_GOAL))
        }
        GoalKind::Rounds => {
            Goal::RoundLimit(positive_or(resolved_round_goal, DEFAULT_ROUND_GOAL))
        }
        GoalKind::Free => Goal::FreePlay,
    };

    let session_name = match session_name.trim() {
        "" => DEFAULT_SESSION_NAME.to_string(),
        name => name.to_string(),
    };

    Ok(SessionConfig {
        players,
        ace_rule,
        goal,
        session_name,
    })
}

/// Start a session from a resolved configuration: no rounds, no winner.
pub fn start_session(config: SessionConfig) -> Session {
    let session = Session::new(config);
    log::info!(
        "Started session {} '{}' with {} players ({})",
        session.id,
        session.config.session_name,
        session.config.players.len(),
        session.config.goal.label()
    );
    session
}

/// Setup players flagged for saving, as roster entries (blank names are skipped).
pub fn players_to_save(setup_players: &[SetupPlayer]) -> Vec<SavedPlayer> {
    setup_players
        .iter()
        .filter(|sp| sp.save && !sp.name.trim().is_empty())
        .map(|sp| SavedPlayer::new(sp.name.trim(), sp.photo.clone()))
        .collect()
}
