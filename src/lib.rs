//! Gin Rummy score keeper: library with session models and scoring logic.

pub mod logic;
pub mod models;

pub use logic::{
    build_config, coerce_score, delete_saved, dismiss_winner, end_session, evaluate_goal,
    load_roster, merge_saved_players, players_to_save, remember_players, resolve_point_goal,
    resolve_round_goal, save_roster, score_sheet_csv, start_session, submit_round, undo_last,
    update_saved_name, update_saved_photo, write_score_sheet, JsonFileRosterStore,
    MemoryRosterStore, RosterError, RosterStore, RoundResult,
};
pub use models::{
    AceRule, ConfigError, Goal, GoalKind, Leader, Player, PlayerId, Round, SavedPlayer, Session,
    SessionConfig, SessionError, SessionId, SessionPhase, SessionSnapshot, SetupPlayer, Standing,
    Winner,
};
