//! Session business logic: setup, scoring, saved roster, score sheet.

mod roster;
mod score_sheet;
mod scoring;
mod setup;

pub use roster::{
    delete_saved, load_roster, merge_saved_players, remember_players, save_roster,
    update_saved_name, update_saved_photo, JsonFileRosterStore, MemoryRosterStore, RosterError,
    RosterStore,
};
pub use score_sheet::{score_sheet_csv, write_score_sheet};
pub use scoring::{
    coerce_score, dismiss_winner, end_session, evaluate_goal, submit_round, undo_last,
    RoundResult,
};
pub use setup::{
    build_config, players_to_save, resolve_point_goal, resolve_round_goal, start_session,
    DEFAULT_POINT_GOAL, DEFAULT_ROUND_GOAL, POINT_GOAL_PRESETS, ROUND_GOAL_PRESETS,
};
