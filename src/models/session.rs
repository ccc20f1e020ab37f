//! Session state: rounds, winner, and the derived totals / leader / standings.

use crate::models::config::{Goal, SessionConfig};
use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for a session.
pub type SessionId = Uuid;

/// Errors from scoring operations on a live session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SessionError {
    /// Round input or forced winner refers to a player not in this session.
    UnknownPlayer(PlayerId),
    /// The session has ended; no more rounds can be recorded.
    SessionEnded,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::UnknownPlayer(id) => write!(f, "No player with id {} in this session", id),
            SessionError::SessionEnded => write!(f, "Session has ended"),
        }
    }
}

impl std::error::Error for SessionError {}

/// One hand: a score for every player in the session.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based position in submission order.
    pub round_number: u32,
    pub scores: BTreeMap<PlayerId, u32>,
}

impl Round {
    pub fn score(&self, player_id: PlayerId) -> u32 {
        self.scores.get(&player_id).copied().unwrap_or(0)
    }
}

/// The crowned player and their total when they were crowned.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Winner {
    pub player: Player,
    pub score: u64,
}

/// Current strict-maximum positive total. `tied` means another player shares it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    pub player_id: PlayerId,
    pub tied: bool,
}

/// Lifecycle of a session.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Scoring, no winner recorded.
    Active,
    /// A winner is recorded but rounds may still be added, undone or the winner dismissed.
    WinnerPending,
    /// Terminal.
    Ended,
}

/// A row of the final standings.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub rank: usize,
    pub player: Player,
    pub total: u64,
    pub champion: bool,
}

/// Live state of one session, exclusively owned by whoever started it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub config: SessionConfig,
    pub rounds: Vec<Round>,
    pub winner: Option<Winner>,
    pub started_at: DateTime<Utc>,
    /// Set once the session is ended.
    pub ended_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Fresh session with no rounds.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            rounds: Vec::new(),
            winner: None,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.config.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.config.players.iter().find(|p| p.id == id)
    }

    pub fn goal(&self) -> Goal {
        self.config.goal
    }

    pub fn phase(&self) -> SessionPhase {
        if self.ended_at.is_some() {
            SessionPhase::Ended
        } else if self.winner.is_some() {
            SessionPhase::WinnerPending
        } else {
            SessionPhase::Active
        }
    }

    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Sum of the player's scores over the recorded rounds. Always recomputed.
    pub fn total(&self, player_id: PlayerId) -> u64 {
        self.rounds.iter().map(|r| u64::from(r.score(player_id))).sum()
    }

    /// Totals in player order.
    pub fn totals(&self) -> Vec<(PlayerId, u64)> {
        self.config
            .players
            .iter()
            .map(|p| (p.id, self.total(p.id)))
            .collect()
    }

    /// First player at the highest total, or None if no one has scored yet.
    pub fn highest_scorer(&self) -> Option<(&Player, u64)> {
        let mut best: Option<(&Player, u64)> = None;
        for p in &self.config.players {
            let t = self.total(p.id);
            if best.map_or(true, |(_, b)| t > b) {
                best = Some((p, t));
            }
        }
        best.filter(|&(_, t)| t > 0)
    }

    /// Strict-maximum positive total. `tied` is set when more than one player holds it.
    pub fn leader(&self) -> Option<Leader> {
        let (player, max) = self.highest_scorer()?;
        let holders = self
            .config
            .players
            .iter()
            .filter(|p| self.total(p.id) == max)
            .count();
        Some(Leader {
            player_id: player.id,
            tied: holders > 1,
        })
    }

    /// Players ranked by total (descending); ties keep player order.
    pub fn standings(&self) -> Vec<Standing> {
        let mut rows: Vec<(Player, u64)> = self
            .config
            .players
            .iter()
            .map(|p| (p.clone(), self.total(p.id)))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        rows.into_iter()
            .enumerate()
            .map(|(i, (player, total))| Standing {
                rank: i + 1,
                player,
                total,
                champion: i == 0 && total > 0,
            })
            .collect()
    }

    /// "Hand n / target" for round-limited sessions.
    pub fn progress(&self) -> Option<String> {
        match self.config.goal {
            Goal::RoundLimit(n) => Some(format!("Hand {} / {}", self.rounds.len(), n)),
            Goal::PointTarget(_) | Goal::FreePlay => None,
        }
    }
}

/// Everything a client needs to draw the scoreboard, derived from a Session.
#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub config: SessionConfig,
    pub goal_label: String,
    pub progress: Option<String>,
    pub rounds: Vec<Round>,
    pub totals: BTreeMap<PlayerId, u64>,
    pub leader: Option<Leader>,
    pub winner: Option<Winner>,
    pub phase: SessionPhase,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    pub fn from_session(s: &Session) -> Self {
        Self {
            id: s.id,
            config: s.config.clone(),
            goal_label: s.config.goal.label(),
            progress: s.progress(),
            rounds: s.rounds.clone(),
            totals: s.totals().into_iter().collect(),
            leader: s.leader(),
            winner: s.winner.clone(),
            phase: s.phase(),
            started_at: s.started_at,
            ended_at: s.ended_at,
        }
    }
}
