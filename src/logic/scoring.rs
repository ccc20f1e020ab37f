//! Scoring: round submission, goal evaluation, undo and ending the session.

use crate::models::{Goal, PlayerId, Round, Session, SessionError, Winner};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};

/// Outcome of a submitted round.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundResult {
    /// All rounds, including the one just added.
    pub rounds: Vec<Round>,
    /// Set when this round made the goal fire.
    pub winner: Option<Winner>,
}

/// Leading integer of the trimmed input (optional sign, then digits), ignoring anything after.
pub(crate) fn parse_leading_int(input: &str) -> Option<i64> {
    let s = input.trim();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let n: i64 = rest[..end].parse().ok()?;
    Some(if negative { -n } else { n })
}

/// Turn one player's raw hand input into a stored score.
///
/// Missing, blank, unparsable, negative and out-of-range input all become 0.
pub fn coerce_score(input: Option<&str>) -> u32 {
    input
        .and_then(parse_leading_int)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

/// Record a hand and evaluate the goal.
///
/// Every player gets a score (missing input counts as 0). Input naming an unknown
/// player is rejected before anything changes, as is submitting to an ended session.
pub fn submit_round(
    session: &mut Session,
    raw_scores: &HashMap<PlayerId, String>,
) -> Result<RoundResult, SessionError> {
    if session.is_ended() {
        return Err(SessionError::SessionEnded);
    }
    if let Some(&unknown) = raw_scores.keys().find(|id| session.player(**id).is_none()) {
        return Err(SessionError::UnknownPlayer(unknown));
    }

    let scores: BTreeMap<PlayerId, u32> = session
        .players()
        .iter()
        .map(|p| (p.id, coerce_score(raw_scores.get(&p.id).map(String::as_str))))
        .collect();
    let round_number = session.rounds.len() as u32 + 1;
    session.rounds.push(Round {
        round_number,
        scores,
    });
    log::debug!("Session {}: recorded hand {}", session.id, round_number);

    let winner = evaluate_goal(session);
    if let Some(w) = &winner {
        log::info!(
            "Session {}: goal reached on hand {}, winner {} with {}",
            session.id,
            round_number,
            w.player.name,
            w.score
        );
        session.winner = Some(w.clone());
    }

    Ok(RoundResult {
        rounds: session.rounds.clone(),
        winner,
    })
}

/// Check the session goal against the current rounds. Does not mutate.
pub fn evaluate_goal(session: &Session) -> Option<Winner> {
    match session.goal() {
        Goal::PointTarget(target) => session.players().iter().find_map(|p| {
            let total = session.total(p.id);
            (total >= u64::from(target)).then(|| Winner {
                player: p.clone(),
                score: total,
            })
        }),
        Goal::RoundLimit(count) if session.rounds.len() >= count as usize => {
            top_scorer(session)
        }
        Goal::RoundLimit(_) | Goal::FreePlay => None,
    }
}

/// First player at the highest total, zero included.
fn top_scorer(session: &Session) -> Option<Winner> {
    let mut best: Option<Winner> = None;
    for p in session.players() {
        let total = session.total(p.id);
        if best.as_ref().map_or(true, |b| total > b.score) {
            best = Some(Winner {
                player: p.clone(),
                score: total,
            });
        }
    }
    best
}

/// Drop the most recent round and any recorded winner. No-op with no rounds or once ended.
pub fn undo_last(session: &mut Session) -> Option<Round> {
    if session.is_ended() {
        return None;
    }
    let removed = session.rounds.pop()?;
    session.winner = None;
    log::debug!("Session {}: undid hand {}", session.id, removed.round_number);
    Some(removed)
}

/// Clear a pending winner and keep scoring. No-op once ended.
pub fn dismiss_winner(session: &mut Session) {
    if session.is_ended() {
        return;
    }
    if let Some(w) = session.winner.take() {
        log::debug!("Session {}: winner {} dismissed", session.id, w.player.name);
    }
}

/// End the session.
///
/// A forced winner replaces any recorded one. Otherwise a winner already set by the goal
/// is kept, or the highest positive total is crowned (first in player order on ties).
/// With every total at 0 the session ends without a winner. Ending twice is a no-op.
pub fn end_session(
    session: &mut Session,
    forced_winner: Option<PlayerId>,
) -> Result<Option<Winner>, SessionError> {
    if session.is_ended() {
        return Ok(session.winner.clone());
    }
    if let Some(id) = forced_winner {
        let player = session
            .player(id)
            .cloned()
            .ok_or(SessionError::UnknownPlayer(id))?;
        let score = session.total(id);
        session.winner = Some(Winner { player, score });
    } else if session.winner.is_none() {
        session.winner = session.highest_scorer().map(|(p, score)| Winner {
            player: p.clone(),
            score,
        });
    }
    session.ended_at = Some(Utc::now());

    match &session.winner {
        Some(w) => log::info!(
            "Session {} ended after {} hands, winner {} with {}",
            session.id,
            session.rounds.len(),
            w.player.name,
            w.score
        ),
        None => log::info!(
            "Session {} ended after {} hands without a winner",
            session.id,
            session.rounds.len()
        ),
    }
    Ok(session.winner.clone())
}
