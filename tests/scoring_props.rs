//! Property-based tests for the scoring engine.
//!
//! Increase cases locally with: PROPTEST_CASES=500 cargo test --test scoring_props

use std::collections::HashMap;
use std::env;

use gin_rummy_scorer::{
    build_config, coerce_score, start_session, submit_round, undo_last, AceRule, GoalKind,
    PlayerId, Session, SetupPlayer,
};
use proptest::prelude::*;

fn proptest_config() -> ProptestConfig {
    let cases = env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(64);

    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}

fn free_session(players: usize) -> Session {
    let setup: Vec<SetupPlayer> = (0..players)
        .map(|i| SetupPlayer::named(format!("P{i}")))
        .collect();
    start_session(build_config(&setup, AceRule::Low, GoalKind::Free, 100, 10, "").unwrap())
}

/// Raw hand input: plain numbers, blanks, junk and negatives.
fn raw_input() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..200).prop_map(|n| n.to_string()),
        Just(String::new()),
        "[a-z]{1,4}",
        (1i32..100).prop_map(|n| format!("-{n}")),
    ]
}

fn hands(players: usize) -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(raw_input(), players), 0..25)
}

fn to_map(hand: &[String]) -> HashMap<PlayerId, String> {
    hand.iter()
        .enumerate()
        .map(|(i, s)| (i as PlayerId, s.clone()))
        .collect()
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn total_is_the_literal_sum(input in hands(3)) {
        let mut s = free_session(3);
        for hand in &input {
            submit_round(&mut s, &to_map(hand)).unwrap();
        }
        for id in 0..3u32 {
            let expected: u64 = input
                .iter()
                .map(|h| u64::from(coerce_score(Some(h[id as usize].as_str()))))
                .sum();
            prop_assert_eq!(s.total(id), expected);
        }
        prop_assert_eq!(s.rounds.len(), input.len());
    }

    #[test]
    fn undo_restores_previous_rounds(input in hands(2), last in prop::collection::vec(raw_input(), 2)) {
        let mut s = free_session(2);
        for hand in &input {
            submit_round(&mut s, &to_map(hand)).unwrap();
        }
        let before = s.rounds.clone();
        submit_round(&mut s, &to_map(&last)).unwrap();
        undo_last(&mut s);
        prop_assert_eq!(&s.rounds, &before);
        prop_assert!(s.winner.is_none());
    }

    #[test]
    fn queries_are_idempotent(input in hands(4)) {
        let mut s = free_session(4);
        for hand in &input {
            submit_round(&mut s, &to_map(hand)).unwrap();
        }
        prop_assert_eq!(s.leader(), s.leader());
        prop_assert_eq!(s.totals(), s.totals());
        if let Some(leader) = s.leader() {
            let max = s.totals().into_iter().map(|(_, t)| t).max().unwrap_or(0);
            prop_assert!(max > 0);
            prop_assert_eq!(s.total(leader.player_id), max);
        } else {
            prop_assert!(s.totals().iter().all(|&(_, t)| t == 0));
        }
    }
}
