//! Integration test for the CSV score sheet.

use gin_rummy_scorer::{
    build_config, score_sheet_csv, start_session, submit_round, AceRule, GoalKind, SetupPlayer,
};
use std::collections::HashMap;

#[test]
fn score_sheet_lists_hands_and_totals() {
    let players = vec![SetupPlayer::named("Ann"), SetupPlayer::named("Bo")];
    let config = build_config(&players, AceRule::Low, GoalKind::Free, 100, 10, "").unwrap();
    let mut s = start_session(config);

    let hand = |a: &str, b: &str| HashMap::from([(0u32, a.to_string()), (1u32, b.to_string())]);
    submit_round(&mut s, &hand("12", "0")).unwrap();
    submit_round(&mut s, &hand("x", "30")).unwrap();

    let csv = score_sheet_csv(&s).unwrap();
    assert_eq!(csv, "Hand,Ann,Bo\n1,12,0\n2,0,30\nTotal,12,30\n");
}
