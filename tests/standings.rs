//! Standings: accumulation over finalized rounds, strict ordering, export.

use swiss_tournament::{
    compute_standings, end_tournament, finalize_round, generate_next_round, record_result,
    standings_to_csv, EngineConfig, Participant, PlayerId, PlayerRule, RuleCatalog, Tournament,
};

fn tournament_with(names: &[&str]) -> (Tournament, RuleCatalog) {
    let rule = PlayerRule::new("D", 3.0, 0.0, 1.0);
    let players: Vec<Participant> = names.iter().map(|n| Participant::new(*n)).collect();
    let t = Tournament::with_participants(players, 3, rule.id);
    let catalog: RuleCatalog = [rule].into_iter().collect();
    (t, catalog)
}

fn id_of(t: &Tournament, name: &str) -> PlayerId {
    t.participants
        .iter()
        .find(|p| p.display_name == name)
        .unwrap()
        .id
}

fn summary(t: &Tournament, through: Option<u32>) -> Vec<(u32, String, f64)> {
    compute_standings(t, through)
        .unwrap()
        .into_iter()
        .map(|s| (s.rank, s.display_name, s.points))
        .collect()
}

fn row(rank: u32, name: &str, points: f64) -> (u32, String, f64) {
    (rank, name.to_string(), points)
}

/// Alice beats Bob, Carol and Dave draw; round 1 finalized.
fn after_round_one() -> (Tournament, RuleCatalog) {
    let (mut t, catalog) = tournament_with(&["Alice", "Bob", "Carol", "Dave"]);
    generate_next_round(&mut t, &EngineConfig::default()).unwrap();
    let matches = t.pending_round().unwrap().matches.clone();
    let alice = id_of(&t, "Alice");
    record_result(&mut t, matches[0].id, Some(alice), 3, 1).unwrap();
    record_result(&mut t, matches[1].id, None, 2, 2).unwrap();
    finalize_round(&mut t, &catalog).unwrap();
    (t, catalog)
}

#[test]
fn end_to_end_first_round() {
    let (t, _) = after_round_one();
    assert_eq!(
        summary(&t, None),
        vec![
            row(1, "Alice", 3.0),
            row(2, "Carol", 1.0),
            row(3, "Dave", 1.0),
            row(4, "Bob", 0.0),
        ]
    );
    let standings = compute_standings(&t, None).unwrap();
    assert_eq!((standings[0].wins, standings[0].losses, standings[0].draws), (1, 0, 0));
    assert_eq!((standings[3].wins, standings[3].losses, standings[3].draws), (0, 1, 0));
}

#[test]
fn standings_before_any_round_rank_by_name() {
    let (t, _) = tournament_with(&["Carol", "Alice", "Bob"]);
    assert_eq!(
        summary(&t, None),
        vec![row(1, "Alice", 0.0), row(2, "Bob", 0.0), row(3, "Carol", 0.0)]
    );
}

#[test]
fn pending_results_are_not_counted() {
    let (mut t, _) = after_round_one();
    let before = compute_standings(&t, None).unwrap();
    generate_next_round(&mut t, &EngineConfig::default()).unwrap();
    let m = t.pending_round().unwrap().matches[0].clone();
    record_result(&mut t, m.id, Some(m.player_1), 1, 0).unwrap();

    assert_eq!(compute_standings(&t, None).unwrap(), before);
}

#[test]
fn through_round_limits_and_clamps() {
    let (mut t, catalog) = after_round_one();
    generate_next_round(&mut t, &EngineConfig::default()).unwrap();
    let matches = t.pending_round().unwrap().matches.clone();
    for m in &matches {
        record_result(&mut t, m.id, Some(m.player_1), 1, 0).unwrap();
    }
    finalize_round(&mut t, &catalog).unwrap();

    let round_one = summary(&t, Some(1));
    assert_eq!(round_one[0], row(1, "Alice", 3.0));
    assert_eq!(round_one[3], row(4, "Bob", 0.0));
    assert_eq!(summary(&t, Some(0)).iter().map(|r| r.2).sum::<f64>(), 0.0);
    assert_eq!(summary(&t, Some(99)), summary(&t, None));
    assert_eq!(summary(&t, None)[0], row(1, "Alice", 6.0));
}

#[test]
fn fully_tied_standings_break_on_name() {
    let rule = PlayerRule::new("D", 3.0, 0.0, 1.0);
    let players = ["Zed", "Amy", "Bob", "Cat"].map(Participant::new).to_vec();
    let mut t = Tournament::with_participants(players, 3, rule.id);
    let catalog: RuleCatalog = [rule].into_iter().collect();
    let config = EngineConfig { pairing_lookahead: 0 };

    for _ in 0..3 {
        generate_next_round(&mut t, &config).unwrap();
        let matches = t.pending_round().unwrap().matches.clone();
        for m in &matches {
            record_result(&mut t, m.id, None, 0, 0).unwrap();
        }
        finalize_round(&mut t, &catalog).unwrap();
    }
    let standings = compute_standings(&t, None).unwrap();
    let names: Vec<&str> = standings.iter().map(|s| s.display_name.as_str()).collect();
    assert_eq!(names, vec!["Amy", "Bob", "Cat", "Zed"]);
    assert!(standings.iter().all(|s| s.points == 3.0 && s.draws == 3));
    let ranks: Vec<u32> = standings.iter().map(|s| s.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
}

#[test]
fn more_wins_beats_more_draws_on_equal_points() {
    let rule = PlayerRule::new("D", 2.0, 0.0, 1.0);
    let players = ["Amy", "Bob", "Cat", "Dan"].map(Participant::new).to_vec();
    let mut t = Tournament::with_participants(players, 2, rule.id);
    let catalog: RuleCatalog = [rule].into_iter().collect();
    let config = EngineConfig { pairing_lookahead: 0 };

    // Round 1: Amy-Bob draw, Cat beats Dan.
    generate_next_round(&mut t, &config).unwrap();
    let m = t.pending_round().unwrap().matches.clone();
    record_result(&mut t, m[0].id, None, 0, 0).unwrap();
    record_result(&mut t, m[1].id, Some(m[1].player_1), 0, 0).unwrap();
    finalize_round(&mut t, &catalog).unwrap();

    // Round 2 order: Cat (2), Amy (1), Bob (1), Dan (0). Cat loses to Amy; Bob-Dan draw.
    generate_next_round(&mut t, &config).unwrap();
    let m = t.pending_round().unwrap().matches.clone();
    record_result(&mut t, m[0].id, Some(m[0].player_2.player().unwrap()), 0, 0).unwrap();
    record_result(&mut t, m[1].id, None, 0, 0).unwrap();
    finalize_round(&mut t, &catalog).unwrap();

    // Amy 3 (1W 1D), Bob 2 (2D), Cat 2 (1W 1L), Dan 1.
    assert_eq!(
        summary(&t, None),
        vec![
            row(1, "Amy", 3.0),
            row(2, "Cat", 2.0),
            row(3, "Bob", 2.0),
            row(4, "Dan", 1.0),
        ]
    );
}

#[test]
fn compute_standings_is_idempotent() {
    let (t, _) = after_round_one();
    let first = serde_json::to_string(&compute_standings(&t, None).unwrap()).unwrap();
    let second = serde_json::to_string(&compute_standings(&t, None).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn ended_tournament_ignores_unfinalized_round() {
    let (mut t, _) = after_round_one();
    generate_next_round(&mut t, &EngineConfig::default()).unwrap();
    let m = t.pending_round().unwrap().matches[0].clone();
    record_result(&mut t, m.id, Some(m.player_1), 1, 0).unwrap();
    end_tournament(&mut t).unwrap();

    assert_eq!(summary(&t, None)[0], row(1, "Alice", 3.0));
}

#[test]
fn dropped_participants_keep_their_standing() {
    let (mut t, _) = after_round_one();
    let alice = id_of(&t, "Alice");
    t.drop_participant(alice).unwrap();
    let standings = compute_standings(&t, None).unwrap();
    assert_eq!(standings[0].player_id, alice);
    assert!(!standings[0].active);
}

#[test]
fn csv_export_has_header_and_rows_in_rank_order() {
    let (t, _) = after_round_one();
    let csv = standings_to_csv(&compute_standings(&t, None).unwrap()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "rank,name,points,wins,losses,draws");
    assert_eq!(lines[1], "1,Alice,3.0,1,0,0");
    assert_eq!(lines[4], "4,Bob,0.0,0,1,0");
    assert_eq!(lines.len(), 5);
}
