//! Tournament state machine: creation, participants, rule assignments, ending.

use swiss_tournament::{
    assign_player_rule, create_tournament, end_tournament, finalize_round, generate_next_round,
    record_result, remove_player_rule, EngineConfig, PlayerRule, RuleCatalog, TournamentError,
    TournamentStatus,
};

#[test]
fn create_requires_a_planned_round() {
    let rule = PlayerRule::standard();
    let err = create_tournament("Cup", 0, &rule).unwrap_err();
    assert!(matches!(err, TournamentError::Validation(_)));

    let t = create_tournament("Cup", 3, &rule).unwrap();
    assert_eq!(t.status, TournamentStatus::Open);
    assert_eq!(t.current_round, 0);
    assert_eq!(t.default_rule_id, rule.id);
    assert_eq!(t.version, 0);
}

#[test]
fn create_rejects_non_finite_rule() {
    let rule = PlayerRule::new("Broken", f64::NAN, 0.0, 1.0);
    assert!(matches!(
        create_tournament("Cup", 3, &rule),
        Err(TournamentError::Validation(_))
    ));
}

#[test]
fn participant_names_are_trimmed_and_unique() {
    let mut t = create_tournament("Cup", 3, &PlayerRule::standard()).unwrap();
    let id = t.add_participant("  Alice ").unwrap();
    assert_eq!(t.participant(id).unwrap().display_name, "Alice");

    assert!(matches!(
        t.add_participant("alice"),
        Err(TournamentError::Conflict(_))
    ));
    assert!(matches!(
        t.add_participant("   "),
        Err(TournamentError::Validation(_))
    ));
}

#[test]
fn participants_can_only_be_removed_while_open() {
    let rule = PlayerRule::standard();
    let other = PlayerRule::new("Other", 2.0, 0.0, 1.0);
    let mut t = create_tournament("Cup", 3, &rule).unwrap();
    let alice = t.add_participant("Alice").unwrap();
    let bob = t.add_participant("Bob").unwrap();
    t.add_participant("Carol").unwrap();
    assign_player_rule(&mut t, alice, &other).unwrap();

    t.remove_participant(alice).unwrap();
    assert!(t.get_participant(alice).is_none());
    assert!(t.rule_assignments.is_empty());

    generate_next_round(&mut t, &EngineConfig::default()).unwrap();
    assert!(matches!(
        t.remove_participant(bob),
        Err(TournamentError::State(_))
    ));
}

#[test]
fn late_entrants_join_the_next_round() {
    let rule = PlayerRule::standard();
    let catalog: RuleCatalog = [rule.clone()].into_iter().collect();
    let mut t = create_tournament("Cup", 3, &rule).unwrap();
    let alice = t.add_participant("Alice").unwrap();
    t.add_participant("Bob").unwrap();
    generate_next_round(&mut t, &EngineConfig::default()).unwrap();
    let m = t.pending_round().unwrap().matches[0].id;
    record_result(&mut t, m, Some(alice), 1, 0).unwrap();
    finalize_round(&mut t, &catalog).unwrap();

    let carol = t.add_participant("Carol").unwrap();
    generate_next_round(&mut t, &EngineConfig::default()).unwrap();
    let round = t.pending_round().unwrap();
    assert!(round.matches.iter().any(|m| m.involves(carol)));
    assert_eq!(t.participant(carol).unwrap().matches_played(), 0);
}

#[test]
fn duplicate_rule_assignment_is_a_conflict() {
    let rule = PlayerRule::standard();
    let x = PlayerRule::new("X", 3.0, 0.0, 1.0).with_cross_effects(0.5, 0.0, 0.5);
    let mut t = create_tournament("Cup", 3, &rule).unwrap();
    let alice = t.add_participant("Alice").unwrap();

    assign_player_rule(&mut t, alice, &x).unwrap();
    assert!(matches!(
        assign_player_rule(&mut t, alice, &x),
        Err(TournamentError::Conflict(_))
    ));
    assert_eq!(t.rule_id_for(alice), x.id);

    remove_player_rule(&mut t, alice).unwrap();
    assert_eq!(t.rule_id_for(alice), rule.id);
    assign_player_rule(&mut t, alice, &x).unwrap();
}

#[test]
fn rule_assignment_needs_a_known_participant() {
    let rule = PlayerRule::standard();
    let mut t = create_tournament("Cup", 3, &rule).unwrap();
    let stranger = uuid::Uuid::new_v4();
    assert!(matches!(
        assign_player_rule(&mut t, stranger, &rule),
        Err(TournamentError::NotFound { .. })
    ));
    assert!(matches!(
        remove_player_rule(&mut t, stranger),
        Err(TournamentError::NotFound { .. })
    ));
}

#[test]
fn removing_a_missing_assignment_is_rejected() {
    let rule = PlayerRule::standard();
    let mut t = create_tournament("Cup", 3, &rule).unwrap();
    let alice = t.add_participant("Alice").unwrap();
    assert!(matches!(
        remove_player_rule(&mut t, alice),
        Err(TournamentError::Validation(_))
    ));
}

#[test]
fn end_tournament_is_terminal() {
    let rule = PlayerRule::standard();
    let mut t = create_tournament("Cup", 3, &rule).unwrap();
    let alice = t.add_participant("Alice").unwrap();
    t.add_participant("Bob").unwrap();

    end_tournament(&mut t).unwrap();
    assert_eq!(t.status, TournamentStatus::Finished);
    assert!(t.ended_at.is_some());

    let state_errors = [
        end_tournament(&mut t).unwrap_err(),
        generate_next_round(&mut t, &EngineConfig::default()).unwrap_err(),
        t.add_participant("Carol").unwrap_err(),
        assign_player_rule(&mut t, alice, &rule).unwrap_err(),
    ];
    for err in state_errors {
        assert!(matches!(err, TournamentError::State(_)), "got {err:?}");
    }
    assert_eq!(t.status, TournamentStatus::Finished);
}

#[test]
fn end_tournament_mid_round_leaves_round_pending() {
    let rule = PlayerRule::standard();
    let catalog: RuleCatalog = [rule.clone()].into_iter().collect();
    let mut t = create_tournament("Cup", 3, &rule).unwrap();
    t.add_participant("Alice").unwrap();
    t.add_participant("Bob").unwrap();
    generate_next_round(&mut t, &EngineConfig::default()).unwrap();
    let m = t.pending_round().unwrap().matches[0].id;
    record_result(&mut t, m, None, 0, 0).unwrap();

    end_tournament(&mut t).unwrap();
    assert_eq!(t.current_round, 0);
    assert!(matches!(
        finalize_round(&mut t, &catalog),
        Err(TournamentError::State(_))
    ));
    assert!(matches!(
        record_result(&mut t, m, None, 1, 1),
        Err(TournamentError::State(_))
    ));
}

#[test]
fn validate_accepts_engine_built_tournaments_and_catches_corruption() {
    let rule = PlayerRule::standard();
    let catalog: RuleCatalog = [rule.clone()].into_iter().collect();
    let mut t = create_tournament("Cup", 3, &rule).unwrap();
    t.add_participant("Alice").unwrap();
    t.add_participant("Bob").unwrap();
    t.validate().unwrap();
    generate_next_round(&mut t, &EngineConfig::default()).unwrap();
    t.validate().unwrap();
    let m = t.pending_round().unwrap().matches[0].id;
    record_result(&mut t, m, None, 0, 0).unwrap();
    finalize_round(&mut t, &catalog).unwrap();
    t.validate().unwrap();

    let mut corrupt = t.clone();
    corrupt.current_round = 2;
    assert!(matches!(corrupt.validate(), Err(TournamentError::Validation(_))));

    let mut corrupt = t.clone();
    corrupt.participants.pop();
    assert!(matches!(corrupt.validate(), Err(TournamentError::NotFound { .. })));
}
