//! Scoring rule resolution: own points plus the cross-effects each side's
//! rule inflicts on its opponent.

use crate::models::{
    EntityKind, Match, Outcome, PlayerId, PlayerRule, RuleCatalog, RuleSnapshot, Tournament,
    TournamentError, TournamentResult,
};

/// Points a rule awards its holder for their own result.
pub fn own_points(rule: &PlayerRule, outcome: Outcome) -> f64 {
    match outcome {
        Outcome::Win => rule.points_for_win,
        Outcome::Loss => rule.points_for_loss,
        Outcome::Tie => rule.points_for_tie,
    }
}

/// Adjustment the holder's rule applies to the holder's opponent, given the
/// holder's own outcome.
///
/// Holder lost: the winner receives `points_given_to_opponent` and gives up
/// `points_lost_by_opponent`.
/// Holder won: no adjustment.
/// Tie: the opponent shifts by `points_to_opponent_on_tie`.
pub fn cross_effect(rule: &PlayerRule, holder_outcome: Outcome) -> f64 {
    match holder_outcome {
        Outcome::Loss => rule.points_given_to_opponent - rule.points_lost_by_opponent,
        Outcome::Win => 0.0,
        Outcome::Tie => rule.points_to_opponent_on_tie,
    }
}

/// Point deltas `(player 1, player 2)` for a completed, non-bye match.
pub fn resolve_points(outcome_1: Outcome, rule_1: &PlayerRule, rule_2: &PlayerRule) -> (f64, f64) {
    let outcome_2 = outcome_1.reversed();
    let delta_1 = own_points(rule_1, outcome_1) + cross_effect(rule_2, outcome_2);
    let delta_2 = own_points(rule_2, outcome_2) + cross_effect(rule_1, outcome_1);
    (delta_1, delta_2)
}

/// A bye is worth the recipient's own win points and nothing else.
pub fn bye_points(rule: &PlayerRule) -> f64 {
    rule.points_for_win
}

/// Deltas for a finalized match from its rule snapshot. Byes yield
/// `(bye points, 0)`.
pub fn match_points(m: &Match) -> TournamentResult<(f64, f64)> {
    let snapshot = m.rules.as_ref().ok_or_else(|| {
        TournamentError::Validation(format!("match {} has no rule snapshot", m.id))
    })?;
    if m.is_bye() {
        return Ok((bye_points(&snapshot.player_1), 0.0));
    }
    let outcome = m
        .outcome_for_player_1()
        .ok_or_else(|| TournamentError::Validation(format!("match {} is pending", m.id)))?;
    let rule_2 = snapshot.player_2.as_ref().ok_or_else(|| {
        TournamentError::Validation(format!("match {} has no rule for player 2", m.id))
    })?;
    Ok(resolve_points(outcome, &snapshot.player_1, rule_2))
}

/// The rule governing `player`: their assignment, else the tournament default.
pub fn effective_rule<'a>(
    tournament: &Tournament,
    rules: &'a RuleCatalog,
    player: PlayerId,
) -> TournamentResult<&'a PlayerRule> {
    let rule_id = tournament.rule_id_for(player);
    rules
        .get(rule_id)
        .ok_or(TournamentError::not_found(EntityKind::Rule, rule_id))
}

/// Copy the rules in force for both sides of `m`.
pub fn snapshot_rules(
    tournament: &Tournament,
    rules: &RuleCatalog,
    m: &Match,
) -> TournamentResult<RuleSnapshot> {
    let player_1 = effective_rule(tournament, rules, m.player_1)?.clone();
    let player_2 = match m.player_2.player() {
        Some(id) => Some(effective_rule(tournament, rules, id)?.clone()),
        None => None,
    };
    Ok(RuleSnapshot { player_1, player_2 })
}
