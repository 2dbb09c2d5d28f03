//! Tournament state machine: creation, rule assignments, ending.

use crate::models::{
    PlayerId, PlayerRule, Tournament, TournamentError, TournamentResult,
    TournamentStatus,
};
use chrono::Utc;

/// Create an Open tournament scored by `default_rule` unless overridden.
pub fn create_tournament(
    name: impl Into<String>,
    total_rounds: u32,
    default_rule: &PlayerRule,
) -> TournamentResult<Tournament> {
    if total_rounds == 0 {
        return Err(TournamentError::Validation(
            "a tournament needs at least one planned round".into(),
        ));
    }
    if !default_rule.is_valid() {
        return Err(TournamentError::Validation(format!(
            "rule {} has non-finite coefficients",
            default_rule.id
        )));
    }
    Ok(Tournament::new(name, total_rounds, default_rule.id))
}

/// Give `player_id` a non-default rule. An existing assignment must be
/// removed first.
pub fn assign_player_rule(
    tournament: &mut Tournament,
    player_id: PlayerId,
    rule: &PlayerRule,
) -> TournamentResult<()> {
    tournament.ensure_not_finished()?;
    tournament.participant(player_id)?;
    if let Some(existing) = tournament.rule_assignments.get(&player_id) {
        return Err(TournamentError::Conflict(format!(
            "participant {player_id} already has rule {existing} assigned"
        )));
    }
    if !rule.is_valid() {
        return Err(TournamentError::Validation(format!(
            "rule {} has non-finite coefficients",
            rule.id
        )));
    }
    tournament.rule_assignments.insert(player_id, rule.id);
    log::info!(
        "tournament {}: assigned rule {:?} to {}",
        tournament.id,
        rule.name,
        player_id
    );
    Ok(())
}

/// Remove a participant's rule override; the default rule applies again
/// from the next finalized round.
pub fn remove_player_rule(tournament: &mut Tournament, player_id: PlayerId) -> TournamentResult<()> {
    tournament.ensure_not_finished()?;
    tournament.participant(player_id)?;
    match tournament.rule_assignments.remove(&player_id) {
        Some(rule_id) => {
            log::info!(
                "tournament {}: removed rule {} from {}",
                tournament.id,
                rule_id,
                player_id
            );
            Ok(())
        }
        None => Err(TournamentError::Validation(format!(
            "participant {player_id} has no rule assignment"
        ))),
    }
}

/// End the tournament. Irreversible; a pending round stays unfinalized and
/// never counts toward standings.
pub fn end_tournament(tournament: &mut Tournament) -> TournamentResult<()> {
    tournament.ensure_not_finished()?;
    if let Some(round) = tournament.pending_round() {
        log::info!(
            "tournament {}: ending with round {} unfinalized",
            tournament.id,
            round.number
        );
    }
    tournament.status = TournamentStatus::Finished;
    tournament.ended_at = Some(Utc::now());
    log::info!(
        "tournament {}: finished after {} round(s)",
        tournament.id,
        tournament.current_round
    );
    Ok(())
}
