//! Round finalization: the only place participant counters change.

use crate::logic::scoring::snapshot_rules;
use crate::models::{
    EntityKind, Opponent, Outcome, PlayerId, RuleCatalog, RuleSnapshot, Tournament,
    TournamentError, TournamentResult, TournamentStatus,
};
use chrono::Utc;

/// Finalize the pending round: apply wins/losses/draws, mark byes, snapshot
/// each match's rules, and advance `current_round`.
///
/// Fails with a validation error if any match is still pending. Nothing is
/// changed unless every match can be committed.
pub fn finalize_round(tournament: &mut Tournament, rules: &RuleCatalog) -> TournamentResult<u32> {
    tournament.ensure_not_finished()?;
    let round = tournament
        .pending_round()
        .ok_or_else(|| TournamentError::State("no round in progress".into()))?;

    if !round.is_complete() {
        return Err(TournamentError::Validation(format!(
            "round incomplete: {} match(es) pending",
            round.pending_count()
        )));
    }

    let mut results: Vec<(PlayerId, Opponent, Outcome)> = Vec::with_capacity(round.matches.len());
    let mut snapshots: Vec<RuleSnapshot> = Vec::with_capacity(round.matches.len());
    for m in &round.matches {
        for pid in std::iter::once(m.player_1).chain(m.player_2.player()) {
            tournament.participant(pid)?;
        }
        let outcome = m.outcome_for_player_1().ok_or_else(|| {
            TournamentError::Validation(format!("match {} is pending", m.id))
        })?;
        results.push((m.player_1, m.player_2, outcome));
        snapshots.push(snapshot_rules(tournament, rules, m)?);
    }

    for (player_1, player_2, outcome) in results {
        apply_result(tournament, player_1, player_2, outcome)?;
    }

    let round = tournament
        .pending_round_mut()
        .ok_or_else(|| TournamentError::State("no round in progress".into()))?;
    for (m, snapshot) in round.matches.iter_mut().zip(snapshots) {
        m.rules = Some(snapshot);
    }
    round.finalized = true;
    round.finalized_at = Some(Utc::now());
    let number = round.number;

    tournament.current_round += 1;
    if tournament.status == TournamentStatus::Open {
        tournament.status = TournamentStatus::InProgress;
    }
    log::info!("tournament {}: finalized round {}", tournament.id, number);
    Ok(tournament.current_round)
}

/// Apply one match result to the participants' counters.
fn apply_result(
    tournament: &mut Tournament,
    player_1: PlayerId,
    player_2: Opponent,
    outcome: Outcome,
) -> TournamentResult<()> {
    let Opponent::Player(player_2) = player_2 else {
        tournament
            .get_participant_mut(player_1)
            .ok_or(TournamentError::not_found(EntityKind::Participant, player_1))?
            .record_bye();
        return Ok(());
    };

    for (pid, side) in [(player_1, outcome), (player_2, outcome.reversed())] {
        let p = tournament
            .get_participant_mut(pid)
            .ok_or(TournamentError::not_found(EntityKind::Participant, pid))?;
        match side {
            Outcome::Win => p.add_win(),
            Outcome::Loss => p.add_loss(),
            Outcome::Tie => p.add_draw(),
        }
    }
    Ok(())
}
