//! Swiss pairing: generate the next round from current standings.

use crate::config::EngineConfig;
use crate::logic::standings::compute_standings;
use crate::models::{
    Match, Participant, PlayerId, Round, Tournament, TournamentError, TournamentResult,
    TournamentStatus,
};
use std::collections::{HashMap, HashSet};

/// Generate the next round (Open or InProgress; previous round finalized).
///
/// 1. Rank active participants by points, then wins, then name.
/// 2. With an odd count, the lowest-ranked participant without a bye sits
///    out (the lowest-ranked overall once everyone has had one).
/// 3. Pair from the top; a pairing that would repeat an earlier match is
///    swapped with one of the next `pairing_lookahead` participants. If none
///    is fresh the repeat is allowed.
/// 4. Tables 1..k in pairing order; the bye is on table 0.
///
/// Generating beyond `total_rounds` is allowed.
pub fn generate_next_round<'a>(
    tournament: &'a mut Tournament,
    config: &EngineConfig,
) -> TournamentResult<&'a Round> {
    tournament.ensure_not_finished()?;
    if let Some(round) = tournament.pending_round() {
        return Err(TournamentError::State(format!(
            "round {} has not been finalized",
            round.number
        )));
    }

    let mut ranked = ranked_for_pairing(tournament)?;
    if ranked.len() < 2 {
        return Err(TournamentError::Validation(format!(
            "need at least 2 active participants to pair, have {}",
            ranked.len()
        )));
    }

    let bye = if ranked.len() % 2 == 1 {
        let idx = ranked
            .iter()
            .rposition(|p| !p.has_had_bye)
            .unwrap_or(ranked.len() - 1);
        let recipient = ranked.remove(idx);
        log::debug!("bye goes to {}", recipient.display_name);
        Some(recipient.id)
    } else {
        None
    };

    let played = played_pairs(tournament);
    let mut queue: Vec<PlayerId> = ranked.iter().map(|p| p.id).collect();
    let mut pairs = Vec::with_capacity(queue.len() / 2);
    while !queue.is_empty() {
        let p = queue.remove(0);
        let window = queue.len().min(config.pairing_lookahead.saturating_add(1));
        let pick = (0..window)
            .find(|&i| !played.contains(&pair_key(p, queue[i])))
            .unwrap_or(0);
        if pick > 0 {
            log::debug!("swapped opponent at offset {pick} to avoid a repeat pairing");
        } else if window > 0 && played.contains(&pair_key(p, queue[0])) {
            log::debug!("no fresh opponent within lookahead; allowing a repeat pairing");
        }
        let q = queue.remove(pick);
        pairs.push((p, q));
    }

    let mut matches: Vec<Match> = pairs
        .into_iter()
        .enumerate()
        .map(|(i, (p, q))| Match::new(i as u32 + 1, p, q))
        .collect();
    if let Some(player) = bye {
        matches.push(Match::bye(player));
    }

    let number = tournament.rounds.len() as u32 + 1;
    tournament.rounds.push(Round::new(number, matches));
    if tournament.status == TournamentStatus::Open {
        tournament.status = TournamentStatus::InProgress;
    }
    log::info!(
        "tournament {}: generated round {} ({} participants)",
        tournament.id,
        number,
        tournament.participants.iter().filter(|p| p.active).count()
    );
    let idx = tournament.rounds.len() - 1;
    Ok(&tournament.rounds[idx])
}

/// Active participants ordered by points desc, wins desc, name asc.
fn ranked_for_pairing(tournament: &Tournament) -> TournamentResult<Vec<&Participant>> {
    let points: HashMap<PlayerId, f64> = compute_standings(tournament, None)?
        .into_iter()
        .map(|s| (s.player_id, s.points))
        .collect();
    let points_of = |p: &Participant| points.get(&p.id).copied().unwrap_or(0.0);

    let mut ranked: Vec<&Participant> =
        tournament.participants.iter().filter(|p| p.active).collect();
    ranked.sort_by(|a, b| {
        points_of(b)
            .total_cmp(&points_of(a))
            .then(b.wins.cmp(&a.wins))
            .then_with(|| a.display_name.cmp(&b.display_name))
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(ranked)
}

fn pair_key(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Every pair of participants that has already met this tournament.
fn played_pairs(tournament: &Tournament) -> HashSet<(PlayerId, PlayerId)> {
    tournament
        .rounds
        .iter()
        .flat_map(|r| &r.matches)
        .filter_map(|m| m.player_2.player().map(|p2| pair_key(m.player_1, p2)))
        .collect()
}
