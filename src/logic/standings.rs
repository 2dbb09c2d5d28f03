//! Standings: points from finalized matches, ranked into a strict order.

use crate::logic::scoring::match_points;
use crate::models::{
    EntityKind, Outcome, PlayerId, Tournament, TournamentError, TournamentResult,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// A participant's rank and record as of a given round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based; no two standings share a rank.
    pub rank: u32,
    pub player_id: PlayerId,
    pub display_name: String,
    pub points: f64,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub active: bool,
}

#[derive(Default)]
struct Tally {
    points: f64,
    wins: u32,
    losses: u32,
    draws: u32,
}

impl Tally {
    fn add(&mut self, points: f64, outcome: Outcome) {
        self.points += points;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Tie => self.draws += 1,
        }
    }
}

/// Compute ranked standings over finalized rounds up to `through_round`
/// (default and upper bound: the tournament's current round).
///
/// Order: points desc, wins desc, draws desc, display name asc. Pending
/// results are never counted.
pub fn compute_standings(
    tournament: &Tournament,
    through_round: Option<u32>,
) -> TournamentResult<Vec<Standing>> {
    let through = through_round
        .unwrap_or(tournament.current_round)
        .min(tournament.current_round);

    let mut tallies: HashMap<PlayerId, Tally> = tournament
        .participants
        .iter()
        .map(|p| (p.id, Tally::default()))
        .collect();

    for round in tournament.finalized_rounds().filter(|r| r.number <= through) {
        for m in &round.matches {
            let (delta_1, delta_2) = match_points(m)?;
            let outcome_1 = m.outcome_for_player_1().ok_or_else(|| {
                TournamentError::Validation(format!("match {} is pending", m.id))
            })?;
            tallies
                .get_mut(&m.player_1)
                .ok_or(TournamentError::not_found(EntityKind::Participant, m.player_1))?
                .add(delta_1, outcome_1);
            if let Some(player_2) = m.player_2.player() {
                tallies
                    .get_mut(&player_2)
                    .ok_or(TournamentError::not_found(EntityKind::Participant, player_2))?
                    .add(delta_2, outcome_1.reversed());
            }
        }
    }

    let mut standings: Vec<Standing> = tournament
        .participants
        .iter()
        .map(|p| {
            let tally = tallies.remove(&p.id).unwrap_or_default();
            Standing {
                rank: 0,
                player_id: p.id,
                display_name: p.display_name.clone(),
                points: tally.points,
                wins: tally.wins,
                losses: tally.losses,
                draws: tally.draws,
                active: p.active,
            }
        })
        .collect();

    standings.sort_by(compare_standings);
    for (i, s) in standings.iter_mut().enumerate() {
        s.rank = i as u32 + 1;
    }
    Ok(standings)
}

fn compare_standings(a: &Standing, b: &Standing) -> Ordering {
    b.points
        .total_cmp(&a.points)
        .then(b.wins.cmp(&a.wins))
        .then(b.draws.cmp(&a.draws))
        .then_with(|| a.display_name.cmp(&b.display_name))
        .then_with(|| a.player_id.cmp(&b.player_id))
}

#[derive(Serialize)]
struct CsvRow<'a> {
    rank: u32,
    name: &'a str,
    points: f64,
    wins: u32,
    losses: u32,
    draws: u32,
}

/// Standings as CSV with a header row.
pub fn standings_to_csv(standings: &[Standing]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for s in standings {
        writer.serialize(CsvRow {
            rank: s.rank,
            name: &s.display_name,
            points: s.points,
            wins: s.wins,
            losses: s.losses,
            draws: s.draws,
        })?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
