//! Recording match outcomes in the pending round.

use crate::models::{
    EntityKind, MatchId, MatchStatus, PlayerId, Tournament, TournamentError, TournamentResult,
};
use serde::{Deserialize, Serialize};

/// Record (or re-record) the outcome of a match in the pending round.
///
/// `winner` is None for a tie. Last write wins until the round is finalized.
/// Participant counters are not touched here; see `finalize_round`.
pub fn record_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    winner: Option<PlayerId>,
    player_1_score: u32,
    player_2_score: u32,
) -> TournamentResult<()> {
    tournament.ensure_not_finished()?;

    let in_pending = tournament
        .pending_round()
        .is_some_and(|r| r.get_match(match_id).is_some());
    if !in_pending {
        return Err(match tournament.find_match(match_id) {
            Some((round, _)) => {
                TournamentError::Validation(format!("round {round} has already been finalized"))
            }
            None => TournamentError::not_found(EntityKind::Match, match_id),
        });
    }

    if let Some(w) = winner {
        tournament.participant(w)?;
    }

    let round = tournament
        .pending_round_mut()
        .ok_or_else(|| TournamentError::State("no round in progress".into()))?;
    let m = round
        .get_match_mut(match_id)
        .ok_or(TournamentError::not_found(EntityKind::Match, match_id))?;

    if m.is_bye() {
        return Err(TournamentError::Validation(
            "a bye has a fixed result".into(),
        ));
    }
    if let Some(w) = winner {
        if !m.involves(w) {
            return Err(TournamentError::Validation(format!(
                "winner {w} is not playing in match {match_id}"
            )));
        }
    }

    m.status = MatchStatus::Completed;
    m.winner = winner;
    m.player_1_score = player_1_score;
    m.player_2_score = player_2_score;
    log::debug!(
        "recorded match {} (table {}): winner {:?}, {}-{}",
        m.id,
        m.table_number,
        winner,
        player_1_score,
        player_2_score
    );
    Ok(())
}

/// A result being edited before it is committed.
///
/// Editing a draft never touches the tournament; only `commit` does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDraft {
    pub match_id: MatchId,
    /// None for a tie.
    #[serde(default)]
    pub winner: Option<PlayerId>,
    #[serde(default)]
    pub player_1_score: u32,
    #[serde(default)]
    pub player_2_score: u32,
}

impl ResultDraft {
    pub fn new(match_id: MatchId) -> Self {
        Self {
            match_id,
            winner: None,
            player_1_score: 0,
            player_2_score: 0,
        }
    }

    /// Start from what is currently recorded for the match.
    pub fn from_recorded(tournament: &Tournament, match_id: MatchId) -> TournamentResult<Self> {
        let (_, m) = tournament
            .find_match(match_id)
            .ok_or(TournamentError::not_found(EntityKind::Match, match_id))?;
        Ok(Self {
            match_id,
            winner: m.winner,
            player_1_score: m.player_1_score,
            player_2_score: m.player_2_score,
        })
    }

    pub fn won_by(mut self, player: PlayerId) -> Self {
        self.winner = Some(player);
        self
    }

    pub fn tied(mut self) -> Self {
        self.winner = None;
        self
    }

    pub fn scores(mut self, player_1_score: u32, player_2_score: u32) -> Self {
        self.player_1_score = player_1_score;
        self.player_2_score = player_2_score;
        self
    }

    pub fn commit(&self, tournament: &mut Tournament) -> TournamentResult<()> {
        record_result(
            tournament,
            self.match_id,
            self.winner,
            self.player_1_score,
            self.player_2_score,
        )
    }
}
