//! Tournament and TournamentStatus.

use crate::models::error::{EntityKind, TournamentError, TournamentResult};
use crate::models::game::{Match, MatchId, Round};
use crate::models::participant::{Participant, PlayerId};
use crate::models::rule::RuleId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Lifecycle of a tournament. `Finished` is terminal.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Registering players and rules; no round generated yet.
    #[default]
    Open,
    /// At least one round generated.
    InProgress,
    /// Ended by the organizer.
    Finished,
}

/// Full tournament aggregate: participants, rounds, rule assignments, status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    /// Planned number of rounds. Organizers may play more.
    pub total_rounds: u32,
    /// Number of finalized rounds.
    pub current_round: u32,
    pub status: TournamentStatus,
    pub default_rule_id: RuleId,
    /// Finalized rounds in order, followed by at most one pending round.
    pub rounds: Vec<Round>,
    pub participants: Vec<Participant>,
    /// Per-participant rule overrides. Absent means the default rule applies.
    pub rule_assignments: BTreeMap<PlayerId, RuleId>,
    /// Bumped on every committed mutation; used for optimistic concurrency.
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Tournament {
    /// Create a new Open tournament with no participants.
    pub fn new(name: impl Into<String>, total_rounds: u32, default_rule_id: RuleId) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            total_rounds,
            current_round: 0,
            status: TournamentStatus::Open,
            default_rule_id,
            rounds: Vec::new(),
            participants: Vec::new(),
            rule_assignments: BTreeMap::new(),
            version: 0,
            created_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Create a tournament with initial participants. Still Open.
    pub fn with_participants(
        participants: Vec<Participant>,
        total_rounds: u32,
        default_rule_id: RuleId,
    ) -> Self {
        Self {
            participants,
            ..Self::new("", total_rounds, default_rule_id)
        }
    }

    pub fn get_participant(&self, id: PlayerId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn get_participant_mut(&mut self, id: PlayerId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    /// Participant by id, or `NotFound`.
    pub fn participant(&self, id: PlayerId) -> TournamentResult<&Participant> {
        self.get_participant(id)
            .ok_or(TournamentError::not_found(EntityKind::Participant, id))
    }

    /// The round currently being played, if one has been generated and not finalized.
    pub fn pending_round(&self) -> Option<&Round> {
        self.rounds.last().filter(|r| !r.finalized)
    }

    pub fn pending_round_mut(&mut self) -> Option<&mut Round> {
        self.rounds.last_mut().filter(|r| !r.finalized)
    }

    pub fn finalized_rounds(&self) -> impl Iterator<Item = &Round> {
        self.rounds.iter().filter(|r| r.finalized)
    }

    /// Find a match in any round, with the number of its round.
    pub fn find_match(&self, id: MatchId) -> Option<(u32, &Match)> {
        self.rounds
            .iter()
            .find_map(|r| r.get_match(id).map(|m| (r.number, m)))
    }

    /// Effective rule id for a participant: their override or the default.
    pub fn rule_id_for(&self, player: PlayerId) -> RuleId {
        self.rule_assignments
            .get(&player)
            .copied()
            .unwrap_or(self.default_rule_id)
    }

    /// All rule ids a finalize of this tournament could need.
    pub fn referenced_rule_ids(&self) -> Vec<RuleId> {
        let mut ids: Vec<RuleId> = self.rule_assignments.values().copied().collect();
        ids.push(self.default_rule_id);
        ids.sort();
        ids.dedup();
        ids
    }

    pub fn is_finished(&self) -> bool {
        self.status == TournamentStatus::Finished
    }

    /// Reject any mutation once the tournament has ended.
    pub fn ensure_not_finished(&self) -> TournamentResult<()> {
        if self.is_finished() {
            return Err(TournamentError::State("tournament has finished".into()));
        }
        Ok(())
    }

    /// Add a participant (Open or InProgress). Names are trimmed and unique, case-insensitive.
    pub fn add_participant(&mut self, name: impl Into<String>) -> TournamentResult<PlayerId> {
        self.ensure_not_finished()?;
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::Validation("participant name is empty".into()));
        }
        let is_duplicate = self
            .participants
            .iter()
            .any(|p| p.display_name.eq_ignore_ascii_case(name));
        if is_duplicate {
            return Err(TournamentError::Conflict(format!(
                "a participant named {name:?} already exists"
            )));
        }
        let participant = Participant::new(name);
        let id = participant.id;
        self.participants.push(participant);
        Ok(id)
    }

    /// Remove a participant entirely (only while Open). Drops their rule assignment too.
    pub fn remove_participant(&mut self, player_id: PlayerId) -> TournamentResult<()> {
        if self.status != TournamentStatus::Open {
            return Err(TournamentError::State(
                "participants can only be removed before the first round".into(),
            ));
        }
        let idx = self
            .participants
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(TournamentError::not_found(EntityKind::Participant, player_id))?;
        self.participants.remove(idx);
        self.rule_assignments.remove(&player_id);
        Ok(())
    }

    /// Withdraw a participant from future pairings. They keep their standing.
    pub fn drop_participant(&mut self, player_id: PlayerId) -> TournamentResult<()> {
        if self.status != TournamentStatus::InProgress {
            return Err(TournamentError::State(
                "participants can only be dropped while the tournament is in progress".into(),
            ));
        }
        self.participant(player_id)?;
        if self
            .pending_round()
            .is_some_and(|r| r.matches.iter().any(|m| m.involves(player_id)))
        {
            return Err(TournamentError::State(
                "participant is paired in the pending round".into(),
            ));
        }
        if let Some(p) = self.get_participant_mut(player_id) {
            p.active = false;
        }
        Ok(())
    }

    /// Check the structural invariants of a tournament read from storage.
    pub fn validate(&self) -> TournamentResult<()> {
        let finalized = self.finalized_rounds().count() as u32;
        if finalized != self.current_round {
            return Err(TournamentError::Validation(format!(
                "current round {} does not match {} finalized rounds",
                self.current_round, finalized
            )));
        }
        for (i, round) in self.rounds.iter().enumerate() {
            if round.number != i as u32 + 1 {
                return Err(TournamentError::Validation(format!(
                    "round at position {} is numbered {}",
                    i + 1,
                    round.number
                )));
            }
            if !round.finalized && i + 1 != self.rounds.len() {
                return Err(TournamentError::Validation(format!(
                    "round {} is not finalized but is not the last round",
                    round.number
                )));
            }
        }
        for round in &self.rounds {
            for m in &round.matches {
                let players = std::iter::once(m.player_1).chain(m.player_2.player());
                for pid in players {
                    self.participant(pid)?;
                }
            }
        }
        if self.status == TournamentStatus::Open && !self.rounds.is_empty() {
            return Err(TournamentError::Validation(
                "open tournament already has rounds".into(),
            ));
        }
        Ok(())
    }
}
