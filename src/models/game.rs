//! Match and Round.

use crate::models::participant::PlayerId;
use crate::models::rule::RuleSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Table number reserved for the bye match.
pub const BYE_TABLE: u32 = 0;

/// Opponent in player 2's seat.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum Opponent {
    Player(PlayerId),
    Bye,
}

impl Opponent {
    pub fn player(self) -> Option<PlayerId> {
        match self {
            Opponent::Player(id) => Some(id),
            Opponent::Bye => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Completed,
}

/// Result from one side's point of view.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

impl Outcome {
    pub fn reversed(self) -> Self {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Loss => Outcome::Win,
            Outcome::Tie => Outcome::Tie,
        }
    }
}

/// A single match between two participants, or a bye.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// 1..k for played matches in pairing order; `BYE_TABLE` for the bye.
    pub table_number: u32,
    pub player_1: PlayerId,
    pub player_2: Opponent,
    pub status: MatchStatus,
    /// None while pending, or for a completed tie.
    pub winner: Option<PlayerId>,
    pub player_1_score: u32,
    pub player_2_score: u32,
    /// Rules in force when the round was finalized. None until then.
    pub rules: Option<RuleSnapshot>,
}

impl Match {
    pub fn new(table_number: u32, player_1: PlayerId, player_2: PlayerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            table_number,
            player_1,
            player_2: Opponent::Player(player_2),
            status: MatchStatus::Pending,
            winner: None,
            player_1_score: 0,
            player_2_score: 0,
            rules: None,
        }
    }

    /// A bye is completed on creation with player 1 as the winner.
    pub fn bye(player: PlayerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            table_number: BYE_TABLE,
            player_1: player,
            player_2: Opponent::Bye,
            status: MatchStatus::Completed,
            winner: Some(player),
            player_1_score: 0,
            player_2_score: 0,
            rules: None,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.player_2 == Opponent::Bye
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.player_1 == player || self.player_2 == Opponent::Player(player)
    }

    /// Outcome for player 1. None while pending.
    pub fn outcome_for_player_1(&self) -> Option<Outcome> {
        if !self.is_completed() {
            return None;
        }
        Some(match self.winner {
            Some(w) if w == self.player_1 => Outcome::Win,
            Some(_) => Outcome::Loss,
            None => Outcome::Tie,
        })
    }
}

/// One round of the tournament.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based.
    pub number: u32,
    pub matches: Vec<Match>,
    pub finalized: bool,
    pub finalized_at: Option<DateTime<Utc>>,
}

impl Round {
    pub fn new(number: u32, matches: Vec<Match>) -> Self {
        Self {
            number,
            matches,
            finalized: false,
            finalized_at: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.matches.iter().all(Match::is_completed)
    }

    pub fn pending_count(&self) -> usize {
        self.matches.iter().filter(|m| !m.is_completed()).count()
    }

    pub fn bye(&self) -> Option<&Match> {
        self.matches.iter().find(|m| m.is_bye())
    }

    pub fn get_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == id)
    }
}
