//! Participant: a registered player and their committed aggregate record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches, rule assignments and lookups).
pub type PlayerId = Uuid;

/// A player in the tournament.
///
/// `wins`, `losses`, `draws` and `has_had_bye` only change when a round is
/// finalized; recording a result leaves them untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: PlayerId,
    pub display_name: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub has_had_bye: bool,
    /// False once the participant has dropped; dropped players keep their
    /// standing but are no longer paired.
    pub active: bool,
}

impl Participant {
    /// Create a new participant with the given name. Counters start at zero.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
            wins: 0,
            losses: 0,
            draws: 0,
            has_had_bye: false,
            active: true,
        }
    }

    pub fn add_win(&mut self) {
        self.wins += 1;
    }

    pub fn add_loss(&mut self) {
        self.losses += 1;
    }

    pub fn add_draw(&mut self) {
        self.draws += 1;
    }

    /// Record a bye: counts as a win and marks the bye as used.
    pub fn record_bye(&mut self) {
        self.wins += 1;
        self.has_had_bye = true;
    }

    pub fn matches_played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }
}
