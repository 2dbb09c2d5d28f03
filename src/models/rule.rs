//! Scoring rules, the organizer's rule catalog, and per-match rule snapshots.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for a scoring rule.
pub type RuleId = Uuid;

/// Points a participant earns from their own result, plus the adjustments
/// their rule inflicts on whoever they play.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerRule {
    pub id: RuleId,
    pub name: String,
    /// Organizer that owns the rule.
    pub organizer: String,
    pub points_for_win: f64,
    pub points_for_loss: f64,
    pub points_for_tie: f64,
    /// Subtracted from an opponent who beats the holder of this rule.
    pub points_lost_by_opponent: f64,
    /// Added to an opponent who beats the holder of this rule.
    pub points_given_to_opponent: f64,
    /// Added (signed) to an opponent who ties the holder of this rule.
    pub points_to_opponent_on_tie: f64,
}

impl PlayerRule {
    /// A rule with the given self coefficients and no cross-effects.
    pub fn new(name: impl Into<String>, win: f64, loss: f64, tie: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            organizer: String::new(),
            points_for_win: win,
            points_for_loss: loss,
            points_for_tie: tie,
            points_lost_by_opponent: 0.0,
            points_given_to_opponent: 0.0,
            points_to_opponent_on_tie: 0.0,
        }
    }

    /// Classic 3/1/0 scoring.
    pub fn standard() -> Self {
        Self::new("Standard", 3.0, 0.0, 1.0)
    }

    pub fn with_organizer(mut self, organizer: impl Into<String>) -> Self {
        self.organizer = organizer.into();
        self
    }

    pub fn with_cross_effects(mut self, lost_by_opponent: f64, given_to_opponent: f64, on_tie: f64) -> Self {
        self.points_lost_by_opponent = lost_by_opponent;
        self.points_given_to_opponent = given_to_opponent;
        self.points_to_opponent_on_tie = on_tie;
        self
    }

    /// Coefficients must be finite numbers.
    pub fn is_valid(&self) -> bool {
        [
            self.points_for_win,
            self.points_for_loss,
            self.points_for_tie,
            self.points_lost_by_opponent,
            self.points_given_to_opponent,
            self.points_to_opponent_on_tie,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// The rules a finalize needs, keyed by id. Built from the store so the
/// round logic never talks to storage.
#[derive(Clone, Debug, Default)]
pub struct RuleCatalog {
    rules: HashMap<RuleId, PlayerRule>,
}

impl RuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, rule: PlayerRule) {
        self.rules.insert(rule.id, rule);
    }

    pub fn get(&self, id: RuleId) -> Option<&PlayerRule> {
        self.rules.get(&id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<PlayerRule> for RuleCatalog {
    fn from_iter<I: IntoIterator<Item = PlayerRule>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for rule in iter {
            catalog.insert(rule);
        }
        catalog
    }
}

/// Rules in force for each side of a match, copied at finalize time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleSnapshot {
    pub player_1: PlayerRule,
    /// None for a bye.
    pub player_2: Option<PlayerRule>,
}
