//! Persistence collaborator: the engine loads and saves whole aggregates
//! through `TournamentStore` and never holds a global instance.

use crate::models::{PlayerRule, RuleId, Tournament, TournamentId};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Infrastructure errors from a store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// CRUD access to tournaments and the organizers' rule catalog.
pub trait TournamentStore: Send + Sync {
    fn load_tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError>;

    /// Insert or replace.
    fn save_tournament(&self, tournament: &Tournament) -> Result<(), StoreError>;

    fn list_tournaments(&self) -> Result<Vec<Tournament>, StoreError>;

    fn load_rule(&self, id: RuleId) -> Result<Option<PlayerRule>, StoreError>;

    /// Insert or replace.
    fn save_rule(&self, rule: &PlayerRule) -> Result<(), StoreError>;

    fn list_rules(&self) -> Result<Vec<PlayerRule>, StoreError>;
}

/// In-memory store: tournaments and rules by id.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tournaments: RwLock<HashMap<TournamentId, Tournament>>,
    rules: RwLock<HashMap<RuleId, PlayerRule>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TournamentStore for InMemoryStore {
    fn load_tournament(&self, id: TournamentId) -> Result<Option<Tournament>, StoreError> {
        let g = self.tournaments.read().map_err(|_| StoreError::Poisoned)?;
        Ok(g.get(&id).cloned())
    }

    fn save_tournament(&self, tournament: &Tournament) -> Result<(), StoreError> {
        let mut g = self.tournaments.write().map_err(|_| StoreError::Poisoned)?;
        g.insert(tournament.id, tournament.clone());
        Ok(())
    }

    fn list_tournaments(&self) -> Result<Vec<Tournament>, StoreError> {
        let g = self.tournaments.read().map_err(|_| StoreError::Poisoned)?;
        let mut all: Vec<Tournament> = g.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    fn load_rule(&self, id: RuleId) -> Result<Option<PlayerRule>, StoreError> {
        let g = self.rules.read().map_err(|_| StoreError::Poisoned)?;
        Ok(g.get(&id).cloned())
    }

    fn save_rule(&self, rule: &PlayerRule) -> Result<(), StoreError> {
        let mut g = self.rules.write().map_err(|_| StoreError::Poisoned)?;
        g.insert(rule.id, rule.clone());
        Ok(())
    }

    fn list_rules(&self) -> Result<Vec<PlayerRule>, StoreError> {
        let g = self.rules.read().map_err(|_| StoreError::Poisoned)?;
        let mut all: Vec<PlayerRule> = g.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(all)
    }
}
