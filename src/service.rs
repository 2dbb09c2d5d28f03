//! Per-tournament serialized access to the engine.
//!
//! Every mutation runs under that tournament's lock: load, check the
//! caller's expected version, apply, bump the version, save. Reads take no
//! tournament lock and see the last saved state.

use crate::config::EngineConfig;
use crate::logic::{
    self, compute_standings, finalize_round, generate_next_round, record_result, ResultDraft,
    Standing,
};
use crate::models::{
    EntityKind, PlayerId, PlayerRule, RuleCatalog, RuleId, Tournament, TournamentError,
    TournamentId, TournamentResult,
};
use crate::store::{StoreError, TournamentStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub struct TournamentService<S> {
    store: S,
    config: EngineConfig,
    locks: Mutex<HashMap<TournamentId, Arc<Mutex<()>>>>,
}

impl<S: TournamentStore> TournamentService<S> {
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn create_rule(&self, rule: PlayerRule) -> TournamentResult<PlayerRule> {
        validate_rule(&rule)?;
        if self.store.load_rule(rule.id)?.is_some() {
            return Err(TournamentError::Conflict(format!("rule {} already exists", rule.id)));
        }
        self.store.save_rule(&rule)?;
        Ok(rule)
    }

    /// Replace a rule. Rounds already finalized keep the snapshot they took.
    pub fn update_rule(&self, rule: PlayerRule) -> TournamentResult<PlayerRule> {
        validate_rule(&rule)?;
        self.rule(rule.id)?;
        self.store.save_rule(&rule)?;
        Ok(rule)
    }

    pub fn rule(&self, id: RuleId) -> TournamentResult<PlayerRule> {
        self.store
            .load_rule(id)?
            .ok_or(TournamentError::not_found(EntityKind::Rule, id))
    }

    pub fn list_rules(&self) -> TournamentResult<Vec<PlayerRule>> {
        Ok(self.store.list_rules()?)
    }

    pub fn create_tournament(
        &self,
        name: &str,
        total_rounds: u32,
        default_rule_id: RuleId,
    ) -> TournamentResult<Tournament> {
        let default_rule = self.rule(default_rule_id)?;
        let tournament = logic::create_tournament(name.trim(), total_rounds, &default_rule)?;
        self.store.save_tournament(&tournament)?;
        log::info!("created tournament {} ({:?})", tournament.id, tournament.name);
        Ok(tournament)
    }

    /// Load a tournament and check its invariants.
    pub fn tournament(&self, id: TournamentId) -> TournamentResult<Tournament> {
        let tournament = self
            .store
            .load_tournament(id)?
            .ok_or(TournamentError::not_found(EntityKind::Tournament, id))?;
        tournament.validate()?;
        Ok(tournament)
    }

    pub fn list_tournaments(&self) -> TournamentResult<Vec<Tournament>> {
        Ok(self.store.list_tournaments()?)
    }

    pub fn add_participant(
        &self,
        id: TournamentId,
        name: &str,
        expected_version: Option<u64>,
    ) -> TournamentResult<Tournament> {
        self.mutate(id, expected_version, |t| t.add_participant(name).map(|_| ()))
    }

    pub fn remove_participant(
        &self,
        id: TournamentId,
        player_id: PlayerId,
        expected_version: Option<u64>,
    ) -> TournamentResult<Tournament> {
        self.mutate(id, expected_version, |t| t.remove_participant(player_id))
    }

    pub fn drop_participant(
        &self,
        id: TournamentId,
        player_id: PlayerId,
        expected_version: Option<u64>,
    ) -> TournamentResult<Tournament> {
        self.mutate(id, expected_version, |t| t.drop_participant(player_id))
    }

    pub fn assign_player_rule(
        &self,
        id: TournamentId,
        player_id: PlayerId,
        rule_id: RuleId,
        expected_version: Option<u64>,
    ) -> TournamentResult<Tournament> {
        let rule = self.rule(rule_id)?;
        self.mutate(id, expected_version, |t| {
            logic::assign_player_rule(t, player_id, &rule)
        })
    }

    pub fn remove_player_rule(
        &self,
        id: TournamentId,
        player_id: PlayerId,
        expected_version: Option<u64>,
    ) -> TournamentResult<Tournament> {
        self.mutate(id, expected_version, |t| {
            logic::remove_player_rule(t, player_id)
        })
    }

    /// Generate the next round. The new round is the tournament's last.
    pub fn generate_next_round(
        &self,
        id: TournamentId,
        expected_version: Option<u64>,
    ) -> TournamentResult<Tournament> {
        let config = self.config;
        self.mutate(id, expected_version, |t| {
            generate_next_round(t, &config).map(|_| ())
        })
    }

    pub fn record_result(
        &self,
        id: TournamentId,
        draft: &ResultDraft,
        expected_version: Option<u64>,
    ) -> TournamentResult<Tournament> {
        self.mutate(id, expected_version, |t| {
            record_result(
                t,
                draft.match_id,
                draft.winner,
                draft.player_1_score,
                draft.player_2_score,
            )
        })
    }

    pub fn finalize_round(
        &self,
        id: TournamentId,
        expected_version: Option<u64>,
    ) -> TournamentResult<Tournament> {
        self.mutate(id, expected_version, |t| {
            let catalog = self.rule_catalog(t)?;
            finalize_round(t, &catalog).map(|_| ())
        })
    }

    pub fn end_tournament(
        &self,
        id: TournamentId,
        expected_version: Option<u64>,
    ) -> TournamentResult<Tournament> {
        self.mutate(id, expected_version, logic::end_tournament)
    }

    /// Read-only; may run alongside any mutation.
    pub fn compute_standings(
        &self,
        id: TournamentId,
        through_round: Option<u32>,
    ) -> TournamentResult<Vec<Standing>> {
        let tournament = self.tournament(id)?;
        compute_standings(&tournament, through_round)
    }

    /// Rules the tournament can reference. Missing ids are left out and
    /// surface as not-found when a match needs them.
    fn rule_catalog(&self, tournament: &Tournament) -> TournamentResult<RuleCatalog> {
        let mut catalog = RuleCatalog::new();
        for rule_id in tournament.referenced_rule_ids() {
            if let Some(rule) = self.store.load_rule(rule_id)? {
                catalog.insert(rule);
            }
        }
        Ok(catalog)
    }

    fn lock_for(&self, id: TournamentId) -> TournamentResult<Arc<Mutex<()>>> {
        let mut locks = self.locks.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(Arc::clone(locks.entry(id).or_default()))
    }

    /// Run `op` on a fresh copy under the tournament's lock and save it if
    /// it succeeds. Nothing is saved on error. Unknown ids never get a lock.
    fn mutate<F>(
        &self,
        id: TournamentId,
        expected_version: Option<u64>,
        op: F,
    ) -> TournamentResult<Tournament>
    where
        F: FnOnce(&mut Tournament) -> TournamentResult<()>,
    {
        if self.store.load_tournament(id)?.is_none() {
            return Err(TournamentError::not_found(EntityKind::Tournament, id));
        }
        let lock = self.lock_for(id)?;
        let _guard = lock.lock().map_err(|_| StoreError::Poisoned)?;

        let mut tournament = self.tournament(id)?;
        if let Some(expected) = expected_version {
            if expected != tournament.version {
                log::warn!(
                    "tournament {}: rejected write at version {} (current {})",
                    id,
                    expected,
                    tournament.version
                );
                return Err(TournamentError::Conflict(format!(
                    "stale version {expected}, current is {}",
                    tournament.version
                )));
            }
        }

        op(&mut tournament)?;
        tournament.version += 1;
        self.store.save_tournament(&tournament)?;
        Ok(tournament)
    }
}

fn validate_rule(rule: &PlayerRule) -> TournamentResult<()> {
    if rule.name.trim().is_empty() {
        return Err(TournamentError::Validation("rule name is empty".into()));
    }
    if !rule.is_valid() {
        return Err(TournamentError::Validation(format!(
            "rule {} has non-finite coefficients",
            rule.id
        )));
    }
    Ok(())
}
