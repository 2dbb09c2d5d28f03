//! Tournament round and scoring engine: Swiss pairing, match results, round
//! finalization, rule-based scoring and standings.

pub mod config;
pub mod logic;
pub mod models;
pub mod service;
pub mod store;

pub use config::{Config, EngineConfig};
pub use logic::{
    assign_player_rule, compute_standings, create_tournament, end_tournament, finalize_round,
    generate_next_round, record_result, remove_player_rule, resolve_points, standings_to_csv,
    ResultDraft, Standing,
};
pub use models::{
    EntityKind, Match, MatchId, MatchStatus, Opponent, Outcome, Participant, PlayerId, PlayerRule,
    Round, RuleCatalog, RuleId, RuleSnapshot, Tournament, TournamentError, TournamentId,
    TournamentResult, TournamentStatus, BYE_TABLE,
};
pub use service::TournamentService;
pub use store::{InMemoryStore, StoreError, TournamentStore};
