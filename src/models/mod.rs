//! Data structures for the tournament engine: participants, rules, rounds, matches.

mod error;
mod game;
mod participant;
mod rule;
mod tournament;

pub use error::{EntityKind, TournamentError, TournamentResult};
pub use game::{Match, MatchId, MatchStatus, Opponent, Outcome, Round, BYE_TABLE};
pub use participant::{Participant, PlayerId};
pub use rule::{PlayerRule, RuleCatalog, RuleId, RuleSnapshot};
pub use tournament::{Tournament, TournamentId, TournamentStatus};
