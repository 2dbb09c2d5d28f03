//! Tournament business logic: pairing, results, finalization, scoring, standings.

mod finalize;
mod lifecycle;
mod pairing;
mod results;
mod scoring;
mod standings;

pub use finalize::finalize_round;
pub use lifecycle::{assign_player_rule, create_tournament, end_tournament, remove_player_rule};
pub use pairing::generate_next_round;
pub use results::{record_result, ResultDraft};
pub use scoring::{bye_points, cross_effect, effective_rule, own_points, resolve_points};
pub use standings::{compute_standings, standings_to_csv, Standing};
