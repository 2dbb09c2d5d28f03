//! Single binary web server: the tournament engine as a JSON REST API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, PAIRING_LOOKAHEAD.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use swiss_tournament::{
    standings_to_csv, Config, InMemoryStore, PlayerId, PlayerRule, ResultDraft, RuleId,
    TournamentError, TournamentId, TournamentResult, TournamentService,
};
use uuid::Uuid;

type AppState = Data<TournamentService<InMemoryStore>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    #[serde(default)]
    name: String,
    total_rounds: u32,
    default_rule_id: RuleId,
}

/// Coefficients for a new or edited rule. Omitted values are 0.
#[derive(Deserialize)]
struct RuleBody {
    name: String,
    #[serde(default)]
    organizer: String,
    #[serde(default)]
    points_for_win: f64,
    #[serde(default)]
    points_for_loss: f64,
    #[serde(default)]
    points_for_tie: f64,
    #[serde(default)]
    points_lost_by_opponent: f64,
    #[serde(default)]
    points_given_to_opponent: f64,
    #[serde(default)]
    points_to_opponent_on_tie: f64,
}

impl RuleBody {
    fn into_rule(self, id: RuleId) -> PlayerRule {
        PlayerRule {
            id,
            name: self.name,
            organizer: self.organizer,
            points_for_win: self.points_for_win,
            points_for_loss: self.points_for_loss,
            points_for_tie: self.points_for_tie,
            points_lost_by_opponent: self.points_lost_by_opponent,
            points_given_to_opponent: self.points_given_to_opponent,
            points_to_opponent_on_tie: self.points_to_opponent_on_tie,
        }
    }
}

/// Optional optimistic-concurrency check for bodiless mutations.
#[derive(Deserialize, Default)]
struct VersionBody {
    #[serde(default)]
    expected_version: Option<u64>,
}

#[derive(Deserialize)]
struct AddParticipantBody {
    name: String,
    #[serde(default)]
    expected_version: Option<u64>,
}

#[derive(Deserialize)]
struct AssignRuleBody {
    rule_id: RuleId,
    #[serde(default)]
    expected_version: Option<u64>,
}

#[derive(Deserialize)]
struct RecordResultBody {
    #[serde(flatten)]
    draft: ResultDraft,
    #[serde(default)]
    expected_version: Option<u64>,
}

#[derive(Deserialize)]
struct StandingsQuery {
    through_round: Option<u32>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and player id.
#[derive(Deserialize)]
struct TournamentPlayerPath {
    id: TournamentId,
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct RulePath {
    id: RuleId,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.client_message() });
    match e {
        TournamentError::Validation(_) => HttpResponse::BadRequest().json(body),
        TournamentError::State(_) | TournamentError::Conflict(_) => {
            HttpResponse::Conflict().json(body)
        }
        TournamentError::NotFound { .. } => HttpResponse::NotFound().json(body),
        TournamentError::Storage(inner) => {
            log::error!("storage failure: {inner}");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn respond<T: Serialize>(result: TournamentResult<T>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(&e),
    }
}

fn expected_version(body: Option<Json<VersionBody>>) -> Option<u64> {
    body.map(|b| b.into_inner()).unwrap_or_default().expected_version
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "swiss-tournament",
    })
}

#[get("/api/rules")]
async fn api_list_rules(state: AppState) -> HttpResponse {
    respond(state.list_rules())
}

#[post("/api/rules")]
async fn api_create_rule(state: AppState, body: Json<RuleBody>) -> HttpResponse {
    respond(state.create_rule(body.into_inner().into_rule(Uuid::new_v4())))
}

#[get("/api/rules/{id}")]
async fn api_get_rule(state: AppState, path: Path<RulePath>) -> HttpResponse {
    respond(state.rule(path.id))
}

/// Edit a rule. Already finalized rounds keep the values they were scored with.
#[put("/api/rules/{id}")]
async fn api_update_rule(state: AppState, path: Path<RulePath>, body: Json<RuleBody>) -> HttpResponse {
    respond(state.update_rule(body.into_inner().into_rule(path.id)))
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    respond(state.list_tournaments())
}

#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    respond(state.create_tournament(&body.name, body.total_rounds, body.default_rule_id))
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.tournament(path.id))
}

/// Register a participant (Open or InProgress).
#[post("/api/tournaments/{id}/participants")]
async fn api_add_participant(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddParticipantBody>,
) -> HttpResponse {
    respond(state.add_participant(path.id, &body.name, body.expected_version))
}

/// Remove a participant (Open only).
#[delete("/api/tournaments/{id}/participants/{player_id}")]
async fn api_remove_participant(
    state: AppState,
    path: Path<TournamentPlayerPath>,
    body: Option<Json<VersionBody>>,
) -> HttpResponse {
    respond(state.remove_participant(path.id, path.player_id, expected_version(body)))
}

/// Drop a participant from future pairings (InProgress only).
#[post("/api/tournaments/{id}/participants/{player_id}/drop")]
async fn api_drop_participant(
    state: AppState,
    path: Path<TournamentPlayerPath>,
    body: Option<Json<VersionBody>>,
) -> HttpResponse {
    respond(state.drop_participant(path.id, path.player_id, expected_version(body)))
}

#[put("/api/tournaments/{id}/participants/{player_id}/rule")]
async fn api_assign_rule(
    state: AppState,
    path: Path<TournamentPlayerPath>,
    body: Json<AssignRuleBody>,
) -> HttpResponse {
    respond(state.assign_player_rule(path.id, path.player_id, body.rule_id, body.expected_version))
}

#[delete("/api/tournaments/{id}/participants/{player_id}/rule")]
async fn api_remove_rule(
    state: AppState,
    path: Path<TournamentPlayerPath>,
    body: Option<Json<VersionBody>>,
) -> HttpResponse {
    respond(state.remove_player_rule(path.id, path.player_id, expected_version(body)))
}

/// Pair the next round from current standings.
#[post("/api/tournaments/{id}/rounds")]
async fn api_generate_round(
    state: AppState,
    path: Path<TournamentPath>,
    body: Option<Json<VersionBody>>,
) -> HttpResponse {
    respond(state.generate_next_round(path.id, expected_version(body)))
}

/// Record (or re-record) a result in the pending round.
#[put("/api/tournaments/{id}/results")]
async fn api_record_result(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    respond(state.record_result(path.id, &body.draft, body.expected_version))
}

#[post("/api/tournaments/{id}/rounds/finalize")]
async fn api_finalize_round(
    state: AppState,
    path: Path<TournamentPath>,
    body: Option<Json<VersionBody>>,
) -> HttpResponse {
    respond(state.finalize_round(path.id, expected_version(body)))
}

#[post("/api/tournaments/{id}/end")]
async fn api_end_tournament(
    state: AppState,
    path: Path<TournamentPath>,
    body: Option<Json<VersionBody>>,
) -> HttpResponse {
    respond(state.end_tournament(path.id, expected_version(body)))
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(
    state: AppState,
    path: Path<TournamentPath>,
    query: Query<StandingsQuery>,
) -> HttpResponse {
    respond(state.compute_standings(path.id, query.through_round))
}

#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(
    state: AppState,
    path: Path<TournamentPath>,
    query: Query<StandingsQuery>,
) -> HttpResponse {
    let standings = match state.compute_standings(path.id, query.through_round) {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };
    match standings_to_csv(&standings) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(csv),
        Err(e) => {
            log::error!("csv export failed: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": "csv export failed" }))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let service = TournamentService::new(InMemoryStore::new(), config.engine);
    match service.create_rule(PlayerRule::standard()) {
        Ok(rule) => log::info!("Seeded default rule {:?} with id {}", rule.name, rule.id),
        Err(e) => log::warn!("Could not seed default rule: {e}"),
    }
    let state = Data::new(service);

    log::info!("Starting server at http://{}:{}", config.host, config.port);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_list_rules)
            .service(api_create_rule)
            .service(api_get_rule)
            .service(api_update_rule)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_add_participant)
            .service(api_remove_participant)
            .service(api_drop_participant)
            .service(api_assign_rule)
            .service(api_remove_rule)
            .service(api_generate_round)
            .service(api_finalize_round)
            .service(api_record_result)
            .service(api_end_tournament)
            .service(api_standings_csv)
            .service(api_standings)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
