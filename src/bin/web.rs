//! Single binary web server: league engine commands and read model via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, ELO_K_FACTOR, RECALC_INTERVAL_MINUTES (0 or unset = off).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::RwLock;
use std::time::Duration;
use tennis_league::{
    create_next_round_match, get_playoff_bracket, get_rating_history, get_standings,
    initialize_playoffs, recalculate_league, recalculate_player, record_match_result,
    reset_match_to_unplayed, reset_playoffs, write_standings_csv, EngineConfig, LeagueError,
    LeagueId, LeagueStore, MatchId, PlayerId, PlayoffGroup, PlayoffInfo, PlayoffStage,
    ScheduleStatus, Score, SeasonId, SeasonKey, SetScore, Side, SkillLevel, SlotOutcome,
};

/// In-memory state. Every command takes the write lock, so writes are single-writer.
type AppState = Data<RwLock<LeagueStore>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
    #[serde(default)]
    level: SkillLevel,
}

#[derive(Deserialize)]
struct RegisterBody {
    league_id: LeagueId,
    season_id: SeasonId,
    #[serde(default)]
    level: SkillLevel,
}

#[derive(Deserialize)]
struct ScheduleMatchBody {
    league_id: LeagueId,
    season_id: SeasonId,
    round: u32,
    player_1: PlayerId,
    player_2: PlayerId,
}

#[derive(Deserialize)]
struct MatchStatusBody {
    status: ScheduleStatus,
}

#[derive(Deserialize)]
struct RecordResultBody {
    winner: PlayerId,
    #[serde(default)]
    sets: Vec<SetScore>,
    #[serde(default)]
    walkover: bool,
    #[serde(default)]
    retired: Option<Side>,
    /// Defaults to now.
    played_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct InitializePlayoffsBody {
    #[serde(default = "default_number_of_groups")]
    number_of_groups: u8,
}

fn default_number_of_groups() -> u8 {
    1
}

#[derive(Deserialize)]
struct ConfirmQuery {
    #[serde(default)]
    confirm: bool,
}

#[derive(Deserialize)]
struct AdvanceBody {
    group: PlayoffGroup,
    stage: PlayoffStage,
    match_number: u32,
}

#[derive(Deserialize)]
struct RecalculateQuery {
    league_id: Option<LeagueId>,
}

/// Path segment: player id (e.g. /api/players/{id})
#[derive(Deserialize)]
struct PlayerPath {
    id: PlayerId,
}

/// Path segment: match id (e.g. /api/matches/{id})
#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

/// Path segments: league and season (e.g. /api/leagues/{league_id}/seasons/{season_id})
#[derive(Deserialize)]
struct SeasonPath {
    league_id: LeagueId,
    season_id: SeasonId,
}

impl SeasonPath {
    fn key(&self) -> SeasonKey {
        SeasonKey::new(self.league_id, self.season_id)
    }
}

/// JSON error body with a status matching the kind of failure.
fn error_response(e: &LeagueError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        LeagueError::PlayerNotFound(_) | LeagueError::MatchNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        LeagueError::InvalidMatchState { .. }
        | LeagueError::LockedSnapshotViolation
        | LeagueError::FeederNotReady { .. }
        | LeagueError::DuplicateRegistration { .. } => HttpResponse::Conflict().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tennis-league",
    })
}

/// Add a player; the skill level picks their starting rating.
#[post("/api/players")]
async fn api_add_player(state: AppState, body: Json<AddPlayerBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let result = g
        .add_player(body.name.as_str(), body.level)
        .and_then(|id| g.player(id).cloned());
    match result {
        Ok(player) => HttpResponse::Ok().json(player),
        Err(e) => error_response(&e),
    }
}

/// Register a player for a league season.
#[post("/api/players/{id}/registrations")]
async fn api_register(state: AppState, path: Path<PlayerPath>, body: Json<RegisterBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let season = SeasonKey::new(body.league_id, body.season_id);
    let result = g
        .register(path.id, season, body.level)
        .and_then(|()| g.player(path.id).cloned());
    match result {
        Ok(player) => HttpResponse::Ok().json(player),
        Err(e) => error_response(&e),
    }
}

/// Rating chart: signup rating followed by one point per completed regular match.
#[get("/api/players/{id}/rating-history")]
async fn api_rating_history(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match get_rating_history(&g, path.id) {
        Ok(points) => HttpResponse::Ok().json(points),
        Err(e) => error_response(&e),
    }
}

/// Rebuild a player's rating and stats from match history (optionally one league only).
#[post("/api/players/{id}/recalculate")]
async fn api_recalculate_player(
    state: AppState,
    path: Path<PlayerPath>,
    query: Query<RecalculateQuery>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match recalculate_player(&mut g, path.id, query.league_id) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => error_response(&e),
    }
}

/// Schedule a regular-season match.
#[post("/api/matches")]
async fn api_schedule_match(state: AppState, body: Json<ScheduleMatchBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let season = SeasonKey::new(body.league_id, body.season_id);
    let result = g
        .schedule_match(season, body.round, body.player_1, body.player_2)
        .and_then(|id| g.game(id).cloned());
    match result {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => error_response(&e),
    }
}

/// Postpone, cancel or reschedule a match without a result.
#[put("/api/matches/{id}/status")]
async fn api_set_match_status(state: AppState, path: Path<MatchPath>, body: Json<MatchStatusBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let result = g
        .set_match_status(path.id, body.status)
        .and_then(|()| g.game(path.id).cloned());
    match result {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => error_response(&e),
    }
}

/// Record a match result (sets, walkover or retirement).
#[post("/api/matches/{id}/result")]
async fn api_record_result(state: AppState, path: Path<MatchPath>, body: Json<RecordResultBody>) -> HttpResponse {
    let body = body.into_inner();
    let score = Score {
        sets: body.sets,
        walkover: body.walkover,
        retired: body.retired,
    };
    let played_at = body.played_at.unwrap_or_else(Utc::now);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match record_match_result(&mut g, path.id, body.winner, score, played_at) {
        Ok(recorded) => HttpResponse::Ok().json(serde_json::json!({
            "match": g.game(path.id).ok(),
            "rating": recorded.rating,
            "created_matches": recorded.created_matches,
        })),
        Err(e) => error_response(&e),
    }
}

/// Reset a completed match to unplayed, undoing its stats and rating change.
#[post("/api/matches/{id}/reset")]
async fn api_reset_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let result = reset_match_to_unplayed(&mut g, path.id).and_then(|()| g.game(path.id).cloned());
    match result {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => error_response(&e),
    }
}

#[get("/api/leagues/{league_id}/seasons/{season_id}/standings")]
async fn api_standings(state: AppState, path: Path<SeasonPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match get_standings(&g, path.key()) {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => error_response(&e),
    }
}

#[get("/api/leagues/{league_id}/seasons/{season_id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<SeasonPath>) -> HttpResponse {
    let rows = {
        let g = match state.read() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        match get_standings(&g, path.key()) {
            Ok(rows) => rows,
            Err(e) => return error_response(&e),
        }
    };
    let mut out = Vec::new();
    if let Err(e) = write_standings_csv(&rows, &mut out) {
        log::error!("Failed to write standings CSV: {}", e);
        return HttpResponse::InternalServerError().body("csv error");
    }
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .body(out)
}

/// Recalculate every registrant of a season; per-player failures are reported, not fatal.
#[post("/api/leagues/{league_id}/seasons/{season_id}/recalculate")]
async fn api_recalculate_league(state: AppState, path: Path<SeasonPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(recalculate_league(&mut g, path.key()))
}

#[get("/api/leagues/{league_id}/seasons/{season_id}/playoffs")]
async fn api_playoff_bracket(state: AppState, path: Path<SeasonPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(get_playoff_bracket(&g, path.key()))
}

/// Lock the qualified players and create the quarterfinals.
#[post("/api/leagues/{league_id}/seasons/{season_id}/playoffs")]
async fn api_initialize_playoffs(
    state: AppState,
    path: Path<SeasonPath>,
    body: Option<Json<InitializePlayoffsBody>>,
) -> HttpResponse {
    let number_of_groups = body
        .as_ref()
        .map(|b| b.number_of_groups)
        .unwrap_or_else(default_number_of_groups);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match initialize_playoffs(&mut g, path.key(), number_of_groups) {
        Ok(_) => HttpResponse::Ok().json(get_playoff_bracket(&g, path.key())),
        Err(e) => error_response(&e),
    }
}

/// Delete all playoff matches and unlock the snapshot. Requires `?confirm=true`.
#[delete("/api/leagues/{league_id}/seasons/{season_id}/playoffs")]
async fn api_reset_playoffs(state: AppState, path: Path<SeasonPath>, query: Query<ConfirmQuery>) -> HttpResponse {
    if !query.confirm {
        return HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": "Resetting playoffs deletes every playoff match; pass confirm=true" }));
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let removed = reset_playoffs(&mut g, path.key());
    HttpResponse::Ok().json(serde_json::json!({ "removed_matches": removed }))
}

/// Operator: create a next-round bracket match explicitly.
#[post("/api/leagues/{league_id}/seasons/{season_id}/playoffs/advance")]
async fn api_advance_playoffs(state: AppState, path: Path<SeasonPath>, body: Json<AdvanceBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let slot = PlayoffInfo::new(body.group, body.stage, body.match_number);
    match create_next_round_match(&mut g, path.key(), slot) {
        Ok(outcome) => HttpResponse::Ok().json(serde_json::json!({
            "match_id": outcome.match_id(),
            "created": matches!(outcome, SlotOutcome::Created(_)),
        })),
        Err(e) => error_response(&e),
    }
}

/// Recalculate every league season that has registrants (drift repair).
fn recalculate_everything(store: &mut LeagueStore) {
    let seasons: BTreeSet<SeasonKey> = store
        .players()
        .flat_map(|p| p.registrations.iter().map(|r| r.season))
        .collect();
    for season in seasons {
        let report = recalculate_league(store, season);
        if !report.failed.is_empty() {
            log::warn!("{} player(s) failed to recalculate for {}", report.failed.len(), season);
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let recalc_minutes: u64 = std::env::var("RECALC_INTERVAL_MINUTES")
        .ok()
        .and_then(|m| m.parse().ok())
        .unwrap_or(0);
    let config = EngineConfig::from_env();
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{} (K-factor {})", bind.0, bind.1, config.k_factor);

    let state = Data::new(RwLock::new(LeagueStore::new(config)));

    // Background task: periodically rebuild derived stats from match history
    if recalc_minutes > 0 {
        let state_recalc = state.clone();
        actix_web::rt::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(recalc_minutes * 60));
            interval.tick().await;
            loop {
                interval.tick().await;
                let mut g = match state_recalc.write() {
                    Ok(guard) => guard,
                    Err(_) => continue,
                };
                recalculate_everything(&mut g);
            }
        });
    }

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_add_player)
            .service(api_register)
            .service(api_rating_history)
            .service(api_recalculate_player)
            .service(api_schedule_match)
            .service(api_set_match_status)
            .service(api_record_result)
            .service(api_reset_match)
            .service(api_standings_csv)
            .service(api_standings)
            .service(api_recalculate_league)
            .service(api_playoff_bracket)
            .service(api_initialize_playoffs)
            .service(api_reset_playoffs)
            .service(api_advance_playoffs)
    })
    .bind(bind)?
    .run()
    .await
}
