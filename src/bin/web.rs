//! Reference host: exposes the engine over a small REST API.
//! Run with: cargo run --bin web
//! Override the bind address with env: HOST (default 0.0.0.0), PORT (default 8080).
//!
//! Every tournament sits behind its own mutex, so results reported concurrently for
//! the same tournament are applied one at a time; different tournaments never contend.
//! Player rankings have their own per-player locks.

use actix_web::{
    delete, get, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use bracket_engine::{
    advance_to_next_round, advance_winner, calculate_prizes, cancel_tournament, get_final_standings,
    mark_ready, read_roster, record_draw, start_match, start_tournament, update_player_ranking,
    ranking_from_rating, GameResult, MatchId, MatchResult, Participant, ParticipantId,
    PlayerRanking, RankTier, RatingChange, Tournament, TournamentConfig, TournamentError,
    TournamentId, DEFAULT_RATING,
};
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

type TournamentHandle = Arc<Mutex<Tournament>>;

#[derive(Default)]
struct EngineState {
    tournaments: RwLock<HashMap<TournamentId, TournamentHandle>>,
    rankings: RwLock<HashMap<String, Arc<Mutex<PlayerRanking>>>>,
}

type AppState = Data<EngineState>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct RegisterBody {
    id: String,
    name: String,
    rating: u32,
    #[serde(default)]
    rank: RankTier,
    #[serde(default)]
    deck_id: Option<String>,
}

#[derive(Deserialize)]
struct ResultBody {
    /// None records a draw.
    winner: Option<String>,
    #[serde(default)]
    result: Option<MatchResult>,
}

#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct ParticipantPath {
    id: TournamentId,
    participant_id: String,
}

#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    match_id: MatchId,
}

#[derive(Deserialize)]
struct PlayerPath {
    player_id: String,
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn bad_request(e: TournamentError) -> HttpResponse {
    log::warn!("rejected: {}", e);
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

fn handle(state: &AppState, id: TournamentId) -> Option<TournamentHandle> {
    state.tournaments.read().ok()?.get(&id).cloned()
}

/// Run `op` under the tournament's lock and reply with the updated tournament.
fn mutate<F>(state: &AppState, id: TournamentId, op: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<(), TournamentError>,
{
    let Some(handle) = handle(state, id) else {
        return not_found();
    };
    let Ok(mut t) = handle.lock() else {
        return lock_error();
    };
    match op(&mut *t) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(e) => bad_request(e),
    }
}

/// A decided match side: participant id and the rating it registered with.
type RatedSide = (ParticipantId, u32);

/// The player's ranking record, created from `seed_rating` on first sight.
fn ranking_handle(
    state: &AppState,
    player_id: &str,
    seed_rating: u32,
) -> Option<Arc<Mutex<PlayerRanking>>> {
    if let Some(existing) = state.rankings.read().ok()?.get(player_id) {
        return Some(existing.clone());
    }
    let mut rankings = state.rankings.write().ok()?;
    Some(
        rankings
            .entry(player_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(ranking_from_rating(player_id, seed_rating))))
            .clone(),
    )
}

/// Update both players' rankings from pre-match ratings. Each player is locked on its own.
fn rate_match(
    state: &AppState,
    first: &RatedSide,
    second: &RatedSide,
    first_result: GameResult,
) -> Option<(RatingChange, RatingChange)> {
    let a = ranking_handle(state, &first.0, first.1)?;
    let b = ranking_handle(state, &second.0, second.1)?;
    let rating_a = a.lock().ok()?.rating;
    let rating_b = b.lock().ok()?.rating;
    let second_result = match first_result {
        GameResult::Win => GameResult::Loss,
        GameResult::Loss => GameResult::Win,
        GameResult::Draw => GameResult::Draw,
    };
    let now = Utc::now();
    let first_change = update_player_ranking(&mut *a.lock().ok()?, rating_b, first_result, now);
    let second_change = update_player_ranking(&mut *b.lock().ok()?, rating_a, second_result, now);
    Some((first_change, second_change))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-engine",
    })
}

/// Create a tournament from its configuration.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<TournamentConfig>) -> HttpResponse {
    let tournament = match Tournament::new(body.into_inner()) {
        Ok(t) => t,
        Err(e) => return bad_request(e),
    };
    let id = tournament.id;
    let body = HttpResponse::Ok().json(&tournament);
    let Ok(mut g) = state.tournaments.write() else {
        return lock_error();
    };
    g.insert(id, Arc::new(Mutex::new(tournament)));
    log::info!("created tournament {}", id);
    body
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let Some(handle) = handle(&state, path.id) else {
        return not_found();
    };
    let Ok(t) = handle.lock() else {
        return lock_error();
    };
    HttpResponse::Ok().json(&*t)
}

#[post("/api/tournaments/{id}/participants")]
async fn api_register(state: AppState, path: Path<TournamentPath>, body: Json<RegisterBody>) -> HttpResponse {
    let body = body.into_inner();
    let mut participant = Participant::new(body.id, body.name, body.rating, body.rank);
    participant.deck_id = body.deck_id;
    mutate(&state, path.id, |t| t.register_participant(participant))
}

/// Register a CSV roster (`id,name,rating,rank,deck`). All rows or nothing.
#[post("/api/tournaments/{id}/participants/import")]
async fn api_import_roster(state: AppState, path: Path<TournamentPath>, body: String) -> HttpResponse {
    let roster = match read_roster(body.as_bytes()) {
        Ok(r) => r,
        Err(e) => return bad_request(e),
    };
    mutate(&state, path.id, |t| {
        let mut staged = t.clone();
        for participant in roster {
            staged.register_participant(participant)?;
        }
        *t = staged;
        Ok(())
    })
}

#[delete("/api/tournaments/{id}/participants/{participant_id}")]
async fn api_withdraw(state: AppState, path: Path<ParticipantPath>) -> HttpResponse {
    mutate(&state, path.id, |t| t.withdraw_participant(&path.participant_id))
}

#[post("/api/tournaments/{id}/participants/{participant_id}/check-in")]
async fn api_check_in(state: AppState, path: Path<ParticipantPath>) -> HttpResponse {
    mutate(&state, path.id, |t| t.check_in(&path.participant_id))
}

#[post("/api/tournaments/{id}/ready")]
async fn api_ready(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    mutate(&state, path.id, mark_ready)
}

#[post("/api/tournaments/{id}/start")]
async fn api_start(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    mutate(&state, path.id, |t| start_tournament(t, Utc::now()))
}

#[post("/api/tournaments/{id}/cancel")]
async fn api_cancel(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    mutate(&state, path.id, |t| cancel_tournament(t, Utc::now()))
}

#[post("/api/tournaments/{id}/matches/{match_id}/start")]
async fn api_start_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    mutate(&state, path.id, |t| start_match(t, path.match_id, Utc::now()))
}

/// Report a result, then try to advance the round under the same lock.
/// Ratings are updated after the tournament lock is released.
#[post("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_report_result(state: AppState, path: Path<MatchPath>, body: Json<ResultBody>) -> HttpResponse {
    let ResultBody { winner, result } = body.into_inner();
    let mut rated: Option<(RatedSide, RatedSide, GameResult)> = None;
    let response = mutate(&state, path.id, |t| {
        let pair = t
            .bracket
            .as_ref()
            .and_then(|b| b.find_match(path.match_id))
            .and_then(|(_, m)| m.participant1.clone().zip(m.participant2.clone()))
            .ok_or(TournamentError::MatchNotFound(path.match_id))?;
        match &winner {
            Some(w) => advance_winner(t, path.match_id, w, result)?,
            None => record_draw(t, path.match_id, result)?,
        }
        let first_result = match &winner {
            None => GameResult::Draw,
            Some(w) if *w == pair.0 => GameResult::Win,
            Some(_) => GameResult::Loss,
        };
        let registered = |id: &str| t.participant(id).map_or(DEFAULT_RATING, |p| p.rating);
        rated = Some((
            (pair.0.clone(), registered(&pair.0)),
            (pair.1.clone(), registered(&pair.1)),
            first_result,
        ));
        if advance_to_next_round(t) {
            log::info!("{}: advanced to round {:?}", t.id, t.bracket.as_ref().map(|b| b.current_round));
        }
        Ok(())
    });
    if let Some((first, second, first_result)) = rated {
        if let Some((a, b)) = rate_match(&state, &first, &second, first_result) {
            log::debug!("ratings: {} {:+}, {} {:+}", first.0, a.change, second.0, b.change);
        }
    }
    response
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let Some(handle) = handle(&state, path.id) else {
        return not_found();
    };
    let Ok(t) = handle.lock() else {
        return lock_error();
    };
    let standings = get_final_standings(&t);
    HttpResponse::Ok().json(standings)
}

#[get("/api/tournaments/{id}/prizes")]
async fn api_prizes(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let Some(handle) = handle(&state, path.id) else {
        return not_found();
    };
    let Ok(t) = handle.lock() else {
        return lock_error();
    };
    let awards = calculate_prizes(&t);
    HttpResponse::Ok().json(awards)
}

#[get("/api/rankings/{player_id}")]
async fn api_ranking(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let Some(handle) = state
        .rankings
        .read()
        .ok()
        .and_then(|g| g.get(&path.player_id).cloned())
    else {
        return HttpResponse::NotFound().json(serde_json::json!({ "error": "No ranking" }));
    };
    let Ok(r) = handle.lock() else {
        return lock_error();
    };
    HttpResponse::Ok().json(&*r)
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
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(EngineState::default());

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_register)
            .service(api_import_roster)
            .service(api_withdraw)
            .service(api_check_in)
            .service(api_ready)
            .service(api_start)
            .service(api_cancel)
            .service(api_start_match)
            .service(api_report_result)
            .service(api_standings)
            .service(api_prizes)
            .service(api_ranking)
    })
    .bind(bind)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn side(id: &str, rating: u32) -> RatedSide {
        (id.to_string(), rating)
    }

    fn stored(state: &AppState, id: &str) -> PlayerRanking {
        let handle = state.rankings.read().unwrap().get(id).cloned().unwrap();
        let ranking = handle.lock().unwrap().clone();
        ranking
    }

    #[test]
    fn first_result_starts_from_the_registered_rating() {
        let state = Data::new(EngineState::default());
        let (winner, loser) =
            rate_match(&state, &side("seed", 2000), &side("qualifier", 1000), GameResult::Win).unwrap();
        assert_eq!(winner.new_rating, 2000);
        assert_eq!(loser.new_rating, 1000);

        let seed = stored(&state, "seed");
        assert_eq!(seed.rank, RankTier::Master);
        assert_eq!(seed.season_wins, 1);
        let qualifier = stored(&state, "qualifier");
        assert_eq!(qualifier.rank, RankTier::Silver);
        assert_eq!(qualifier.season_losses, 1);
    }

    #[test]
    fn later_results_use_the_stored_record() {
        let state = Data::new(EngineState::default());
        rate_match(&state, &side("a", 1500), &side("b", 1500), GameResult::Win).unwrap();
        let (a, b) = rate_match(&state, &side("a", 100), &side("b", 100), GameResult::Draw).unwrap();
        // 1516 vs 1484 after the first game; the seed ratings passed here are ignored.
        assert_eq!(a.new_rating, 1515);
        assert_eq!(b.new_rating, 1485);
        assert_eq!(stored(&state, "a").season_games(), 2);
    }
}
