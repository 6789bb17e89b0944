// HTTP handler bindings for the arena API
//
// This module provides thin wrapper functions that bind Rocket HTTP routes
// to the Arena's methods. Handlers are responsible for:
// - Deserializing incoming JSON requests
// - Extracting the Arena from Rocket's managed state
// - Delegating to Arena methods
// - Mapping errors to status codes

use log::warn;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde_json::{json, Value};

use crate::arena::{Arena, MatchRequest, RegisterRequest, UnregisterRequest};
use crate::error::ArenaError;
use crate::replay::Replay;
use crate::store::{AiInfo, GameId, GameSummary};

type ApiResult<T> = Result<Json<T>, Custom<Json<Value>>>;

fn error_response(e: ArenaError) -> Custom<Json<Value>> {
    let status = Status::from_code(e.status_code()).unwrap_or(Status::InternalServerError);
    if status.code >= 500 {
        warn!("Request failed: {}", e);
    }
    Custom(status, Json(json!({ "error": e.to_string() })))
}

/// GET / endpoint
/// Returns service metadata and the bots currently online
#[get("/")]
pub fn index(arena: &rocket::State<Arena>) -> Json<Value> {
    Json(arena.info())
}

/// POST /register endpoint
#[post("/register", format = "json", data = "<req>")]
pub fn register(arena: &rocket::State<Arena>, req: Json<RegisterRequest>) -> ApiResult<AiInfo> {
    arena.register(&req).map(Json).map_err(error_response)
}

/// POST /unregister endpoint
#[post("/unregister", format = "json", data = "<req>")]
pub fn unregister(
    arena: &rocket::State<Arena>,
    req: Json<UnregisterRequest>,
) -> ApiResult<AiInfo> {
    arena.unregister(&req).map(Json).map_err(error_response)
}

/// POST /match endpoint
/// Answers as soon as the game exists; the match itself keeps running
#[post("/match", format = "json", data = "<req>")]
pub async fn start_match(arena: &rocket::State<Arena>, req: Json<MatchRequest>) -> ApiResult<Value> {
    arena
        .start_match(&req)
        .await
        .map(|id| Json(json!({ "game_id": id })))
        .map_err(error_response)
}

/// GET /game/<id> endpoint
/// Full replay, which grows while the match is still running
#[get("/game/<id>")]
pub fn game(arena: &rocket::State<Arena>, id: &str) -> ApiResult<Replay> {
    arena
        .lookup_game(&GameId(id.to_string()))
        .map(Json)
        .map_err(error_response)
}

/// GET /game/<id>/info endpoint
#[get("/game/<id>/info")]
pub fn game_info(arena: &rocket::State<Arena>, id: &str) -> ApiResult<GameSummary> {
    arena
        .lookup_game_info(&GameId(id.to_string()))
        .map(Json)
        .map_err(error_response)
}
