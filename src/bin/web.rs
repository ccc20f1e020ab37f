//! Single binary web server: JSON API over the scoring engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, ROSTER_PATH (saved players file), RUST_LOG.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use gin_rummy_scorer::{
    build_config, delete_saved, dismiss_winner, end_session, load_roster, players_to_save,
    remember_players, resolve_point_goal, resolve_round_goal, save_roster, score_sheet_csv,
    start_session, submit_round, undo_last, update_saved_name, update_saved_photo, AceRule,
    GoalKind, JsonFileRosterStore, PlayerId, RosterStore, Session, SessionId, SessionSnapshot,
    SetupPlayer,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-session entry: session data + last activity time (for auto-cleanup).
struct SessionEntry {
    session: Session,
    last_activity: Instant,
}

/// In-memory state: many sessions by ID. Idle entries are swept after `INACTIVITY_TIMEOUT`.
type AppState = Data<RwLock<HashMap<SessionId, SessionEntry>>>;

/// Saved roster shared by all sessions.
type RosterState = Data<Box<dyn RosterStore + Send + Sync>>;

/// Inactivity threshold: sessions not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateSessionBody {
    #[serde(default)]
    session_name: String,
    players: Vec<SetupPlayer>,
    #[serde(default)]
    ace_rule: AceRule,
    #[serde(default)]
    goal_type: GoalKind,
    #[serde(default = "default_point_goal")]
    point_goal: u32,
    #[serde(default)]
    custom_point_goal: String,
    #[serde(default = "default_round_goal")]
    round_goal: u32,
    #[serde(default)]
    custom_round_goal: String,
}

fn default_point_goal() -> u32 {
    gin_rummy_scorer::logic::DEFAULT_POINT_GOAL
}

fn default_round_goal() -> u32 {
    gin_rummy_scorer::logic::DEFAULT_ROUND_GOAL
}

/// Per-player hand input. Strings are coerced by the engine; numbers are taken as their text;
/// null or anything else counts as missing (0).
#[derive(Deserialize)]
struct SubmitRoundBody {
    #[serde(default)]
    scores: HashMap<PlayerId, serde_json::Value>,
}

impl SubmitRoundBody {
    fn raw_scores(&self) -> HashMap<PlayerId, String> {
        self.scores
            .iter()
            .filter_map(|(&id, v)| {
                let text = match v {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Number(n) => n.to_string(),
                    _ => return None,
                };
                Some((id, text))
            })
            .collect()
    }
}

#[derive(Deserialize, Default)]
struct EndSessionBody {
    #[serde(default)]
    winner: Option<PlayerId>,
}

#[derive(Deserialize)]
struct SavedPhotoBody {
    photo: Option<String>,
}

#[derive(Deserialize)]
struct SavedNameBody {
    name: String,
}

/// Path segment: session id (e.g. /api/sessions/{id})
#[derive(Deserialize)]
struct SessionPath {
    id: SessionId,
}

/// Path segment: roster index (e.g. /api/roster/{index})
#[derive(Deserialize)]
struct RosterPath {
    index: usize,
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No session" }))
}

fn bad_request(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

fn store(roster: &RosterState) -> &dyn RosterStore {
    &**roster.get_ref()
}

/// Look up a session, refresh its activity time and hand it to `f`.
fn with_session<F>(state: &AppState, id: SessionId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Session) -> HttpResponse,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            f(&mut entry.session)
        }
        None => not_found(),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "gin-rummy-scorer",
    })
}

/// Deadwood reference rows for an ace rule.
#[get("/api/ace-rules/{rule}/reference")]
async fn api_ace_reference(rule: Path<String>) -> HttpResponse {
    let rule: AceRule = match rule.parse() {
        Ok(r) => r,
        Err(e) => return HttpResponse::NotFound().json(serde_json::json!({ "error": e })),
    };
    let rows: Vec<_> = rule
        .reference_table()
        .into_iter()
        .map(|(cards, points)| serde_json::json!({ "cards": cards, "points": points }))
        .collect();
    HttpResponse::Ok().json(rows)
}

/// List saved players.
#[get("/api/roster")]
async fn api_get_roster(roster: RosterState) -> HttpResponse {
    HttpResponse::Ok().json(load_roster(store(&roster)))
}

/// Delete a saved player by position.
#[delete("/api/roster/{index}")]
async fn api_delete_saved(roster: RosterState, path: Path<RosterPath>) -> HttpResponse {
    let roster_store = store(&roster);
    let updated = delete_saved(&load_roster(roster_store), path.index);
    save_roster(roster_store, &updated);
    HttpResponse::Ok().json(updated)
}

/// Replace a saved player's photo.
#[put("/api/roster/{index}/photo")]
async fn api_update_saved_photo(
    roster: RosterState,
    path: Path<RosterPath>,
    body: Json<SavedPhotoBody>,
) -> HttpResponse {
    let roster_store = store(&roster);
    let updated =
        update_saved_photo(&load_roster(roster_store), path.index, body.into_inner().photo);
    save_roster(roster_store, &updated);
    HttpResponse::Ok().json(updated)
}

/// Rename a saved player.
#[put("/api/roster/{index}/name")]
async fn api_update_saved_name(
    roster: RosterState,
    path: Path<RosterPath>,
    body: Json<SavedNameBody>,
) -> HttpResponse {
    let roster_store = store(&roster);
    let updated = update_saved_name(&load_roster(roster_store), path.index, &body.name);
    save_roster(roster_store, &updated);
    HttpResponse::Ok().json(updated)
}

/// Create a session from setup input (returns it with id; client stores id for subsequent requests).
#[post("/api/sessions")]
async fn api_create_session(
    state: AppState,
    roster: RosterState,
    body: Json<CreateSessionBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let config = match build_config(
        &body.players,
        body.ace_rule,
        body.goal_type,
        resolve_point_goal(body.point_goal, &body.custom_point_goal),
        resolve_round_goal(body.round_goal, &body.custom_round_goal),
        &body.session_name,
    ) {
        Ok(c) => c,
        Err(e) => return bad_request(e),
    };

    remember_players(store(&roster), &players_to_save(&body.players));

    let session = start_session(config);
    let id = session.id;
    let snapshot = SessionSnapshot::from_session(&session);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(
        id,
        SessionEntry {
            session,
            last_activity: Instant::now(),
        },
    );
    HttpResponse::Ok().json(snapshot)
}

/// Get a session by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/sessions/{id}")]
async fn api_get_session(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        HttpResponse::Ok().json(SessionSnapshot::from_session(s))
    })
}

/// Record a hand.
#[post("/api/sessions/{id}/rounds")]
async fn api_submit_round(
    state: AppState,
    path: Path<SessionPath>,
    body: Json<SubmitRoundBody>,
) -> HttpResponse {
    let raw = body.raw_scores();
    with_session(&state, path.id, |s| match submit_round(s, &raw) {
        Ok(_) => HttpResponse::Ok().json(SessionSnapshot::from_session(s)),
        Err(e) => bad_request(e),
    })
}

/// Undo the most recent hand (no-op with no hands).
#[post("/api/sessions/{id}/undo")]
async fn api_undo_last(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        undo_last(s);
        HttpResponse::Ok().json(SessionSnapshot::from_session(s))
    })
}

/// Keep scoring after a goal fired.
#[post("/api/sessions/{id}/dismiss-winner")]
async fn api_dismiss_winner(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| {
        dismiss_winner(s);
        HttpResponse::Ok().json(SessionSnapshot::from_session(s))
    })
}

/// End the session, optionally naming the winner.
#[post("/api/sessions/{id}/end")]
async fn api_end_session(
    state: AppState,
    path: Path<SessionPath>,
    body: Option<Json<EndSessionBody>>,
) -> HttpResponse {
    let forced = body.map(|b| b.into_inner()).unwrap_or_default().winner;
    with_session(&state, path.id, |s| match end_session(s, forced) {
        Ok(_) => HttpResponse::Ok().json(SessionSnapshot::from_session(s)),
        Err(e) => bad_request(e),
    })
}

/// Final standings, highest total first.
#[get("/api/sessions/{id}/standings")]
async fn api_standings(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| HttpResponse::Ok().json(s.standings()))
}

/// Round history as CSV.
#[get("/api/sessions/{id}/score-sheet.csv")]
async fn api_score_sheet(state: AppState, path: Path<SessionPath>) -> HttpResponse {
    with_session(&state, path.id, |s| match score_sheet_csv(s) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(csv),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    })
}

/// Drop sessions idle for at least `timeout`. Returns how many were removed.
fn sweep_inactive(sessions: &mut HashMap<SessionId, SessionEntry>, timeout: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| entry.last_activity.elapsed() < timeout);
    let removed = before - sessions.len();
    if removed > 0 {
        log::info!(
            "Cleaned up {} inactive session(s) (no activity for {}h)",
            removed,
            timeout.as_secs() / 3600
        );
    }
    removed
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_roster_path() -> String {
    "saved_players.json".to_string()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let roster_path = std::env::var("ROSTER_PATH").unwrap_or_else(|_| default_roster_path());
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!("Saved players file: {}", roster_path);

    let state = Data::new(RwLock::new(HashMap::<SessionId, SessionEntry>::new()));
    let roster: RosterState = Data::new(
        Box::new(JsonFileRosterStore::new(roster_path)) as Box<dyn RosterStore + Send + Sync>,
    );

    // Background task: every 30 minutes, remove sessions past INACTIVITY_TIMEOUT
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            sweep_inactive(&mut g, INACTIVITY_TIMEOUT);
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(roster.clone())
            .service(api_health)
            .service(api_ace_reference)
            .service(api_get_roster)
            .service(api_delete_saved)
            .service(api_update_saved_photo)
            .service(api_update_saved_name)
            .service(api_create_session)
            .service(api_get_session)
            .service(api_submit_round)
            .service(api_undo_last)
            .service(api_dismiss_winner)
            .service(api_end_session)
            .service(api_standings)
            .service(api_score_sheet)
    })
    .bind(bind)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use gin_rummy_scorer::MemoryRosterStore;

    fn app_state() -> (AppState, RosterState) {
        (
            Data::new(RwLock::new(HashMap::new())),
            Data::new(Box::new(MemoryRosterStore::new()) as Box<dyn RosterStore + Send + Sync>),
        )
    }

    #[actix_web::test]
    async fn create_submit_and_end_session() {
        let (state, roster) = app_state();
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .app_data(roster.clone())
                .service(api_create_session)
                .service(api_submit_round)
                .service(api_end_session)
                .service(api_get_roster),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/sessions")
            .set_json(serde_json::json!({
                "session_name": "  Friday  ",
                "players": [{ "name": "Ann", "save": true }, { "name": "" }],
                "goal_type": "points",
                "point_goal": 100
            }))
            .to_request();
        let created: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created["config"]["session_name"], "Friday");
        assert_eq!(created["config"]["players"][1]["name"], "Player 2");
        let id = created["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/rounds", id))
            .set_json(serde_json::json!({ "scores": { "0": "120", "1": "abc" } }))
            .to_request();
        let after: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(after["phase"], "winner_pending");
        assert_eq!(after["winner"]["score"], 120);
        assert_eq!(after["rounds"][0]["scores"]["1"], 0);

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/end", id))
            .to_request();
        let ended: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ended["phase"], "ended");
        assert_eq!(ended["winner"]["player"]["name"], "Ann");

        let req = test::TestRequest::get().uri("/api/roster").to_request();
        let saved: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(saved.as_array().map(|a| a.len()), Some(1));
        assert_eq!(saved[0]["name"], "Ann");
    }

    #[actix_web::test]
    async fn null_and_numeric_hand_input_is_accepted() {
        let (state, roster) = app_state();
        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(roster)
                .service(api_create_session)
                .service(api_submit_round),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/sessions")
            .set_json(serde_json::json!({
                "players": [{ "name": "Ann" }, { "name": "Bo" }],
                "goal_type": "free"
            }))
            .to_request();
        let created: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/rounds", id))
            .set_json(serde_json::json!({ "scores": { "0": "12", "1": null } }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        let after: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(after["rounds"][0]["scores"]["0"], 12);
        assert_eq!(after["rounds"][0]["scores"]["1"], 0);

        let req = test::TestRequest::post()
            .uri(&format!("/api/sessions/{}/rounds", id))
            .set_json(serde_json::json!({ "scores": { "0": 7, "1": [1] } }))
            .to_request();
        let after: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(after["rounds"][1]["scores"]["0"], 7);
        assert_eq!(after["rounds"][1]["scores"]["1"], 0);
        assert_eq!(after["totals"]["0"], 19);
    }

    #[actix_web::test]
    async fn rename_saved_player() {
        let (state, _) = app_state();
        let roster: RosterState = Data::new(Box::new(MemoryRosterStore::with_players(vec![
            gin_rummy_scorer::SavedPlayer::new("Ann", None),
        ])) as Box<dyn RosterStore + Send + Sync>);
        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(roster.clone())
                .service(api_update_saved_name),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/roster/0/name")
            .set_json(serde_json::json!({ "name": " Annie " }))
            .to_request();
        let updated: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated[0]["name"], "Annie");
        assert_eq!(load_roster(store(&roster))[0].name, "Annie");
    }

    #[actix_web::test]
    async fn sweep_drops_idle_sessions() {
        let players = vec![SetupPlayer::named("Ann"), SetupPlayer::named("Bo")];
        let config =
            build_config(&players, AceRule::Low, GoalKind::Free, 100, 10, "").unwrap();
        let session = start_session(config);
        let mut sessions = HashMap::new();
        sessions.insert(
            session.id,
            SessionEntry {
                session,
                last_activity: Instant::now(),
            },
        );

        assert_eq!(sweep_inactive(&mut sessions, INACTIVITY_TIMEOUT), 0);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sweep_inactive(&mut sessions, Duration::ZERO), 1);
        assert!(sessions.is_empty());
    }

    #[actix_web::test]
    async fn rejects_single_player_setup() {
        let (state, roster) = app_state();
        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(roster)
                .service(api_create_session),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/sessions")
            .set_json(serde_json::json!({ "players": [{ "name": "Solo" }] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn unknown_session_is_404() {
        let (state, _) = app_state();
        let app = test::init_service(App::new().app_data(state).service(api_get_session)).await;
        let req = test::TestRequest::get()
            .uri(&format!("/api/sessions/{}", uuid::Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}
