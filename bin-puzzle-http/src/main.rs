use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use lib_puzzle::puzzle::Puzzle;
use lib_puzzle::search::GeneratorConfig;
use lib_puzzle::word::Word;
use lib_puzzle::PuzzleGenerator;
use once_cell::sync::OnceCell;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static INDEX: &str = include_str!("../index.html");

const SESSION_TTL: Duration = Duration::from_secs(60 * 60);

struct AppState {
    generator: PuzzleGenerator,
    rng: Mutex<StdRng>,
    sessions: Mutex<HashMap<Uuid, (Puzzle, Instant)>>,
}

static APP_STATE: OnceCell<AppState> = OnceCell::new();

fn app_state() -> &'static AppState {
    APP_STATE.get().expect("app state initialized before serving requests")
}

fn init_app_state() {
    let wordlist_path = std::env::var("PUZZLE_WORDLIST").unwrap_or_else(|_| "data/wordlist.txt".to_string());
    let frequency_path = std::env::var("PUZZLE_FREQUENCY").ok().map(PathBuf::from);

    let mut config = GeneratorConfig::new(PathBuf::from(wordlist_path));
    config.frequency_path = frequency_path;

    let mut rng = StdRng::from_entropy();
    let generator = PuzzleGenerator::new(&config, &mut rng).expect("failed to build puzzle generator");

    let state = AppState { generator, rng: Mutex::new(rng), sessions: Mutex::new(HashMap::new()) };
    APP_STATE.set(state).ok().expect("app state set twice");
}

#[derive(Serialize)]
struct PuzzleResponse {
    puzzle_id: Uuid,
    guesses: Vec<lib_puzzle::puzzle::Guess>,
}

#[derive(Deserialize)]
struct CheckRequest {
    puzzle_id: Uuid,
    guess: String,
}

#[derive(Serialize)]
struct CheckResponse {
    correct: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    answer: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn json_response(status: StatusCode, body: &impl Serialize) -> Response<Body> {
    let payload = serde_json::to_vec(body).unwrap_or_default();
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(payload.into())
        .unwrap()
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response<Body> {
    json_response(status, &ErrorBody { error: message.into() })
}

fn prune_expired_sessions(sessions: &mut HashMap<Uuid, (Puzzle, Instant)>) {
    let now = Instant::now();
    sessions.retain(|_, (_, created_at)| now.duration_since(*created_at) < SESSION_TTL);
}

async fn get_puzzle(_req: Request<Body>) -> Result<Response<Body>, Infallible> {
    let state = app_state();

    let puzzle = {
        let mut rng = state.rng.lock().unwrap();
        state.generator.generate_puzzle(None, Some(500), &mut *rng)
    };

    let puzzle = match puzzle {
        Ok(puzzle) => puzzle,
        Err(err) => {
            log::error!("puzzle generation failed: {err}");
            return Ok(error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()));
        }
    };

    let puzzle_id = Uuid::new_v4();
    let mut sessions = state.sessions.lock().unwrap();
    prune_expired_sessions(&mut sessions);
    let guesses = puzzle.guesses.clone();
    sessions.insert(puzzle_id, (puzzle, Instant::now()));

    Ok(json_response(StatusCode::OK, &PuzzleResponse { puzzle_id, guesses }))
}

async fn check_guess(req: Request<Body>) -> Result<Response<Body>, Infallible> {
    let bytes = match hyper::body::to_bytes(req.into_body()).await {
        Ok(bytes) => bytes,
        Err(err) => return Ok(error_response(StatusCode::BAD_REQUEST, err.to_string())),
    };

    let check: CheckRequest = match serde_json::from_slice(&bytes) {
        Ok(check) => check,
        Err(err) => return Ok(error_response(StatusCode::BAD_REQUEST, format!("malformed request body: {err}"))),
    };

    let Some(guess) = Word::new(&check.guess) else {
        return Ok(error_response(StatusCode::BAD_REQUEST, format!("'{}' is not a valid five-letter word", check.guess)));
    };

    let state = app_state();
    let sessions = state.sessions.lock().unwrap();
    let Some((puzzle, _)) = sessions.get(&check.puzzle_id) else {
        return Ok(error_response(StatusCode::NOT_FOUND, "unknown or expired puzzle_id"));
    };

    let correct = guess == puzzle.answer;
    let response = CheckResponse {
        correct,
        message: if correct { "Correct!".to_string() } else { "Not quite, try again.".to_string() },
        answer: correct.then(|| puzzle.answer.to_string()),
    };

    Ok(json_response(StatusCode::OK, &response))
}

async fn index(_req: Request<Body>) -> Result<Response<Body>, Infallible> {
    Ok(Response::builder().header("Content-Type", "text/html; charset=utf-8").body(INDEX.into()).unwrap())
}

async fn route(req: Request<Body>) -> Result<Response<Body>, Infallible> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, "/") => index(req).await,
        (&Method::GET, "/api/puzzle") => get_puzzle(req).await,
        (&Method::POST, "/api/check") => check_guess(req).await,
        _ => Ok(error_response(StatusCode::NOT_FOUND, "not found")),
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    init_app_state();

    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    log::info!("Starting on {addr:?}...");

    let make_svc = make_service_fn(|_conn| async { Ok::<_, Infallible>(service_fn(route)) });

    let server = Server::bind(&addr).serve(make_svc);
    let server = server.with_graceful_shutdown(shutdown_signal());

    if let Err(err) = server.await {
        log::error!("Server error: {err}");
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.expect("failed to listen for ctrl-c")
}
