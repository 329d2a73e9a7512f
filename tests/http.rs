use axum::{
    Router,
    http::{HeaderMap, Method, StatusCode, Uri, header},
};
use once_cell::sync::Lazy;
use reqwest::{Client, redirect};
use serde_json::{Value, json};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

const GOOD_TOKEN: &str = "tok-ok";
const STALE_TOKEN: &str = "tok-expired";
const PASSWORD: &str = "secret123";

#[derive(Debug, Clone)]
struct ApiCall {
    method: Method,
    path: String,
    body: String,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));
static API_CALLS: Lazy<std::sync::Mutex<Vec<ApiCall>>> =
    Lazy::new(|| std::sync::Mutex::new(Vec::new()));

/// Base url of a stand-in mood API, running on its own thread so it outlives
/// the runtime of whichever test started it.
static MOOD_API: Lazy<String> = Lazy::new(|| {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mood api");
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            let app = Router::new().fallback(mood_api);
            axum::serve(listener, app).await.unwrap();
        });
    });
    format!("http://{addr}")
});

async fn mood_api(method: Method, uri: Uri, headers: HeaderMap, body: String) -> (StatusCode, String) {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    API_CALLS.lock().unwrap().push(ApiCall {
        method: method.clone(),
        path: uri.path().to_string(),
        body: body.clone(),
    });

    if bearer == format!("Bearer {STALE_TOKEN}") {
        return (StatusCode::UNAUTHORIZED, String::new());
    }

    match (method, uri.path()) {
        (Method::POST, "/api/auth/login") => {
            let credentials: Value = serde_json::from_str(&body).unwrap_or_default();
            if credentials["password"] == PASSWORD {
                (StatusCode::OK, json!({ "token": GOOD_TOKEN }).to_string())
            } else {
                (StatusCode::UNAUTHORIZED, String::new())
            }
        }
        (Method::POST, "/api/auth/logout") => (StatusCode::OK, String::new()),
        (Method::GET, "/api/moods/range") => (
            StatusCode::OK,
            json!([{ "id": 1, "date": "2026-01-01", "moodScore": 4, "note": "stub entry" }])
                .to_string(),
        ),
        (Method::POST, "/api/moods/create") => (StatusCode::CREATED, String::new()),
        _ => (StatusCode::NOT_FOUND, String::new()),
    }
}

fn creates() -> Vec<ApiCall> {
    API_CALLS
        .lock()
        .unwrap()
        .iter()
        .filter(|call| call.method == Method::POST && call.path == "/api/moods/create")
        .cloned()
        .collect()
}

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn client() -> Client {
    Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .unwrap()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/health")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_mood_journal"))
        .env("PORT", port.to_string())
        .env("MOOD_API_BASE", MOOD_API.as_str())
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

fn set_cookie(response: &reqwest::Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("jwt="))
        .unwrap_or_default()
        .to_string()
}

async fn post_mood(server: &TestServer, score: &str, note: &str) -> reqwest::Response {
    client()
        .post(format!("{}/dashboard/moods", server.base_url))
        .header(header::COOKIE, format!("jwt={GOOD_TOKEN}"))
        .form(&[("date", "2026-01-01"), ("score", score), ("note", note)])
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_protected_page_requires_login() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let response = client()
        .get(format!("{}/dashboard", server.base_url))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn http_login_sets_session_cookie() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let response = client()
        .post(format!("{}/login", server.base_url))
        .form(&[("email", "ada@example.com"), ("password", PASSWORD)])
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/dashboard");
    let cookie = set_cookie(&response);
    assert!(cookie.starts_with(&format!("jwt={GOOD_TOKEN}")));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(!cookie.contains("Max-Age"));
}

#[tokio::test]
async fn http_bad_credentials_stay_on_login() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let response = client()
        .post(format!("{}/login", server.base_url))
        .form(&[("email", "ada@example.com"), ("password", "wrong-password")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Invalid email or password"));
}

#[tokio::test]
async fn http_dashboard_lists_moods() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let response = client()
        .get(format!(
            "{}/dashboard?from=2026-01-01&to=2026-01-31",
            server.base_url
        ))
        .header(header::COOKIE, format!("jwt={GOOD_TOKEN}"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("stub entry"));
}

#[tokio::test]
async fn http_out_of_range_score_is_not_sent() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let before = creates().len();

    let response = post_mood(&server, "6", "").await;

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Mood must be between 1 and 5."));
    assert_eq!(creates().len(), before);
}

#[tokio::test]
async fn http_long_note_is_not_sent() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let before = creates().len();
    let note = "x".repeat(501);

    let response = post_mood(&server, "5", &note).await;

    let body = response.text().await.unwrap();
    assert!(body.contains("Note is too long (max 500 characters)."));
    assert_eq!(creates().len(), before);
}

#[tokio::test]
async fn http_valid_mood_is_created() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let before = creates().len();

    let response = post_mood(&server, "3", "").await;

    let body = response.text().await.unwrap();
    assert!(body.contains("Saved!"));
    let created = creates();
    assert_eq!(created.len(), before + 1);
    let sent: Value = serde_json::from_str(&created[before].body).unwrap();
    assert_eq!(sent, json!({ "date": "2026-01-01", "moodScore": 3 }));
}

#[tokio::test]
async fn http_expired_token_logs_out() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let response = client()
        .get(format!("{}/dashboard", server.base_url))
        .header(header::COOKIE, format!("jwt={STALE_TOKEN}"))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");
    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("jwt=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn http_logout_clears_cookie() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let response = client()
        .post(format!("{}/logout", server.base_url))
        .header(header::COOKIE, format!("jwt={GOOD_TOKEN}"))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");
    assert!(set_cookie(&response).contains("Max-Age=0"));
}

#[tokio::test]
async fn http_plan_download_is_a_text_file() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let response = client()
        .post(format!("{}/statistics/plan/download", server.base_url))
        .header(header::COOKIE, format!("jwt={GOOD_TOKEN}"))
        .form(&[("plan", "Day 1\r\n- Walk\r\n")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("mood-plan.txt"));
    assert_eq!(response.text().await.unwrap(), "Day 1\n- Walk\n");
}
