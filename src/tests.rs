//! Integration tests: the real client against an in-process mock backend.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::auth::AuthStore;
use crate::config::Config;
use crate::errors::ClientError;
use crate::models::{ChatRole, Provider};
use crate::navigation::Route;
use crate::query::keys;
use crate::storage::{init_storage, LocalStorage};
use crate::views::{
    self, ApiSetupModal, ChatOutcome, ChatPanel, CompetitorAnalysis, AnalysisTab, Gated,
    KeywordTable, PermissionsPanel, ProjectsPage, ViewState, CHAT_FALLBACK, GREETING,
};
use crate::App;

const TOKEN: &str = "tok-1";
const PASSWORD: &str = "hunter22";

/// One request as the mock backend saw it.
#[derive(Debug, Clone)]
struct Seen {
    method: String,
    path: String,
    authorization: Option<String>,
    content_type: Option<String>,
}

#[derive(Default)]
struct MockState {
    seen: Mutex<Vec<Seen>>,
    projects: Mutex<Vec<Value>>,
    credentials: Mutex<HashSet<String>>,
    bodies: Mutex<HashMap<String, Vec<Value>>>,
    queries: Mutex<Vec<HashMap<String, String>>>,
    project_lists: AtomicUsize,
    stats_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
    revoked: AtomicBool,
    chat_fails: AtomicBool,
    chat_slow: AtomicBool,
    credential_check_fails: AtomicBool,
}

impl MockState {
    fn record_body(&self, name: &str, body: Value) {
        self.bodies
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .push(body);
    }

    fn bodies(&self, name: &str) -> Vec<Value> {
        self.bodies
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    fn seen(&self, path: &str) -> Vec<Seen> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.path == path)
            .cloned()
            .collect()
    }
}

type Shared = Arc<MockState>;

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Could not validate credentials"})),
    )
        .into_response()
}

/// Records every request and rejects everything once the token is revoked.
async fn record_layer(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let seen = {
        let header_value = |name: header::HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Seen {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            authorization: header_value(header::AUTHORIZATION),
            content_type: header_value(header::CONTENT_TYPE),
        }
    };
    let expected = format!("Bearer {}", TOKEN);
    let authorized = seen.authorization.as_deref() == Some(expected.as_str());
    let is_login = seen.path == "/api/auth/login";
    state.seen.lock().unwrap().push(seen);

    if state.revoked.load(Ordering::SeqCst) && !is_login && authorized {
        return unauthorized();
    }
    next.run(req).await
}

fn user_json() -> Value {
    json!({
        "id": "u1",
        "email": "owner@example.com",
        "api_credits_remaining": "12.50",
        "created_at": "2024-01-01T00:00:00"
    })
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(state): State<Shared>, Form(form): Form<LoginForm>) -> Response {
    state.record_body("login", json!({"username": form.username}));
    if form.password != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Incorrect email or password"})),
        )
            .into_response();
    }
    Json(json!({"access_token": TOKEN, "token_type": "bearer"})).into_response()
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    state.record_body("register", body);
    Json(user_json())
}

async fn me(headers: axum::http::HeaderMap) -> Response {
    let expected = format!("Bearer {}", TOKEN);
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Json(user_json()).into_response(),
        _ => unauthorized(),
    }
}

async fn list_projects(State(state): State<Shared>) -> Json<Value> {
    state.project_lists.fetch_add(1, Ordering::SeqCst);
    Json(Value::Array(state.projects.lock().unwrap().clone()))
}

async fn create_project(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut projects = state.projects.lock().unwrap();
    let project = json!({
        "id": format!("p{}", projects.len() + 1),
        "name": body["name"],
        "domain": body["domain"],
        "gsc_connected": false
    });
    projects.push(project.clone());
    Json(project)
}

async fn get_project(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let projects = state.projects.lock().unwrap();
    match projects.iter().find(|p| p["id"] == id.as_str()) {
        Some(project) => Json(project.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Project not found"})),
        )
            .into_response(),
    }
}

async fn list_keywords() -> Json<Value> {
    Json(json!([
        {"id": "k1", "keyword_text": "rust seo", "search_volume": 1200, "keyword_difficulty": 35}
    ]))
}

async fn bulk_add(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let added = body["keywords"].as_array().map(|k| k.len()).unwrap_or(0);
    state.record_body("bulk", body);
    Json(json!({"success": true, "added": added, "skipped": 0}))
}

async fn refresh_keyword(
    State(state): State<Shared>,
    Path((_pid, kid)): Path<(String, String)>,
) -> Json<Value> {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({"id": kid, "keyword_text": "rust seo", "search_volume": 1300}))
}

async fn rank_stats(State(state): State<Shared>) -> Json<Value> {
    state.stats_calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    Json(json!({
        "total_tracked": 10,
        "average_position": 8.4,
        "distribution": {"top_3": 2, "top_10": 5, "top_20": 8, "below_20": 2}
    }))
}

async fn gap_analysis(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.queries.lock().unwrap().push(params);
    Json(json!({
        "competitor": "rival.com",
        "total_gaps": 1,
        "opportunities": [
            {"keyword": "seo audit", "competitor_position": 4, "our_position": null,
             "opportunity_score": 87.5, "gap_size": 96}
        ]
    }))
}

async fn check_credentials(State(state): State<Shared>, Path(provider): Path<String>) -> Response {
    if state.credential_check_fails.load(Ordering::SeqCst) {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"detail": "Credential store unavailable"})),
        )
            .into_response();
    }
    let exists = state.credentials.lock().unwrap().contains(&provider);
    Json(json!({"exists": exists, "provider": provider, "last_verified": null})).into_response()
}

async fn setup_credentials(
    State(state): State<Shared>,
    Path(provider): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if body.get("password").and_then(|p| p.as_str()) == Some("wrong") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Invalid DataForSEO credentials"})),
        )
            .into_response();
    }
    state.credentials.lock().unwrap().insert(provider.clone());
    Json(json!({"success": true, "provider": provider, "message": "Credentials saved"}))
        .into_response()
}

async fn chat(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let message = body["message"].as_str().unwrap_or_default().to_string();
    state.record_body("chat", body);
    if state.chat_slow.load(Ordering::SeqCst) {
        tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
    }
    if state.chat_fails.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Claude API error"})),
        )
            .into_response();
    }
    Json(json!({"success": true, "response": format!("echo: {}", message)})).into_response()
}

fn mock_router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/me", get(me))
        .route("/api/projects", get(list_projects).post(create_project))
        .route("/api/projects/{id}", get(get_project))
        .route("/api/projects/{pid}/keywords", get(list_keywords))
        .route("/api/projects/{pid}/keywords/bulk", post(bulk_add))
        .route("/api/projects/{pid}/keywords/{kid}/refresh", put(refresh_keyword))
        .route(
            "/api/projects/{pid}/rank-tracking/stats/overview",
            get(rank_stats),
        )
        .route(
            "/api/projects/{pid}/competitors/analysis/gap-analysis",
            get(gap_analysis),
        )
        .route("/api/credentials/check/{provider}", get(check_credentials))
        .route("/api/credentials/setup/{provider}", post(setup_credentials))
        .route("/api/ai/chat", post(chat))
        .layer(middleware::from_fn_with_state(state.clone(), record_layer))
        .with_state(state)
}

/// Test fixture for integration tests.
struct TestFixture {
    app: App,
    mock: Shared,
    base_url: String,
    temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mock: Shared = Arc::new(MockState::default());

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        let router = mock_router(mock.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let app = App::start(Config::new(&base_url, temp_dir.path().join("client.sqlite")))
            .await
            .expect("Failed to start app");

        TestFixture {
            app,
            mock,
            base_url,
            temp_dir,
        }
    }

    async fn signed_in() -> Self {
        let fixture = Self::new().await;
        fixture
            .app
            .session
            .sign_in("owner@example.com", PASSWORD)
            .await
            .expect("Failed to sign in");
        fixture
    }

    /// A second app over the same state file, as after a restart.
    async fn reopen(&self) -> App {
        App::start(Config::new(
            &self.base_url,
            self.temp_dir.path().join("client.sqlite"),
        ))
        .await
        .expect("Failed to reopen app")
    }

    fn configure(&self, provider: Provider) {
        self.mock
            .credentials
            .lock()
            .unwrap()
            .insert(provider.as_str().to_string());
    }
}

/// Poll `condition` until it holds, failing after one second.
async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(tokio::time::Duration::from_secs(1), async {
        while !condition() {
            tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("Condition not met in time");
}

// ============================================================================
// Session and interceptors
// ============================================================================

#[tokio::test]
async fn test_no_session_sends_no_bearer_header() {
    let fixture = TestFixture::new().await;

    let projects = fixture.app.client.projects().list().await.unwrap();
    assert!(projects.is_empty());

    let seen = fixture.mock.seen("/api/projects");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization, None);
}

#[tokio::test]
async fn test_session_attaches_bearer_header() {
    let fixture = TestFixture::signed_in().await;

    fixture.app.client.projects().list().await.unwrap();

    let seen = fixture.mock.seen("/api/projects");
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer tok-1"));
    assert_eq!(seen[0].content_type.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_login_is_form_encoded() {
    let fixture = TestFixture::signed_in().await;

    let login = fixture.mock.seen("/api/auth/login");
    assert_eq!(login.len(), 1);
    assert_eq!(login[0].method, "POST");
    assert_eq!(
        login[0].content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(
        fixture.mock.bodies("login")[0]["username"],
        "owner@example.com"
    );

    let user = fixture.app.session.current_user().unwrap();
    assert_eq!(user.email, "owner@example.com");
    assert_eq!(user.api_credits_remaining, 12.5);
    assert_eq!(fixture.app.navigator().current(), Route::Dashboard);
}

#[tokio::test]
async fn test_wrong_password_surfaces_detail() {
    let fixture = TestFixture::new().await;

    let err = fixture
        .app
        .session
        .sign_in("owner@example.com", "nope")
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.message(), "Incorrect email or password");
    assert!(!fixture.app.auth().is_authenticated());
}

#[tokio::test]
async fn test_sign_up_registers_then_signs_in() {
    let fixture = TestFixture::new().await;

    let user = fixture
        .app
        .session
        .sign_up("owner@example.com", PASSWORD)
        .await
        .unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(fixture.mock.bodies("register")[0]["email"], "owner@example.com");
    assert_eq!(fixture.app.auth().token().as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn test_unauthorized_response_signs_out_and_redirects() {
    let fixture = TestFixture::signed_in().await;
    fixture.app.navigator().navigate(Route::Projects);

    // Warm the cache so the sign-out has something to clear.
    views::projects(&fixture.app).await.unwrap();
    assert!(fixture
        .app
        .queries
        .get_query_data::<Vec<crate::models::Project>>(&keys::projects())
        .is_some());

    fixture.mock.revoked.store(true, Ordering::SeqCst);
    let err = fixture.app.client.projects().list().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));

    assert!(!fixture.app.auth().is_authenticated());
    assert_eq!(fixture.app.navigator().current(), Route::Login);

    // The session watcher clears cached queries.
    wait_until(|| {
        fixture
            .app
            .queries
            .get_query_data::<Vec<crate::models::Project>>(&keys::projects())
            .is_none()
    })
    .await;

    // The cleared session is persisted too.
    let pool = init_storage(&fixture.temp_dir.path().join("client.sqlite"))
        .await
        .unwrap();
    let store = AuthStore::new(LocalStorage::new(pool));
    store.hydrate().await.unwrap();
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_session_survives_restart() {
    let fixture = TestFixture::signed_in().await;

    let reopened = fixture.reopen().await;
    assert_eq!(reopened.auth().token().as_deref(), Some(TOKEN));
    assert_eq!(
        reopened.session.current_user().map(|u| u.email),
        Some("owner@example.com".to_string())
    );
    assert!(!reopened.auth().is_loading());
}

#[tokio::test]
async fn test_sign_out_clears_session_and_cache() {
    let fixture = TestFixture::signed_in().await;
    views::projects(&fixture.app).await.unwrap();

    fixture.app.session.sign_out().await.unwrap();

    assert!(!fixture.app.auth().is_authenticated());
    assert_eq!(fixture.app.navigator().current(), Route::Login);
    assert!(fixture.app.queries.is_stale(&keys::projects()));

    let reopened = fixture.reopen().await;
    assert!(!reopened.auth().is_authenticated());
}

#[tokio::test]
async fn test_protected_routes_redirect_without_session() {
    let fixture = TestFixture::new().await;

    let navigator = fixture.app.navigator();
    assert_eq!(navigator.navigate(Route::Projects), Route::Login);
    assert_eq!(
        navigator.navigate_path("/projects/p1"),
        Route::Login
    );
    assert_eq!(navigator.navigate(Route::Register), Route::Register);
}

// ============================================================================
// Query cache and mutations
// ============================================================================

#[tokio::test]
async fn test_creating_project_invalidates_list() {
    let fixture = TestFixture::signed_in().await;

    let mut page = ProjectsPage::new();
    page.load(&fixture.app).await;
    assert!(matches!(page.projects, ViewState::Empty(_)));

    // Fresh data comes from cache without another request.
    page.load(&fixture.app).await;
    assert_eq!(fixture.mock.project_lists.load(Ordering::SeqCst), 1);

    page.open_create();
    page.form.name = "  My Site ".to_string();
    page.form.domain = "example.com".to_string();
    let created = page.submit_create(&fixture.app).await.unwrap();
    assert_eq!(created.name, "My Site");

    assert_eq!(fixture.mock.project_lists.load(Ordering::SeqCst), 2);
    assert!(!page.form.open);
    assert!(page.form.name.is_empty());
    let listed = page.projects.ready().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].domain, "example.com");
}

#[tokio::test]
async fn test_create_project_requires_both_fields() {
    let fixture = TestFixture::signed_in().await;

    let mut page = ProjectsPage::new();
    page.open_create();
    page.form.name = "Only a name".to_string();
    let err = page.submit_create(&fixture.app).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(page.form.error.is_some());
    assert!(fixture.mock.projects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_fetches_share_one_request() {
    let fixture = TestFixture::signed_in().await;

    let (a, b) = tokio::join!(
        views::rank_stats(&fixture.app, "p1"),
        views::rank_stats(&fixture.app, "p1")
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a, b);
    assert_eq!(a.total_keywords, 10);
    assert_eq!(fixture.mock.stats_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_project_detail_not_found() {
    let fixture = TestFixture::signed_in().await;

    let err = views::project(&fixture.app, "missing").await.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(err.message(), "Project not found");
}

// ============================================================================
// Widgets
// ============================================================================

#[tokio::test]
async fn test_bulk_add_submits_trimmed_lines() {
    let fixture = TestFixture::signed_in().await;

    let mut table = KeywordTable::new("p1");
    let result = table.bulk_add(&fixture.app, "a\n\nb \n").await.unwrap();
    assert_eq!(result.added, 2);

    let bodies = fixture.mock.bodies("bulk");
    assert_eq!(bodies[0], json!({"keywords": ["a", "b"]}));
    assert!(table.rows.ready().is_some());
}

#[tokio::test]
async fn test_blank_bulk_add_sends_nothing() {
    let fixture = TestFixture::signed_in().await;

    let mut table = KeywordTable::new("p1");
    let err = table.bulk_add(&fixture.app, "\n  \n").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(fixture.mock.bodies("bulk").is_empty());
}

#[tokio::test]
async fn test_refresh_is_gated_on_credentials() {
    let fixture = TestFixture::signed_in().await;
    let mut table = KeywordTable::new("p1");

    match table.refresh(&fixture.app, "k1").await.unwrap() {
        Gated::SetupRequired(modal) => assert_eq!(modal.provider, Provider::DataForSeo),
        Gated::Ran(_) => panic!("refresh ran without credentials"),
    }
    assert_eq!(fixture.mock.refresh_calls.load(Ordering::SeqCst), 0);

    // Saving credentials invalidates the cached check.
    let mut modal = ApiSetupModal::new(Provider::DataForSeo, "keyword research");
    modal.set_field("login", "me@example.com");
    modal.set_field("password", "secret");
    modal.submit(&fixture.app).await.unwrap();

    let refreshed = table.refresh(&fixture.app, "k1").await.unwrap().ran().unwrap();
    assert_eq!(refreshed.search_volume, Some(1300));
    assert_eq!(fixture.mock.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_setup_failure_shows_backend_detail() {
    let fixture = TestFixture::signed_in().await;

    let mut modal = ApiSetupModal::new(Provider::DataForSeo, "keyword research");
    modal.set_field("login", "me@example.com");
    modal.set_field("password", "wrong");
    assert!(modal.submit(&fixture.app).await.is_err());
    assert_eq!(modal.error.as_deref(), Some("Invalid DataForSEO credentials"));
    assert!(!modal.submitting);
}

#[tokio::test]
async fn test_gap_analysis_passes_competitor_id() {
    let fixture = TestFixture::signed_in().await;

    let mut analysis = CompetitorAnalysis::new("p1");
    analysis.select(AnalysisTab::Gaps("c7".to_string()));
    analysis.load(&fixture.app).await;

    let queries = fixture.mock.queries.lock().unwrap().clone();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].get("competitor_id").map(String::as_str), Some("c7"));

    let report = analysis.gaps.ready().unwrap();
    assert_eq!(report.total_gaps, 1);
    assert_eq!(report.opportunities[0].keyword, "seo audit");
}

#[tokio::test]
async fn test_chat_sends_prior_history() {
    let fixture = TestFixture::signed_in().await;
    fixture.configure(Provider::Anthropic);

    let mut panel = ChatPanel::new(Some("p1".to_string()));
    assert!(matches!(
        panel.send(&fixture.app, "  hello ").await.unwrap(),
        ChatOutcome::Replied
    ));
    assert!(matches!(
        panel.send(&fixture.app, "again").await.unwrap(),
        ChatOutcome::Replied
    ));

    let bodies = fixture.mock.bodies("chat");
    assert_eq!(bodies[0]["message"], "hello");
    assert_eq!(bodies[0]["project_id"], "p1");
    assert_eq!(bodies[0]["conversation_history"].as_array().unwrap().len(), 1);
    assert_eq!(bodies[0]["conversation_history"][0]["content"], GREETING);
    assert_eq!(bodies[1]["conversation_history"].as_array().unwrap().len(), 3);

    assert_eq!(panel.messages.len(), 5);
    assert_eq!(panel.messages[2].role, ChatRole::Assistant);
    assert_eq!(panel.messages[2].content, "echo: hello");
    assert!(!panel.show_quick_actions());
}

#[tokio::test]
async fn test_chat_ignores_blank_input_and_falls_back_on_error() {
    let fixture = TestFixture::signed_in().await;
    fixture.configure(Provider::Anthropic);

    let mut panel = ChatPanel::new(None);
    assert!(matches!(
        panel.send(&fixture.app, "   ").await.unwrap(),
        ChatOutcome::Ignored
    ));
    assert!(fixture.mock.bodies("chat").is_empty());

    fixture.mock.chat_fails.store(true, Ordering::SeqCst);
    panel.send(&fixture.app, "hi").await.unwrap();
    assert_eq!(panel.messages.last().unwrap().content, CHAT_FALLBACK);
    assert!(!panel.pending);
}

#[tokio::test]
async fn test_chat_falls_back_when_credential_check_fails() {
    let fixture = TestFixture::signed_in().await;
    fixture
        .mock
        .credential_check_fails
        .store(true, Ordering::SeqCst);

    let mut panel = ChatPanel::new(None);
    panel.input = "hello".to_string();
    assert!(matches!(
        panel.submit(&fixture.app).await.unwrap(),
        ChatOutcome::Replied
    ));

    assert_eq!(panel.messages.len(), 3);
    assert_eq!(panel.messages[1].role, ChatRole::User);
    assert_eq!(panel.messages[1].content, "hello");
    assert_eq!(panel.messages[2].content, CHAT_FALLBACK);
    assert!(panel.input.is_empty());
    assert!(fixture.mock.bodies("chat").is_empty());
}

#[tokio::test]
async fn test_dropped_chat_send_does_not_block_later_messages() {
    let fixture = TestFixture::signed_in().await;
    fixture.configure(Provider::Anthropic);
    fixture.mock.chat_slow.store(true, Ordering::SeqCst);

    let mut panel = ChatPanel::new(None);
    let dropped = tokio::time::timeout(
        tokio::time::Duration::from_millis(100),
        panel.send(&fixture.app, "slow one"),
    )
    .await;
    assert!(dropped.is_err());
    assert!(!panel.pending);

    fixture.mock.chat_slow.store(false, Ordering::SeqCst);
    assert!(matches!(
        panel.send(&fixture.app, "next").await.unwrap(),
        ChatOutcome::Replied
    ));
    assert_eq!(panel.messages.last().unwrap().content, "echo: next");
}

#[tokio::test]
async fn test_chat_requires_anthropic_credentials() {
    let fixture = TestFixture::signed_in().await;

    let mut panel = ChatPanel::new(None);
    match panel.send(&fixture.app, "hi").await.unwrap() {
        ChatOutcome::SetupRequired(modal) => assert_eq!(modal.provider, Provider::Anthropic),
        other => panic!("expected setup prompt, got {:?}", other),
    }
    assert_eq!(panel.messages.len(), 1);
    assert!(fixture.mock.bodies("chat").is_empty());
}

#[tokio::test]
async fn test_permissions_persist_on_save() {
    let fixture = TestFixture::signed_in().await;

    let mut panel = PermissionsPanel::new();
    panel.load(&fixture.app).await.unwrap();
    assert_eq!(panel.toggle(&fixture.app, "read_data").await.unwrap(), Some(true));
    assert_eq!(panel.toggle(&fixture.app, "write_data").await.unwrap(), Some(true));
    panel.save(&fixture.app).await.unwrap();

    let reopened = fixture.reopen().await;
    let mut restored = PermissionsPanel::new();
    restored.load(&reopened).await.unwrap();
    assert!(restored.permissions.read_data);
    assert!(restored.permissions.write_data);
    assert!(!restored.permissions.send_emails);

    restored.reset_to_defaults();
    assert!(!restored.permissions.write_data);
}

#[tokio::test]
async fn test_stored_read_data_off_loads_as_on() {
    let fixture = TestFixture::signed_in().await;
    fixture
        .app
        .storage
        .set_item(views::PERMISSIONS_STORAGE_KEY, r#"{"read_data": false, "send_emails": true}"#)
        .await
        .unwrap();

    let mut panel = PermissionsPanel::new();
    panel.load(&fixture.app).await.unwrap();
    assert!(panel.permissions.read_data);
    assert!(panel.permissions.send_emails);
}
