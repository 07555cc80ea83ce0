//! In-memory stand-in for the portfolio backend.
//!
//! Serves the same routes, envelope and session-cookie behavior the client
//! expects, backed by vectors behind a `RwLock`. Record types are defined
//! here independently of the client crate so integration tests catch
//! schema drift.

use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub school: String,
    pub degree: String,
    pub field_of_study: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEducation {
    pub school: String,
    pub degree: String,
    pub field_of_study: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub position: String,
    pub bullet_points: Vec<String>,
    pub skills: Vec<String>,
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExperience {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub bullet_points: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
    pub image_url: Option<String>,
    pub skills: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub created_at: String,
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// Response envelope shared by every route.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    pub data: Option<T>,
    pub timestamp: String,
}

/// The one account allowed to sign in.
#[derive(Clone, Debug)]
pub struct AdminAccount {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

impl Default for AdminAccount {
    fn default() -> Self {
        Self {
            email: "admin@example.com".to_string(),
            password: "change-me".to_string(),
            name: Some("Admin".to_string()),
        }
    }
}

#[derive(Default)]
pub struct Db {
    sessions: HashSet<String>,
    education: Vec<Education>,
    experiences: Vec<Experience>,
    projects: Vec<Project>,
}

#[derive(Clone)]
pub struct AppState {
    db: Arc<RwLock<Db>>,
    admin: Arc<AdminAccount>,
    user: Arc<User>,
}

/// A stored resource with its own collection and create payload.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    type New: DeserializeOwned + Send + 'static;
    const LABEL: &'static str;

    fn id(&self) -> &str;
    fn table(db: &Db) -> &Vec<Self>;
    fn table_mut(db: &mut Db) -> &mut Vec<Self>;
    fn create(id: String, new: Self::New) -> Result<Self, String>;
}

impl Record for Education {
    type New = NewEducation;
    const LABEL: &'static str = "Education";

    fn id(&self) -> &str {
        &self.id
    }

    fn table(db: &Db) -> &Vec<Self> {
        &db.education
    }

    fn table_mut(db: &mut Db) -> &mut Vec<Self> {
        &mut db.education
    }

    fn create(id: String, new: NewEducation) -> Result<Self, String> {
        require_text("school", &new.school)?;
        require_text("degree", &new.degree)?;
        require_text("fieldOfStudy", &new.field_of_study)?;
        require_text("description", &new.description)?;
        Ok(Self {
            id,
            school: new.school,
            degree: new.degree,
            field_of_study: new.field_of_study,
            description: new.description,
            start_date: normalize_date("startDate", &new.start_date)?,
            end_date: normalize_date("endDate", &new.end_date)?,
        })
    }
}

impl Record for Experience {
    type New = NewExperience;
    const LABEL: &'static str = "Experience";

    fn id(&self) -> &str {
        &self.id
    }

    fn table(db: &Db) -> &Vec<Self> {
        &db.experiences
    }

    fn table_mut(db: &mut Db) -> &mut Vec<Self> {
        &mut db.experiences
    }

    fn create(id: String, new: NewExperience) -> Result<Self, String> {
        require_text("company", &new.company)?;
        require_text("position", &new.position)?;
        let end_date = match new.end_date {
            Some(end) => Some(normalize_date("endDate", &end)?),
            None => None,
        };
        Ok(Self {
            id,
            company: new.company,
            position: new.position,
            bullet_points: new.bullet_points,
            skills: new.skills,
            start_date: normalize_date("startDate", &new.start_date)?,
            end_date,
        })
    }
}

impl Record for Project {
    type New = NewProject;
    const LABEL: &'static str = "Project";

    fn id(&self) -> &str {
        &self.id
    }

    fn table(db: &Db) -> &Vec<Self> {
        &db.projects
    }

    fn table_mut(db: &mut Db) -> &mut Vec<Self> {
        &mut db.projects
    }

    fn create(id: String, new: NewProject) -> Result<Self, String> {
        require_text("name", &new.name)?;
        require_text("description", &new.description)?;
        Ok(Self {
            id,
            name: new.name,
            description: new.description,
            github_url: new.github_url,
            website_url: new.website_url,
            image_url: new.image_url,
            skills: new.skills,
        })
    }
}

fn require_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

fn normalize_date(field: &str, value: &str) -> Result<String, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true))
        .map_err(|_| format!("{field} must be an ISO-8601 date-time"))
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn envelope<T: Serialize>(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Response {
    let body = Envelope {
        success: status.is_success(),
        status_code: status.as_u16(),
        message: message.into(),
        data,
        timestamp: timestamp(),
    };
    (status, Json(body)).into_response()
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    envelope::<()>(status, message, None)
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.to_string())
}

async fn require_session(state: &AppState, headers: &HeaderMap) -> Result<(), Response> {
    let signed_in = match session_token(headers) {
        Some(token) => state.db.read().await.sessions.contains(&token),
        None => false,
    };
    if signed_in {
        Ok(())
    } else {
        Err(failure(StatusCode::UNAUTHORIZED, "authentication required"))
    }
}

pub fn app() -> Router {
    app_with(AdminAccount::default())
}

pub fn app_with(admin: AdminAccount) -> Router {
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: admin.email.clone(),
        name: admin.name.clone(),
        created_at: timestamp(),
    };
    let state = AppState {
        db: Arc::new(RwLock::new(Db::default())),
        admin: Arc::new(admin),
        user: Arc::new(user),
    };
    Router::new()
        .route("/users/login", post(login))
        .route("/users/logout", delete(logout))
        .route("/users/me", get(me))
        .route("/education", get(list::<Education>).post(create::<Education>))
        .route("/education/{id}", patch(update::<Education>).delete(remove::<Education>))
        .route("/experiences", get(list::<Experience>).post(create::<Experience>))
        .route("/experiences/{id}", patch(update::<Experience>).delete(remove::<Experience>))
        .route("/projects", get(list::<Project>).post(create::<Project>))
        .route("/projects/{id}", patch(update::<Project>).delete(remove::<Project>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, AdminAccount::default()).await
}

pub async fn serve(listener: TcpListener, admin: AdminAccount) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(admin)).await
}

async fn login(State(state): State<AppState>, Json(input): Json<LoginBody>) -> Response {
    if input.email != state.admin.email || input.password != state.admin.password {
        tracing::info!(email = %input.email, "rejected login");
        return failure(StatusCode::UNAUTHORIZED, "bad credentials");
    }
    let token = Uuid::new_v4().to_string();
    state.db.write().await.sessions.insert(token.clone());

    let cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
    let mut response = envelope::<()>(StatusCode::CREATED, "Logged in", None);
    if let Ok(value) = cookie.parse::<HeaderValue>() {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.db.write().await.sessions.remove(&token);
    }
    let mut response = envelope::<()>(StatusCode::OK, "Logged out", None);
    if let Ok(value) = HeaderValue::from_str(&format!("{SESSION_COOKIE}=; Path=/; Max-Age=0")) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}

async fn me(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(rejection) = require_session(&state, &headers).await {
        return rejection;
    }
    envelope(StatusCode::OK, "Current user", Some(state.user.as_ref().clone()))
}

async fn list<R: Record>(State(state): State<AppState>) -> Response {
    let db = state.db.read().await;
    envelope(StatusCode::OK, format!("{} retrieved", R::LABEL), Some(R::table(&db).clone()))
}

async fn create<R: Record>(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<R::New>,
) -> Response {
    if let Err(rejection) = require_session(&state, &headers).await {
        return rejection;
    }
    let record = match R::create(Uuid::new_v4().to_string(), input) {
        Ok(record) => record,
        Err(message) => return failure(StatusCode::BAD_REQUEST, message),
    };
    R::table_mut(&mut *state.db.write().await).push(record.clone());
    envelope(StatusCode::CREATED, format!("{} created", R::LABEL), Some(record))
}

async fn update<R: Record>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(changes): Json<Map<String, Value>>,
) -> Response {
    if let Err(rejection) = require_session(&state, &headers).await {
        return rejection;
    }
    let mut db = state.db.write().await;
    let Some(record) = R::table_mut(&mut db).iter_mut().find(|r| r.id() == id) else {
        return failure(StatusCode::NOT_FOUND, format!("{} not found", R::LABEL));
    };
    match apply_changes(record, changes) {
        Ok(updated) => {
            *record = updated.clone();
            envelope(StatusCode::OK, format!("{} updated", R::LABEL), Some(updated))
        }
        Err(message) => failure(StatusCode::BAD_REQUEST, message),
    }
}

async fn remove<R: Record>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = require_session(&state, &headers).await {
        return rejection;
    }
    let mut db = state.db.write().await;
    let table = R::table_mut(&mut db);
    let before = table.len();
    table.retain(|r| r.id() != id);
    if table.len() == before {
        return failure(StatusCode::NOT_FOUND, format!("{} not found", R::LABEL));
    }
    envelope::<()>(StatusCode::OK, format!("{} deleted", R::LABEL), None)
}

/// Overlay the provided fields on `record`; absent fields stay, `null` clears.
fn apply_changes<R: Record>(record: &R, changes: Map<String, Value>) -> Result<R, String> {
    let mut merged = match serde_json::to_value(record) {
        Ok(Value::Object(fields)) => fields,
        _ => return Err("record is not an object".to_string()),
    };
    for (key, value) in changes {
        if key == "id" || !merged.contains_key(&key) {
            return Err(format!("unknown field {key}"));
        }
        let value = match (key.as_str(), value) {
            ("startDate" | "endDate", Value::String(date)) => Value::String(normalize_date(&key, &date)?),
            (_, value) => value,
        };
        merged.insert(key, value);
    }
    serde_json::from_value(Value::Object(merged)).map_err(|e| e.to_string())
}
