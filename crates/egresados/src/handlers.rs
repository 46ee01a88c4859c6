// File: src/handlers.rs
// Purpose: Axum routes and handlers

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use egresados_validation_core::IdentifierRule;
use maud::Markup;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::{self, clear_cookie, session_cookie, CurrentUser, Flash};
use crate::database::{Egresado, EgresadoUpdate};
use crate::error::{AppError, AppResult};
use crate::export;
use crate::forms::{EgresadoForm, FormContext, LoginForm};
use crate::pages::{self, Chrome, FormPage};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.assets.dir);

    Router::new()
        .route("/", get(index))
        .route("/login", get(login_page).post(login_submit))
        .route("/logout", get(logout))
        .route("/dashboard", get(dashboard))
        .route("/formularios", get(unified_form).post(unified_submit))
        .route("/egresados/nuevo", get(new_form))
        .route("/egresados", post(create_submit))
        .route("/editar/:matricula", get(edit_form).post(edit_submit))
        .route("/eliminar/:matricula", post(delete))
        .route("/exportar", get(export_csv))
        .route("/api/egresados", get(api_list).post(api_create))
        .route("/init", get(init_db))
        .nest_service("/static", assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn html(markup: Markup) -> Html<String> {
    Html(markup.into_string())
}

/// Page chrome for a logged-in user, consuming pending flashes
async fn chrome<'a>(state: &'a AppState, user: &'a CurrentUser) -> Chrome<'a> {
    Chrome::new(&state.config.project.name)
        .user(&user.username)
        .flashes(state.sessions.take_flashes(user.session_id).await)
}

async fn redirect_with(state: &AppState, user: &CurrentUser, flash: Flash, to: &str) -> Redirect {
    state.sessions.push_flash(user.session_id, flash).await;
    Redirect::to(to)
}

// ============================================================================
// PAGES
// ============================================================================

async fn index(State(state): State<AppState>, user: Option<CurrentUser>) -> Html<String> {
    let institution = state.config.project.institution.as_deref();
    match &user {
        Some(user) => html(pages::home(&chrome(&state, user).await, institution)),
        None => html(pages::home(&Chrome::new(&state.config.project.name), institution)),
    }
}

async fn login_page(State(state): State<AppState>) -> Html<String> {
    html(pages::login(&Chrome::new(&state.config.project.name), "", None))
}

async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    match auth::authenticate(&state.db, &form.username, &form.password).await? {
        Some(user) => {
            let id = state.sessions.create(&user).await;
            state
                .sessions
                .push_flash(id, Flash::success("Logged in successfully."))
                .await;
            info!("User '{}' logged in", user.username);

            let cookie = session_cookie(&state.config.auth.cookie_name, id, state.sessions.ttl());
            Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/dashboard")).into_response())
        }
        None => {
            warn!("Failed login for '{}'", form.username);
            let page = pages::login(
                &Chrome::new(&state.config.project.name),
                &form.username,
                Some("Invalid credentials."),
            );
            Ok(html(page).into_response())
        }
    }
}

async fn logout(State(state): State<AppState>, user: Option<CurrentUser>) -> Response {
    if let Some(user) = user {
        state.sessions.remove(user.session_id).await;
        info!("User '{}' logged out", user.username);
    }
    (
        [(header::SET_COOKIE, clear_cookie(&state.config.auth.cookie_name))],
        Redirect::to("/"),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

async fn dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Html<String>> {
    let records = state.db.search_egresados(query.q.as_deref()).await?;
    let total = state.db.count_egresados().await?;
    let q = query.q.unwrap_or_default();

    Ok(html(pages::dashboard(&chrome(&state, &user).await, &records, &q, total)))
}

// ============================================================================
// RECORD FORMS
// ============================================================================

async fn render_form(
    state: &AppState,
    user: &CurrentUser,
    page: &FormPage,
    ctx: &FormContext,
    status: StatusCode,
) -> Response {
    (status, html(pages::record_form(&chrome(state, user).await, page, ctx))).into_response()
}

async fn render_invalid(
    state: &AppState,
    user: &CurrentUser,
    page: &FormPage,
    form: &EgresadoForm,
    errors: HashMap<String, String>,
) -> Response {
    let ctx = FormContext::new(errors, form.values());
    render_form(state, user, page, &ctx, StatusCode::UNPROCESSABLE_ENTITY).await
}

fn already_registered(matricula: &str) -> HashMap<String, String> {
    HashMap::from([(
        "matricula".to_string(),
        format!("matrícula {} is already registered", matricula.trim()),
    )])
}

async fn new_form(State(state): State<AppState>, user: CurrentUser) -> Response {
    render_form(&state, &user, &FormPage::create(), &FormContext::empty(), StatusCode::OK).await
}

async fn unified_form(State(state): State<AppState>, user: CurrentUser) -> Response {
    render_form(&state, &user, &FormPage::unified(), &FormContext::empty(), StatusCode::OK).await
}

/// Create form: exactly 8 digits, the matrícula must be new
async fn create_submit(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<EgresadoForm>,
) -> AppResult<Response> {
    let page = FormPage::create();

    if let Err(errors) = form.check(page.rule) {
        return Ok(render_invalid(&state, &user, &page, &form, errors).await);
    }

    if state.db.get_egresado(form.matricula.trim()).await?.is_some() {
        let errors = already_registered(&form.matricula);
        return Ok(render_invalid(&state, &user, &page, &form, errors).await);
    }

    let record = state.db.create_egresado(form.into_new()).await?;
    info!("Created egresado {} by {}", record.matricula, user.username);

    let flash = Flash::success(format!("Record {} saved.", record.matricula));
    Ok(redirect_with(&state, &user, flash, "/dashboard").await.into_response())
}

/// Unified form: 8 to 20 digits, creates or updates by matrícula
async fn unified_submit(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<EgresadoForm>,
) -> AppResult<Response> {
    let page = FormPage::unified();

    if let Err(errors) = form.check(page.rule) {
        return Ok(render_invalid(&state, &user, &page, &form, errors).await);
    }

    let new = form.into_new();
    let matricula = new.matricula.clone();

    let flash = match state
        .db
        .update_egresado(&matricula, EgresadoUpdate::from(new.clone()))
        .await?
    {
        Some(_) => {
            info!("Updated egresado {} by {}", matricula, user.username);
            Flash::success(format!("Record {} updated.", matricula))
        }
        None => {
            state.db.create_egresado(new).await?;
            info!("Created egresado {} by {}", matricula, user.username);
            Flash::success(format!("Record {} saved.", matricula))
        }
    };

    Ok(redirect_with(&state, &user, flash, "/dashboard").await.into_response())
}

async fn edit_form(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(matricula): Path<String>,
) -> AppResult<Response> {
    let record = state
        .db
        .get_egresado(&matricula)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No record with matrícula {}", matricula)))?;

    let ctx = FormContext::from_record(&record);
    Ok(render_form(&state, &user, &FormPage::edit(&matricula), &ctx, StatusCode::OK).await)
}

async fn edit_submit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(matricula): Path<String>,
    Form(mut form): Form<EgresadoForm>,
) -> AppResult<Response> {
    if !form.matricula.trim().is_empty() && form.matricula.trim() != matricula {
        return Err(AppError::BadRequest(
            "The matrícula of a record cannot be changed".to_string(),
        ));
    }
    form.matricula = matricula.clone();

    let page = FormPage::edit(&matricula);
    if let Err(errors) = form.check(page.rule) {
        return Ok(render_invalid(&state, &user, &page, &form, errors).await);
    }

    let updates = EgresadoUpdate::from(form.into_new());
    state
        .db
        .update_egresado(&matricula, updates)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No record with matrícula {}", matricula)))?;
    info!("Updated egresado {} by {}", matricula, user.username);

    let flash = Flash::success(format!("Record {} updated.", matricula));
    Ok(redirect_with(&state, &user, flash, "/dashboard").await.into_response())
}

async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(matricula): Path<String>,
) -> AppResult<Redirect> {
    let flash = if state.db.delete_egresado(&matricula).await? {
        info!("Deleted egresado {} by {}", matricula, user.username);
        Flash::success(format!("Record {} deleted.", matricula))
    } else {
        warn!("Delete requested for unknown matrícula {}", matricula);
        Flash::danger(format!("No record with matrícula {}.", matricula))
    };

    Ok(redirect_with(&state, &user, flash, "/dashboard").await)
}

// ============================================================================
// EXPORT AND API
// ============================================================================

async fn export_csv(State(state): State<AppState>, user: CurrentUser) -> AppResult<Response> {
    let records = state.db.list_egresados().await?;
    let body = export::to_csv_bytes(&records)?;
    info!("{} exported {} records", user.username, records.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export::CSV_FILE_NAME),
            ),
        ],
        body,
    )
        .into_response())
}

/// Summary shape served by the JSON API
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiEgresado {
    pub id: i64,
    pub matricula: String,
    pub nombre: String,
    pub carrera: String,
    pub generacion: String,
    pub estatus: String,
}

impl From<Egresado> for ApiEgresado {
    fn from(e: Egresado) -> Self {
        Self {
            id: e.id,
            matricula: e.matricula,
            nombre: e.nombre_completo,
            carrera: e.carrera,
            generacion: e.generacion,
            estatus: e.estatus,
        }
    }
}

async fn api_list(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> AppResult<Json<Vec<ApiEgresado>>> {
    let records = state.db.list_egresados().await?;
    Ok(Json(records.into_iter().map(ApiEgresado::from).collect()))
}

async fn api_create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(form): Json<EgresadoForm>,
) -> AppResult<Response> {
    if let Err(errors) = form.check(IdentifierRule::UNIFIED) {
        let body = Json(json!({ "errors": errors }));
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, body).into_response());
    }

    if state.db.get_egresado(form.matricula.trim()).await?.is_some() {
        let errors = already_registered(&form.matricula);
        return Ok((StatusCode::CONFLICT, Json(json!({ "errors": errors }))).into_response());
    }

    let record = state.db.create_egresado(form.into_new()).await?;
    info!("Created egresado {} through the API by {}", record.matricula, user.username);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Egresado created",
            "egresado": ApiEgresado::from(record),
        })),
    )
        .into_response())
}

/// Create the schema and the default administrator
async fn init_db(State(state): State<AppState>) -> AppResult<String> {
    state.db.create_schema().await?;

    if auth::ensure_admin(&state.db).await? {
        Ok(format!(
            "Database initialized. User: {}, password: {}",
            auth::DEFAULT_ADMIN_USER,
            auth::DEFAULT_ADMIN_PASSWORD
        ))
    } else {
        Ok("Database already initialized".to_string())
    }
}
