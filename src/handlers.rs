use crate::actions::{
    self, ActionOutput, AdjustToneForm, ApologyForm, CompleteApologyForm, EmergencyForm,
    ExcuseForm, GuiltForm, ScheduleForm, ScreenshotForm,
};
use crate::errors::AppError;
use crate::models::ContentKind;
use crate::panels::PanelId;
use crate::session::{ActionGuard, Screenshot, ToggleOutcome};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct PanelToggleResponse {
    pub panel: &'static str,
    pub outcome: ToggleOutcome,
    pub open: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    pub dark_mode: bool,
}

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub dark_mode: bool,
    pub name: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct MemoryQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let session = &state.session;
    let (rankings, top_apologies) = tokio::join!(
        session.load_panel(PanelId::ExcuseRankings),
        session.load_panel(PanelId::ApologyRankings),
    );
    Html(render_index(session.theme(), &rankings, &top_apologies))
}

pub async fn static_asset(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let asset = state
        .assets
        .respond(&Method::GET, &format!("/static/{path}"))
        .await?;

    let status = StatusCode::from_u16(asset.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = asset
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    Ok((status, [(header::CONTENT_TYPE, content_type)], asset.body).into_response())
}

pub async fn toggle_panel(
    State(state): State<AppState>,
    Path(panel): Path<String>,
) -> Result<Json<PanelToggleResponse>, AppError> {
    let id = PanelId::from_dom_id(&panel)
        .ok_or_else(|| AppError::not_found(format!("unknown panel '{panel}'")))?;

    let toggle = state.session.toggle_panel(id).await;
    Ok(Json(PanelToggleResponse {
        panel: toggle.panel.spec().dom_id,
        outcome: toggle.outcome,
        open: toggle.open.map(|open| open.spec().dom_id),
        html: toggle.html,
    }))
}

pub async fn excuse(
    State(state): State<AppState>,
    Json(form): Json<ExcuseForm>,
) -> Result<Json<ActionOutput>, AppError> {
    let _busy = begin(&state, "excuse")?;
    Ok(Json(actions::generate_excuse(&state.session, form).await?))
}

pub async fn apology(
    State(state): State<AppState>,
    Json(form): Json<ApologyForm>,
) -> Result<Json<ActionOutput>, AppError> {
    let _busy = begin(&state, "apology")?;
    Ok(Json(actions::generate_apology(&state.session, form).await?))
}

pub async fn adjust_tone(
    State(state): State<AppState>,
    Json(form): Json<AdjustToneForm>,
) -> Result<Json<ActionOutput>, AppError> {
    let _busy = begin(&state, "adjust-tone")?;
    Ok(Json(actions::adjust_tone(&state.session, form).await?))
}

pub async fn complete_apology(
    State(state): State<AppState>,
    Json(form): Json<CompleteApologyForm>,
) -> Result<Json<ActionOutput>, AppError> {
    let _busy = begin(&state, "complete-apology")?;
    Ok(Json(actions::complete_apology(&state.session, form).await?))
}

pub async fn guilt_score(
    State(state): State<AppState>,
    Json(form): Json<GuiltForm>,
) -> Result<Json<ActionOutput>, AppError> {
    let _busy = begin(&state, "guilt-score")?;
    Ok(Json(actions::guilt_score(&state.session, form).await?))
}

pub async fn screenshot(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(form): Json<ScreenshotForm>,
) -> Result<Json<ActionOutput>, AppError> {
    let kind = parse_kind(&kind)?;
    let _busy = begin(&state, "screenshot")?;
    Ok(Json(actions::screenshot(&state.session, kind, form).await?))
}

pub async fn download_screenshot(State(state): State<AppState>) -> Result<Response, AppError> {
    let stored = state
        .session
        .screenshot()
        .ok_or_else(|| AppError::not_found("no screenshot yet"))?;

    match stored.shot {
        Screenshot::Url(url) => Ok(Redirect::temporary(&url).into_response()),
        Screenshot::Image(bytes) => {
            let disposition = format!("inline; filename=\"{}_proof.png\"", stored.kind);
            Ok((
                [
                    (header::CONTENT_TYPE, "image/png".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response())
        }
    }
}

pub async fn save_favorite(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<ActionOutput>, AppError> {
    let kind = parse_kind(&kind)?;
    let _busy = begin(&state, "favorite")?;
    Ok(Json(actions::save_favorite(&state.session, kind).await?))
}

pub async fn clear_rankings(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<ActionOutput>, AppError> {
    let kind = parse_kind(&kind)?;
    let _busy = begin(&state, "clear-rankings")?;
    Ok(Json(actions::clear_rankings(&state.session, kind).await?))
}

pub async fn memory(
    State(state): State<AppState>,
    Query(query): Query<MemoryQuery>,
) -> Html<String> {
    let matches = actions::memory_suggestions(&state.session, &query.q).await;
    Html(actions::render_suggestions(&matches))
}

pub async fn emergency(
    State(state): State<AppState>,
    Json(form): Json<EmergencyForm>,
) -> Result<Json<ActionOutput>, AppError> {
    let _busy = begin(&state, "emergency")?;
    Ok(Json(actions::trigger_emergency(&state.session, form).await?))
}

pub async fn schedule(
    State(state): State<AppState>,
    Json(form): Json<ScheduleForm>,
) -> Result<Json<ActionOutput>, AppError> {
    let _busy = begin(&state, "schedule")?;
    Ok(Json(actions::schedule_emergency(&state.session, form).await?))
}

pub async fn theme(
    State(state): State<AppState>,
    Json(payload): Json<ThemeRequest>,
) -> Result<Json<ThemeResponse>, AppError> {
    let theme = state.session.set_theme(payload.dark_mode).await?;
    Ok(Json(ThemeResponse {
        dark_mode: theme.dark_mode,
        name: theme.name(),
        label: theme.label(),
    }))
}

fn begin<'a>(state: &'a AppState, action: &'static str) -> Result<ActionGuard<'a>, AppError> {
    state
        .session
        .begin_action(action)
        .ok_or_else(|| AppError::busy(action))
}

fn parse_kind(raw: &str) -> Result<ContentKind, AppError> {
    ContentKind::parse(raw).ok_or_else(|| AppError::not_found(format!("unknown kind '{raw}'")))
}
