mod common;

use common::{closed_port_url, spawn_backend, PNG_BYTES};
use excuse_desk::actions::{
    self, AdjustToneForm, CompleteApologyForm, ExcuseForm, GuiltForm, ScheduleForm, ScreenshotForm,
    CONNECTION_FAILED, SCREENSHOT_FAILED,
};
use excuse_desk::asset_cache::AssetCache;
use excuse_desk::errors::ClientError;
use excuse_desk::gateway::Gateway;
use excuse_desk::models::ContentKind;
use excuse_desk::panels::{PanelId, PanelPhase};
use excuse_desk::render::EMPTY_PLACEHOLDER;
use excuse_desk::session::{Screenshot, ToggleOutcome, LOAD_FAILED};
use excuse_desk::storage::ThemeState;
use excuse_desk::{ClientConfig, ClientSession};
use reqwest::Method;
use std::time::Duration;
use tokio::time::sleep;

fn session_for(base: &str) -> ClientSession {
    let config = ClientConfig {
        api_base: base.to_string(),
        reveal: Duration::ZERO,
        theme_path: std::env::temp_dir()
            .join(format!("excuse_desk_client_{}.json", std::process::id())),
        ..ClientConfig::default()
    };
    ClientSession::new(&config, ThemeState::default())
}

#[tokio::test]
async fn gateway_gets_and_posts_json() {
    let (base, backend) = spawn_backend().await;
    let gateway = Gateway::new(base);

    let history = gateway.get("/api/history").await.unwrap();
    assert_eq!(history["history"][0]["text"], "Missed the bus");

    let excuse = gateway
        .post("/api/excuse", &serde_json::json!({ "scenario": "rain" }))
        .await
        .unwrap();
    assert_eq!(excuse["english"], "Stuck because of rain.");
    assert_eq!(backend.excuse_calls(), 1);
}

#[tokio::test]
async fn gateway_marks_non_json_and_unreachable_backends() {
    let (base, _backend) = spawn_backend().await;
    let gateway = Gateway::new(base);
    let decoded = gateway.get("/api/apology-calendar").await;
    assert!(matches!(decoded, Err(ClientError::Decode { .. })));

    let offline = Gateway::new(closed_port_url());
    let result = offline.get("/api/rankings").await;
    assert!(matches!(result, Err(ClientError::Network { .. })));
}

#[tokio::test]
async fn ranked_panel_keeps_backend_order() {
    let (base, _backend) = spawn_backend().await;
    let session = session_for(&base);

    let html = session.load_panel(PanelId::ExcuseRankings).await;
    let rows: Vec<&str> = html.split("</li>").filter(|row| !row.is_empty()).collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].contains("🧠5</span> 🥇 a"));
    assert!(rows[1].contains("🧠0</span> 🥈 b"));
    assert!(rows[2].contains("🧠9</span> 🥉 c"));
    assert_eq!(
        session.ranking_snapshot(PanelId::ExcuseRankings),
        Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
    );

    let empty = session.load_panel(PanelId::ApologyRankings).await;
    assert_eq!(empty, EMPTY_PLACEHOLDER);
}

#[tokio::test]
async fn panels_pick_their_own_template() {
    let (base, _backend) = spawn_backend().await;
    let session = session_for(&base);

    let history = session.load_panel(PanelId::ExcuseHistory).await;
    assert_eq!(history, "<li><strong>2026-01-05 08:10</strong><br>Missed the bus</li>");

    let favorites = session.load_panel(PanelId::ExcuseFavorites).await;
    assert_eq!(favorites, "<li>Dog ate homework</li><li>&lt;b&gt;bold&lt;/b&gt;</li>");

    let calendar = session.load_panel(PanelId::ExcuseCalendar).await;
    assert_eq!(calendar.matches("<h4>2026-01-05</h4>").count(), 1);
    assert!(calendar.find("first").unwrap() < calendar.find("second").unwrap());

    let broken = session.load_panel(PanelId::ApologyCalendar).await;
    assert_eq!(broken, LOAD_FAILED);
}

#[tokio::test]
async fn opening_second_panel_closes_first() {
    let (base, _backend) = spawn_backend().await;
    let session = session_for(&base);

    let first = session.toggle_panel(PanelId::ExcuseHistory).await;
    assert_eq!(first.outcome, ToggleOutcome::Opened);
    assert_eq!(first.open, Some(PanelId::ExcuseHistory));

    let second = session.toggle_panel(PanelId::ApologyFavorites).await;
    assert_eq!(second.outcome, ToggleOutcome::Opened);
    assert_eq!(second.open, Some(PanelId::ApologyFavorites));
    assert_eq!(session.open_panel(), Some(PanelId::ApologyFavorites));

    let collapsed = session.toggle_panel(PanelId::ApologyFavorites).await;
    assert_eq!(collapsed.outcome, ToggleOutcome::Closed);
    assert!(collapsed.html.is_none());
    assert_eq!(session.open_panel(), None);
}

#[tokio::test]
async fn slow_loader_does_not_hold_other_panels() {
    let (base, backend) = spawn_backend().await;
    backend.delay_history(Duration::from_millis(1500));
    let config = ClientConfig {
        api_base: base,
        reveal: Duration::from_millis(50),
        ..ClientConfig::default()
    };
    let session = std::sync::Arc::new(ClientSession::new(&config, ThemeState::default()));

    let slow = {
        let session = std::sync::Arc::clone(&session);
        tokio::spawn(async move { session.toggle_panel(PanelId::ExcuseHistory).await })
    };
    sleep(Duration::from_millis(400)).await;
    assert_eq!(session.panel_phase(PanelId::ExcuseHistory), PanelPhase::Open);

    let calendar = session.toggle_panel(PanelId::ExcuseCalendar).await;
    assert_eq!(calendar.outcome, ToggleOutcome::Opened);
    assert_eq!(session.panel_phase(PanelId::ExcuseHistory), PanelPhase::Closed);

    let slow = slow.await.unwrap();
    assert_eq!(slow.outcome, ToggleOutcome::Opened);
    assert!(slow.html.unwrap().contains("Missed the bus"));
    assert_eq!(slow.open, Some(PanelId::ExcuseCalendar));
}

#[tokio::test]
async fn excuse_validation_happens_before_any_call() {
    let (base, backend) = spawn_backend().await;
    let session = session_for(&base);

    let err = actions::generate_excuse(&session, ExcuseForm::default())
        .await
        .unwrap_err();
    assert_eq!(err, ClientError::validation("Please enter a scenario."));
    assert_eq!(backend.excuse_calls(), 0);
}

#[tokio::test]
async fn excuse_output_is_stamped_and_translated() {
    let (base, backend) = spawn_backend().await;
    let session = session_for(&base);

    let form = ExcuseForm {
        scenario: "rain".to_string(),
        urgency: "high".to_string(),
        language: "es".to_string(),
        style: "funny".to_string(),
    };
    let out = actions::generate_excuse(&session, form).await.unwrap();
    let html = out.html.unwrap();
    assert!(html.starts_with("<strong>"));
    assert!(html.ends_with("<br>Stuck because of rain."));
    assert_eq!(out.translation.as_deref(), Some("Translation: Atascado."));

    let body = backend.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["urgency"], "high");
    assert_eq!(body["style"], "funny");
}

#[tokio::test]
async fn offline_excuse_renders_connection_failure() {
    let session = session_for(&closed_port_url());
    let form = ExcuseForm {
        scenario: "rain".to_string(),
        ..ExcuseForm::default()
    };
    let out = actions::generate_excuse(&session, form).await.unwrap();
    assert_eq!(out.html.as_deref(), Some(CONNECTION_FAILED));
}

#[tokio::test]
async fn adjusted_tone_is_saved_to_both_systems() {
    let (base, backend) = spawn_backend().await;
    let session = session_for(&base);

    let form = AdjustToneForm {
        tone: "humble".to_string(),
        sentence: "Sorry.".to_string(),
    };
    let out = actions::adjust_tone(&session, form).await.unwrap();
    assert!(out.html.unwrap().ends_with("[humble] Sorry."));

    for _ in 0..50 {
        if backend.saved().len() == 2 {
            break;
        }
        sleep(Duration::from_millis(20)).await;
    }
    let mut saved = backend.saved();
    saved.sort();
    assert_eq!(
        saved,
        vec![
            ("/api/save-apology-history".to_string(), "[humble] Sorry.".to_string()),
            ("/api/update-latest-apology".to_string(), "[humble] Sorry.".to_string()),
        ]
    );
}

#[tokio::test]
async fn completion_defaults_to_formal_tone() {
    let (base, _backend) = spawn_backend().await;
    let session = session_for(&base);

    let form = CompleteApologyForm {
        start: "I regret".to_string(),
        tone: String::new(),
    };
    let out = actions::complete_apology(&session, form).await.unwrap();
    assert!(out.html.unwrap().ends_with("I regret (formal)"));

    let missing = actions::complete_apology(&session, CompleteApologyForm::default()).await;
    assert!(missing.unwrap_err().is_validation());
}

#[tokio::test]
async fn guilt_score_becomes_an_alert() {
    let (base, _backend) = spawn_backend().await;
    let session = session_for(&base);

    let out = actions::guilt_score(&session, GuiltForm { text: "Sorry".to_string() })
        .await
        .unwrap();
    assert_eq!(out.alert.as_deref(), Some("🧠 Guilt Level:\n\n42/100 – mild"));

    let offline = session_for(&closed_port_url());
    let out = actions::guilt_score(&offline, GuiltForm { text: "Sorry".to_string() })
        .await
        .unwrap();
    assert_eq!(out.alert.as_deref(), Some("🧠 Guilt Level:\n\nError analyzing text"));
}

#[tokio::test]
async fn screenshot_accepts_image_and_rejects_null_url() {
    let (base, _backend) = spawn_backend().await;
    let session = session_for(&base);

    let out = actions::screenshot(&session, ContentKind::Excuse, ScreenshotForm::default())
        .await
        .unwrap();
    let link = out.screenshot.unwrap();
    assert_eq!(link.download, "excuse_proof.png");
    let stored = session.screenshot().unwrap();
    assert_eq!(stored.shot, Screenshot::Image(PNG_BYTES.to_vec()));

    let out = actions::screenshot(&session, ContentKind::Apology, ScreenshotForm::default())
        .await
        .unwrap();
    assert_eq!(out.alert.as_deref(), Some(SCREENSHOT_FAILED));
    assert_eq!(session.screenshot().unwrap().kind, ContentKind::Excuse);
}

#[tokio::test]
async fn clearing_rankings_reloads_the_list() {
    let (base, _backend) = spawn_backend().await;
    let session = session_for(&base);

    let out = actions::clear_rankings(&session, ContentKind::Excuse).await.unwrap();
    assert!(out.html.unwrap().contains("🥇 a"));
}

#[tokio::test]
async fn memory_lookup_encodes_query_and_skips_blank() {
    let (base, _backend) = spawn_backend().await;
    let session = session_for(&base);

    let matches = actions::memory_suggestions(&session, "  late & lost ").await;
    assert_eq!(matches, vec!["matched late & lost".to_string()]);
    assert!(actions::memory_suggestions(&session, "   ").await.is_empty());
}

#[tokio::test]
async fn schedule_requires_date_and_time() {
    let (base, _backend) = spawn_backend().await;
    let session = session_for(&base);

    let err = actions::schedule_emergency(&session, ScheduleForm::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Set date/time");

    let form = ScheduleForm {
        date: "2026-01-05".to_string(),
        time: "09:00".to_string(),
        email: "boss@example.com".to_string(),
    };
    let out = actions::schedule_emergency(&session, form).await.unwrap();
    assert_eq!(out.alert.as_deref(), Some("🚨 Emergency scheduled for 2026-01-05 09:00"));
}

#[tokio::test]
async fn favorites_report_backend_message() {
    let (base, _backend) = spawn_backend().await;
    let session = session_for(&base);

    let out = actions::save_favorite(&session, ContentKind::Excuse).await.unwrap();
    assert_eq!(out.alert.as_deref(), Some("✅ Excuse added to favourites!"));
}

#[tokio::test]
async fn asset_cache_serves_repeat_gets_from_cache() {
    let (base, backend) = spawn_backend().await;
    let cache = AssetCache::new(base);

    let first = cache.respond(&Method::GET, "/static/style.css").await.unwrap();
    let second = cache.respond(&Method::GET, "/static/style.css").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(backend.css_hits(), 1);
    assert!(cache.contains("/static/style.css").await);

    let api = cache.respond(&Method::POST, "/api/guilt-score").await.unwrap();
    assert_eq!(api.status, 415);
    let again = cache.respond(&Method::POST, "/api/guilt-score").await.unwrap();
    assert_eq!(again.status, 415);
    assert!(!cache.contains("/api/guilt-score").await);
}

#[tokio::test]
async fn asset_install_skips_missing_files() {
    let (base, _backend) = spawn_backend().await;
    let cache = AssetCache::new(base);

    assert_eq!(cache.install().await, 1);
    assert_eq!(cache.len().await, 1);
}
