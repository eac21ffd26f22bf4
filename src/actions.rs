use crate::errors::ClientError;
use crate::models::{
    AdjustToneRequest, AdjustToneResponse, ApologyRequest, CompleteApologyRequest,
    CompleteApologyResponse, ContentKind, EmergencyRequest, ExcuseRequest, ExcuseResponse,
    GuiltScoreRequest, GuiltScoreResponse, LatestApologyRequest, MemoryResponse, MessageResponse,
    SaveHistoryRequest, ScheduleRequest, ScreenshotRequest,
};
use crate::panels::PanelId;
use crate::render::escape_html;
use crate::session::{ClientSession, Screenshot};
use chrono::{DateTime, Local};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

pub const CONNECTION_FAILED: &str = "❌ Connection failed. Backend offline?";
pub const SCREENSHOT_FAILED: &str = "Screenshot failed.";
pub const TRIGGERED: &str = "🚨 Triggered!";

// Same set `encodeURIComponent` leaves alone.
const QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActionOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<ScreenshotLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenshotLink {
    pub src: String,
    pub download: String,
}

impl ActionOutput {
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            ..Self::default()
        }
    }

    pub fn alert(message: impl Into<String>) -> Self {
        Self {
            alert: Some(message.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExcuseForm {
    pub scenario: String,
    pub urgency: String,
    pub language: String,
    pub style: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApologyForm {
    pub context: String,
    pub tone: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub style: String,
    pub language: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdjustToneForm {
    pub tone: String,
    pub sentence: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompleteApologyForm {
    pub start: String,
    pub tone: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GuiltForm {
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScreenshotForm {
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmergencyForm {
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScheduleForm {
    pub date: String,
    pub time: String,
    pub email: String,
}

fn require(value: &str, prompt: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::validation(prompt));
    }
    Ok(())
}

pub fn stamped(text: &str) -> String {
    stamped_at(Local::now(), text)
}

pub fn stamped_at(now: DateTime<Local>, text: &str) -> String {
    format!(
        "<strong>{}</strong><br>{}",
        now.format("%Y-%m-%d %H:%M:%S"),
        escape_html(text)
    )
}

pub async fn generate_excuse(
    session: &ClientSession,
    form: ExcuseForm,
) -> Result<ActionOutput, ClientError> {
    require(&form.scenario, "Please enter a scenario.")?;

    let language = if form.language.is_empty() { "en".to_string() } else { form.language };
    let request = ExcuseRequest {
        scenario: form.scenario,
        urgency: form.urgency,
        language: language.clone(),
        style: form.style,
    };

    match session
        .gateway()
        .post_as::<_, ExcuseResponse>("/api/excuse", &request)
        .await
    {
        Ok(response) => {
            let translation = if language != "en" {
                format!("Translation: {}", response.translated.unwrap_or_default())
            } else {
                String::new()
            };
            Ok(ActionOutput {
                html: Some(stamped(&response.english)),
                translation: Some(translation),
                ..ActionOutput::default()
            })
        }
        Err(_) => Ok(ActionOutput::html(CONNECTION_FAILED)),
    }
}

pub async fn generate_apology(
    session: &ClientSession,
    form: ApologyForm,
) -> Result<ActionOutput, ClientError> {
    require(&form.context, "Please enter context.")?;

    let request = ApologyRequest {
        context: form.context,
        tone: form.tone,
        message_type: form.message_type,
        style: form.style,
        language: if form.language.is_empty() { "en".to_string() } else { form.language },
    };

    let response = session
        .gateway()
        .post_as::<_, MessageResponse>("/api/apology", &request)
        .await;
    match response.ok().and_then(|response| response.message) {
        Some(message) => Ok(ActionOutput::html(stamped(&message))),
        None => Ok(ActionOutput::html(CONNECTION_FAILED)),
    }
}

pub async fn adjust_tone(
    session: &ClientSession,
    form: AdjustToneForm,
) -> Result<ActionOutput, ClientError> {
    if form.tone.trim().is_empty() || form.sentence.trim().is_empty() {
        return Err(ClientError::validation("Generate an apology first."));
    }

    let request = AdjustToneRequest {
        tone: form.tone,
        sentence: form.sentence,
    };
    let adjusted = session
        .gateway()
        .post_as::<_, AdjustToneResponse>("/api/adjust-tone", &request)
        .await
        .ok()
        .and_then(|response| response.adjusted);

    match adjusted {
        Some(adjusted) => {
            save_to_all_systems(session, &adjusted);
            Ok(ActionOutput::html(stamped(&adjusted)))
        }
        None => Ok(ActionOutput::default()),
    }
}

pub async fn complete_apology(
    session: &ClientSession,
    form: CompleteApologyForm,
) -> Result<ActionOutput, ClientError> {
    require(&form.start, "Enter start text.")?;

    let request = CompleteApologyRequest {
        start: form.start,
        tone: if form.tone.is_empty() { "formal".to_string() } else { form.tone },
    };
    let completed = session
        .gateway()
        .post_as::<_, CompleteApologyResponse>("/api/complete-apology", &request)
        .await
        .ok()
        .and_then(|response| response.completed);

    match completed {
        Some(completed) => {
            save_to_all_systems(session, &completed);
            Ok(ActionOutput::html(stamped(&completed)))
        }
        None => Ok(ActionOutput::default()),
    }
}

pub async fn guilt_score(
    session: &ClientSession,
    form: GuiltForm,
) -> Result<ActionOutput, ClientError> {
    require(&form.text, "No apology found.")?;

    let feedback = session
        .gateway()
        .post_as::<_, GuiltScoreResponse>(
            "/api/guilt-score",
            &GuiltScoreRequest { text: form.text },
        )
        .await
        .ok()
        .and_then(|response| response.feedback)
        .unwrap_or_else(|| "Error analyzing text".to_string());

    Ok(ActionOutput::alert(format!("🧠 Guilt Level:\n\n{feedback}")))
}

pub async fn screenshot(
    session: &ClientSession,
    kind: ContentKind,
    form: ScreenshotForm,
) -> Result<ActionOutput, ClientError> {
    let theme = form
        .theme
        .filter(|theme| !theme.is_empty())
        .unwrap_or_else(|| session.theme().name().to_string());
    let endpoint = session.screenshot_endpoint(kind);
    let body = serde_json::to_value(ScreenshotRequest { theme })
        .map_err(|err| ClientError::decode(&endpoint, err))?;

    let shot = match session.gateway().call_raw(&endpoint, Some(&body)).await {
        Ok(raw) if raw.status.is_success() && raw.is_image() => Some(Screenshot::Image(raw.body)),
        Ok(raw) if raw.status.is_success() => serde_json::from_slice::<Value>(&raw.body)
            .ok()
            .and_then(|value| value.get("url").and_then(Value::as_str).map(str::to_string))
            .filter(|url| !url.is_empty() && url != "null")
            .map(Screenshot::Url),
        Ok(raw) => {
            warn!("API error ({endpoint}): status {}", raw.status);
            None
        }
        Err(_) => None,
    };

    let Some(shot) = shot else {
        return Ok(ActionOutput::alert(SCREENSHOT_FAILED));
    };
    session.store_screenshot(kind, shot);
    info!(%kind, "screenshot stored");

    Ok(ActionOutput {
        screenshot: Some(ScreenshotLink {
            src: "/ui/screenshot".to_string(),
            download: format!("{kind}_proof.png"),
        }),
        ..ActionOutput::default()
    })
}

pub async fn save_favorite(
    session: &ClientSession,
    kind: ContentKind,
) -> Result<ActionOutput, ClientError> {
    let endpoint = match kind {
        ContentKind::Excuse => "/api/favorite",
        ContentKind::Apology => "/api/apology-favorite",
    };
    let message = session
        .gateway()
        .post_as::<_, MessageResponse>(endpoint, &json!({}))
        .await
        .ok()
        .and_then(|response| response.message);

    Ok(message.map(ActionOutput::alert).unwrap_or_default())
}

pub async fn clear_rankings(
    session: &ClientSession,
    kind: ContentKind,
) -> Result<ActionOutput, ClientError> {
    let endpoint = match kind {
        ContentKind::Excuse => "/api/clear-rankings",
        ContentKind::Apology => "/api/clear-apology-rankings",
    };
    if let Err(err) = session.gateway().post(endpoint, &json!({})).await {
        warn!("clearing rankings failed: {err}");
    }

    let html = session.load_panel(PanelId::rankings(kind)).await;
    Ok(ActionOutput::html(html))
}

pub async fn memory_suggestions(session: &ClientSession, query: &str) -> Vec<String> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let endpoint = format!("/api/memory?q={}", utf8_percent_encode(query, QUERY));
    session
        .gateway()
        .call_as::<MemoryResponse>(&endpoint, None)
        .await
        .map(|response| response.matches)
        .unwrap_or_default()
}

pub fn render_suggestions(matches: &[String]) -> String {
    matches
        .iter()
        .map(|text| format!("<li style=\"cursor:pointer;padding:4px\">{}</li>", escape_html(text)))
        .collect()
}

pub async fn trigger_emergency(
    session: &ClientSession,
    form: EmergencyForm,
) -> Result<ActionOutput, ClientError> {
    if let Err(err) = session
        .gateway()
        .post("/api/emergency", &EmergencyRequest { email: form.email })
        .await
    {
        warn!("emergency trigger failed: {err}");
    }
    Ok(ActionOutput::alert(TRIGGERED))
}

pub async fn schedule_emergency(
    session: &ClientSession,
    form: ScheduleForm,
) -> Result<ActionOutput, ClientError> {
    if form.date.trim().is_empty() || form.time.trim().is_empty() {
        return Err(ClientError::validation("Set date/time"));
    }

    let request = ScheduleRequest {
        date: form.date,
        time: form.time,
        email: form.email,
    };
    let message = session
        .gateway()
        .post_as::<_, MessageResponse>("/api/schedule", &request)
        .await
        .ok()
        .and_then(|response| response.message)
        .unwrap_or_else(|| "❌ Scheduling failed.".to_string());

    Ok(ActionOutput::alert(message))
}

// Records a finished apology in history and as the latest apology.
// Neither call is awaited by the caller.
pub fn save_to_all_systems(session: &ClientSession, text: &str) {
    let gateway = session.gateway().clone();
    let history = SaveHistoryRequest {
        text: text.to_string(),
        time: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    };
    let latest = LatestApologyRequest { text: text.to_string() };

    tokio::spawn(async move {
        let (saved, updated) = tokio::join!(
            gateway.post("/api/save-apology-history", &history),
            gateway.post("/api/update-latest-apology", &latest),
        );
        if let Err(err) = saved.and(updated) {
            warn!("saving apology failed: {err}");
        }
    });
}
