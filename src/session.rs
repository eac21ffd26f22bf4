use crate::config::{ClientConfig, ScreenshotPath};
use crate::errors::AppError;
use crate::gateway::Gateway;
use crate::models::{items_from_value, ContentKind, Item};
use crate::panels::{PanelController, PanelId, PanelPhase, Transition};
use crate::render::{render, render_ranked, Template};
use crate::storage::{persist_theme, ThemeState};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

pub const LOAD_FAILED: &str = "<li class=\"error\" style=\"text-align:center;color:#b00\">❌ Could not load items.</li>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screenshot {
    Url(String),
    Image(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct StoredScreenshot {
    pub kind: ContentKind,
    pub shot: Screenshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleOutcome {
    Opened,
    Closed,
    Ignored,
}

#[derive(Debug, Clone, Serialize)]
pub struct PanelToggle {
    pub panel: PanelId,
    pub outcome: ToggleOutcome,
    pub open: Option<PanelId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

pub struct ClientSession {
    gateway: Gateway,
    reveal: Duration,
    theme_path: PathBuf,
    screenshot_path: ScreenshotPath,
    panels: Mutex<PanelController>,
    theme: Mutex<ThemeState>,
    rankings: Mutex<HashMap<PanelId, Vec<String>>>,
    screenshot: Mutex<Option<StoredScreenshot>>,
    busy: Mutex<HashSet<&'static str>>,
}

impl ClientSession {
    pub fn new(config: &ClientConfig, theme: ThemeState) -> Self {
        Self::with_gateway(config, Gateway::new(config.api_base.clone()), theme)
    }

    pub fn with_gateway(config: &ClientConfig, gateway: Gateway, theme: ThemeState) -> Self {
        Self {
            gateway,
            reveal: config.reveal,
            theme_path: config.theme_path.clone(),
            screenshot_path: config.screenshot_path,
            panels: Mutex::new(PanelController::default()),
            theme: Mutex::new(theme),
            rankings: Mutex::new(HashMap::new()),
            screenshot: Mutex::new(None),
            busy: Mutex::new(HashSet::new()),
        }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn screenshot_endpoint(&self, kind: ContentKind) -> String {
        self.screenshot_path.endpoint(kind)
    }

    pub fn panel_phase(&self, id: PanelId) -> PanelPhase {
        lock(&self.panels).phase(id)
    }

    pub fn open_panel(&self) -> Option<PanelId> {
        lock(&self.panels).open_panel()
    }

    // Runs one panel toggle end to end. The transition settles when the
    // reveal timer fires, independent of the loader; the loader's markup is
    // returned once it arrives. A toggle that arrives while another
    // transition is running is ignored.
    pub async fn toggle_panel(&self, id: PanelId) -> PanelToggle {
        let started = lock(&self.panels).begin(id);
        let Some(transition) = started else {
            debug!(panel = ?id, "toggle ignored, transition in flight");
            return PanelToggle {
                panel: id,
                outcome: ToggleOutcome::Ignored,
                open: self.open_panel(),
                html: None,
            };
        };
        let revealing = matches!(transition, Transition::Reveal { .. });
        let guard = TransitionGuard {
            panels: &self.panels,
            transition,
        };

        let load = async {
            if revealing {
                Some(self.load_panel(id).await)
            } else {
                None
            }
        };
        let settle = async move {
            sleep(self.reveal).await;
            drop(guard);
        };
        let (html, ()) = tokio::join!(load, settle);

        let outcome = if html.is_some() {
            ToggleOutcome::Opened
        } else {
            ToggleOutcome::Closed
        };
        info!(panel = ?id, ?outcome, "panel toggled");

        PanelToggle {
            panel: id,
            outcome,
            open: self.open_panel(),
            html,
        }
    }

    pub async fn load_panel(&self, id: PanelId) -> String {
        let spec = id.spec();
        match self.fetch_items(spec.endpoint).await {
            Some(items) if spec.template == Template::Ranked => self.render_ranking(id, &items),
            Some(items) => render(&items, spec.template),
            None => LOAD_FAILED.to_string(),
        }
    }

    async fn fetch_items(&self, endpoint: &str) -> Option<Vec<Item>> {
        let value = self.gateway.get(endpoint).await.ok()?;
        match items_from_value(value) {
            Ok(items) => Some(items),
            Err(err) => {
                warn!("API error ({endpoint}): list has unexpected shape: {err}");
                None
            }
        }
    }

    fn render_ranking(&self, id: PanelId, items: &[Item]) -> String {
        let mut rankings = lock(&self.rankings);
        let html = render_ranked(items, rankings.get(&id).map(Vec::as_slice));
        rankings.insert(id, items.iter().map(|item| item.text.clone()).collect());
        html
    }

    pub fn ranking_snapshot(&self, id: PanelId) -> Option<Vec<String>> {
        lock(&self.rankings).get(&id).cloned()
    }

    pub fn theme(&self) -> ThemeState {
        *lock(&self.theme)
    }

    pub async fn set_theme(&self, dark_mode: bool) -> Result<ThemeState, AppError> {
        let theme = ThemeState { dark_mode };
        persist_theme(&self.theme_path, theme).await?;
        *lock(&self.theme) = theme;
        info!(theme = theme.name(), "theme changed");
        Ok(theme)
    }

    pub fn screenshot(&self) -> Option<StoredScreenshot> {
        lock(&self.screenshot).clone()
    }

    pub fn store_screenshot(&self, kind: ContentKind, shot: Screenshot) {
        *lock(&self.screenshot) = Some(StoredScreenshot { kind, shot });
    }

    pub fn begin_action(&self, action: &'static str) -> Option<ActionGuard<'_>> {
        if !lock(&self.busy).insert(action) {
            debug!(action, "action already in flight");
            return None;
        }
        Some(ActionGuard {
            busy: &self.busy,
            action,
        })
    }

    pub fn is_busy(&self, action: &str) -> bool {
        lock(&self.busy).contains(action)
    }
}

pub struct ActionGuard<'a> {
    busy: &'a Mutex<HashSet<&'static str>>,
    action: &'static str,
}

impl Drop for ActionGuard<'_> {
    fn drop(&mut self) {
        lock(self.busy).remove(self.action);
    }
}

struct TransitionGuard<'a> {
    panels: &'a Mutex<PanelController>,
    transition: Transition,
}

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        lock(self.panels).finish(&self.transition);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
