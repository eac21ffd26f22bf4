use crate::models::ContentKind;
use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_API_BASE: &str = "https://intelligent-excuse-generator-xqx0.onrender.com";
pub const DEFAULT_REVEAL: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenshotPath {
    Dash,
    Slash,
}

impl ScreenshotPath {
    pub fn endpoint(self, kind: ContentKind) -> String {
        match self {
            Self::Dash => format!("/api/screenshot-{kind}"),
            Self::Slash => format!("/api/screenshot/{kind}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: String,
    pub asset_origin: String,
    pub port: u16,
    pub theme_path: PathBuf,
    pub reveal: Duration,
    pub screenshot_path: ScreenshotPath,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            asset_origin: DEFAULT_API_BASE.to_string(),
            port: 8080,
            theme_path: PathBuf::from("data/theme.json"),
            reveal: DEFAULT_REVEAL,
            screenshot_path: ScreenshotPath::Dash,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_base = lookup("API_BASE")
            .map(|value| trim_base(&value))
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.api_base);
        let asset_origin = lookup("ASSET_ORIGIN")
            .map(|value| trim_base(&value))
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| api_base.clone());
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(defaults.port);
        let theme_path = lookup("APP_THEME_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.theme_path);
        let reveal = lookup("REVEAL_MS")
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.reveal);
        let screenshot_path = match lookup("SCREENSHOT_PATH_STYLE").as_deref() {
            Some("slash") => ScreenshotPath::Slash,
            _ => ScreenshotPath::Dash,
        };

        Self {
            api_base,
            asset_origin,
            port,
            theme_path,
            reveal,
            screenshot_path,
        }
    }
}

fn trim_base(value: &str) -> String {
    value.trim().trim_end_matches('/').to_string()
}
