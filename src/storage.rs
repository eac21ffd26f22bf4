use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ThemeState {
    pub dark_mode: bool,
}

impl ThemeState {
    pub fn name(self) -> &'static str {
        if self.dark_mode { "dark" } else { "light" }
    }

    pub fn label(self) -> &'static str {
        if self.dark_mode {
            "🌙 Dark Mode"
        } else {
            "🌞 Light Mode"
        }
    }
}

pub async fn load_theme(path: &Path) -> ThemeState {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(theme) => theme,
            Err(err) => {
                error!("failed to parse theme file: {err}");
                ThemeState::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => ThemeState::default(),
        Err(err) => {
            error!("failed to read theme file: {err}");
            ThemeState::default()
        }
    }
}

pub async fn persist_theme(path: &Path, theme: ThemeState) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(AppError::internal)?;
    }
    let payload = serde_json::to_vec_pretty(&theme).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
