pub mod actions;
pub mod app;
pub mod asset_cache;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod handlers;
pub mod models;
pub mod panels;
pub mod render;
pub mod session;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::ClientConfig;
pub use session::ClientSession;
pub use state::AppState;
pub use storage::load_theme;
