use crate::asset_cache::AssetCache;
use crate::session::ClientSession;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ClientSession>,
    pub assets: Arc<AssetCache>,
}

impl AppState {
    pub fn new(session: ClientSession, assets: AssetCache) -> Self {
        Self {
            session: Arc::new(session),
            assets: Arc::new(assets),
        }
    }
}
