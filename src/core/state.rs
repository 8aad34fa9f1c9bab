use std::sync::Arc;

use sqlx::PgPool;

use crate::core::{config::Settings, redis::RedisHandle};
use crate::services::ai_client::AiServiceClient;
use crate::services::maps::MapsClient;
use crate::services::uploads::UploadStore;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: PgPool,
    redis: RedisHandle,
    ai: AiServiceClient,
    maps: MapsClient,
    uploads: UploadStore,
}

impl AppState {
    pub(crate) fn new(
        settings: Settings,
        db: PgPool,
        redis: RedisHandle,
        ai: AiServiceClient,
        maps: MapsClient,
        uploads: UploadStore,
    ) -> Self {
        Self { inner: Arc::new(InnerState { settings, db, redis, ai, maps, uploads }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub(crate) fn redis(&self) -> &RedisHandle {
        &self.inner.redis
    }

    pub(crate) fn ai(&self) -> &AiServiceClient {
        &self.inner.ai
    }

    pub(crate) fn maps(&self) -> &MapsClient {
        &self.inner.maps
    }

    pub(crate) fn uploads(&self) -> &UploadStore {
        &self.inner.uploads
    }
}
