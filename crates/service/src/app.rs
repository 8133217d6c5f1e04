//! Application wiring: every shared object is built here exactly once.

use std::sync::Arc;
use std::time::Duration;

use kotoba_core::constants::AUDIO_SWEEP_DELAY_MS;
use kotoba_core::{AppConfig, ContentKind};
use kotoba_gateway::{CachedGateway, ContentGateway, ListCache, RemoteGateway};
use kotoba_llm::{GenerativeClient, Pronouncer, SpeechClient, StudyGenerator};
use kotoba_storage::{AudioCache, PendingSweep};
use tracing::{info, warn};

use crate::error::ServiceError;
use crate::list_controller::ListController;

pub struct StudyApp<G = RemoteGateway> {
    config: AppConfig,
    gateway: Arc<CachedGateway<G>>,
    generator: Option<StudyGenerator>,
    pronouncer: Option<Pronouncer>,
}

impl StudyApp<RemoteGateway> {
    /// Build the app against the configured GraphQL endpoint.
    ///
    /// AI and speech support are enabled only when configured. An audio cache
    /// that cannot be opened on disk degrades to an in-memory one.
    pub fn from_config(config: AppConfig) -> Result<Self, ServiceError> {
        let remote = RemoteGateway::from_endpoint(config.api_url.clone())?;
        Self::with_gateway(config, remote)
    }
}

impl<G: ContentGateway> StudyApp<G> {
    pub fn with_gateway(config: AppConfig, gateway: G) -> Result<Self, ServiceError> {
        let cache = Arc::new(ListCache::new(config.list_cache_ttl));
        let gateway = Arc::new(CachedGateway::new(gateway, cache));

        let generator = match &config.ai {
            Some(ai) => {
                let client = GenerativeClient::from_config(ai)?;
                info!(model = client.model(), "AI generation enabled");
                Some(StudyGenerator::new(Arc::new(client)))
            },
            None => None,
        };

        let pronouncer = match &config.speech {
            Some(speech) => {
                let client = SpeechClient::from_config(speech)?;
                Some(Pronouncer::new(client, open_audio_cache(&config)?))
            },
            None => None,
        };

        Ok(Self { config, gateway, generator, pronouncer })
    }

    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub const fn gateway(&self) -> &Arc<CachedGateway<G>> {
        &self.gateway
    }

    /// New controller for `kind`, sharing this app's list cache.
    #[must_use]
    pub fn controller(&self, kind: ContentKind) -> ListController<G> {
        ListController::new(kind, Arc::clone(&self.gateway))
    }

    pub fn generator(&self) -> Result<&StudyGenerator, ServiceError> {
        self.generator
            .as_ref()
            .ok_or_else(|| ServiceError::NotConfigured("AI generation (set KOTOBA_AI_KEY)".to_owned()))
    }

    pub fn pronouncer(&self) -> Result<&Pronouncer, ServiceError> {
        self.pronouncer
            .as_ref()
            .ok_or_else(|| ServiceError::NotConfigured("speech (set KOTOBA_SPEECH_URL)".to_owned()))
    }

    /// Schedule the one-off audio cache sweep. Must be called inside a tokio runtime.
    ///
    /// Short-lived callers should [`PendingSweep::finish`] it before exiting.
    #[must_use]
    pub fn spawn_audio_sweep(&self) -> Option<PendingSweep> {
        let cache = self.pronouncer.as_ref()?.cache();
        Some(cache.spawn_startup_sweep(Duration::from_millis(AUDIO_SWEEP_DELAY_MS)))
    }

    /// Sweep the audio cache now, opening it if speech is not configured.
    pub async fn sweep_audio(&self) -> Result<usize, ServiceError> {
        let cache = match &self.pronouncer {
            Some(p) => Arc::clone(p.cache()),
            None => Arc::new(AudioCache::open(&self.config.audio_db_path, self.config.audio_cache_ttl)?),
        };
        Ok(tokio::task::spawn_blocking(move || cache.sweep()).await?)
    }
}

fn open_audio_cache(config: &AppConfig) -> Result<Arc<AudioCache>, ServiceError> {
    match AudioCache::open(&config.audio_db_path, config.audio_cache_ttl) {
        Ok(cache) => Ok(Arc::new(cache)),
        Err(e) => {
            warn!(
                path = %config.audio_db_path.display(),
                "Audio cache unavailable, falling back to memory: {e}"
            );
            let cache = AudioCache::open_in_memory(
                config.audio_cache_ttl,
                Arc::new(kotoba_storage::SystemClock),
            )?;
            Ok(Arc::new(cache))
        },
    }
}
