use std::sync::Arc;

use tokio::sync::{Mutex, TryLockError};

use crate::application::ports::{ModelLoader, SpeechModel, TranscriptionError};
use crate::domain::EngineKind;

/// A loaded model together with the identity it was loaded for.
pub struct ModelHandle {
    engine: EngineKind,
    model: String,
    instance: Arc<dyn SpeechModel>,
}

impl ModelHandle {
    pub fn engine(&self) -> EngineKind {
        self.engine
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn instance(&self) -> &Arc<dyn SpeechModel> {
        &self.instance
    }

    fn matches(&self, engine: EngineKind, model: &str) -> bool {
        self.engine == engine && self.model == model
    }
}

/// Single-slot cache of the currently loaded model.
///
/// The slot is locked for the whole check-load-swap sequence, so two jobs
/// never load into it at the same time. A load that fails leaves the
/// previous model in place.
pub struct ModelCache {
    loader: Arc<dyn ModelLoader>,
    current: Mutex<Option<Arc<ModelHandle>>>,
}

impl ModelCache {
    pub fn new(loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            loader,
            current: Mutex::new(None),
        }
    }

    pub async fn get_or_load(
        &self,
        engine: EngineKind,
        model: &str,
    ) -> Result<Arc<ModelHandle>, TranscriptionError> {
        let mut slot = self.current.lock().await;

        if let Some(handle) = slot.as_ref().filter(|h| h.matches(engine, model)) {
            tracing::info!(engine = %engine, model = model, "Reusing existing model");
            return Ok(Arc::clone(handle));
        }

        tracing::info!(engine = %engine, model = model, "Loading new model");
        let instance = self.loader.load(engine, model).await.map_err(|e| {
            tracing::error!(engine = %engine, model = model, error = %e, "Model load failed");
            e
        })?;

        let handle = Arc::new(ModelHandle {
            engine,
            model: model.to_string(),
            instance,
        });

        if let Some(previous) = slot.replace(Arc::clone(&handle)) {
            tracing::debug!(
                engine = %previous.engine,
                model = %previous.model,
                "Released previous model"
            );
        }

        Ok(handle)
    }

    /// Identity of the cached model, if any.
    pub async fn current(&self) -> Option<(EngineKind, String)> {
        self.current
            .lock()
            .await
            .as_ref()
            .map(|h| (h.engine, h.model.clone()))
    }

    /// Like [`ModelCache::current`] but fails instead of waiting while a
    /// load holds the slot.
    pub fn try_current(&self) -> Result<Option<(EngineKind, String)>, TryLockError> {
        Ok(self
            .current
            .try_lock()?
            .as_ref()
            .map(|h| (h.engine, h.model.clone())))
    }
}
