use std::sync::Arc;

use crate::application::ports::ModelLoader;
use crate::presentation::config::{EngineProvider, EngineSettings};

use super::remote_whisper_engine::{EngineEndpoints, RemoteModelLoader};
use super::scripted_engine::ScriptedModelLoader;

pub struct ModelLoaderFactory;

impl ModelLoaderFactory {
    pub fn create(settings: &EngineSettings, client: reqwest::Client) -> Arc<dyn ModelLoader> {
        match settings.provider {
            EngineProvider::Remote => {
                let endpoints = EngineEndpoints {
                    faster_whisper: settings.faster_whisper_url.clone(),
                    stable_whisper: settings.stable_whisper_url.clone(),
                };
                Arc::new(RemoteModelLoader::new(
                    client,
                    endpoints,
                    settings.api_key.clone(),
                ))
            }
            EngineProvider::Mock => {
                tracing::warn!("Using scripted speech models; audio will not be transcribed");
                Arc::new(ScriptedModelLoader::default())
            }
        }
    }
}
