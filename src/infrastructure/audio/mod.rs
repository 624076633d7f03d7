mod http_audio_resolver;
mod model_loader_factory;
mod remote_whisper_engine;
mod scripted_engine;

pub use http_audio_resolver::HttpAudioResolver;
pub use model_loader_factory::ModelLoaderFactory;
pub use remote_whisper_engine::{EngineEndpoints, RemoteModelLoader, RemoteWhisperModel};
pub use scripted_engine::{ScriptedModel, ScriptedModelLoader};
