mod environment;
mod settings;

pub use environment::{Environment, UnknownEnvironment};
pub use settings::{
    AudioSettings, EngineProvider, EngineSettings, LoggingSettings, ServerSettings, Settings,
    WebhookSettings, WorkerSettings,
};
