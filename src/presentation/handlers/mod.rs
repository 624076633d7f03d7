mod cancel;
mod error_response;
mod health;
mod run;
mod status;
mod stream;

pub use cancel::cancel_handler;
pub use error_response::ErrorResponse;
pub use health::health_handler;
pub use run::{RunRequest, RunResponse, run_handler};
pub use status::status_handler;
pub use stream::stream_handler;
