pub mod audio;
pub mod job_api;
pub mod observability;
pub mod persistence;
pub mod webhooks;
