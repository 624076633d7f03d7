mod http_job_backend;

pub use http_job_backend::HttpJobBackend;
