/// Subscriber options for one of the binaries.
#[derive(Debug, Clone, PartialEq)]
pub struct TracingConfig {
    /// Recorded on the startup event.
    pub service: &'static str,
    pub environment: String,
    pub json_format: bool,
    /// Filter directives used when `RUST_LOG` is unset.
    pub level: Option<String>,
}

impl TracingConfig {
    pub fn server(environment: impl Into<String>, json_format: bool, level: impl Into<String>) -> Self {
        Self {
            service: "verbatim",
            environment: environment.into(),
            json_format,
            level: Some(level.into()),
        }
    }

    /// The client writes results to stdout, so its logs default to warnings.
    /// `LOG_FORMAT=json` switches to structured output.
    pub fn client() -> Self {
        Self {
            service: "verbatim-client",
            environment: std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".to_string()),
            json_format: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            level: Some("warn".to_string()),
        }
    }
}
