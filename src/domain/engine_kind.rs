use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Speech-recognition backend a job is routed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineKind {
    #[default]
    #[serde(rename = "faster-whisper")]
    FasterWhisper,
    #[serde(rename = "stable-whisper")]
    StableWhisper,
}

impl EngineKind {
    pub const ALL: [EngineKind; 2] = [EngineKind::FasterWhisper, EngineKind::StableWhisper];

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::FasterWhisper => "faster-whisper",
            EngineKind::StableWhisper => "stable-whisper",
        }
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "faster-whisper" => Ok(EngineKind::FasterWhisper),
            "stable-whisper" => Ok(EngineKind::StableWhisper),
            _ => Err(format!("Invalid engine: {}", s)),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
