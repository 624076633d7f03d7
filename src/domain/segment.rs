use serde::{Deserialize, Serialize};

/// A timestamped span of recognized speech.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub seek: u64,
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default)]
    pub avg_logprob: f64,
    #[serde(default)]
    pub compression_ratio: f64,
    #[serde(default)]
    pub no_speech_prob: f64,
    #[serde(default)]
    pub words: Vec<Word>,
    /// Speaker labels attached by diarization, empty otherwise.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub speakers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub start: f64,
    pub end: f64,
    pub word: String,
    #[serde(default)]
    pub probability: f64,
}

impl Segment {
    pub fn new(id: u64, start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            id,
            seek: 0,
            start,
            end,
            text: text.into(),
            avg_logprob: 0.0,
            compression_ratio: 0.0,
            no_speech_prob: 0.0,
            words: Vec::new(),
            speakers: Vec::new(),
        }
    }

    /// Length in characters of the segment's JSON form, the unit the
    /// stream transport limits are expressed in.
    pub fn serialized_len(&self) -> usize {
        serde_json::to_string(self)
            .map(|json| json.chars().count())
            .unwrap_or(0)
    }
}
