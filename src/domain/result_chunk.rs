use serde::{Deserialize, Serialize};

use super::Segment;

/// One stream unit: an ordered batch of segments sent together.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultChunk(Vec<Segment>);

impl ResultChunk {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.0
    }

    pub fn serialized_len(&self) -> usize {
        self.0.iter().map(Segment::serialized_len).sum()
    }
}

/// Plain-text transcript: every segment's text in emission order,
/// space-joined and trimmed.
pub fn transcript_text<'a, I>(chunks: I) -> String
where
    I: IntoIterator<Item = &'a ResultChunk>,
{
    let texts: Vec<&str> = chunks
        .into_iter()
        .flat_map(|chunk| chunk.segments().iter().map(|s| s.text.as_str()))
        .collect();
    texts.join(" ").trim().to_string()
}
