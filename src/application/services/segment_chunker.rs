use std::pin::Pin;

use futures::stream::{self, Stream, StreamExt};

use crate::application::ports::{SegmentSource, TranscriptionError};
use crate::domain::{ResultChunk, Segment};

pub type ChunkStream =
    Pin<Box<dyn Stream<Item = Result<ResultChunk, TranscriptionError>> + Send + 'static>>;

/// Groups engine output into transport-sized chunks.
///
/// Live streams are forwarded one segment per chunk as segments arrive.
/// Materialized results are packed into as few chunks as fit under
/// `max_chunk_chars`.
pub fn chunk_segments(source: SegmentSource, max_chunk_chars: usize) -> ChunkStream {
    match source {
        SegmentSource::Lazy(segments) => Box::pin(
            segments.map(|segment| segment.map(|s| ResultChunk::new(vec![s]))),
        ),
        SegmentSource::Eager(segments) => Box::pin(stream::iter(
            SegmentBatches::new(segments.into_iter(), max_chunk_chars).map(Ok),
        )),
    }
}

/// Size-bounded batching over a finite sequence of segments.
///
/// A segment larger than the bound on its own still forms a chunk.
pub struct SegmentBatches<I> {
    segments: I,
    max_chunk_chars: usize,
    group: Vec<Segment>,
    group_chars: usize,
}

impl<I> SegmentBatches<I>
where
    I: Iterator<Item = Segment>,
{
    pub fn new(segments: I, max_chunk_chars: usize) -> Self {
        Self {
            segments,
            max_chunk_chars,
            group: Vec::new(),
            group_chars: 0,
        }
    }
}

impl<I> Iterator for SegmentBatches<I>
where
    I: Iterator<Item = Segment>,
{
    type Item = ResultChunk;

    fn next(&mut self) -> Option<Self::Item> {
        for segment in self.segments.by_ref() {
            let size = segment.serialized_len();

            if !self.group.is_empty() && self.group_chars + size > self.max_chunk_chars {
                let full = std::mem::replace(&mut self.group, vec![segment]);
                self.group_chars = size;
                return Some(ResultChunk::new(full));
            }

            self.group.push(segment);
            self.group_chars += size;
        }

        if self.group.is_empty() {
            return None;
        }

        self.group_chars = 0;
        Some(ResultChunk::new(std::mem::take(&mut self.group)))
    }
}
