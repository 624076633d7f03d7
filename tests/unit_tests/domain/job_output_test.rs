use serde_json::json;

use verbatim::domain::{JobOutput, ResultChunk, Segment};

#[test]
fn given_error_json_when_deserializing_then_is_error_variant() {
    let output: JobOutput = serde_json::from_value(json!({ "error": "boom" })).unwrap();
    assert_eq!(output, JobOutput::error("boom"));
    assert_eq!(output.error_message(), Some("boom"));
}

#[test]
fn given_segment_array_when_deserializing_then_is_chunk_variant() {
    let output: JobOutput =
        serde_json::from_value(json!([{ "start": 0.0, "end": 1.5, "text": "hi" }])).unwrap();

    let JobOutput::Chunk(chunk) = output else {
        panic!("expected chunk");
    };
    assert_eq!(chunk.segments()[0].text, "hi");
    assert_eq!(chunk.segments()[0].end, 1.5);
}

#[test]
fn given_aggregate_when_serialized_then_wraps_chunks_in_result() {
    let output = JobOutput::Aggregate {
        result: vec![ResultChunk::new(vec![Segment::new(0, 0.0, 1.0, "hello")])],
    };

    let value = serde_json::to_value(&output).unwrap();

    assert_eq!(value["result"][0][0]["text"], "hello");
    assert!(!output.is_error());
}
