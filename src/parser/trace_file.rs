//! Loading trace documents from disk.
//!
//! The document is parsed in two passes: once into top-level members as
//! raw JSON, then the event list into individual raw events. Only the
//! event list is ever re-serialized.

use super::schema::{TraceDocument, TraceEvent};
use crate::utils::config::TraceConventions;
use crate::utils::error::TraceError;
use indexmap::IndexMap;
use log::debug;
use serde_json::value::RawValue;
use std::path::Path;

/// Load a trace document from a JSON file
///
/// **Public** - main entry point of the trace store
///
/// # Errors
/// * `TraceError::Io` - File cannot be read
/// * `TraceError::Json` / `TraceError::Format` - See `parse_trace_bytes`
pub fn load_trace(
    path: impl AsRef<Path>,
    conventions: &TraceConventions,
) -> Result<TraceDocument, TraceError> {
    let path = path.as_ref();
    debug!("Reading trace from: {}", path.display());

    let bytes = std::fs::read(path).map_err(|e| TraceError::io(path, e))?;
    let doc = parse_trace_bytes(&bytes, conventions)?;

    debug!(
        "Loaded {} events ({} bytes) from {}",
        doc.events.len(),
        bytes.len(),
        path.display()
    );
    Ok(doc)
}

/// Parse a trace document from in-memory JSON
///
/// **Public** - used by `load_trace` and tests
///
/// # Errors
/// * `TraceError::Json` - Bytes are not JSON, or the top level is not an object
/// * `TraceError::Format` - Event list missing or not an array, or a scoped
///   event lacks its thread id or start timestamp
pub fn parse_trace_bytes(
    bytes: &[u8],
    conventions: &TraceConventions,
) -> Result<TraceDocument, TraceError> {
    let mut members: IndexMap<String, Box<RawValue>> = serde_json::from_slice(bytes)?;

    let key = conventions.events_key.as_str();
    let (events_index, _, raw_events) = members
        .shift_remove_full(key)
        .ok_or_else(|| TraceError::Format(format!("missing `{}` event list", key)))?;

    let raw_list: Vec<Box<RawValue>> = serde_json::from_str(raw_events.get())
        .map_err(|_| TraceError::Format(format!("`{}` is not an array", key)))?;

    let events = parse_events(raw_list, &conventions.scoped_category)?;

    Ok(TraceDocument::new(members, key, events_index, events))
}

/// Build typed events, checking the fields scoped events depend on
///
/// **Private** - internal helper for parse_trace_bytes
fn parse_events(
    raw_list: Vec<Box<RawValue>>,
    scoped_category: &str,
) -> Result<Vec<TraceEvent>, TraceError> {
    let mut events = Vec::with_capacity(raw_list.len());

    for (index, raw) in raw_list.into_iter().enumerate() {
        let event = TraceEvent::from_raw(raw)?;

        if event.is_scoped(scoped_category) {
            if event.thread_id().is_none() {
                return Err(TraceError::Format(format!(
                    "`{}` event #{} has no thread id",
                    scoped_category, index
                )));
            }
            if event.start_time().is_none() {
                return Err(TraceError::Format(format!(
                    "`{}` event #{} has no start timestamp",
                    scoped_category, index
                )));
            }
        }

        events.push(event);
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::ThreadId;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(text: &str) -> Result<TraceDocument, TraceError> {
        parse_trace_bytes(text.as_bytes(), &TraceConventions::default())
    }

    #[test]
    fn test_parse_minimal_document() {
        let doc = parse(
            r#"{"schemaVersion": 1, "traceEvents": [
                {"ph": "X", "cat": "python_function", "tid": 7, "ts": 1, "dur": 2},
                {"ph": "M", "name": "process_name", "args": {"name": "python"}}
            ], "displayTimeUnit": "ms"}"#,
        )
        .unwrap();

        assert_eq!(doc.events.len(), 2);
        assert_eq!(doc.events[0].thread_id(), Some(&ThreadId::Int(7)));
        assert_eq!(doc.keys(), vec!["schemaVersion", "traceEvents", "displayTimeUnit"]);
        assert_eq!(doc.member("displayTimeUnit").unwrap().get(), "\"ms\"");
    }

    #[test]
    fn test_invalid_json_is_format_error() {
        let err = parse(r#"{"traceEvents": [}"#).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_top_level_array_is_format_error() {
        let err = parse("[]").unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_missing_event_list() {
        let err = parse(r#"{"deviceProperties": []}"#).unwrap_err();
        assert!(matches!(err, TraceError::Format(msg) if msg.contains("traceEvents")));
    }

    #[test]
    fn test_event_list_must_be_array() {
        let err = parse(r#"{"traceEvents": {"a": 1}}"#).unwrap_err();
        assert!(matches!(err, TraceError::Format(msg) if msg.contains("not an array")));
    }

    #[test]
    fn test_scoped_event_requires_tid() {
        let err = parse(r#"{"traceEvents": [{"cat": "python_function", "ts": 1}]}"#).unwrap_err();
        assert!(matches!(err, TraceError::Format(msg) if msg.contains("thread id")));
    }

    #[test]
    fn test_scoped_event_requires_ts() {
        let err = parse(r#"{"traceEvents": [{"cat": "python_function", "tid": 1}]}"#).unwrap_err();
        assert!(matches!(err, TraceError::Format(msg) if msg.contains("start timestamp")));
    }

    #[test]
    fn test_other_events_need_no_fields() {
        let doc = parse(r#"{"traceEvents": [{"cat": "kernel"}, 3, "x"]}"#).unwrap();
        assert_eq!(doc.events.len(), 3);
    }

    #[test]
    fn test_custom_events_key() {
        let conventions = TraceConventions {
            events_key: "events".to_string(),
            ..Default::default()
        };
        let doc = parse_trace_bytes(br#"{"events": [{"ts": 1}]}"#, &conventions).unwrap();
        assert_eq!(doc.events_key(), "events");
        assert_eq!(doc.events.len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_trace(dir.path().join("absent.json"), &TraceConventions::default())
            .unwrap_err();
        assert!(matches!(err, TraceError::Io { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"traceEvents": [{{"ph": "i", "ts": 3}}]}}"#).unwrap();

        let doc = load_trace(file.path(), &TraceConventions::default()).unwrap();
        assert_eq!(doc.events.len(), 1);
    }
}
