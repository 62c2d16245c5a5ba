//! In-memory model of a Chrome trace-event document.
//!
//! Events keep their original JSON text so that anything we do not
//! interpret is written back exactly as it was read. The handful of
//! fields the pipeline needs are extracted once into a typed view.

use crate::utils::config::{CATEGORY_FIELD, DURATION_FIELD, NAME_FIELD, START_FIELD, THREAD_FIELD};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::value::RawValue;
use serde_json::Value;
use std::fmt;

/// Identifier of the thread or stream that recorded an event
///
/// Profilers emit integers for OS threads and sometimes strings for
/// synthetic lanes, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ThreadId {
    Int(i64),
    Str(String),
}

impl ThreadId {
    /// Extract a thread id from a JSON value
    ///
    /// Integral floats such as `7.0` are the same thread as `7`. Other
    /// numbers that do not fit an `i64` are kept as their JSON text.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(
                match n.as_i64().or_else(|| n.as_f64().and_then(integral_f64)) {
                    Some(i) => ThreadId::Int(i),
                    None => ThreadId::Str(n.to_string()),
                },
            ),
            Value::String(s) => Some(ThreadId::Str(s.clone())),
            _ => None,
        }
    }
}

/// **Private** - exact `i64` value of an integral float, if any
fn integral_f64(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.is_finite() && f.fract() == 0.0 && in_range).then(|| f as i64)
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadId::Int(i) => write!(f, "{}", i),
            ThreadId::Str(s) => f.write_str(s),
        }
    }
}

/// A single trace event
///
/// **Public** - the unit every pipeline stage works on
///
/// The typed fields are a read-only view over `raw`. Serializing the
/// event writes `raw` verbatim.
#[derive(Debug, Clone)]
pub struct TraceEvent {
    raw: Box<RawValue>,
    category: Option<String>,
    thread_id: Option<ThreadId>,
    name: Option<String>,
    start_time: Option<f64>,
    duration: Option<f64>,
}

impl TraceEvent {
    /// Build an event from its raw JSON text
    ///
    /// Fields with an unexpected JSON type are treated as absent, and
    /// non-object events get an empty view.
    pub fn from_raw(raw: Box<RawValue>) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(raw.get())?;

        let field = |key: &str| value.get(key);
        let string_field = |key: &str| field(key).and_then(Value::as_str).map(str::to_string);

        Ok(Self {
            category: string_field(CATEGORY_FIELD),
            thread_id: field(THREAD_FIELD).and_then(ThreadId::from_json),
            name: string_field(NAME_FIELD),
            start_time: field(START_FIELD).and_then(Value::as_f64),
            duration: field(DURATION_FIELD).and_then(Value::as_f64),
            raw,
        })
    }

    /// Build an event from a JSON value (handy for tests and tooling)
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        let raw = RawValue::from_string(serde_json::to_string(value)?)?;
        Self::from_raw(raw)
    }

    /// Original JSON text of the event
    pub fn raw(&self) -> &RawValue {
        &self.raw
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn thread_id(&self) -> Option<&ThreadId> {
        self.thread_id.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    /// Span length; `None` marks an instantaneous event
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// End timestamp, treating a missing duration as zero-width
    pub fn end_time(&self) -> Option<f64> {
        self.start_time
            .map(|start| start + self.duration.unwrap_or(0.0))
    }

    /// Whether this event belongs to the given scoped category
    pub fn is_scoped(&self, scoped_category: &str) -> bool {
        self.category.as_deref() == Some(scoped_category)
    }
}

impl Serialize for TraceEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// A whole trace document
///
/// **Public** - produced by `load_trace`, consumed by `write_trace`
///
/// Holds every top-level member except the event list as raw JSON, in
/// file order, plus the position the event list occupied.
#[derive(Debug, Clone)]
pub struct TraceDocument {
    members: IndexMap<String, Box<RawValue>>,
    events_key: String,
    events_index: usize,

    /// The event list, replaced wholesale by each pipeline stage
    pub events: Vec<TraceEvent>,
}

impl TraceDocument {
    /// Assemble a document from its pass-through members and event list
    ///
    /// `events_index` is clamped to the member count.
    pub fn new(
        members: IndexMap<String, Box<RawValue>>,
        events_key: impl Into<String>,
        events_index: usize,
        events: Vec<TraceEvent>,
    ) -> Self {
        let events_index = events_index.min(members.len());
        Self {
            members,
            events_key: events_key.into(),
            events_index,
            events,
        }
    }

    pub fn events_key(&self) -> &str {
        &self.events_key
    }

    /// Raw text of a pass-through top-level member
    #[cfg(test)]
    pub fn member(&self, key: &str) -> Option<&RawValue> {
        self.members.get(key).map(|raw| raw.as_ref())
    }

    /// Top-level keys in file order, including the event list
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.members.keys().map(String::as_str).collect();
        keys.insert(self.events_index, &self.events_key);
        keys
    }
}

impl Serialize for TraceDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.members.len() + 1))?;

        for (index, (key, raw)) in self.members.iter().enumerate() {
            if index == self.events_index {
                map.serialize_entry(&self.events_key, &self.events)?;
            }
            map.serialize_entry(key, raw)?;
        }

        if self.events_index == self.members.len() {
            map.serialize_entry(&self.events_key, &self.events)?;
        }

        map.end()
    }
}
