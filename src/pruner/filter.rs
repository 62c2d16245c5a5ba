//! Dropping scoped events recorded on unwanted threads.

use crate::parser::schema::{ThreadId, TraceEvent};
use log::debug;
use std::collections::HashSet;

/// Keep non-scoped events, and scoped events on a kept thread
///
/// **Public** - stable single pass; input order is preserved
pub fn filter_threads(
    events: Vec<TraceEvent>,
    keep: &HashSet<ThreadId>,
    scoped_category: &str,
) -> Vec<TraceEvent> {
    let before = events.len();

    let remained: Vec<TraceEvent> = events
        .into_iter()
        .filter(|event| {
            !event.is_scoped(scoped_category)
                || event.thread_id().map_or(false, |tid| keep.contains(tid))
        })
        .collect();

    debug!(
        "Thread filter kept {} of {} events",
        remained.len(),
        before
    );
    remained
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pruner::ThreadSelection;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const SCOPED: &str = "python_function";

    fn names(events: &[TraceEvent]) -> Vec<&str> {
        events.iter().filter_map(TraceEvent::name).collect()
    }

    fn event(name: &str, cat: &str, tid: i64) -> TraceEvent {
        TraceEvent::from_value(&json!({"name": name, "cat": cat, "tid": tid, "ts": 0})).unwrap()
    }

    #[test]
    fn test_filter_is_keep_set_exact_for_scoped_events() {
        let events = vec![
            event("a", SCOPED, 1),
            event("b", SCOPED, 2),
            event("c", SCOPED, 3),
            event("d", SCOPED, 1),
        ];
        let keep = HashSet::from([ThreadId::Int(1), ThreadId::Int(3)]);

        assert_eq!(names(&filter_threads(events, &keep, SCOPED)), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_filter_preserves_other_events_in_order() {
        let events = vec![
            event("k1", "kernel", 7),
            event("drop", SCOPED, 2),
            event("meta", "", 2),
            event("keep", SCOPED, 1),
            event("k2", "cuda_runtime", 2),
        ];
        let keep = HashSet::from([ThreadId::Int(1)]);

        assert_eq!(
            names(&filter_threads(events, &keep, SCOPED)),
            vec!["k1", "meta", "keep", "k2"]
        );
    }

    #[test]
    fn test_float_thread_id_matches_integer_selection() {
        let events = vec![
            TraceEvent::from_value(&json!({"name": "f", "cat": SCOPED, "tid": 7.0, "ts": 0})).unwrap(),
            event("other", SCOPED, 8),
        ];
        let keep = match "7".parse::<ThreadSelection>().unwrap() {
            ThreadSelection::Explicit(ids) => ids.into_iter().collect::<HashSet<_>>(),
            ThreadSelection::Auto => unreachable!(),
        };

        assert_eq!(names(&filter_threads(events, &keep, SCOPED)), vec!["f"]);
    }

    #[test]
    fn test_filter_empty_keep_set_drops_all_scoped() {
        let events = vec![event("a", SCOPED, 1), event("k", "kernel", 1)];
        assert_eq!(
            names(&filter_threads(events, &HashSet::new(), SCOPED)),
            vec!["k"]
        );
    }
}
