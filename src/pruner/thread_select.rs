//! Choosing which thread(s) represent the main line of execution.

use crate::parser::schema::{ThreadId, TraceEvent};
use crate::utils::config::AUTO_THREADS_TOKEN;
use crate::utils::error::{ConfigError, TraceError};
use indexmap::IndexMap;
use log::info;
use std::collections::HashSet;
use std::str::FromStr;

/// How the threads to keep are chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadSelection {
    /// Keep the thread with the most scoped events
    Auto,

    /// Keep exactly these threads
    Explicit(Vec<ThreadId>),
}

impl FromStr for ThreadSelection {
    type Err = ConfigError;

    /// Parse `auto` or a comma-separated list of integer thread ids
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(AUTO_THREADS_TOKEN) {
            return Ok(ThreadSelection::Auto);
        }

        let ids = s
            .split(',')
            .map(|item| item.trim().parse::<i64>().map(ThreadId::Int))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ConfigError::InvalidThreadList(s.to_string()))?;

        Ok(ThreadSelection::Explicit(ids))
    }
}

/// Infer the main thread from scoped-event frequency
///
/// **Public** - used by `select_threads` in auto mode
///
/// # Returns
/// The winning thread id and its scoped-event count
///
/// # Tie-break
/// On equal counts the thread whose first scoped event appears earliest
/// in the event list wins, so repeated runs agree.
///
/// # Errors
/// * `TraceError::EmptyTrace` - No scoped events to count
pub fn infer_main_thread(
    events: &[TraceEvent],
    scoped_category: &str,
) -> Result<(ThreadId, usize), TraceError> {
    // Insertion order doubles as first-seen order
    let mut counts: IndexMap<&ThreadId, usize> = IndexMap::new();

    for event in events.iter().filter(|e| e.is_scoped(scoped_category)) {
        if let Some(tid) = event.thread_id() {
            *counts.entry(tid).or_insert(0) += 1;
        }
    }

    let mut best: Option<(&ThreadId, usize)> = None;
    for (tid, count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((tid, count));
        }
    }

    best.map(|(tid, count)| (tid.clone(), count))
        .ok_or_else(|| TraceError::EmptyTrace {
            category: scoped_category.to_string(),
        })
}

/// Resolve a selection into the set of thread ids to keep
///
/// **Public** - main entry point for thread selection
pub fn select_threads(
    events: &[TraceEvent],
    selection: &ThreadSelection,
    scoped_category: &str,
) -> Result<HashSet<ThreadId>, TraceError> {
    match selection {
        ThreadSelection::Auto => {
            let (main_tid, count) = infer_main_thread(events, scoped_category)?;
            info!(
                "Using main tid {} as the main thread ({} `{}` events)",
                main_tid, count, scoped_category
            );
            Ok(HashSet::from([main_tid]))
        }
        ThreadSelection::Explicit(ids) => Ok(ids.iter().cloned().collect()),
    }
}
