//! Call-stack depth trimming.
//!
//! Scoped events carry no parent pointers; nesting is implied by
//! `[ts, ts + dur)` interval containment. Sorting the spans by
//! `(start, end)` gives an approximate pre-order walk, and an explicit
//! stack of open frames yields each span's depth without building a tree.
//!
//! Example: with `max_depth = 2`
//! ```text
//! forward          [0, 100)   depth 1  kept
//!   linear         [10, 90)   depth 2  kept
//!     addmm        [20, 30)   depth 3  dropped
//!     LaunchKernel [40, 50)   depth 3  kept (kernel marker)
//! ```

use crate::parser::schema::TraceEvent;
use crate::utils::config::TraceConventions;
use crate::utils::error::TraceError;
use log::{debug, warn};

/// Counters describing one trimming pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrimStats {
    /// Scoped events examined
    pub scoped: usize,

    /// Kept because they sit within `max_depth`
    pub kept_by_depth: usize,

    /// Kept only because they are instantaneous or kernel launches
    pub kept_by_exemption: usize,

    /// Scoped events removed
    pub dropped: usize,

    /// Deepest nesting seen
    pub deepest: usize,

    /// Spans that start inside their parent but end after it
    pub crossing_spans: usize,

    /// Spans sharing a start with a shorter span, which the sort pushed
    /// first; the pair nests, but with depths swapped
    pub equal_start_inversions: usize,
}

/// Result of `trim_frames`
#[derive(Debug)]
pub struct TrimOutcome {
    pub events: Vec<TraceEvent>,
    pub stats: TrimStats,
}

/// An open frame on the reconstruction stack
#[derive(Debug, Clone, Copy)]
struct Frame {
    start: f64,
    end: f64,
}

/// Why a scoped event survives, if it does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Retention {
    Depth,
    Exempt,
    Drop,
}

/// Drop scoped frames nested deeper than `max_depth`
///
/// **Public** - main entry point for stack trimming
///
/// # Arguments
/// * `events` - Thread-filtered event list
/// * `max_depth` - Deepest nesting level to keep (1 = top-level calls only);
///   0 disables trimming
/// * `conventions` - Scoped category and kernel-launch marker
///
/// # Returns
/// Kept events in their original relative order, plus counters
///
/// # Errors
/// * `TraceError::Format` - A scoped event has no start timestamp
///
/// # Algorithm
/// 1. Stable-sort scoped events by `(start, start + duration)`
/// 2. Before pushing each event, pop every frame that ended at or before
///    its start
/// 3. Stack length after the push is the event's depth
/// 4. Keep it if within depth, instantaneous, or a kernel launch
///
/// Overlapping spans that are not properly nested are counted in
/// `TrimStats::crossing_spans` and logged; their depth is whatever the
/// stack says. A longer span starting together with a shorter one lands
/// beneath it; that is counted in `TrimStats::equal_start_inversions`.
pub fn trim_frames(
    events: Vec<TraceEvent>,
    max_depth: usize,
    conventions: &TraceConventions,
) -> Result<TrimOutcome, TraceError> {
    let mut stats = TrimStats::default();

    if max_depth == 0 {
        return Ok(TrimOutcome { events, stats });
    }

    let scoped_category = conventions.scoped_category.as_str();

    // (input index, start, end) for every scoped event
    let mut order = Vec::new();
    for (index, event) in events.iter().enumerate() {
        if !event.is_scoped(scoped_category) {
            continue;
        }
        let (start, end) = event
            .start_time()
            .zip(event.end_time())
            .ok_or_else(|| {
                TraceError::Format(format!(
                    "`{}` event #{} has no start timestamp",
                    scoped_category, index
                ))
            })?;
        order.push((index, start, end));
    }

    order.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.2.total_cmp(&b.2)));

    let mut keep = vec![true; events.len()];
    let mut stack: Vec<Frame> = Vec::new();

    for &(index, start, end) in &order {
        while stack.last().map_or(false, |top| top.end <= start) {
            stack.pop();
        }

        if let Some(parent) = stack.last().filter(|parent| end > parent.end) {
            if parent.start == start {
                stats.equal_start_inversions += 1;
            } else {
                stats.crossing_spans += 1;
            }
        }

        stack.push(Frame { start, end });
        let depth = stack.len();
        stats.deepest = stats.deepest.max(depth);

        match retention(&events[index], depth, max_depth, conventions) {
            Retention::Depth => stats.kept_by_depth += 1,
            Retention::Exempt => stats.kept_by_exemption += 1,
            Retention::Drop => {
                stats.dropped += 1;
                keep[index] = false;
            }
        }
    }
    stats.scoped = order.len();

    if stats.crossing_spans > 0 {
        warn!(
            "{} `{}` spans overlap their parent without nesting; depths for them are approximate",
            stats.crossing_spans, scoped_category
        );
    }

    if stats.equal_start_inversions > 0 {
        debug!(
            "{} `{}` spans share a start with a shorter span and sit one level deeper than their child",
            stats.equal_start_inversions, scoped_category
        );
    }

    debug!(
        "Trimmed {} of {} `{}` events (deepest nesting {})",
        stats.dropped, stats.scoped, scoped_category, stats.deepest
    );

    let events = events
        .into_iter()
        .zip(keep)
        .filter_map(|(event, kept)| kept.then_some(event))
        .collect();

    Ok(TrimOutcome { events, stats })
}

/// **Private** - retention rule for one scoped event
fn retention(
    event: &TraceEvent,
    depth: usize,
    max_depth: usize,
    conventions: &TraceConventions,
) -> Retention {
    if depth <= max_depth {
        Retention::Depth
    } else if event.duration().is_none()
        || event
            .name()
            .map_or(false, |name| conventions.is_kernel_launch(name))
    {
        Retention::Exempt
    } else {
        Retention::Drop
    }
}
