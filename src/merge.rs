//! # Merge Module
//!
//! Stack-based, precedence-ordered overlap resolution over milestone
//! rectangles. Invalid rectangles are dropped with a warning; survivors are
//! pushed in caller order and resolved by popping: a popped rectangle cedes
//! any overlap to the rectangles still on the stack and re-enters as
//! fragments, so the side pushed first survives overlaps intact.

use crate::rectangle::MilestoneRectangle;
use crate::schema::RecordSchema;
use crate::temporal::{Instant, NO_DATE};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Precedence ordering for rectangles within one input side: higher `in`
/// wins, tie-break by higher `from`; the `NO_DATE` sentinel ranks highest.
///
/// Sorting a side with this comparator puts its winners first, so they are
/// pushed deepest and survive overlap resolution against the rest of that
/// side.
pub fn precedence_order<R>(a: &MilestoneRectangle<R>, b: &MilestoneRectangle<R>) -> Ordering {
    sort_key(b.processing().from)
        .cmp(&sort_key(a.processing().from))
        .then_with(|| sort_key(b.business().from).cmp(&sort_key(a.business().from)))
}

fn sort_key(value: Instant) -> Instant {
    if value == NO_DATE {
        Instant::MAX
    } else {
        value
    }
}

/// Merge a precedence-ordered list of rectangles into a non-overlapping set.
///
/// The caller supplies rectangles from highest to lowest effective
/// precedence: the first rectangle lands at the bottom of the stack and
/// keeps any region it covers. Rectangles failing the validity invariant
/// are dropped with a warning naming the entity and the record's printable
/// key; they never participate in merging. The routine has no failure mode
/// and always terminates: each fragmentation strictly shrinks the popped
/// rectangle's span.
pub fn merge<'a, S>(
    schema: &S,
    rectangles: Vec<MilestoneRectangle<'a, S::Record>>,
) -> Vec<MilestoneRectangle<'a, S::Record>>
where
    S: RecordSchema,
{
    let mut stack: Vec<MilestoneRectangle<'a, S::Record>> = Vec::with_capacity(rectangles.len());
    for rectangle in rectangles {
        if rectangle.is_valid() {
            stack.push(rectangle);
        } else {
            warn!(
                entity = schema.entity_name(),
                key = %schema.primary_key(rectangle.data()),
                rectangle = %rectangle,
                "dropping record with invalid milestoning"
            );
        }
    }

    let merged = resolve(stack);
    debug!(
        entity = schema.entity_name(),
        merged = merged.len(),
        "milestone merge complete"
    );
    merged
}

/// Merge without per-record diagnostics: invalid rectangles are dropped
/// silently. Used by the adapter's pre-merge self-check so each invalid
/// record is warned about exactly once, by the real merge.
pub(crate) fn merge_quiet<'a, R>(
    rectangles: Vec<MilestoneRectangle<'a, R>>,
) -> Vec<MilestoneRectangle<'a, R>> {
    resolve(rectangles.into_iter().filter(|r| r.is_valid()).collect())
}

/// The worklist: pop, scan the remaining stack top-down for the first
/// intersection, cede the overlap to the resident rectangle and re-enter
/// as fragments, or finalize.
fn resolve<'a, R>(mut stack: Vec<MilestoneRectangle<'a, R>>) -> Vec<MilestoneRectangle<'a, R>> {
    let mut merged = Vec::with_capacity(stack.len());
    while let Some(next) = stack.pop() {
        let hit = (0..stack.len()).rev().find(|&i| next.intersects(&stack[i]));
        match hit {
            Some(index) => {
                let resident = stack[index];
                next.fragment(&resident, &mut stack);
            }
            None => merged.push(next),
        }
    }
    merged
}
