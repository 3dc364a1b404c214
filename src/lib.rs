//! # Bimerge
//!
//! A bitemporal milestone reconciliation and merge engine.
//!
//! Versioned records are modeled as rectangles in two-dimensional time
//! (business validity × processing validity). When new data supersedes or
//! extends existing history, the engine fragments overlapping rectangles
//! by precedence and emits a non-overlapping result set, preserving the
//! full temporal extent of the input. The engine is synchronous,
//! allocation-only, and side-effect-free apart from diagnostic logging;
//! concurrent invocations on disjoint key groups need no synchronization.

pub mod adapter;
pub mod merge;
pub mod rectangle;
pub mod schema;
pub mod temporal;
pub mod test_support;

// Re-export main types for convenience
pub use merge::{merge, precedence_order};
pub use rectangle::MilestoneRectangle;
pub use schema::RecordSchema;
pub use temporal::{Instant, Span, INFINITY, NO_DATE};

/// Main API for milestone merging: a schema plus the adapter operations.
///
/// The grouped entry points assume both input sides share a single
/// dateless primary key; use [`BitemporalMerger::merge_all`] for
/// mixed-key lists.
pub struct BitemporalMerger<S: RecordSchema> {
    schema: S,
}

impl<S: RecordSchema> BitemporalMerger<S> {
    /// Create a merger for one record schema.
    pub fn new(schema: S) -> Self {
        Self { schema }
    }

    /// The wrapped schema.
    pub fn schema(&self) -> &S {
        &self.schema
    }

    /// Convert records into rectangles, with the overlap self-check.
    pub fn from_records<'a>(
        &self,
        records: &'a [S::Record],
    ) -> Vec<MilestoneRectangle<'a, S::Record>> {
        adapter::from_records(&self.schema, records)
    }

    /// Materialize rectangles back into persistable record copies.
    pub fn to_records(&self, rectangles: &[MilestoneRectangle<'_, S::Record>]) -> Vec<S::Record> {
        adapter::to_records(&self.schema, rectangles)
    }

    /// Merge a precedence-ordered rectangle list into a non-overlapping set.
    pub fn merge<'a>(
        &self,
        rectangles: Vec<MilestoneRectangle<'a, S::Record>>,
    ) -> Vec<MilestoneRectangle<'a, S::Record>> {
        merge::merge(&self.schema, rectangles)
    }

    /// Reconcile new records against existing history for one key group.
    /// New data supersedes existing data wherever they overlap.
    pub fn merge_grouped(
        &self,
        new_records: &[S::Record],
        existing_records: &[S::Record],
    ) -> Vec<S::Record> {
        adapter::merge_grouped(&self.schema, new_records, existing_records)
    }

    /// Reconcile mixed-key record lists, grouping by dateless primary key.
    pub fn merge_all(
        &self,
        new_records: &[S::Record],
        existing_records: &[S::Record],
    ) -> Vec<S::Record> {
        adapter::merge_all(&self.schema, new_records, existing_records)
    }
}
