//! # Schema Module
//!
//! The seam between the merge engine and application record types. A
//! `RecordSchema` plays the role the finder metadata plays in the calling
//! system: it names the entity, renders the dateless primary key for
//! diagnostics, exposes the milestoning axis spans, and can materialize a
//! structural copy of a record with new bounds. Passing this capability in
//! explicitly replaces reflective record construction.

use crate::temporal::Span;

/// Metadata and factory capability for one milestoned record type.
///
/// Implementations must be cheap to call: the merge path invokes the span
/// accessors once per record and `copy_with_spans` once per output row.
pub trait RecordSchema {
    /// The application record type being merged.
    type Record: Clone;

    /// Entity name used in diagnostic warnings (e.g. "Balance").
    fn entity_name(&self) -> &str;

    /// Printable dateless primary key of a record, used only for
    /// diagnostic warnings. Mixing keys within one merge call is the
    /// caller's bug and is not detected here.
    fn primary_key(&self, record: &Self::Record) -> String;

    /// The business-time validity span, or `None` if this record type has
    /// no business dimension.
    fn business_span(&self, record: &Self::Record) -> Option<Span>;

    /// The processing-time (system) validity span, or `None` if this
    /// record type has no processing dimension.
    fn processing_span(&self, record: &Self::Record) -> Option<Span>;

    /// Produce a structural copy of `record` with the milestoning bounds
    /// overwritten. An axis passed as `None` is absent from the schema and
    /// must be left untouched.
    fn copy_with_spans(
        &self,
        record: &Self::Record,
        business: Option<Span>,
        processing: Option<Span>,
    ) -> Self::Record;
}
