//! # Milestone Rectangle Module
//!
//! The geometric model of one record version: a rectangle in
//! (business-time × processing-time) space. Comparison, intersection, and
//! fragmentation live here; everything is plain integer arithmetic over
//! epoch milliseconds. Rectangles are immutable; fragmentation allocates
//! new rectangles sharing the operand's data reference.

use crate::schema::RecordSchema;
use crate::temporal::{Instant, Span};
use std::fmt;
use std::hash::{Hash, Hasher};

/// One record version as a rectangle in two-dimensional time.
///
/// `data` is an opaque reference to the source record; the engine never
/// inspects it except to render diagnostics and to materialize output
/// copies. Fragments produced during a merge carry the parent's `data`
/// reference, so callers must re-derive a proper record copy (via
/// [`MilestoneRectangle::to_record_copy`]) before persisting.
pub struct MilestoneRectangle<'a, R> {
    data: &'a R,
    business: Span,
    processing: Span,
}

impl<'a, R> MilestoneRectangle<'a, R> {
    /// Construct from axis spans. No validation happens here; the merge
    /// routine checks validity lazily and drops invalid rectangles.
    pub fn new(data: &'a R, business: Span, processing: Span) -> Self {
        Self {
            data,
            business,
            processing,
        }
    }

    /// Construct from raw bounds (`from`/`thru` business, `in`/`out`
    /// processing), unvalidated.
    pub fn from_bounds(data: &'a R, from: Instant, thru: Instant, in_: Instant, out: Instant) -> Self {
        Self::new(data, Span::raw(from, thru), Span::raw(in_, out))
    }

    /// Construct from a dated record using the schema's milestoning axis
    /// pairs. An absent pair yields the sentinel span throughout.
    pub fn from_record<S>(schema: &S, data: &'a R) -> Self
    where
        S: RecordSchema<Record = R>,
    {
        Self::new(
            data,
            schema.business_span(data).unwrap_or_else(Span::none),
            schema.processing_span(data).unwrap_or_else(Span::none),
        )
    }

    /// The opaque source record reference.
    pub fn data(&self) -> &'a R {
        self.data
    }

    /// The business-time validity span.
    pub fn business(&self) -> Span {
        self.business
    }

    /// The processing-time validity span.
    pub fn processing(&self) -> Span {
        self.processing
    }

    /// A rectangle is valid iff both axis spans are valid (strictly
    /// increasing, or the absent-axis sentinel).
    pub fn is_valid(&self) -> bool {
        self.business.is_valid() && self.processing.is_valid()
    }

    /// Two rectangles intersect iff both the business spans and the
    /// processing spans pairwise overlap, with sentinel spans overlapping
    /// everything.
    pub fn intersects(&self, other: &Self) -> bool {
        self.business.overlaps(&other.business) && self.processing.overlaps(&other.processing)
    }

    /// Subtract an intersecting `other` rectangle from this one, pushing
    /// the remainder onto the merge stack as up to four new rectangles:
    ///
    /// - **left**: the business-time portion before `other` begins,
    /// - **bottom**: the processing-time portion below `other.in`,
    ///   confined to the intersected business span,
    /// - **top**: the processing-time portion above `other.out`,
    ///   confined to the intersected business span,
    /// - **right**: the business-time portion after `other` ends.
    ///
    /// `other` takes the overlapping region; every fragment carries this
    /// rectangle's `data`. Callers must have established intersection and
    /// that both rectangles share the same axis shape.
    pub fn fragment(&self, other: &Self, stack: &mut Vec<Self>) {
        if self.business.from < other.business.from {
            stack.push(Self::new(
                self.data,
                Span::raw(self.business.from, other.business.from),
                self.processing,
            ));
        }
        if self.processing.from < other.processing.from {
            stack.push(Self::new(
                self.data,
                self.business.intersect_bounds(&other.business),
                Span::raw(self.processing.from, other.processing.from),
            ));
        }
        if self.processing.thru > other.processing.thru {
            stack.push(Self::new(
                self.data,
                self.business.intersect_bounds(&other.business),
                Span::raw(other.processing.thru, self.processing.thru),
            ));
        }
        if self.business.thru > other.business.thru {
            stack.push(Self::new(
                self.data,
                Span::raw(other.business.thru, self.business.thru),
                self.processing,
            ));
        }
    }

    /// Materialize a persistable record: a structural copy of `data` with
    /// this rectangle's bounds written back through the schema. This is
    /// the only point where a concrete new record is produced from a
    /// rectangle.
    pub fn to_record_copy<S>(&self, schema: &S) -> R
    where
        S: RecordSchema<Record = R>,
    {
        let business = (!self.business.is_none()).then_some(self.business);
        let processing = (!self.processing.is_none()).then_some(self.processing);
        schema.copy_with_spans(self.data, business, processing)
    }
}

// Manual impls: R only appears behind a shared reference, so the derive
// bounds on R would be spurious.
impl<'a, R> Clone for MilestoneRectangle<'a, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, R> Copy for MilestoneRectangle<'a, R> {}

impl<'a, R> fmt::Debug for MilestoneRectangle<'a, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MilestoneRectangle")
            .field("business", &self.business)
            .field("processing", &self.processing)
            .finish()
    }
}

impl<'a, R> fmt::Display for MilestoneRectangle<'a, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.business, self.processing)
    }
}

/// Identity over the (data reference, business, processing) tuple.
/// Test and debug use only.
impl<'a, R> PartialEq for MilestoneRectangle<'a, R> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.data, other.data)
            && self.business == other.business
            && self.processing == other.processing
    }
}

impl<'a, R> Eq for MilestoneRectangle<'a, R> {}

impl<'a, R> Hash for MilestoneRectangle<'a, R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.data as *const R as usize).hash(state);
        self.business.hash(state);
        self.processing.hash(state);
    }
}
