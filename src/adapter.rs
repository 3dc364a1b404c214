//! # Adapter Module
//!
//! Conversion between application record lists and rectangle lists, and
//! back. Grouping by dateless primary key is preserved throughout: the
//! grouped entry points assume one key per call, and `merge_all` partitions
//! mixed-key inputs before merging.

use crate::merge::{merge, merge_quiet, precedence_order};
use crate::rectangle::MilestoneRectangle;
use crate::schema::RecordSchema;
use hashbrown::HashMap;
use tracing::warn;

/// Convert records into rectangles, one per record.
///
/// After construction a diagnostic self-check runs: if merging the freshly
/// built set shrinks it, the input already contained overlapping or invalid
/// milestoning and a warning names the entity and the group's key. The
/// check merges quietly, so per-record invalid warnings are left to the
/// real merge. The rectangles are returned unchanged either way.
pub fn from_records<'a, S>(
    schema: &S,
    records: &'a [S::Record],
) -> Vec<MilestoneRectangle<'a, S::Record>>
where
    S: RecordSchema,
{
    let rectangles: Vec<_> = records
        .iter()
        .map(|record| MilestoneRectangle::from_record(schema, record))
        .collect();

    if !rectangles.is_empty() {
        let merged = merge_quiet(rectangles.clone());
        if merged.len() != rectangles.len() {
            warn!(
                entity = schema.entity_name(),
                key = %schema.primary_key(&records[0]),
                records = rectangles.len(),
                merged = merged.len(),
                "records already contain overlapping or invalid milestoning"
            );
        }
    }

    rectangles
}

/// Materialize each rectangle as a fresh persistable record copy.
pub fn to_records<S>(
    schema: &S,
    rectangles: &[MilestoneRectangle<'_, S::Record>],
) -> Vec<S::Record>
where
    S: RecordSchema,
{
    rectangles
        .iter()
        .map(|rectangle| rectangle.to_record_copy(schema))
        .collect()
}

/// Merge one key group: reconcile `new_records` against `existing_records`
/// and return non-overlapping record copies ready to persist.
///
/// Both sides must share a single dateless primary key; that is the
/// caller's contract and is not validated here. Each side is sorted by the
/// precedence comparator and the new side is concatenated first, so new
/// data supersedes existing data wherever they overlap.
pub fn merge_grouped<S>(
    schema: &S,
    new_records: &[S::Record],
    existing_records: &[S::Record],
) -> Vec<S::Record>
where
    S: RecordSchema,
{
    let mut rectangles = from_records(schema, new_records);
    rectangles.sort_by(precedence_order);

    let mut existing = from_records(schema, existing_records);
    existing.sort_by(precedence_order);
    rectangles.extend(existing);

    let merged = merge(schema, rectangles);
    to_records(schema, &merged)
}

/// Merge inputs spanning several dateless primary keys.
///
/// Records are partitioned by printable key (first-seen order across the
/// new side, then the existing side) and each group is merged
/// independently via [`merge_grouped`].
pub fn merge_all<S>(
    schema: &S,
    new_records: &[S::Record],
    existing_records: &[S::Record],
) -> Vec<S::Record>
where
    S: RecordSchema,
{
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, (Vec<S::Record>, Vec<S::Record>)> = HashMap::new();

    for record in new_records {
        let key = schema.primary_key(record);
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().0.push(record.clone());
    }
    for record in existing_records {
        let key = schema.primary_key(record);
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().1.push(record.clone());
    }

    let mut result = Vec::new();
    for key in order {
        let (new_side, existing_side) = &groups[&key];
        result.extend(merge_grouped(schema, new_side, existing_side));
    }
    result
}
