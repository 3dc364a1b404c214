//! End-to-end milestone merge scenarios over dated histories.
//!
//! These exercise the documented reconciliation shapes: superseding the
//! tail of a history from an effective date onward, and restating a single
//! business day inside an open-ended row. Expected outputs were derived by
//! hand from the stack algorithm and pin the fragmentation geometry.

use bimerge_rs::temporal::instant_from_datetime;
use bimerge_rs::test_support::{balance, rate, BalanceSchema, RateRow, RateSchema};
use bimerge_rs::{BitemporalMerger, Instant, INFINITY};
use time::macros::datetime;
use time::OffsetDateTime;

fn ms(dt: OffsetDateTime) -> Instant {
    instant_from_datetime(dt)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn sorted_by_from(mut rows: Vec<RateRow>) -> Vec<RateRow> {
    rows.sort_by_key(|r| r.from);
    rows
}

/// Superseding an open-ended history from a new effective date fragments
/// the open row at that date: before-fragment, up-to fragment, new value.
#[test]
fn supersede_from_effective_date() {
    init_tracing();
    let mar12 = ms(datetime!(2009-03-12 00:00 UTC));
    let mar19 = ms(datetime!(2009-03-19 00:00 UTC));
    let mar22 = ms(datetime!(2009-03-22 00:00 UTC));

    let existing = vec![
        rate("7880.C", 100, mar12, mar19),
        rate("7880.C", 200, mar19, INFINITY),
    ];
    let new_records = vec![rate("7880.C", 300, mar22, INFINITY)];

    let merger = BitemporalMerger::new(RateSchema);
    let merged = sorted_by_from(merger.merge_grouped(&new_records, &existing));

    assert_eq!(merged.len(), 3);
    assert_eq!((merged[0].from, merged[0].thru, merged[0].value), (mar12, mar19, 100));
    assert_eq!((merged[1].from, merged[1].thru, merged[1].value), (mar19, mar22, 200));
    assert_eq!((merged[2].from, merged[2].thru, merged[2].value), (mar22, INFINITY, 300));
}

/// The bitemporal version of the supersede: the superseded region of the
/// open row survives as a processing-time history fragment, and the rows
/// still believed current reproduce the single-temporal picture.
#[test]
fn supersede_keeps_processing_history() {
    init_tracing();
    let mar12 = ms(datetime!(2009-03-12 00:00 UTC));
    let mar19 = ms(datetime!(2009-03-19 00:00 UTC));
    let mar22 = ms(datetime!(2009-03-22 00:00 UTC));
    // Processing-in instants: when each row was recorded
    let t1 = ms(datetime!(2009-03-12 18:30 UTC));
    let t2 = ms(datetime!(2009-03-19 18:30 UTC));
    let t3 = ms(datetime!(2009-03-22 18:30 UTC));

    let existing = vec![
        balance("7880.C", 100, mar12, mar19, t1, INFINITY),
        balance("7880.C", 200, mar19, INFINITY, t2, INFINITY),
    ];
    let new_records = vec![balance("7880.C", 300, mar22, INFINITY, t3, INFINITY)];

    let merger = BitemporalMerger::new(BalanceSchema);
    let merged = merger.merge_grouped(&new_records, &existing);
    assert_eq!(merged.len(), 4);

    // Exactly one row is no longer current: the superseded tail of the
    // open row, chopped at the new row's processing-in.
    let history: Vec<_> = merged
        .iter()
        .filter(|row| row.processing_out != INFINITY)
        .collect();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].quantity, 200);
    assert_eq!((history[0].business_from, history[0].business_thru), (mar22, INFINITY));
    assert_eq!((history[0].processing_in, history[0].processing_out), (t2, t3));

    // The current rows reproduce the single-temporal picture
    let mut current: Vec<_> = merged
        .into_iter()
        .filter(|row| row.processing_out == INFINITY)
        .collect();
    current.sort_by_key(|row| row.business_from);
    assert_eq!(current.len(), 3);
    assert_eq!(
        (current[0].business_from, current[0].business_thru, current[0].quantity),
        (mar12, mar19, 100)
    );
    assert_eq!(
        (current[1].business_from, current[1].business_thru, current[1].quantity),
        (mar19, mar22, 200)
    );
    assert_eq!(
        (current[2].business_from, current[2].business_thru, current[2].quantity),
        (mar22, INFINITY, 300)
    );
}

/// Restating one business day only (not onward) splits the open row into
/// before / the single day / after, so the full history has four rows.
#[test]
fn single_day_restatement_chains() {
    init_tracing();
    let mar12 = ms(datetime!(2009-03-12 00:00 UTC));
    let mar19 = ms(datetime!(2009-03-19 00:00 UTC));
    let mar24 = ms(datetime!(2009-03-24 00:00 UTC));
    let mar25 = ms(datetime!(2009-03-25 00:00 UTC));

    let existing = vec![
        rate("7880.C", 100, mar12, mar19),
        rate("7880.C", 200, mar19, INFINITY),
    ];
    let new_records = vec![rate("7880.C", 999, mar24, mar25)];

    let merger = BitemporalMerger::new(RateSchema);
    let merged = sorted_by_from(merger.merge_grouped(&new_records, &existing));

    assert_eq!(merged.len(), 4);
    assert_eq!((merged[0].from, merged[0].thru, merged[0].value), (mar12, mar19, 100));
    assert_eq!((merged[1].from, merged[1].thru, merged[1].value), (mar19, mar24, 200));
    assert_eq!((merged[2].from, merged[2].thru, merged[2].value), (mar24, mar25, 999));
    assert_eq!((merged[3].from, merged[3].thru, merged[3].value), (mar25, INFINITY, 200));
}

/// Extending history with a row that touches nothing merges without any
/// fragmentation.
#[test]
fn disjoint_extension_passes_through() {
    let mar12 = ms(datetime!(2009-03-12 00:00 UTC));
    let mar19 = ms(datetime!(2009-03-19 00:00 UTC));
    let mar22 = ms(datetime!(2009-03-22 00:00 UTC));

    let existing = vec![rate("7880.C", 100, mar12, mar19)];
    let new_records = vec![rate("7880.C", 200, mar19, mar22)];

    let merger = BitemporalMerger::new(RateSchema);
    let merged = sorted_by_from(merger.merge_grouped(&new_records, &existing));

    assert_eq!(merged.len(), 2);
    assert_eq!((merged[0].from, merged[0].thru, merged[0].value), (mar12, mar19, 100));
    assert_eq!((merged[1].from, merged[1].thru, merged[1].value), (mar19, mar22, 200));
}
