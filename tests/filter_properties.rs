//! Filter Engine Property Tests
//!
//! Structural guarantees of filtering over a realistic mixed dataset:
//! order preservation, identity selections, idempotence, and the bin sets
//! partitioning every non-negative value exactly once.

use prodigy_iq::dataset::columns;
use prodigy_iq::filter::{self, BinSet, CriterionSpec, FilterCriterion, FilterEngine, FilterError};
use prodigy_iq::Dataset;

fn wells() -> Dataset {
    Dataset::from_rows(
        &[
            "Well_Name",
            "Operator",
            "flowline_Shakers",
            "TD_Date",
            "MD Depth",
            "AMW",
        ],
        &[
            vec!["Alpha 1H", "Apex", "Derrick", "2020-01-01", "4200", "8.9"],
            vec!["Bravo 2H", "Borealis", "Non-Derrick", "2021-06-01", "9800", "10.2"],
            vec!["Charlie 3H", "Apex", "Derrick", "", "15000", "11.0"],
            vec!["Delta 4H", "Cobalt", "Brandt", "2022-12-31", "", "14.0"],
            vec!["Echo 5H", "Apex", "", "2023-02-14", "27500", "n/a"],
            vec!["Foxtrot 6H", "Borealis", "Derrick", "2022-01-01", "0", "2.5"],
        ],
    )
}

fn positions(ds: &Dataset) -> Vec<usize> {
    ds.rows().map(|r| r.position()).collect()
}

fn sample_criteria() -> Vec<Vec<FilterCriterion>> {
    let depth = BinSet::depth();
    vec![
        vec![FilterCriterion::equals(columns::OPERATOR, "Apex")],
        vec![FilterCriterion::search("derrick")],
        vec![FilterCriterion::year_range(columns::TD_DATE, 2021, 2022)],
        vec![FilterCriterion::in_range(columns::MD_DEPTH, depth.bins[1].clone())],
        vec![
            FilterCriterion::one_of(columns::OPERATOR, &["Apex", "Borealis"]),
            FilterCriterion::search("h"),
        ],
    ]
}

// ============================================================================
// Order and subset
// ============================================================================

#[test]
fn filtered_records_are_an_ordered_subsequence() {
    let ds = wells();
    let source = positions(&ds);

    for criteria in sample_criteria() {
        let out = positions(&filter::apply(&ds, &criteria));
        assert!(out.windows(2).all(|w| w[0] < w[1]), "order broken for {criteria:?}");
        assert!(out.iter().all(|p| source.contains(p)), "foreign record for {criteria:?}");
    }
}

#[test]
fn source_dataset_is_not_mutated() {
    let ds = wells();
    let before = positions(&ds);
    let _ = filter::apply(&ds, &[FilterCriterion::search("xyz")]);
    assert_eq!(positions(&ds), before);
    assert_eq!(ds.len(), 6);
}

// ============================================================================
// Identity and idempotence
// ============================================================================

#[test]
fn identity_selections_keep_everything() {
    let ds = wells();
    let identities = [
        FilterCriterion::equals(columns::OPERATOR, "All"),
        FilterCriterion::one_of::<&str>(columns::OPERATOR, &[]),
        FilterCriterion::search(""),
    ];
    for c in identities {
        assert!(c.is_identity());
        assert_eq!(positions(&filter::apply(&ds, &[c])), positions(&ds));
    }
    assert_eq!(FilterEngine::default().apply(&ds).len(), ds.len());
}

#[test]
fn applying_twice_equals_applying_once() {
    let ds = wells();
    for criteria in sample_criteria() {
        let once = filter::apply(&ds, &criteria);
        let twice = filter::apply(&once, &criteria);
        assert_eq!(positions(&once), positions(&twice));
    }
}

#[test]
fn criterion_on_absent_column_is_skipped() {
    let ds = wells();
    let out = filter::apply(&ds, &[FilterCriterion::equals("Rig_Name", "Ensign 12")]);
    assert_eq!(out.len(), ds.len());
}

// ============================================================================
// Range buckets
// ============================================================================

#[test]
fn bin_sets_partition_non_negative_values() {
    for set in [BinSet::depth(), BinSet::mud_weight()] {
        assert!(set.validate().is_empty(), "{} invalid", set.name);
        for value in [0.0, 2.999, 3.0, 4999.0, 5000.0, 14.0, 25_000.0, 1.0e9] {
            let hits = set.bins.iter().filter(|b| b.contains(value)).count();
            assert_eq!(hits, 1, "{value} matched {hits} bins in {}", set.name);
        }
    }
}

#[test]
fn depth_buckets_split_dataset_without_overlap() {
    let ds = wells();
    let depth = BinSet::depth();
    let mut seen = Vec::new();
    for bin in &depth.bins {
        let out = filter::apply(&ds, &[FilterCriterion::in_range(columns::MD_DEPTH, bin.clone())]);
        seen.extend(positions(&out));
    }
    seen.sort_unstable();
    // Delta has no depth; every other record lands in exactly one bucket
    assert_eq!(seen, vec![0, 1, 2, 4, 5]);
}

#[test]
fn last_bin_is_unbounded_and_missing_values_never_match() {
    let ds = wells();
    let deep = BinSet::depth().criterion("25000 ft and above").unwrap().unwrap();
    let out = filter::apply(&ds, &[deep]);
    assert_eq!(positions(&out), vec![4]);

    let heavy = BinSet::mud_weight().criterion("14 and above").unwrap().unwrap();
    let out = filter::apply(&ds, &[heavy]);
    // "n/a" on Echo is malformed and counts as missing
    assert_eq!(positions(&out), vec![3]);
}

#[test]
fn bucket_descriptors_resolve_against_configured_sets() {
    let sets = [BinSet::depth(), BinSet::mud_weight()];
    let specs = vec![
        CriterionSpec::Bucket {
            bins: "depth".into(),
            bin: "All".into(),
        },
        CriterionSpec::Bucket {
            bins: "mud_weight".into(),
            bin: "9–11".into(),
        },
    ];
    let criteria = filter::resolve(&specs, &sets).unwrap();
    assert_eq!(criteria.len(), 1);
    assert_eq!(filter::apply(&wells(), &criteria).len(), 1);

    let unknown = vec![CriterionSpec::Bucket {
        bins: "depth".into(),
        bin: "deep".into(),
    }];
    assert!(matches!(
        filter::resolve(&unknown, &sets),
        Err(FilterError::UnknownBin { .. })
    ));
}

// ============================================================================
// Search and year window
// ============================================================================

#[test]
fn search_is_case_insensitive_substring() {
    let ds = Dataset::from_rows(
        &["flowline_Shakers"],
        &[vec!["Derrick"], vec!["Non-Derrick"], vec!["Derrick"]],
    );
    assert_eq!(filter::apply(&ds, &[FilterCriterion::search("derrick")]).len(), 3);
    assert_eq!(filter::apply(&ds, &[FilterCriterion::search("DERRICK")]).len(), 3);
    assert_eq!(filter::apply(&ds, &[FilterCriterion::search("xyz")]).len(), 0);
}

#[test]
fn year_window_drops_missing_dates() {
    let ds = Dataset::from_rows(
        &["TD_Date"],
        &[vec!["2020-01-01"], vec!["2021-06-01"], vec![""]],
    );
    let out = filter::apply(&ds, &[FilterCriterion::year_range(columns::TD_DATE, 2021, 2022)]);
    assert_eq!(positions(&out), vec![1]);
}

#[test]
fn inverted_year_window_is_rejected() {
    let specs = vec![CriterionSpec::YearRange {
        column: columns::TD_DATE.to_string(),
        start: 2024,
        end: 2021,
    }];
    assert_eq!(
        filter::resolve(&specs, &[]),
        Err(FilterError::InvalidYearRange {
            start: 2024,
            end: 2021
        })
    );
}

#[test]
fn criteria_combine_with_and() {
    let ds = wells();
    let engine = FilterEngine::default()
        .with(FilterCriterion::equals(columns::OPERATOR, "Apex"))
        .with(FilterCriterion::search("derrick"));
    // Alpha and Charlie; Echo has no shaker
    assert_eq!(positions(&engine.apply(&ds)), vec![0, 2]);
}

#[test]
fn select_options_lead_with_all() {
    let options = filter::select_options(&wells(), columns::OPERATOR);
    assert_eq!(options, vec!["All", "Apex", "Borealis", "Cobalt"]);
}
