//! Metric Engine Scenario Tests
//!
//! End-to-end filter-then-aggregate scenarios over the public API, with the
//! reference numbers the dashboard pages are checked against.

use chrono::NaiveDate;
use prodigy_iq::dataset::columns;
use prodigy_iq::filter::{self, FilterCriterion};
use prodigy_iq::metrics::cost::{self, CostGroup};
use prodigy_iq::metrics::{advanced, normalize, sales, summary, NormalizationUnit, Sign};
use prodigy_iq::{safe_div, CostConfiguration, CostParameters, Dataset};

fn metric(metrics: &[prodigy_iq::DerivedMetric], key: &str) -> f64 {
    metrics
        .iter()
        .find(|m| m.key == key)
        .map(|m| m.value)
        .unwrap_or_else(|| panic!("metric {key} missing"))
}

fn field_data() -> Dataset {
    Dataset::from_rows(
        &[
            "Well_Name",
            "Well_Job_ID",
            "Operator",
            "flowline_Shakers",
            "TD_Date",
            "IntLength",
            "Haul_OFF",
            "Total_Dil",
            "Discard Ratio",
            "Base_Oil",
            "Water",
            "Chemicals",
        ],
        &[
            vec!["Alpha 1H", "J-1", "Apex", "Derrick", "2024-05-02", "1000", "40", "50", "0.20", "300", "100", "20"],
            vec!["Bravo 2H", "J-2", "Borealis", "Non-Derrick", "2024-05-20", "500", "30", "40", "0.30", "100", "50", ""],
            vec!["Charlie 3H", "J-3", "Apex", "Derrick", "2023-11-11", "", "10", "", "", "", "", ""],
        ],
    )
}

// ============================================================================
// Ratios
// ============================================================================

#[test]
fn cuttings_volume_ratio_reference() {
    let ds = Dataset::from_rows(
        &["IntLength", "Haul_OFF"],
        &[vec!["100", "10"], vec!["200", "20"], vec!["0", "5"]],
    );
    let cvr = metric(&advanced::advanced_metrics(&ds), advanced::CVR);
    assert!((cvr - 0.1167).abs() < 1e-4);
}

#[test]
fn ratios_never_divide_by_zero() {
    assert_eq!(safe_div(10.0, 0.0), 0.0);
    let ds = Dataset::from_rows(&["IntLength", "Haul_OFF"], &[vec!["0", "5"], vec!["", "7"]]);
    let cvr = metric(&advanced::advanced_metrics(&ds), advanced::CVR);
    assert_eq!(cvr, 0.0);
    assert!(cvr.is_finite());
}

#[test]
fn retention_is_exact_complement_of_discards() {
    let ds = field_data();
    let mre = metric(&advanced::advanced_metrics(&ds), advanced::MRE_PCT);
    assert_eq!(mre, 100.0 - advanced::discard_percentage(&ds));
    assert!((mre - 75.0).abs() < 1e-9);
}

// ============================================================================
// Filter then aggregate
// ============================================================================

#[test]
fn summary_follows_filtered_subset() {
    let ds = field_data();
    let apex = filter::apply(&ds, &[FilterCriterion::equals(columns::OPERATOR, "Apex")]);
    let kpis = summary::well_summary(&apex);

    // Charlie has no interval; the mean is over present values only
    assert_eq!(metric(&kpis, columns::INT_LENGTH), 1000.0);
    assert_eq!(metric(&kpis, columns::HAUL_OFF), 25.0);
}

#[test]
fn empty_subset_reports_zero_everywhere() {
    let ds = field_data();
    let none = filter::apply(&ds, &[FilterCriterion::search("xyz")]);
    assert!(none.is_empty());

    for m in summary::well_summary(&none)
        .iter()
        .chain(advanced::advanced_metrics(&none).iter())
    {
        if m.key == advanced::MRE_PCT {
            // Complement of a zero discard mean
            assert_eq!(m.value, 100.0);
        } else {
            assert_eq!(m.value, 0.0, "{} should be zero", m.key);
        }
    }
    assert!(summary::compare_parameter(&none, columns::INT_LENGTH).is_empty());
}

#[test]
fn normalization_by_interval_length() {
    let ds = field_data();
    let kpis = summary::well_summary(&ds);
    let per_ft = normalize(&kpis, NormalizationUnit::Feet, &ds);
    assert_eq!(per_ft.len(), kpis.len());
    let haul = metric(&per_ft, columns::HAUL_OFF);
    assert!((haul - safe_div(80.0 / 3.0, 1500.0)).abs() < 1e-12);
}

// ============================================================================
// Cost estimator
// ============================================================================

#[test]
fn cost_reference_scenario() {
    let ds = Dataset::from_rows(
        &["Total_Dil", "Haul_OFF", "IntLength"],
        &[vec!["50", "40", "1000"]],
    );
    let config = CostConfiguration::new(CostParameters::derrick()).unwrap();
    let b = cost::estimate(&ds, &config);

    assert!((b.total_cost - 50_657.14).abs() < 0.01);
    assert_eq!(format!("{:.2}", b.cost_per_ft), "50.66");
}

#[test]
fn negative_lifetime_is_rejected_at_construction() {
    let params = CostParameters {
        equipment_life_years: -7.0,
        ..CostParameters::derrick()
    };
    let err = CostConfiguration::new(params).unwrap_err();
    assert!(err.to_string().contains("equipment_life_years"));
}

#[test]
fn comparison_sign_follows_b_minus_a() {
    let ds = field_data();
    let derrick = CostConfiguration::new(CostParameters::derrick()).unwrap();
    let non_derrick = CostConfiguration::new(CostParameters::non_derrick()).unwrap();
    let a = CostGroup::by_shaker(derrick);
    let b = CostGroup::by_shaker(non_derrick);

    let cmp = cost::compare(&ds, &a, &b);
    assert_eq!(cmp.group_a.records, 2);
    assert_eq!(cmp.group_b.records, 1);

    let delta = cmp.group_b.total_cost - cmp.group_a.total_cost;
    assert!((cmp.total_cost_delta.value - delta).abs() < 1e-9);
    assert_eq!(cmp.total_cost_delta.sign, Sign::of(delta));

    // Swapping the groups flips the sign
    let swapped = cost::compare(&ds, &b, &a);
    assert!((swapped.total_cost_delta.value + cmp.total_cost_delta.value).abs() < 1e-9);
}

#[test]
fn renamed_presets_keep_their_shaker_groups() {
    let ds = field_data();
    let a = CostGroup::by_shaker(
        CostConfiguration::new(CostParameters {
            name: "Rig 12 shakers".to_string(),
            ..CostParameters::derrick()
        })
        .unwrap(),
    );
    let b = CostGroup::by_shaker(
        CostConfiguration::new(CostParameters {
            name: "Rig 7 shakers".to_string(),
            ..CostParameters::non_derrick()
        })
        .unwrap(),
    );

    let cmp = cost::compare(&ds, &a, &b);
    assert_eq!(cmp.group_a.name, "Rig 12 shakers");
    assert_eq!(cmp.group_a.records, 2);
    assert_eq!(cmp.group_b.records, 1);
}

// ============================================================================
// Sales page
// ============================================================================

#[test]
fn sales_summary_counts_reference_month() {
    let ds = field_data();
    let reference = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
    let s = sales::sales_summary(&ds, reference);

    assert_eq!(s.periods.month, 2);
    assert_eq!(s.periods.year, 2);
    assert_eq!(s.periods.total, 3);
    assert_eq!(s.shakers[0].group, "Derrick");
    assert_eq!(s.shakers[0].count, 2);
}
