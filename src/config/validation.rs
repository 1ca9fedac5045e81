//! Config validation: unknown-key detection with Levenshtein suggestions
//! and plausibility range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, ", did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

const COST_PARAMETER_KEYS: &[&str] = &[
    "name",
    "shaker_label",
    "dilution_rate",
    "haul_rate",
    "screen_price",
    "screen_count",
    "equipment_cost",
    "equipment_count",
    "equipment_life_years",
    "engineering_cost",
    "other_cost",
];

/// Returns the complete set of valid dotted key paths for `DashboardConfig`.
///
/// Maintained by hand to match the struct hierarchy in dashboard_config.rs.
/// Array-of-table contents (`filters.bins`) are not walked.
pub fn known_config_keys() -> HashSet<String> {
    let mut keys: HashSet<String> = [
        // [data]
        "data",
        "data.csv_path",
        "data.delimiter",
        "data.skip_blank_rows",
        // [server]
        "server",
        "server.addr",
        // [filters]
        "filters",
        "filters.year_min",
        "filters.year_max",
        "filters.bins",
        // [cost]
        "cost",
        "cost.derrick",
        "cost.non_derrick",
        // [export]
        "export",
        "export.filename",
        "export.directory",
    ]
    .iter()
    .map(|k| (*k).to_string())
    .collect();

    for preset in ["cost.derrick", "cost.non_derrick"] {
        keys.extend(COST_PARAMETER_KEYS.iter().map(|k| format!("{preset}.{k}")));
    }
    keys
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a_len = a.len();
    let b_len = b.len();
    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1)
                .min(curr[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<String>) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for k in known {
        let dist = levenshtein(unknown, k);
        if dist <= 3 && best.map_or(true, |(_, best_dist)| dist < best_dist) {
            best = Some((k, dist));
        }
    }
    best.map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// Unknown keys never fail the load; they only warn.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    let found = walk_toml_keys(&value, "");
    let mut warnings = Vec::new();

    for key in &found {
        if !known.contains(key.as_str()) {
            let suggestion = suggest_correction(key, &known);
            let message = format!("Unknown config key '{key}'");
            warnings.push(ValidationWarning {
                field: key.clone(),
                message,
                suggestion,
            });
        }
    }

    warnings
}

// ============================================================================
// Range Validation
// ============================================================================

/// Plausibility checks on a parsed `DashboardConfig`.
///
/// Returns (errors, warnings): errors are impossible values that must
/// prevent startup; warnings are suspicious but not fatal.
pub fn validate_ranges(config: &super::DashboardConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Completion dates outside 1900-2100 are data-entry errors, not a window
    let f = &config.filters;
    for (key, year) in [("filters.year_min", f.year_min), ("filters.year_max", f.year_max)] {
        if !(1900..=2100).contains(&year) {
            errors.push(format!("{key} = {year} is outside the supported range (1900-2100)"));
        }
    }

    // Bin sets should cover zero so every non-negative value lands in a bin
    for set in &f.bins {
        if let Some(first) = set.bins.first() {
            if first.low > 0.0 {
                warnings.push(ValidationWarning {
                    field: "filters.bins".to_string(),
                    message: format!(
                        "bin set '{}' starts at {} so smaller values fall in no bin",
                        set.name, first.low
                    ),
                    suggestion: None,
                });
            }
        }
    }

    let presets = [
        ("cost.derrick", &config.cost.derrick),
        ("cost.non_derrick", &config.cost.non_derrick),
    ];
    for (section, p) in presets {
        // A lifetime of zero disables amortization, fractions of a year are suspicious
        if p.equipment_life_years > 0.0 && p.equipment_life_years < 1.0 {
            warnings.push(ValidationWarning {
                field: format!("{section}.equipment_life_years"),
                message: format!(
                    "{section}.equipment_life_years = {} is under one year",
                    p.equipment_life_years
                ),
                suggestion: None,
            });
        }
        if p.dilution_rate > 1_000.0 || p.haul_rate > 1_000.0 {
            warnings.push(ValidationWarning {
                field: section.to_string(),
                message: format!(
                    "{section}: per-bbl rates above $1000 (dilution {}, haul {}) look like totals",
                    p.dilution_rate, p.haul_rate
                ),
                suggestion: None,
            });
        }
        if p.name.trim().is_empty() {
            errors.push(format!("{section}.name must not be empty"));
        }
    }

    if config.cost.derrick.shaker_label == config.cost.non_derrick.shaker_label {
        warnings.push(ValidationWarning {
            field: "cost".to_string(),
            message: format!(
                "both cost presets select shaker '{}', the comparison groups will be identical",
                config.cost.derrick.shaker_label
            ),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
