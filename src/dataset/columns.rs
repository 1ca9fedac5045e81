//! Well-known column names of the drilling operations export.
//!
//! Column presence varies between exports; every consumer checks
//! [`super::Dataset::has_column`] before relying on one of these.

// Identifiers
pub const WELL_NAME: &str = "Well_Name";
pub const WELL_JOB_ID: &str = "Well_Job_ID";
pub const OPERATOR: &str = "Operator";
pub const CONTRACTOR: &str = "Contractor";

// Categorical
pub const FLOWLINE_SHAKERS: &str = "flowline_Shakers";
pub const HOLE_SIZE: &str = "Hole_Size";

// Geography
pub const DI_BASIN: &str = "DI Basin";
pub const AAPG_PROVINCE: &str = "AAPG Geologic Province";
pub const LATITUDE: &str = "Well_Coord_Lat";
pub const LONGITUDE: &str = "Well_Coord_Lon";

/// Completion (total depth) date
pub const TD_DATE: &str = "TD_Date";

// Drilling measures
pub const MD_DEPTH: &str = "MD Depth";
pub const INT_LENGTH: &str = "IntLength";
pub const ROP: &str = "ROP";
pub const DRILLING_HOURS: &str = "Drilling_Hours";
pub const AMW: &str = "AMW";

// Solids control / fluids
pub const DSRE: &str = "DSRE";
pub const DILUTION_RATIO: &str = "Dilution_Ratio";
pub const DISCARD_RATIO: &str = "Discard Ratio";
pub const HAUL_OFF: &str = "Haul_OFF";
pub const TOTAL_DIL: &str = "Total_Dil";
pub const BASE_OIL: &str = "Base_Oil";
pub const WATER: &str = "Water";
pub const CHEMICALS: &str = "Chemicals";

/// Parameters offered by the per-well comparison chart.
pub const COMPARISON_PARAMETERS: &[&str] = &[
    "DSRE",
    "TMLDR",
    "Discard Ratio",
    "TLML",
    "Down_Loss",
    "Evap_Loss",
    "Total_SCE",
    "Total_Dil",
    "ROP",
    "Temp",
    "DOW",
    "IntLength",
    "AMW",
    "Drilling_Hours",
    "Haul_OFF",
    "Base_Oil",
    "Water",
    "Weight_Material",
    "Chemicals",
    "Reserve_Adds",
    "Dilution_Ratio",
    "Dil_Per_Hole_Vol_Ratio",
    "Solids_Generated",
    "Average_LGS%",
];

/// Metrics plotted on the sales trend chart.
pub const TREND_METRICS: &[&str] = &[DSRE, DILUTION_RATIO, DISCARD_RATIO, MD_DEPTH];
