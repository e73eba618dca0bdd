//! Application constants for the manufacturing KPI pipeline
//!
//! Column names are fixed contracts with the input and output files; they
//! are collected here together with file names and default lookup data.

// =============================================================================
// Input and Output Files
// =============================================================================

pub const PRODUCTION_FILE: &str = "production_data.csv";
pub const QUALITY_FILE: &str = "quality_data.csv";
pub const PRODUCT_MASTER_FILE: &str = "product_master.csv";

pub const FINAL_DATASET_FILE: &str = "final_monthly_dataset.csv";
pub const PRODUCTION_REPORT_FILE: &str = "production_data_quality_report.csv";
pub const QUALITY_REPORT_FILE: &str = "quality_data_quality_report.csv";

/// Table names used in error messages and logs
pub mod tables {
    pub const PRODUCTION: &str = "production_data";
    pub const QUALITY: &str = "quality_data";
    pub const PRODUCT_MASTER: &str = "product_master";
}

// =============================================================================
// Column Contracts
// =============================================================================

/// Columns of the production log
pub mod production_columns {
    pub const PLANT_ID: &str = "plant_id";
    pub const PRODUCTION_LINE: &str = "production_line";
    pub const PRODUCT_CODE: &str = "product_code";
    pub const PRODUCTION_DATE: &str = "production_date";
    pub const UNITS_PRODUCED: &str = "units_produced";
    pub const PLANNED_UNITS: &str = "planned_units";
    pub const DOWNTIME_MINUTES: &str = "downtime_minutes";

    /// Columns that must be present; downtime may be absent and defaults to 0
    pub const REQUIRED: &[&str] = &[
        PLANT_ID,
        PRODUCTION_LINE,
        PRODUCT_CODE,
        PRODUCTION_DATE,
        UNITS_PRODUCED,
        PLANNED_UNITS,
    ];

    /// Text columns normalized before validation
    pub const TEXT: &[&str] = &[PLANT_ID, PRODUCTION_LINE, PRODUCT_CODE];

    /// Columns checked for non-positive values in the quality report
    pub const NUMERIC: &[&str] = &[UNITS_PRODUCED, PLANNED_UNITS, DOWNTIME_MINUTES];
}

/// Columns of the quality-inspection log
pub mod quality_columns {
    pub const PLANT_ID: &str = "plant_id";
    pub const PRODUCT_CODE: &str = "product_code";
    pub const INSPECTION_DATE: &str = "inspection_date";
    pub const UNITS_INSPECTED: &str = "units_inspected";
    pub const DEFECT_UNITS: &str = "defect_units";

    pub const REQUIRED: &[&str] = &[
        PLANT_ID,
        PRODUCT_CODE,
        INSPECTION_DATE,
        UNITS_INSPECTED,
        DEFECT_UNITS,
    ];

    pub const TEXT: &[&str] = &[PLANT_ID, PRODUCT_CODE];

    pub const NUMERIC: &[&str] = &[UNITS_INSPECTED, DEFECT_UNITS];
}

/// Columns of the product master
pub mod master_columns {
    pub const PRODUCT_CODE_RAW: &str = "product_code_raw";
    pub const PRODUCT_CODE_STD: &str = "product_code_std";
    pub const PRODUCT_FAMILY: &str = "product_family";

    pub const REQUIRED: &[&str] = &[PRODUCT_CODE_RAW, PRODUCT_CODE_STD, PRODUCT_FAMILY];
}

/// Columns of the final monthly dataset, in output order
pub const FINAL_DATASET_COLUMNS: &[&str] = &[
    "plant_id",
    "production_line",
    "product_code_std",
    "product_family",
    "month",
    "units_produced",
    "planned_units",
    "downtime_minutes",
    "units_inspected",
    "defect_units",
    "production_efficiency",
    "defect_rate",
    "downtime_per_unit",
    "performance_rank",
    "risk_score",
    "risk_level",
];

/// Columns of a data quality report, in output order
pub const QUALITY_REPORT_COLUMNS: &[&str] =
    &["column", "missing_pct", "invalid_count", "duplicate_rows"];

// =============================================================================
// Normalization and Parsing Defaults
// =============================================================================

/// Text rendered for a null cell by the text normalizer
pub const NULL_TEXT: &str = "NAN";

/// Known production line spellings and their canonical codes
pub const DEFAULT_LINE_CODES: &[(&str, &str)] = &[
    ("L1", "LINE01"),
    ("LINE-1", "LINE01"),
    ("LINE1", "LINE01"),
    ("L2", "LINE02"),
    ("LINE-2", "LINE02"),
    ("LINE2", "LINE02"),
    ("L3", "LINE03"),
    ("LINE-3", "LINE03"),
    ("LINE3", "LINE03"),
];

/// Date formats tried in order when deriving the month bucket
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%b-%Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Cell values read as null by the input reader
pub const DEFAULT_NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// =============================================================================
// Risk Scoring Defaults
// =============================================================================

pub mod risk {
    pub const EFFICIENCY_WEIGHT: f64 = 50.0;
    pub const DEFECT_WEIGHT: f64 = 30.0;
    pub const DOWNTIME_WEIGHT: f64 = 20.0;

    pub const MIN_SCORE: f64 = 0.0;
    pub const MAX_SCORE: f64 = 100.0;

    /// Inclusive upper edge of the LOW band
    pub const LOW_UPPER: f64 = 30.0;
    /// Inclusive upper edge of the MEDIUM band
    pub const MEDIUM_UPPER: f64 = 60.0;
}
