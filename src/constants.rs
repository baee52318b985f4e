//! Application constants for the rally scorer
//!
//! This module contains configuration constants, default values, column
//! names and status codes used throughout the rally scorer application.

// =============================================================================
// Settings File Patterns
// =============================================================================

/// Glob pattern for the competitor roster table
pub const ENTRIES_FILE_PATTERN: &str = "entries*.csv";

/// Glob pattern for the rank-to-points table
pub const POINTS_FILE_PATTERN: &str = "point*.csv";

/// Glob pattern for the section definition table
pub const SECTIONS_FILE_PATTERN: &str = "section*.csv";

/// Glob pattern for timing files in the race folder
pub const TIMING_FILE_PATTERN: &str = "*.csv";

// =============================================================================
// Settings Table Columns
// =============================================================================

/// Column names of the roster (entries) table
pub mod roster_columns {
    pub const BIB: &str = "No";
    pub const DRIVER_NAME: &str = "DriverName";
    pub const DRIVER_AGE: &str = "DriverAge";
    pub const CO_DRIVER_NAME: &str = "CoDriverName";
    pub const CO_DRIVER_AGE: &str = "CoDriverAge";
    pub const CAR_NAME: &str = "CarName";
    pub const CAR_YEAR: &str = "CarYear";
    pub const CAR_CLASS: &str = "CarClass";
    pub const COEFFICIENT: &str = "Coef";
    pub const AGE_COEFFICIENT: &str = "AgeCoef";

    /// Columns that must be present for the roster to load
    pub const REQUIRED: &[&str] = &[BIB, DRIVER_AGE, CO_DRIVER_AGE, CAR_YEAR, COEFFICIENT, AGE_COEFFICIENT];
}

/// Column names of the points table
pub mod points_columns {
    pub const RANK: &str = "Order";
    pub const POINT: &str = "Point";

    pub const REQUIRED: &[&str] = &[RANK, POINT];
}

/// Column names of the section table
pub mod section_columns {
    pub const KIND: &str = "type";
    pub const SECTION: &str = "section";
    pub const NAME: &str = "name";
    pub const TARGET_TIME: &str = "time";
    pub const GROUP: &str = "GROUP";
    pub const DAY: &str = "DAY";

    pub const REQUIRED: &[&str] = &[KIND, SECTION, NAME, TARGET_TIME, GROUP];
}

// =============================================================================
// Status Codes
// =============================================================================

/// Manual status override codes as they appear in persisted configuration
pub mod status_codes {
    /// Competitor retired from the section or the event
    pub const RETIRED: &str = "RIT";

    /// Competitor not classified: times shown, excluded from ranking
    pub const NOT_CLASSIFIED: &str = "N.C.";

    /// No-show: no timing data expected at all
    pub const BLANK: &str = "BLNK";
}

// =============================================================================
// Timing and Scoring
// =============================================================================

/// Accepted time-of-day formats for checkpoint timestamps, tried in order
pub const TIME_OF_DAY_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M:%S"];

/// Seconds in one day, added when a GOAL timestamp falls past midnight
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Default points awarded for clearing a CO checkpoint
pub const DEFAULT_CO_POINT: i64 = 500;

/// CO clear window in seconds, starting exactly at the target time
pub const CO_CLEAR_WINDOW_SECONDS: f64 = 60.0;

/// Placeholder shown where a time or differential has no data
pub const NO_DATA_PLACEHOLDER: &str = "-";

// =============================================================================
// Validation Thresholds
// =============================================================================

/// Lane/type column value that marks a manually timed row
pub const MANUAL_LANE_MARKER: &str = "T";

/// PC deviation from target (seconds) that counts toward a measurement fault
pub const PC_DEVIATION_THRESHOLD_SECONDS: f64 = 1.0;

/// Fraction of timed bibs that must deviate before a section is flagged
pub const MEASUREMENT_DEFICIENCY_RATIO: f64 = 0.5;

/// Default persisted configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "rally_config.json";
