//! User-facing messages produced by the wizard

pub const LOADING: &str = "Loading...";

pub const PATTERN_DOES_NOT_MATCH: &str = "Pattern does not match any existing indices";
pub const NON_UNIQUE_INDEX_NAMES: &str =
    "Invalid pattern: the interval does not create unique index names";

pub const SET_INDEX_NAME_FIRST: &str = "Set an index name first";
pub const INTERVAL_REQUIRED: &str = "An interval is required to populate indices";

pub const NO_INDICES_FOR_MAPPING: &str =
    "Unable to fetch mapping. Do you have indices matching the pattern?";
pub const MAPPING_ACCESS_DENIED: &str =
    "Unable to fetch mapping, access to this index pattern was denied.";

pub const INDICES_ACCESS_DENIED: &str =
    "Could not locate indices matching the pattern, access was forbidden.";
pub const NO_INDICES_MATCH: &str = "No indices match the pattern";

pub const TIME_FIELD_REQUIRED: &str = "A time field is required for time-based index patterns";
pub const STILL_CHECKING: &str = "Still checking the pattern against existing indices";
