/// Rhyme Finder Constants

// =============================================================================
// WORD API
// =============================================================================

/// Datamuse API base URL
pub const DATAMUSE_API_URL: &str = "https://api.datamuse.com";

/// Upper bound on a single word API request, in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Path of the word query endpoint
pub const WORDS_ENDPOINT: &str = "/words";

/// Field the rhyme results are grouped by
pub const SYLLABLES_FIELD: &str = "numSyllables";

/// Unit shown in rhyme group headings
pub const SYLLABLE_UNIT: &str = "syllable";

// =============================================================================
// DISPLAY TEXT
// =============================================================================

/// Description shown while a lookup is in flight
pub const LOADING_TEXT: &str = "...loading";

/// Description shown when the API returned nothing
pub const NO_RESULTS_TEXT: &str = "(no results)";

/// Separator for the saved words line
pub const SAVED_WORDS_SEPARATOR: &str = ", ";

// =============================================================================
// API SERVER
// =============================================================================

/// Default API server bind address
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";

/// Default API server port
pub const DEFAULT_API_PORT: u16 = 3000;

// =============================================================================
// LOGGING
// =============================================================================

/// Default tracing filter when RUST_LOG and LOG_FILTER are unset
pub const DEFAULT_LOG_FILTER: &str = "info";
