//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scheduled sync jobs rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args)               |
//! | 3-9     | sync             | Configuration / input / partial sync     |
//! | 50-59   | fetch            | External data source connectors          |

use benchcat_recon::ReconError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Sync (3-9)
// =============================================================================

/// Catalog configuration missing, malformed, or invalid. Fatal to the pass.
pub const EXIT_CONFIG: u8 = 3;

/// Input file (payload, CSV, content tree) unreadable or unparseable.
pub const EXIT_INPUT: u8 = 4;

/// Sync finished but at least one benchmark or metadata record failed.
pub const EXIT_PARTIAL: u8 = 6;

// =============================================================================
// Fetch / adapter (50-59): external data source connectors
// =============================================================================

/// No API key provided (neither flag nor env var).
pub const EXIT_FETCH_NOT_AUTH: u8 = 50;

/// Auth rejected by upstream (401/403).
pub const EXIT_FETCH_AUTH: u8 = 51;

/// Bad request rejected by upstream (400).
pub const EXIT_FETCH_VALIDATION: u8 = 52;

/// Rate limited after retries (429).
pub const EXIT_FETCH_RATE_LIMIT: u8 = 53;

/// Upstream error (5xx), malformed payload, or network failure after retries.
pub const EXIT_FETCH_UPSTREAM: u8 = 54;

// =============================================================================
// Engine Error Types
// =============================================================================

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CONFIG,
        ReconError::Io(_) | ReconError::CorruptRecord { .. } => EXIT_INPUT,
        ReconError::UnknownBenchmark(_) => EXIT_USAGE,
        ReconError::Serialize(_) => EXIT_ERROR,
    }
}
