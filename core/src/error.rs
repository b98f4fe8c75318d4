//! The detection core never fails on well-formed input (§7) — there is no
//! `Result`-returning engine operation. This module exists purely so the
//! HTTP boundary (`aegis-api`) and any other collaborator can report
//! failures using a shared, machine-readable vocabulary of error codes.
pub mod codes {
    pub const VALIDATION_FAILED: &str = "validation_failed";
    pub const NOT_FOUND: &str = "not_found";
    pub const INTERNAL_ERROR: &str = "internal_error";
}
