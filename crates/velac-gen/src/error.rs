//! Code generation failure modes.
//!
//! The source models most of these as `assert(false && "unimplemented")`
//! or an unchecked register-stack overflow (`spec.md` §4.4). Per the same
//! uniform result-type discipline used in `velac-par` and `velac-sem`
//! (`spec.md` §9's error-propagation note), this crate turns both into a
//! `Result` so a caller can report and move on instead of aborting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CodegenError {
    /// Exceeded the eight-register ad-hoc stack; there is no spilling.
    #[error("register stack overflow")]
    RegisterStackOverflow,
    /// Comparison operators, logical operators, and function calls have
    /// no lowering defined — `spec.md` §4.4 explicitly leaves them
    /// "not yet lowered".
    #[error("unimplemented codegen path")]
    Unimplemented,
}
