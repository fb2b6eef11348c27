//! Parser error type.

/// A sentinel returned once a syntax error has been written to the
/// diagnostic sink.
///
/// `spec.md` §9's "Error propagation" design note prefers a uniform
/// result-type discipline over the original C's direct `exit(EXIT_FAILURE)`
/// call from inside `match()`: the parser reports the error and returns
/// `Err`, and it's the driver's job to decide the process exits non-zero,
/// so tests can capture the diagnostic instead of killing the test process.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("syntax error")]
pub struct SyntaxError;
