//! Semantic error taxonomy, per `spec.md` §7.

/// Every way the checker can reject a program. `Ok` in the surrounding
/// `Result` is the taxonomy's `OK` sentinel; there's no variant for it
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SemanticError {
    #[error("type mismatch")]
    TypeMismatch,
    #[error("invalid operand type")]
    TypeInvalidOperands,
    #[error("variable already exists")]
    VarAlreadyExists,
    #[error("variable does not exist")]
    VarNotExists,
    #[error("function already exists")]
    FunAlreadyExists,
    #[error("function does not exist")]
    FunNotExists,
    #[error("function arity does not match")]
    FunArityNotMatch,
    #[error("type does not exist")]
    TypeNotExists,
    #[error("unexpected type")]
    UnexpectedType,
}
