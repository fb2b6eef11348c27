//! Type and scope checking.

pub mod checker;
pub mod error;
pub mod scope;
pub mod types;

pub use checker::check_program;
pub use error::SemanticError;
pub use scope::{CompiledFunction, CompiledParameter, CompiledVariable, ScopeChain};
pub use types::{TypeInfo, TypeKind};
