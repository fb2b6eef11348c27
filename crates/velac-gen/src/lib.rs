//! x86-64 assembly code generation.

pub mod asm;
pub mod error;
pub mod register;

pub use asm::AsmGenerator;
pub use error::CodegenError;
pub use register::{Register, RegisterStack};
