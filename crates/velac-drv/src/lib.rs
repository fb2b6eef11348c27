//! Driver: read a source file, run it through the lex → parse → check →
//! codegen pipeline, and render the result for the CLI.
//!
//! Grounded on `faxc-drv::Session::compile`'s overall shape (read source,
//! run each stage, bail out on the first stage that fails) but reduced to
//! the single axis this compiler has: one input file and a choice of which
//! intermediate stage to print, via [`EmitType`].

use std::fmt;
use std::path::{Path, PathBuf};

use velac_gen::AsmGenerator;
use velac_lex::Lexer;
use velac_par::Parser;
use velac_sem::check_program;
use velac_util::Handler;

/// Which pipeline stage's output to print, selected by `--emit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum EmitType {
    Tokens,
    Ast,
    #[default]
    Asm,
}

/// Reduced to the single axis this compiler actually has: one input file,
/// no output file (assembly always goes to stdout per `spec.md` §6), and
/// no optimizer.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_file: PathBuf,
    pub emit: EmitType,
}

impl Config {
    pub fn new(input_file: impl Into<PathBuf>) -> Self {
        Self {
            input_file: input_file.into(),
            emit: EmitType::Asm,
        }
    }
}

/// Failure modes the driver reports. `ParseFailed`/`CheckFailed` carry no
/// payload: the failing stage already wrote its diagnostic to the
/// [`Handler`] before returning, per `spec.md` §7 ("diagnostics are
/// emitted and the process exits"), so there's nothing left to print but
/// the exit code.
#[derive(Debug)]
pub enum CompileError {
    Io(PathBuf, std::io::Error),
    ParseFailed,
    CheckFailed,
    CodegenFailed,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Io(path, err) => write!(f, "{}: {err}", path.display()),
            CompileError::ParseFailed | CompileError::CheckFailed | CompileError::CodegenFailed => {
                write!(f, "compilation failed")
            }
        }
    }
}

impl std::error::Error for CompileError {}

fn read_source(path: &Path) -> Result<String, CompileError> {
    std::fs::read_to_string(path).map_err(|err| CompileError::Io(path.to_path_buf(), err))
}

/// Runs the full pipeline and returns the rendering of whichever stage
/// `config.emit` selects. `spec.md` §9's error-propagation note pushes the
/// `exit` policy up to the caller: this function only ever returns
/// `Result`, it never aborts the process itself.
pub fn compile(config: &Config) -> Result<String, CompileError> {
    let source = read_source(&config.input_file)?;
    tracing::debug!(bytes = source.len(), "read source file");

    let handler = Handler::new();

    let tokens = Lexer::new(&source, &handler).tokenize();
    tracing::debug!(count = tokens.len(), "lexed tokens");
    if config.emit == EmitType::Tokens {
        return Ok(format!("{tokens:#?}"));
    }

    let mut parser = Parser::new(tokens, &handler);
    // The parser already wrote the diagnostic that caused a syntax error;
    // `spec.md` §7 treats this as fatal, so there is nothing further to
    // attempt once it fails.
    let ast = parser.parse_program().map_err(|_| CompileError::ParseFailed)?;
    tracing::debug!(count = ast.functions.len(), "parsed functions");
    if config.emit == EmitType::Ast {
        return Ok(format!("{ast:#?}"));
    }

    let functions = check_program(&ast, &handler);
    tracing::debug!(count = functions.len(), "checked functions");
    if handler.has_errors() {
        return Err(CompileError::CheckFailed);
    }

    let mut generator = AsmGenerator::new();
    let asm = generator
        .generate_program(&ast.functions)
        .map_err(|_| CompileError::CodegenFailed)?
        .to_string();
    tracing::debug!(bytes = asm.len(), "generated assembly");
    Ok(asm)
}
