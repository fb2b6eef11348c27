//! `velac` — `spec.md` §6: `compiler <source-path>`, assembly on stdout,
//! diagnostics on stderr.

use clap::Parser as _;
use velac_drv::{compile, CompileError, Config, EmitType};

#[derive(clap::Parser, Debug)]
#[command(name = "velac", version, about = "A whole-program single-file x86-64 compiler")]
struct Cli {
    /// Path to the source file to compile.
    source_path: std::path::PathBuf,

    /// Which pipeline stage to print instead of the final assembly.
    #[arg(long, value_enum)]
    emit: Option<EmitType>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config {
        input_file: cli.source_path,
        emit: cli.emit.unwrap_or_default(),
    };

    match compile(&config) {
        Ok(output) => println!("{output}"),
        Err(CompileError::Io(path, err)) => {
            eprintln!("error: {}: {err}", path.display());
            std::process::exit(1);
        }
        // The failing stage already wrote its diagnostic to stderr; only
        // the exit code is left to decide.
        Err(CompileError::ParseFailed | CompileError::CheckFailed | CompileError::CodegenFailed) => {
            std::process::exit(1);
        }
    }
}
