use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tape_compiler::{compile, compile_to_result, parse, CompileOptions, CONTEXT_RADIUS};
use tape_parser::DEFAULT_MAX_DEPTH;
use tape_types::ast::Dialect;
use tape_types::{context_window, TapeError};

/// Compile a tape program to Go source.
#[derive(Parser)]
#[command(name = "tapec", version, about)]
struct Options {
    /// Source file. Reads stdin when omitted or `-`.
    file: Option<PathBuf>,
    /// Treat `{`, `}` and `!` as comments.
    #[arg(long)]
    classic: bool,
    /// Deepest allowed nesting of loops and function bodies.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    /// Print a JSON compile result instead of Go source.
    #[arg(long)]
    json: bool,
    /// Execute the program instead of emitting code.
    #[arg(long, conflicts_with = "json")]
    run: bool,
    /// Bytes fed to `,` when running.
    #[arg(long, default_value = "")]
    input: String,
}

impl Options {
    fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            dialect: if self.classic {
                Dialect::Classic
            } else {
                Dialect::Extended
            },
            max_depth: self.max_depth,
            ..CompileOptions::default()
        }
    }

    fn display_name(&self) -> String {
        match &self.file {
            Some(path) if path.as_os_str() != "-" => path.display().to_string(),
            _ => "<stdin>".to_string(),
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let options = Options::parse();
    let source = read_source(options.file.as_ref())?;
    let compile_options = options.compile_options();

    if options.json {
        let result = compile_to_result(&source, &options.display_name(), &compile_options);
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(exit_code(result.success));
    }

    if options.run {
        let program = match parse(&source, &compile_options) {
            Ok(program) => program,
            Err(error) => return Ok(report(&source, &error)),
        };
        return match tape_eval::run(&program, options.input.as_bytes()) {
            Ok(outcome) => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(&outcome.output)?;
                stdout.flush()?;
                Ok(ExitCode::SUCCESS)
            }
            Err(error) => {
                eprintln!("Error: {error}");
                Ok(ExitCode::FAILURE)
            }
        };
    }

    match compile(&source, &compile_options) {
        Ok(code) => {
            print!("{code}");
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => Ok(report(&source, &error)),
    }
}

fn read_source(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display())),
        _ => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("failed to read stdin")?;
            Ok(source)
        }
    }
}

/// Print a parse error with the surrounding source.
fn report(source: &str, error: &TapeError) -> ExitCode {
    eprintln!("{error}");
    eprintln!(
        "Details: {}",
        context_window(source, error.span, CONTEXT_RADIUS)
    );
    ExitCode::FAILURE
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Install a stderr subscriber when `TAPE_LOG` or `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let directives = ["TAPE_LOG", "RUST_LOG"]
        .into_iter()
        .find_map(|var| std::env::var(var).ok());
    if let Some(directives) = directives {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::new(directives))
            .init();
    }
}
