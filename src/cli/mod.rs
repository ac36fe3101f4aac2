//! Thin command-line driver, kept outside the core transpilation library.
//!
//! Reads a Bash source file (or stdin), runs the [`crate::transpile`]
//! pipeline, writes the emitted module to stdout or `-o`, and prints
//! diagnostics to stderr in the `severity[:code] at L:C in <context>:
//! <message>` format. Exit code policy: 0 on no error-level diagnostic,
//! 1 otherwise.

use crate::diagnostics::{has_errors, Diagnostic};
use crate::emitter::Config;
use clap::Parser;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

/// `bashc <input> [-o output] [--strict] [--no-imports] [--module-path P]`
#[derive(Parser, Debug)]
#[command(name = "bashc")]
#[command(about = "Bash-to-Deno/TypeScript transpiler")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Input Bash file, or "-" to read from stdin.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Write the emitted module here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Use the strict (throw-on-first-error) front end instead of the
    /// diagnostic-collecting recovery mode that is the CLI default.
    #[arg(long)]
    pub strict: bool,

    /// Omit the runtime-library import preamble from the emitted module.
    #[arg(long)]
    pub no_imports: bool,

    /// Import specifier for the runtime shell-API library.
    #[arg(long, default_value = "./runtime.ts")]
    pub module_path: String,
}

/// Runs the CLI end to end, writing output/diagnostics to the given
/// streams. Returns the process exit code: 0 on no errors, 1 otherwise.
pub fn run(cli: Cli, stdout: &mut impl Write, stderr: &mut impl Write) -> io::Result<i32> {
    let source = read_input(&cli.input)?;

    let config = Config {
        module_path: cli.module_path.clone(),
        emit_imports: !cli.no_imports,
        strict: cli.strict,
        ..Config::default()
    };

    let output = crate::transpile(&source, config);

    for diagnostic in &output.diagnostics {
        writeln!(stderr, "{diagnostic}")?;
    }

    match &cli.output {
        Some(path) => {
            fs::write(path, &output.code)?;
        }
        None => {
            write!(stdout, "{}", output.code)?;
        }
    }

    Ok(exit_code(&output.diagnostics))
}

fn read_input(path: &PathBuf) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}

fn exit_code(diagnostics: &[Diagnostic]) -> i32 {
    if has_errors(diagnostics) {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_is_zero_without_error_diagnostics() {
        let diagnostics = vec![Diagnostic::warning("unsupported thing")];
        assert_eq!(exit_code(&diagnostics), 0);
    }

    #[test]
    fn exit_code_is_one_with_an_error_diagnostic() {
        let diagnostics = vec![Diagnostic::error("boom")];
        assert_eq!(exit_code(&diagnostics), 1);
    }

    #[test]
    fn run_emits_code_to_stdout_by_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("script.sh");
        fs::write(&input, "echo hello\n").expect("write script");

        let cli = Cli {
            input,
            output: None,
            strict: false,
            no_imports: false,
            module_path: "./runtime.ts".to_string(),
        };

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = run(cli, &mut stdout, &mut stderr).expect("run");

        assert_eq!(code, 0);
        assert!(String::from_utf8_lossy(&stdout).contains(r#"$.echo("hello")"#));
        assert!(stderr.is_empty());
    }

    #[test]
    fn run_writes_to_output_file_when_given() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("script.sh");
        let output = dir.path().join("out.ts");
        fs::write(&input, "cd /tmp\n").expect("write script");

        let cli = Cli {
            input,
            output: Some(output.clone()),
            strict: false,
            no_imports: false,
            module_path: "./runtime.ts".to_string(),
        };

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        run(cli, &mut stdout, &mut stderr).expect("run");

        assert!(stdout.is_empty());
        let written = fs::read_to_string(&output).expect("read output");
        assert!(written.contains(r#"$.cd("/tmp")"#));
    }
}
