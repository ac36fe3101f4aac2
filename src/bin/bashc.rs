use bashc::cli::{run, Cli};
use clap::Parser;
use std::io;
use std::process;

fn main() {
    #[cfg(feature = "tracing-subscriber")]
    if std::env::var("BASHC_LOG").is_ok() {
        tracing_subscriber::fmt::init();
    }

    let cli = Cli::parse();
    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut stdout = stdout.lock();
    let mut stderr = stderr.lock();

    match run(cli, &mut stdout, &mut stderr) {
        Ok(code) => process::exit(code),
        Err(error) => {
            eprintln!("error: {error}");
            process::exit(2);
        }
    }
}
