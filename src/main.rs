use clap::Parser;
use loxscan::driver::{EX_IOERR, EX_USAGE};
use loxscan::{Discard, Lox, LoxError, TokenConsumer, TokenPrinter};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(version, about = "Scan Lox source into tokens")]
struct Args {
    /// Script to scan; without one, lines are read from stdin
    scripts: Vec<PathBuf>,

    /// Scan without printing tokens
    #[arg(short, long)]
    quiet: bool,

    #[arg(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.debug);

    if args.scripts.len() > 1 {
        eprintln!("Usage: loxscan [script]");
        return ExitCode::from(EX_USAGE);
    }

    let mut consumer: Box<dyn TokenConsumer> = if args.quiet {
        Box::new(Discard)
    } else {
        Box::new(TokenPrinter::new(io::stdout()))
    };
    let mut lox = Lox::new(io::stdout(), io::stderr());

    let result = match args.scripts.first() {
        Some(script) => lox.run_file(script, consumer.as_mut()).map(|o| o.exit_code()),
        None => lox
            .run_prompt(io::stdin().lock(), consumer.as_mut())
            .map(|_| 0),
    };

    match result {
        Ok(code) => {
            debug!(code, "exiting");
            ExitCode::from(code)
        }
        Err(err) => {
            eprintln!("{}", err);
            match err {
                LoxError::ReadFile { .. } => ExitCode::from(EX_IOERR),
                LoxError::Io(_) => ExitCode::FAILURE,
            }
        }
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}
