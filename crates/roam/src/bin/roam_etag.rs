//! `roam-etag`: print the change token of a roaming resource.
//!
//! Usage:
//!   roam-etag <kind>
//!
//! The resource is read from stdin.

use std::io::{self, Read};
use std::process::ExitCode;

use roam::cli::{self, ResourceKind};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let kind: ResourceKind = match std::env::args().nth(1).map(|k| k.parse()) {
        Some(Ok(kind)) => kind,
        Some(Err(e)) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
        None => {
            eprintln!("First argument must be a resource kind.");
            return ExitCode::FAILURE;
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match cli::etag(kind, buf.trim()) {
        Ok(etag) => {
            println!("{etag}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
