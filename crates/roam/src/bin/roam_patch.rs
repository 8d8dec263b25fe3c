//! `roam-patch`: apply a merge-patch document to a roaming resource.
//!
//! Usage:
//!   roam-patch <kind> '<patch-json>' [--allow-downgrade]
//!
//! The resource is read from stdin. Prints the patched resource as canonical
//! JSON on the first line and its change token on the second.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use roam::cli::{self, ResourceKind};
use roam::{PatchOptions, TraceId};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((kind, patch, allow_downgrade)) = cli::parse_patch_args(&args) else {
        eprintln!("usage: roam-patch <kind> '<patch-json>' [--allow-downgrade]");
        return ExitCode::FAILURE;
    };

    let kind: ResourceKind = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let options = PatchOptions::new(TraceId::generate()).allow_downgrade(allow_downgrade);
    match cli::patch(kind, buf.trim(), patch, &options) {
        Ok(out) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{}\n{}", out.document, out.etag) {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
