//! MikroTik API CLI
//!
//! Logs in to a device, runs one command and prints the reply rows.

use clap::Parser;
use mikrotik_api::{Config, Session};
use tracing_subscriber::{fmt, EnvFilter};

/// MikroTik API CLI
#[derive(Parser, Debug)]
#[command(name = "mikrotik-cli")]
#[command(about = "Run a command on a MikroTik device over the API")]
#[command(version)]
struct Args {
    /// Device address (host:port)
    #[arg(short, long, default_value = "192.168.88.1:8728")]
    address: String,

    /// Login name
    #[arg(short, long, default_value = "admin")]
    user: String,

    /// Login password
    #[arg(short, long, env = "MIKROTIK_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    /// Timeout for the dial and for every read/write, in milliseconds
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    /// Attribute every reply row must carry (e.g. =name), repeatable
    #[arg(short, long = "mandatory")]
    mandatory: Vec<String>,

    /// Trace every word sent and received
    #[arg(short, long)]
    verbose: bool,

    /// Command path followed by its argument words
    #[arg(required = true)]
    words: Vec<String>,
}

fn main() {
    let args = Args::parse();

    // Initialize tracing/logging
    let default_filter = if args.verbose {
        "info,mikrotik_api=trace"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::builder()
        .address(&args.address)
        .timeout_ms(args.timeout_ms)
        .build();

    if let Err(e) = config.validate() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    let mut session: Session = Session::new(config);

    if let Err(e) = session.connect(&args.user, &args.password) {
        tracing::error!("Login to {} failed: {}", args.address, e);
        std::process::exit(1);
    }
    tracing::info!("Logged in to {} as {}", args.address, args.user);

    let rows = match session.query(&args.words[..], &args.mandatory[..]) {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Command failed: {}", e);
            std::process::exit(1);
        }
    };

    for row in &rows {
        println!("{}", row);
    }

    let traffic = session.traffic();
    tracing::info!(
        "{} rows, {} bytes in, {} bytes out",
        rows.len(),
        traffic.bytes_in,
        traffic.bytes_out
    );

    session.close();
}
