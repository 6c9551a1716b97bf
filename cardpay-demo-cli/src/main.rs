//! CardPay Demo CLI
//!
//! Command-line interface for building signed CardPay requests and checking
//! bank callbacks.

use anyhow::Result;
use cardpay_lib::ProtocolVariant;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod ui;

#[derive(Parser)]
#[command(name = "cardpay-demo")]
#[command(about = "CardPay Demo CLI - Sign payment requests and verify bank callbacks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Merchant configuration file (JSON). Falls back to CARDPAY_* env vars.
    #[arg(short, long, global = true, env = "CARDPAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured protocol generation (legacy, hmac256)
    #[arg(long, global = true)]
    variant: Option<ProtocolVariant>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the known-answer self-test
    SelfTest {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build and sign a payment request
    Request {
        /// Amount, e.g. 1234.50
        #[arg(short, long)]
        amount: String,

        /// Currency, alphabetic or numeric (EUR, 978)
        #[arg(long, default_value = "EUR")]
        currency: String,

        /// Variable symbol (up to 10 digits)
        #[arg(long)]
        vs: u64,

        /// Return URL
        #[arg(long)]
        rurl: String,

        /// Client IP address
        #[arg(long, default_value = "127.0.0.1")]
        ip: String,

        /// Client name
        #[arg(long)]
        name: String,

        /// Timestamp ddMMyyyyHHmmss (HMAC only; defaults to now)
        #[arg(long)]
        timestamp: Option<String>,

        /// Enforce strict field validation
        #[arg(long)]
        strict: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Verify a bank callback query string
    Verify {
        /// Query string the bank appended to the return URL
        query: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved merchant configuration
    Config {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "cardpay_demo_cli=debug,cardpay_lib=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let source = commands::ConfigSource {
        path: cli.config,
        variant: cli.variant,
    };

    match cli.command {
        Commands::SelfTest { json } => commands::self_test::run(json, cli.verbose),
        Commands::Request {
            amount,
            currency,
            vs,
            rurl,
            ip,
            name,
            timestamp,
            strict,
            json,
        } => {
            let args = commands::request::RequestArgs {
                amount,
                currency,
                variable_symbol: vs,
                return_url: rurl,
                client_ip: ip,
                client_name: name,
                timestamp,
                strict,
            };
            commands::request::run(&source, args, json)
        }
        Commands::Verify { query, json } => commands::verify::run(&source, &query, json),
        Commands::Config { json } => commands::config::run(&source, json),
    }
}
