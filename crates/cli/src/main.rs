use clap::{Parser, Subcommand, ValueEnum};
use netstack_application::ports::JobOutcome;
use netstack_application::use_cases::{AddressFamily, FetchResult, HostResolution};
use netstack_domain::CliOverrides;
use serde_json::json;
use std::io::Write;
use std::net::SocketAddr;
use tracing::{error, info};

mod bootstrap;
mod di;

#[derive(Parser)]
#[command(name = "netstack")]
#[command(version)]
#[command(about = "netstack - stub DNS resolver and file: URL loader")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Nameserver to query, repeatable (e.g. 9.9.9.9:53)
    #[arg(short = 'n', long = "nameserver", value_name = "ADDR")]
    nameservers: Vec<SocketAddr>,

    /// Base per-attempt timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Retries per nameserver
    #[arg(long)]
    attempts: Option<u8>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a hostname to addresses in preference order
    Resolve {
        host: String,

        #[arg(short, long, value_enum, default_value_t = Family::Any)]
        family: Family,
    },

    /// Load a file: URL and print its contents or directory listing
    Fetch { url: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum Family {
    Any,
    Ipv4,
    Ipv6,
}

impl From<Family> for AddressFamily {
    fn from(family: Family) -> Self {
        match family {
            Family::Any => AddressFamily::Any,
            Family::Ipv4 => AddressFamily::Ipv4,
            Family::Ipv6 => AddressFamily::Ipv6,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        nameservers: cli.nameservers.clone(),
        timeout_ms: cli.timeout_ms,
        attempts: cli.attempts,
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting netstack v{}", env!("CARGO_PKG_VERSION"));

    let use_cases = di::UseCases::new(&config)?;

    match cli.command {
        Command::Resolve { host, family } => {
            let resolution = use_cases
                .resolve_host
                .execute(&host, family.into())
                .await
                .inspect_err(|e| error!(host = %host, error = %e, "Resolution failed"))?;
            print_resolution(&resolution)?;
        }
        Command::Fetch { url } => {
            let fetched = use_cases
                .fetch_url
                .execute(&url)
                .await
                .inspect_err(|e| error!(url = %url, error = %e, code = e.code(), "Fetch failed"))?;
            print_fetch(&fetched)?;
        }
    }

    Ok(())
}

fn print_resolution(resolution: &HostResolution) -> anyhow::Result<()> {
    let body = json!({
        "hostname": &*resolution.hostname,
        "canonical_name": resolution.canonical_name,
        "addresses": resolution.addresses,
        "min_ttl": resolution.min_ttl,
    });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn print_fetch(fetched: &FetchResult) -> anyhow::Result<()> {
    match &fetched.outcome {
        JobOutcome::Data(bytes) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
        JobOutcome::DirectoryListing(entries) => {
            let entries: Vec<_> = entries
                .iter()
                .map(|e| json!({ "name": e.name, "is_dir": e.is_dir, "size": e.size }))
                .collect();
            let body = json!({
                "url": fetched.final_request.to_string(),
                "entries": entries,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        JobOutcome::Redirect(target) => {
            println!("{}", json!({ "redirect": target.to_string() }));
        }
    }
    Ok(())
}
