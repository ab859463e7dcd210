use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use futures::stream::{self, StreamExt};
use gqlprobe::http::HttpClient;
use gqlprobe::output::ensure_output_dir;
use gqlprobe::probe::{process_target, Outcome};
use gqlprobe::targets::load_targets;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_banner() {
    println!("{}", "                __                 __        ".bright_magenta());
    println!("{}", "   ____ _____ _/ /___  _________  / /_  ___  ".bright_magenta());
    println!("{}", "  / __ `/ __ `/ / __ \\/ ___/ __ \\/ __ \\/ _ \\ ".bright_magenta());
    println!("{}", " / /_/ / /_/ / / /_/ / /  / /_/ / /_/ /  __/ ".bright_magenta());
    println!("{}", " \\__, /\\__, /_/ .___/_/   \\____/_.___/\\___/  ".bright_magenta());
    println!("{}", "/____/   /_/ /_/                             ".bright_magenta());
    println!(
        "  {} {}\n",
        "GraphQL Endpoint Prober".bold().white(),
        format!("v{}", VERSION).dimmed()
    );
}

#[derive(Parser)]
#[command(name = "gqlprobe")]
#[command(version = VERSION)]
#[command(about = "a cli tool that probes urls for graphql endpoints and saves their introspection schemas")]
struct Cli {
    /// Single target URL to probe
    #[arg(short, long)]
    url: Option<String>,

    /// File with one target URL per line
    #[arg(short, long)]
    targets_file: Option<PathBuf>,

    /// Directory where schema files are written
    #[arg(short, long, default_value = ".")]
    output_path: PathBuf,

    /// Custom HTTP headers (can be repeated)
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// HTTP/HTTPS/SOCKS proxy URL
    #[arg(short = 'x', long)]
    proxy: Option<String>,

    /// Number of targets probed concurrently
    #[arg(short, long, default_value_t = 1)]
    workers: usize,

    /// Print per-target results as JSON instead of status lines
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct TargetReport {
    target: String,
    #[serde(flatten)]
    outcome: Outcome,
}

fn parse_headers(headers: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();

    for header in headers {
        // Try JSON format first: {"Authorization": "Bearer token"}
        if header.starts_with('{') {
            let parsed: HashMap<String, String> =
                serde_json::from_str(header).context("Invalid JSON header format")?;
            map.extend(parsed);
        } else if let Some((key, value)) = header.split_once(':') {
            // Standard format: "Authorization: Bearer token"
            map.insert(key.trim().to_string(), value.trim().to_string());
        } else {
            bail!("Invalid header format: {}", header);
        }
    }

    Ok(map)
}

fn collect_targets(cli: &Cli) -> Result<Vec<String>> {
    if let Some(url) = &cli.url {
        return Ok(vec![url.clone()]);
    }

    if let Some(path) = &cli.targets_file {
        return load_targets(path);
    }

    bail!("Either --url (-u) or --targets-file (-t) must be supplied");
}

fn print_outcome(target: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Skipped { reason } => {
            println!("{} Skipping {}: {}", "[-]".red(), target, reason);
        }
        Outcome::NotGraphql => {
            println!(
                "{} {} does not appear to be a GraphQL endpoint",
                "[-]".red(),
                target
            );
        }
        Outcome::SchemaSaved { path } => {
            println!("{} {} is a GraphQL endpoint", "[+]".green(), target);
            println!("    Schema saved to {}", path.display());
        }
        Outcome::IntrospectionFailed => {
            println!("{} {} is a GraphQL endpoint", "[+]".green(), target);
            println!("    {} Introspection failed", "[!]".yellow());
        }
        Outcome::SaveFailed { error } => {
            println!("{} {} is a GraphQL endpoint", "[+]".green(), target);
            println!("    {} Failed to save schema: {}", "[!]".yellow(), error);
        }
    }
}

fn print_summary(reports: &[TargetReport]) {
    let mut saved = 0;
    let mut not_graphql = 0;
    let mut failed = 0;
    let mut skipped = 0;

    for report in reports {
        match report.outcome {
            Outcome::SchemaSaved { .. } => saved += 1,
            Outcome::NotGraphql => not_graphql += 1,
            Outcome::IntrospectionFailed | Outcome::SaveFailed { .. } => failed += 1,
            Outcome::Skipped { .. } => skipped += 1,
        }
    }

    println!(
        "\n{} Done: {} schema(s) saved, {} not GraphQL, {} failed, {} skipped",
        "[*]".cyan(),
        saved,
        not_graphql,
        failed,
        skipped
    );
}

async fn run(cli: Cli) -> Result<()> {
    if !cli.json {
        print_banner();
    }

    if cli.url.is_none() && cli.targets_file.is_none() {
        bail!("Either --url (-u) or --targets-file (-t) must be supplied");
    }

    ensure_output_dir(&cli.output_path)?;

    let headers = parse_headers(&cli.headers)?;
    let client = HttpClient::new(cli.proxy.as_deref(), headers)?;

    let targets = collect_targets(&cli)?;
    let workers = cli.workers.max(1);

    if !cli.json {
        println!("{} Checking {} target(s)\n", "[*]".cyan(), targets.len());
    }

    let reports: Vec<TargetReport> = stream::iter(targets)
        .map(|target| {
            let client = &client;
            let output_path = cli.output_path.as_path();
            let quiet = cli.json;
            async move {
                let outcome = process_target(client, &target, output_path).await;
                if !quiet {
                    print_outcome(&target, &outcome);
                }
                TargetReport { target, outcome }
            }
        })
        .buffer_unordered(workers)
        .collect()
        .await;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&reports).unwrap_or_default()
        );
    } else {
        print_summary(&reports);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
