//! swaggerdrill CLI - run every endpoint of an OpenAPI/Swagger spec

mod storage;

use std::collections::HashMap;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use swaggerdrill_core::listing::header_warnings;
use swaggerdrill_core::stats::{format_distribution, format_pct};
use swaggerdrill_core::{Config, EndpointListing, RunSummary, TestResult};
use swaggerdrill_runner::{HttpResultStore, SpecSource, TestRunner, load_endpoints};

#[derive(Parser)]
#[command(name = "swaggerdrill")]
#[command(about = "Run every endpoint of an OpenAPI/Swagger spec with synthesized payloads")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "terminal")]
    output: OutputFormat,

    /// Verbose logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Call every endpoint once and report the results
    Run {
        #[command(flatten)]
        source: SourceArgs,

        /// Extra header sent with every call, repeatable
        #[arg(short = 'H', long = "header", value_name = "KEY:VALUE")]
        headers: Vec<String>,

        /// Result store base URL (records go to {url}/test-results)
        #[arg(long)]
        store_url: Option<String>,

        /// Do not persist results, even if store_url is configured
        #[arg(long, conflicts_with = "store_url")]
        no_store: bool,

        /// Export results to a JSON file
        #[arg(long)]
        save: bool,

        /// Directory for exported results (implies --save)
        #[arg(long)]
        save_dir: Option<String>,

        /// RNG seed for reproducible payloads
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the endpoints a run would call, without sending requests
    Endpoints {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Show results stored by earlier runs
    History {
        /// Config file (default: .swaggerdrill.toml)
        #[arg(short, long)]
        config: Option<String>,

        /// Result store base URL
        #[arg(long)]
        store_url: Option<String>,
    },

    /// Initialize config file
    Init,

    /// Export JSON Schema for the result record
    Schema,
}

#[derive(Args)]
struct SourceArgs {
    /// Config file (default: .swaggerdrill.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Spec document, file path or URL
    #[arg(short, long)]
    spec: Option<String>,

    /// Prefix for endpoints whose path is not an absolute URL
    #[arg(long)]
    base_url: Option<String>,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Terminal,
    Json,
    Silent,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(3)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<u8> {
    match cli.command {
        Commands::Run {
            source,
            headers,
            store_url,
            no_store,
            save,
            save_dir,
            seed,
        } => {
            let mut cfg = source.config()?;
            if let Some(url) = store_url {
                cfg.store_url = Some(url);
            }
            if no_store {
                cfg.store_url = None;
            }
            cfg.headers.extend(parse_headers(&headers)?);

            let endpoints = source.load(&cfg).await?;
            if endpoints.is_empty() {
                eprintln!("Error: No endpoints found in {}", cfg.spec);
                return Ok(3);
            }

            let request_headers = cfg.request_headers();
            if cli.output != OutputFormat::Silent {
                eprintln!("Config:");
                eprintln!("  spec:      {}", cfg.spec);
                if let Some(base) = &cfg.base_url {
                    eprintln!("  base_url:  {base}");
                }
                eprintln!("  endpoints: {}", endpoints.len());
                if !request_headers.is_empty() {
                    eprintln!("  headers:   {} configured", request_headers.len());
                }
                eprintln!(
                    "  store:     {}",
                    cfg.store_url.as_deref().unwrap_or("disabled")
                );
                for warning in header_warnings(&request_headers) {
                    eprintln!("  WARNING: {warning}");
                }
                eprintln!();
            }

            let mut runner = TestRunner::from_config(&cfg)?;
            if let Some(seed) = seed {
                runner = runner.with_seed(seed);
            }
            let results = runner.run(&endpoints, &request_headers).await;
            let summary = RunSummary::from_results(&results);

            match cli.output {
                OutputFormat::Terminal => {
                    print_results(&results);
                    print_summary(&summary);
                }
                OutputFormat::Json => {
                    let json_output = serde_json::json!({
                        "results": results,
                        "summary": summary,
                    });
                    println!("{}", serde_json::to_string_pretty(&json_output)?);
                }
                OutputFormat::Silent => {}
            }

            if storage::should_save(save, save_dir.as_deref(), &cfg) {
                let dir = storage::results_dir(save_dir.as_deref(), &cfg);
                match storage::save_run(&results, &summary, &dir) {
                    Ok(path) => {
                        if cli.output != OutputFormat::Silent {
                            eprintln!("Results saved: {}", path.display());
                        }
                    }
                    Err(e) => eprintln!("Warning: failed to save results: {e}"),
                }
            }

            Ok(if summary.all_successful() { 0 } else { 1 })
        }

        Commands::Endpoints { source } => {
            let cfg = source.config()?;
            let endpoints = source.load(&cfg).await?;
            let listing = EndpointListing::new(&endpoints);
            match cli.output {
                OutputFormat::Terminal => println!("{}", listing.to_terminal()),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
                OutputFormat::Silent => {}
            }
            Ok(0)
        }

        Commands::History { config, store_url } => {
            let cfg = load_config(config.as_deref())?;
            let Some(url) = store_url.or(cfg.store_url.clone()) else {
                bail!("No result store configured (set store_url or pass --store-url)");
            };
            let store = HttpResultStore::new(&url, cfg.persist_timeout())?;
            let history = store
                .history()
                .await
                .with_context(|| format!("fetching {}", store.collection_url()))?;
            let summary = RunSummary::from_results(&history);

            match cli.output {
                OutputFormat::Terminal => {
                    println!("{} stored results ({url})", history.len());
                    print_results(&history);
                    print_summary(&summary);
                }
                OutputFormat::Json => {
                    let json_output = serde_json::json!({
                        "results": history,
                        "summary": summary,
                    });
                    println!("{}", serde_json::to_string_pretty(&json_output)?);
                }
                OutputFormat::Silent => {}
            }
            Ok(0)
        }

        Commands::Init => {
            let config_path = ".swaggerdrill.toml";
            if Path::new(config_path).exists() {
                eprintln!("{config_path} already exists");
                return Ok(1);
            }

            std::fs::write(config_path, Config::example())?;
            println!("Created {config_path}");
            println!("\nEdit the file to configure:");
            println!("  - spec: path or URL of your OpenAPI/Swagger document");
            println!("  - base_url: server for specs without an absolute server URL");
            println!("  - headers: auth tokens, API keys");
            println!("  - store_url: result store, optional");
            Ok(0)
        }

        Commands::Schema => {
            let schema = swaggerdrill_core::record::generate_schema();
            println!("{schema}");
            Ok(0)
        }
    }
}

impl SourceArgs {
    /// Config file plus `--spec` / `--base-url` overrides.
    fn config(&self) -> Result<Config> {
        let mut cfg = load_config(self.config.as_deref())?;
        if let Some(spec) = &self.spec {
            cfg.spec.clone_from(spec);
        }
        if let Some(base) = &self.base_url {
            cfg.base_url = Some(base.clone());
        }
        Ok(cfg)
    }

    async fn load(&self, cfg: &Config) -> Result<Vec<swaggerdrill_core::Endpoint>> {
        let client = reqwest::Client::builder()
            .timeout(cfg.request_timeout())
            .build()?;
        let source = SpecSource::parse(&cfg.spec);
        let endpoints = load_endpoints(&source, cfg.base_url.as_deref(), &client)
            .await
            .with_context(|| format!("loading spec {source}"))?;
        Ok(endpoints)
    }
}

fn load_config(path: Option<&str>) -> Result<Config> {
    let cfg = match path {
        Some(path) => Config::load(Path::new(path))?,
        None => Config::load_default()?,
    };
    tracing::debug!(config = ?path, spec = %cfg.spec, "configuration loaded");
    Ok(cfg)
}

/// `"Authorization: Bearer x"` → `("Authorization", "Bearer x")`. Blank keys are dropped.
fn parse_headers(raw: &[String]) -> Result<HashMap<String, String>> {
    let mut headers = HashMap::new();
    for entry in raw {
        let Some((key, value)) = entry.split_once(':') else {
            bail!("Invalid header '{entry}', expected KEY:VALUE");
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        headers.insert(key.to_string(), value.trim().to_string());
    }
    Ok(headers)
}

fn print_results(results: &[TestResult]) {
    for r in results {
        let icon = if r.is_success() { "PASS" } else { "FAIL" };
        let status = if r.is_transport_failure() {
            format!("ERR {}", r.data["error"].as_str().unwrap_or(&r.status_text))
        } else {
            format!("{} {}", r.status, r.status_text)
        };
        println!("{icon}  {:<60} {status} ({}ms)", r.endpoint.label(), r.duration);
    }
}

fn print_summary(summary: &RunSummary) {
    println!(
        "\nSummary: {}/{} successful ({}%, {})",
        summary.successful,
        summary.total,
        format_pct(summary.success_rate),
        summary.band
    );
    if summary.transport_failures > 0 {
        println!("  Transport failures: {}", summary.transport_failures);
    }
    if summary.total == 0 {
        return;
    }
    println!("  Status: {}", format_distribution(&summary.status_distribution));

    println!("\nBy method:");
    for m in &summary.by_method {
        println!("  {:<8} {}/{}", m.method, m.successful, m.count);
    }
    println!("\nBy path:");
    for p in &summary.by_path {
        println!("  {} ({}% 2xx)", p.path, format_pct(p.success_rate));
    }
    if summary.by_spec.len() > 1 {
        println!("\nBy spec:");
        for s in &summary.by_spec {
            println!("  {} {}: {}/{}", s.spec_title, s.spec_version, s.successful, s.count);
        }
    }
}
