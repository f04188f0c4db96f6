use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use zirve_site::cache::PropsCache;
use zirve_site::client::CmsClient;
use zirve_site::config::{self, SiteConfig};
use zirve_site::contact::{self, ContactSubmission};
use zirve_site::fetch::{self, FetchOptions, Snapshot};
use zirve_site::filter::{self, ProjectFilter, StatusFilter};
use zirve_site::{generate, loader, output};

/// Shared flags for commands that talk to the CMS.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Refetch every route even if its cached props are still fresh
    #[arg(long)]
    no_cache: bool,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "zirve-site")]
#[command(about = "Static site generator for the Zirve Dayanışma Ağı website")]
#[command(long_about = "\
Static site generator for the Zirve Dayanışma Ağı website

Content lives in a headless CMS. Articles, projects, categories and static
pages are fetched over its REST API and rendered to plain HTML.

Routes:

  /                        Home: hero, statistics, latest articles
  /about/                  About page (CMS page with slug `about`)
  /contact/                Contact form (posts to the CMS from the browser)
  /projects/               Project listing with live search
  /projects/<status>.html  Listing filtered to active, completed or planning
  /projects/<key>/         Project detail
  /articles/<key>/         Article detail

A route key is the record's slug when it contains a hyphen, otherwise its
document id.

Page props are cached in the temp directory. Props younger than
`revalidate.interval_secs` are reused; older ones are refetched, and if the
CMS is unreachable the last good props are served instead.

The CMS base URL comes from `cms.base_url` or the STRAPI_URL environment
variable. Set RUST_LOG (e.g. RUST_LOG=zirve_site=debug) for request logs.

Run 'zirve-site gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (stock defaults are used if it does not exist)
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (snapshot, props cache)
    #[arg(long, default_value = ".zirve-site-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch page props from the CMS into a snapshot
    Fetch(CacheArgs),
    /// Produce the HTML site from the last snapshot
    Generate,
    /// Run the full pipeline: fetch → generate
    Build(CacheArgs),
    /// Rebuild every revalidation interval until interrupted
    Watch(CacheArgs),
    /// Fetch and list every route without writing the site
    Check,
    /// Search the CMS project list
    Search {
        /// Case-insensitive text matched against title and description
        #[arg(long, short, default_value = "")]
        query: String,
        /// all, active, completed or planning
        #[arg(long, short, default_value = "all", value_parser = parse_status)]
        status: StatusFilter,
    },
    /// Send a contact form submission to the CMS
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        /// genel, bagis, gonullu, proje or diger
        #[arg(long, default_value = "genel")]
        subject: String,
        #[arg(long)]
        message: String,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn parse_status(value: &str) -> Result<StatusFilter, String> {
    StatusFilter::parse(value)
        .ok_or_else(|| format!("expected all, active, completed or planning, got '{value}'"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let site_config = config::load_config(&cli.config)?;
    init_thread_pool(&site_config.processing);

    match &cli.command {
        Command::Fetch(cache_args) => {
            let snapshot = fetch_stage(&site_config, &cli.temp_dir, cache_args.no_cache).await?;
            let path = snapshot.save(&cli.temp_dir)?;
            println!("Snapshot: {}", path.display());
        }
        Command::Generate => {
            let snapshot = Snapshot::load(&cli.temp_dir)?;
            let summary = generate::generate(&snapshot, &site_config, &cli.output)?;
            output::print_generate_output(&summary, &cli.output);
        }
        Command::Build(cache_args) => {
            build(&site_config, &cli, cache_args.no_cache).await?;
        }
        Command::Watch(cache_args) => {
            let interval = std::time::Duration::from_secs(site_config.revalidate.interval_secs);
            let mut force = cache_args.no_cache;
            loop {
                if let Err(e) = build(&site_config, &cli, force).await {
                    tracing::error!("build failed: {e}");
                }
                force = false;
                println!(
                    "==> Next revalidation in {}s (Ctrl-C to stop)",
                    interval.as_secs()
                );
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = tokio::signal::ctrl_c() => {
                        println!("==> Stopped");
                        break;
                    }
                }
            }
        }
        Command::Check => {
            println!("==> Checking {}", site_config.cms.base_url);
            let client = Arc::new(CmsClient::new(site_config.cms.clone())?);
            let mut cache = PropsCache::empty();
            let result = fetch::fetch_site(
                client,
                &site_config,
                &mut cache,
                FetchOptions {
                    now: Utc::now(),
                    force: true,
                },
            )
            .await?;
            output::print_fetch_output(&result.snapshot, &result.stats);
            if result.stats.degraded > 0 {
                println!("==> CMS unreachable for {} routes", result.stats.degraded);
            } else {
                println!("==> Content is valid");
            }
        }
        Command::Search { query, status } => {
            let client = CmsClient::new(site_config.cms.clone())?;
            let props = loader::load_projects(&client).await?;
            let filter = ProjectFilter {
                query: query.clone(),
                category: None,
                status: *status,
            };
            let results = filter::filter_projects(&props.projects, &filter);
            output::print_search_output(&filter, &results);
        }
        Command::Contact {
            name,
            email,
            phone,
            subject,
            message,
        } => {
            let submission =
                ContactSubmission::new(name, email, phone.as_deref(), subject, message);
            let client = CmsClient::new(site_config.cms.clone())?;
            contact::submit(&client, &site_config.cms, &submission).await?;
            output::print_contact_output(&submission);
        }
        // Printed before config loading.
        Command::GenConfig => {}
    }

    Ok(())
}

/// Fetch through the props cache and persist the updated cache.
async fn fetch_stage(
    site_config: &SiteConfig,
    temp_dir: &Path,
    force: bool,
) -> Result<Snapshot, Box<dyn std::error::Error>> {
    let client = Arc::new(CmsClient::new(site_config.cms.clone())?);
    let mut cache = PropsCache::load(temp_dir);
    let result = fetch::fetch_site(
        client,
        site_config,
        &mut cache,
        FetchOptions {
            now: Utc::now(),
            force,
        },
    )
    .await?;
    cache.save(temp_dir)?;
    output::print_fetch_output(&result.snapshot, &result.stats);
    Ok(result.snapshot)
}

async fn build(
    site_config: &SiteConfig,
    cli: &Cli,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("==> Stage 1: Fetching {}", site_config.cms.base_url);
    let snapshot = fetch_stage(site_config, &cli.temp_dir, force).await?;
    snapshot.save(&cli.temp_dir)?;

    println!("==> Stage 2: Generating HTML → {}", cli.output.display());
    let summary = generate::generate(&snapshot, site_config, &cli.output)?;
    output::print_generate_output(&summary, &cli.output);

    println!("==> Build complete: {}", cli.output.display());
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. The user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
