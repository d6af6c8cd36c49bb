use upwork_scraper_lib::{cookie_handler, exporter, logger, time_utils};
use upwork_scraper_lib::{build_search_url, JobParser, JobRecord, ProxyManager, RunConfig, SearchRequest};

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use log::{error, info, warn};
use std::fs;
use std::path::PathBuf;
use std::process;

const SOURCE_LABEL: &str = "Upwork Jobs Search";
const DEFAULT_PROXY_SOURCE: &str = "data/proxies.txt";

#[derive(Parser)]
#[command(name = "upwork-job-scraper")]
#[command(about = "Fetches structured job listings from Upwork search results")]
struct Cli {
    /// Path to input JSON configuration
    #[arg(long, default_value = "data/input.example.json")]
    input: PathBuf,

    /// Directory to write output files
    #[arg(long, default_value = "data")]
    outdir: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    // Missing or unparsable input is the only fatal error; everything past
    // this point degrades to empty pages.
    let config = match RunConfig::load(&cli.input) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load input config: {:#}", e);
            process::exit(1);
        }
    };

    let mut queries = config.queries.clone();
    if queries.is_empty() {
        warn!("No queries provided. Using default ['web scraping'] for demo.");
        queries = vec!["web scraping".to_string()];
    }

    let pages = config.pages.max(1);
    let per_page = config.per_page.max(1);

    let cookies = cookie_handler::jar_from_cookie_string(&config.cookies);
    let mut proxy_pool = if config.use_proxies {
        let source = config
            .proxy_source
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROXY_SOURCE));
        Some(ProxyManager::load(source))
    } else {
        None
    };

    let parser = JobParser::new(cookies);

    fs::create_dir_all(&cli.outdir)?;

    let mut all_results: Vec<JobRecord> = Vec::new();
    info!("Scrape started at {}", time_utils::now_iso());

    for query in &queries {
        info!(
            "Query '{}' with {} pages x {} per page",
            query, pages, per_page
        );

        for page in 1..=pages {
            let url = build_search_url(&SearchRequest {
                query,
                page,
                per_page,
                filters: &config.filters,
            });
            let proxy = proxy_pool.as_mut().and_then(|pool| pool.next());

            let batch = match parser.fetch_and_parse(&url, proxy.as_deref()) {
                Ok(batch) => batch,
                Err(e) => {
                    error!("Error parsing page {}: {}", url, e);
                    Vec::new()
                }
            };

            // the upstream page can return more than requested
            let collected = batch.len().min(per_page as usize);
            for mut record in batch.into_iter().take(per_page as usize) {
                record.query = query.clone();
                record.source = SOURCE_LABEL.to_string();
                all_results.push(record);
            }

            info!(
                "Query '{}' page {}: collected {} items (total={})",
                query,
                page,
                collected,
                all_results.len()
            );
        }
    }

    let timestamp = Utc::now().format("%Y%m%d-%H%M%S");
    let json_path = cli.outdir.join(format!("upwork_jobs_{}.json", timestamp));
    let csv_path = cli.outdir.join(format!("upwork_jobs_{}.csv", timestamp));

    exporter::to_json(&all_results, &json_path)?;
    exporter::to_csv(&all_results, &csv_path)?;

    info!("Wrote JSON -> {}", json_path.display());
    info!("Wrote CSV  -> {}", csv_path.display());
    info!(
        "Scrape finished at {} (items={})",
        time_utils::now_iso(),
        all_results.len()
    );
    Ok(())
}
