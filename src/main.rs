// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Crawl the site until done, or until Ctrl-C
// 4. Print the report (table or JSON), optionally write the HTML report
// 5. Exit with the proper code:
//    0 = no broken links, 1 = broken links, 2 = error, 3 = interrupted
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use link_sentinel::{report, CrawlReport, Orchestrator};

const EXIT_OK: i32 = 0;
const EXIT_BROKEN: i32 = 1;
const EXIT_ERROR: i32 = 2;
const EXIT_INTERRUPTED: i32 = 3;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.into())
        .parse_default_env()
        .init();

    let orchestrator = Orchestrator::new(&cli.start_url, cli.crawl_config())?;

    if !cli.json {
        println!("🔍 Crawling website: {}", cli.start_url);
    }

    let report = match orchestrator
        .start_with_shutdown(&cli.start_url, shutdown_signal())
        .await
    {
        Ok(report) => report,
        Err(e) if e.is_interrupted() => {
            eprintln!("❌ {}", e);
            return Ok(EXIT_INTERRUPTED);
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(path) = &cli.html_report {
        std::fs::write(path, report::render_html(&report))
            .with_context(|| format!("could not write HTML report to {}", path.display()))?;
        if !cli.json {
            println!("✅ Crawl finished. See {} for results.", path.display());
        }
    }

    print_results(&report, cli.json)?;

    if report.has_broken_links() {
        Ok(EXIT_BROKEN)
    } else {
        Ok(EXIT_OK)
    }
}

// Completes on Ctrl-C. If the handler cannot be installed the crawl simply
// runs to completion.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

fn print_results(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report::render_table(report));
    }
    Ok(())
}
