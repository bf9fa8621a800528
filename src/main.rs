// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Run one sitemap scan
// 3. Print the problematic results and the summary (or JSON)
// 4. Exit with proper code (0 = all fine, 1 = problems found, 2 = error)
// =============================================================================

mod checker;  // src/checker/ - URL checking pipeline
mod cli;      // src/cli.rs - command-line parsing
mod logfile;  // src/logfile.rs - the run log
mod scan;     // src/scan.rs - one end-to-end run
mod sitemap;  // src/sitemap/ - sitemap download and parsing
mod telemetry;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use scan::ScanReport;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every URL answered with a 2xx status
//   Ok(1) = errors, bad statuses or redirects were found
//   Err   = the run could not be completed (e.g. unreadable sitemap)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.verbose);

    let report = scan::run_scan(&cli.scan_config()).await?;

    print_results(&report, cli.json)?;

    if report.summary.problematic > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn print_results(report: &ScanReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_report(report);
    }
    Ok(())
}

fn print_report(report: &ScanReport) {
    for line in report.results.iter().filter_map(|r| r.log_line()) {
        println!("{}", line);
    }

    println!();
    println!("URLs in sitemap: {}", report.url_count);
    println!("{}", report.summary.headline());
    println!("{}", report.summary.redirect_line());

    if let Some(path) = &report.log_path {
        println!("Log written to: {}", path.display());
    }
}
