use clap::Parser;
use seo_audit::{AuditConfig, AuditEngine, AuditReport, ReportFormatter, Result};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    match run(&args).await {
        Ok(report) => {
            print_report(&report, args.json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            ::log::error!("Audit failed: {}", e);
            eprintln!("{}", ReportFormatter::format_error(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<AuditReport> {
    let config = match &args.config {
        Some(path) => AuditConfig::from_file(path)?,
        None => AuditConfig::default(),
    };
    let config = args.apply(config.apply_env());
    let engine = AuditEngine::new(config)?;

    // Ctrl-C drops every in-flight fetch
    let cancel = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            ::log::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let path = match &args.baseline {
        Some(path) if !args.default_source => path,
        _ => return engine.run_default_source_until(cancel).await,
    };
    ::log::info!("Starting audit for baseline: {}", path.display());
    let raw_table = tokio::fs::read(path).await?;

    engine.run_until(&raw_table, cancel).await
}

fn print_report(report: &AuditReport, json: bool) {
    if !json {
        println!("{}", ReportFormatter::format_report(report));
        return;
    }
    match serde_json::to_string_pretty(report) {
        Ok(text) => println!("{text}"),
        Err(e) => ::log::error!("Failed to serialize report: {}", e),
    }
}
