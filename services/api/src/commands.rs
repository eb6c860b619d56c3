use crate::infra::airtable_service;
use chrono::Utc;
use clap::Args;
use govtech_scoring::config::AppConfig;
use govtech_scoring::error::AppError;
use govtech_scoring::telemetry;
use govtech_scoring::workflows::assessment::{
    selectable_options, Category, Scorecard, ServiceOption,
};
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Default)]
pub(crate) struct ServicesArgs {
    /// Print the options as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SubmitArgs {
    /// JSON file shaped like the body of POST /api/submit
    #[arg(long)]
    pub(crate) payload: PathBuf,
    /// Validate and score the payload without writing to Airtable
    #[arg(long)]
    pub(crate) dry_run: bool,
}

pub(crate) async fn run_services(args: ServicesArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_stderr(&config.telemetry)?;
    let service = airtable_service(config.airtable)?;

    let fetched = service.list_services().await;
    let from_airtable = matches!(&fetched, Ok(services) if !services.is_empty());
    let options = selectable_options(fetched);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&options)?);
        return Ok(());
    }

    let source = if from_airtable { "Airtable" } else { "built-in" };
    println!("Services offered ({source} catalog)");
    render_options(&options);
    Ok(())
}

pub(crate) async fn run_submit(args: SubmitArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_stderr(&config.telemetry)?;

    let payload = read_payload(&args.payload)?;
    let service = airtable_service(config.airtable)?;

    if args.dry_run {
        let prepared = service.prepare(&payload, Utc::now())?;
        println!("Dry run for {} (nothing written)", prepared.service_name);
        render_scorecard(&prepared.scorecard);
        println!("  Record fields:\n{}", serde_json::to_string_pretty(&prepared.fields)?);
        return Ok(());
    }

    let receipt = service.submit(&payload).await?;
    println!("Submission saved successfully -> record {}", receipt.record_id);
    Ok(())
}

fn read_payload(path: &Path) -> Result<Value, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn run_rubric() {
    for category in Category::ALL {
        println!("\n{} - {}", category.label(), category.summary());
        for field in category.fields() {
            let spec = field.spec();
            println!("  - {} [{}]", spec.prompt, spec.key);
            println!("    {}", spec.guidance);
        }
    }
}

fn render_options(options: &[ServiceOption]) {
    let width = options
        .iter()
        .map(|option| option.value.len())
        .max()
        .unwrap_or(0);
    for option in options {
        println!("  {:<width$}  {}", option.value, option.label);
    }
}

fn render_scorecard(scorecard: &Scorecard) {
    for category in Category::ALL {
        println!(
            "  {:<20} {:.2}",
            category.label(),
            scorecard.category(category)
        );
    }
    println!("  {:<20} {:.2}", "Overall", scorecard.overall);
}
