//! Report which external tools are available.

use super::load_config;
use anyhow::Result;
use folio_export::Exporter;
use std::path::Path;

pub async fn check_tools(config_path: &Path, json: bool) -> Result<()> {
    let exporter = Exporter::new(load_config(config_path)?);
    let statuses = exporter.probe().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    for status in &statuses {
        match (&status.version, &status.error) {
            (Some(version), _) => println!("ok       {:<20} {} ({})", status.role, status.command, version),
            (None, Some(err)) => println!("missing  {:<20} {} ({})", status.role, status.command, err),
            (None, None) => println!("missing  {:<20} {}", status.role, status.command),
        }
    }

    let missing = statuses.iter().filter(|s| !s.available()).count();
    if missing > 0 {
        println!("{} of {} tools unavailable", missing, statuses.len());
    }
    Ok(())
}
