//! JSON API output: the full dashboard data for one day, for consumption by
//! anything that wants the items without the markup.

use crate::models::Dashboard;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write the dashboard data to `{output_dir}/data/{date}.json` and return
/// the written path.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir, date = %dashboard.local_date))]
pub async fn write_dashboard(
    dashboard: &Dashboard,
    output_dir: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(dashboard)?;

    let data_dir = format!("{}/data", output_dir.trim_end_matches('/'));
    if let Err(e) = fs::create_dir_all(&data_dir).await {
        error!(%data_dir, error = %e, "Failed to create data dir");
        return Err(e.into());
    }

    let path = format!("{data_dir}/{}.json", dashboard.local_date);
    fs::write(&path, json).await?;
    info!(%path, items = dashboard.total_items(), "Wrote JSON API file");
    Ok(path)
}
