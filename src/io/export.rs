//! Dashboard exports.
//!
//! - JSON: the whole `Dashboard` (blocks + declarative figures)
//! - CSV: the campaign × gender summary table
//! - HTML: a self-contained page rendered by `render::html`

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::AppError;
use crate::report::{CampaignSummaryRow, Dashboard};

/// Write the dashboard as pretty-printed JSON.
pub fn write_dashboard_json(path: &Path, dashboard: &Dashboard) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export JSON '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, dashboard)
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))?;

    info!(path = %path.display(), "dashboard JSON written");
    Ok(())
}

/// Write the campaign × gender summary to CSV.
pub fn write_summary_csv(path: &Path, rows: &[CampaignSummaryRow]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create summary CSV '{}': {e}", path.display())))?;
    write_summary(file, rows)?;

    info!(path = %path.display(), rows = rows.len(), "summary CSV written");
    Ok(())
}

fn write_summary<W: Write>(out: W, rows: &[CampaignSummaryRow]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    for r in rows {
        writer
            .serialize(r)
            .map_err(|e| AppError::new(2, format!("Failed to write summary CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write summary CSV: {e}")))?;
    Ok(())
}

/// Write the dashboard as a standalone HTML page.
pub fn write_dashboard_html(path: &Path, dashboard: &Dashboard) -> Result<(), AppError> {
    let page = crate::render::html::render_page(dashboard)?;
    std::fs::write(path, page)
        .map_err(|e| AppError::new(2, format!("Failed to write export HTML '{}': {e}", path.display())))?;

    info!(path = %path.display(), "dashboard HTML written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CampaignId, Gender};

    #[test]
    fn summary_csv_has_header_and_rows() {
        let rows = vec![
            CampaignSummaryRow {
                campaign_id: CampaignId::new("1178"),
                gender: Gender::F,
                clicks: 40,
                spent: 61.5,
                approved_conversion: 2,
                conversion_rate: 0.05,
            },
            CampaignSummaryRow {
                campaign_id: CampaignId::new("1178"),
                gender: Gender::M,
                clicks: 0,
                spent: 0.0,
                approved_conversion: 1,
                conversion_rate: 1.0,
            },
        ];

        let mut buf = Vec::new();
        write_summary(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "campaign_id,gender,clicks,spent,approved_conversion,conversion_rate");
        assert_eq!(lines[1], "1178,F,40,61.5,2,0.05");
        assert_eq!(lines[2], "1178,M,0,0.0,1,1.0");
    }

    #[test]
    fn unwritable_path_is_an_input_error() {
        let path = std::env::temp_dir().join("abdash-missing-dir").join("nested").join("out.csv");
        let err = write_summary_csv(&path, &[]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
