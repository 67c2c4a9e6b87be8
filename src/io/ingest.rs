//! CSV ingest.
//!
//! Turns the advertising export into `AdRecord`s:
//! - **Strict schema** for the seven required columns (clear errors + exit code 2)
//! - **Truncation**: only the first `ROW_LIMIT` data rows are consumed; later rows are never parsed
//! - **Missing cells stay missing**: an empty numeric cell becomes `None`
//! - **Malformed cells stop the run**: a non-numeric count or an unknown gender is reported
//!   with its line number and aborts (exit code 2)

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{AdRecord, CampaignId, Gender, ROW_LIMIT};
use crate::error::AppError;

/// Canonical column names and the header spellings accepted for each.
const COLUMNS: [(&str, &[&str]); 7] = [
    ("campaign_id", &["campaign_id", "xyz_campaign_id", "campaign"]),
    ("gender", &["gender"]),
    ("impressions", &["impressions"]),
    ("clicks", &["clicks"]),
    ("spent", &["spent", "spend"]),
    ("total_conversion", &["total_conversion", "total_conversions"]),
    ("approved_conversion", &["approved_conversion", "approved_conversions"]),
];

/// Ingest output: the truncated table plus a little bookkeeping for logs/reports.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub records: Vec<AdRecord>,
    /// True when the input had more than `ROW_LIMIT` data rows.
    pub truncated: bool,
}

/// Load the input file.
pub fn load_records(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    info!(path = %path.display(), "loading advertising data");
    load_records_from_reader(file)
}

/// Load records from any reader (file, in-memory buffer, stdin).
pub fn load_records_from_reader<R: Read>(reader: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let columns = resolve_columns(&headers)?;

    let mut records = Vec::new();
    let mut truncated = false;

    for (idx, result) in reader.records().enumerate() {
        if idx == ROW_LIMIT {
            // Only peek that another row exists; its fields are never parsed.
            truncated = true;
            break;
        }

        let record = result.map_err(|e| AppError::new(2, format!("CSV parse error: {e}")))?;
        // Physical line where the record starts; quoted fields may span lines.
        let line = record.position().map_or(idx as u64 + 2, |p| p.line());
        let row = parse_row(&record, &columns).map_err(|msg| AppError::new(2, format!("Line {line}: {msg}")))?;
        records.push(row);
    }

    if records.is_empty() {
        return Err(AppError::new(3, "Input file contains no data rows."));
    }

    info!(rows = records.len(), truncated, "advertising data loaded");
    Ok(IngestedData { records, truncated })
}

/// Column positions for the required fields.
#[derive(Debug, Clone)]
struct ColumnMap(HashMap<&'static str, usize>);

impl ColumnMap {
    fn index(&self, name: &'static str) -> usize {
        // Every canonical name is inserted by `resolve_columns`.
        self.0.get(name).copied().unwrap_or(usize::MAX)
    }
}

fn resolve_columns(headers: &StringRecord) -> Result<ColumnMap, AppError> {
    let normalized: Vec<String> = headers.iter().map(normalize_header_name).collect();

    let mut map = HashMap::new();
    for (canonical, aliases) in COLUMNS {
        let idx = normalized
            .iter()
            .position(|h| aliases.contains(&h.as_str()))
            .ok_or_else(|| AppError::new(2, format!("Missing required column: `{canonical}`")))?;
        debug!(column = canonical, index = idx, "resolved column");
        map.insert(canonical, idx);
    }
    Ok(ColumnMap(map))
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(record: &StringRecord, columns: &ColumnMap) -> Result<AdRecord, String> {
    let campaign_id = get_required(record, columns, "campaign_id")?;
    let gender_raw = get_required(record, columns, "gender")?;
    let gender = Gender::parse(gender_raw).ok_or_else(|| format!("Invalid `gender` value '{gender_raw}' (expected M or F)."))?;

    Ok(AdRecord {
        campaign_id: CampaignId::new(campaign_id),
        gender,
        impressions: parse_count(record, columns, "impressions")?,
        clicks: parse_count(record, columns, "clicks")?,
        spent: parse_amount(record, columns, "spent")?,
        total_conversion: parse_count(record, columns, "total_conversion")?,
        approved_conversion: parse_count(record, columns, "approved_conversion")?,
    })
}

fn get_required<'a>(record: &'a StringRecord, columns: &ColumnMap, name: &'static str) -> Result<&'a str, String> {
    get_optional(record, columns, name).ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, columns: &ColumnMap, name: &'static str) -> Option<&'a str> {
    record
        .get(columns.index(name))
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("nan"))
}

/// Parse a non-negative count. Integral floats such as `12.0` are accepted.
fn parse_count(record: &StringRecord, columns: &ColumnMap, name: &'static str) -> Result<Option<u64>, String> {
    let Some(raw) = get_optional(record, columns, name) else {
        return Ok(None);
    };
    if let Ok(v) = raw.parse::<u64>() {
        return Ok(Some(v));
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => Ok(Some(v as u64)),
        _ => Err(format!("Invalid `{name}` value '{raw}' (expected a non-negative count).")),
    }
}

fn parse_amount(record: &StringRecord, columns: &ColumnMap, name: &'static str) -> Result<Option<f64>, String> {
    let Some(raw) = get_optional(record, columns, name) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(format!("Invalid `{name}` value '{raw}'.")),
    }
}
