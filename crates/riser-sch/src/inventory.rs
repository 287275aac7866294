//! Inventory reading and merging.
//!
//! A physical level can be split over several inventory rows, so rows that
//! share a `(TORRE, NIVEL)` key are folded together: quantity columns are
//! summed, string columns keep the last non-empty value. A row without a
//! usable tower or level id is reported and skipped; it never aborts the
//! merge.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::{Level, LevelId, Tower, TowerId};

pub const TOWER_FIELD: &str = "TORRE";
pub const LEVEL_FIELD: &str = "NIVEL";
pub const TOWER_NAME_FIELD: &str = "torre_nombre";
pub const LEVEL_NAME_FIELD: &str = "nivel_nombre";

/// Switch indicator value meaning "no switch of this role here".
pub const EMPTY_INDICATOR: &str = "0";

const QUANTITY_MARKER: &str = "Qty";
const SWITCH_PREFIX: &str = "switch_";
const MODEL_SUFFIX: &str = "_modelo";
const NAME_SUFFIX: &str = "_nombre";

/// One inventory row: column name -> raw cell text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRow {
    /// 1-based line in the source, used for diagnostics.
    pub line: u64,
    pub fields: BTreeMap<String, String>,
}

impl RawRow {
    pub fn new<K, V>(line: u64, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        RawRow {
            line,
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Trimmed value of `key`, `None` when absent or blank.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn identifier(&self, key: &str) -> Result<i64, MalformedRowError> {
        let raw = self
            .value(key)
            .ok_or_else(|| MalformedRowError::new(self.line, format!("missing {key}")))?;
        raw.parse().map_err(|_| {
            MalformedRowError::new(self.line, format!("invalid {key} value '{raw}'"))
        })
    }

    fn identifiers(&self) -> Result<(TowerId, LevelId), MalformedRowError> {
        Ok((self.identifier(TOWER_FIELD)?, self.identifier(LEVEL_FIELD)?))
    }
}

/// A row that was skipped because its tower or level id is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {reason}")]
pub struct MalformedRowError {
    pub line: u64,
    pub reason: String,
}

impl MalformedRowError {
    pub fn new(line: u64, reason: impl Into<String>) -> Self {
        MalformedRowError {
            line,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("inventory file not found: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("failed to read inventory {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Result of folding every row: merged towers plus the rows that were skipped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeOutcome {
    /// Towers in ascending id order.
    pub towers: Vec<Tower>,
    pub rejected: Vec<MalformedRowError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Quantity,
    Text,
    Ignored,
}

fn classify(key: &str) -> FieldKind {
    if matches!(key, TOWER_FIELD | LEVEL_FIELD | TOWER_NAME_FIELD) {
        FieldKind::Ignored
    } else if key.ends_with(MODEL_SUFFIX) || key.ends_with(NAME_SUFFIX) {
        FieldKind::Text
    } else if key.contains(QUANTITY_MARKER) || key.starts_with(SWITCH_PREFIX) {
        FieldKind::Quantity
    } else {
        FieldKind::Ignored
    }
}

/// Quantity cell -> count. Blank, non-numeric and negative text yield zero.
fn parse_quantity(key: &str, value: &str, line: u64) -> u64 {
    value.parse::<u64>().unwrap_or_else(|_| {
        if value.bytes().all(|b| b.is_ascii_digit()) {
            log::warn!("line {line}: {key}='{value}' is out of range, treating as 0");
        } else {
            log::debug!("line {line}: treating {key}='{value}' as 0");
        }
        0
    })
}

/// `switch_core` -> `SW-CORE`. Model columns are not indicators.
pub fn switch_role(key: &str) -> Option<String> {
    if key.ends_with(MODEL_SUFFIX) {
        return None;
    }
    let segment = key.strip_prefix(SWITCH_PREFIX)?.split('_').next()?;
    if segment.is_empty() {
        return None;
    }
    Some(format!("SW-{}", segment.to_uppercase()))
}

/// Read a CSV inventory (header row required) into raw rows.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>, InventoryError> {
    if !path.is_file() {
        return Err(InventoryError::SourceMissing(path.to_path_buf()));
    }
    let csv_error = |source| InventoryError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;
    let headers = reader.headers().map_err(csv_error)?.clone();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        let line = record
            .position()
            .map(|pos| pos.line())
            .unwrap_or(index as u64 + 2);
        let fields = headers
            .iter()
            .zip(record.iter())
            .filter(|(name, _)| !name.is_empty());
        rows.push(RawRow::new(line, fields));
    }

    log::info!("Read {} inventory rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Fold raw rows into towers keyed by id.
pub fn merge<I>(rows: I) -> MergeOutcome
where
    I: IntoIterator<Item = RawRow>,
{
    let mut towers = BTreeMap::<TowerId, Tower>::new();
    let mut rejected = Vec::new();

    for row in rows {
        let (tower_id, level_id) = match row.identifiers() {
            Ok(ids) => ids,
            Err(err) => {
                log::warn!("Skipping inventory row: {err}");
                rejected.push(err);
                continue;
            }
        };

        let tower = towers
            .entry(tower_id)
            .or_insert_with(|| Tower::new(tower_id));
        if let Some(name) = row.value(TOWER_NAME_FIELD) {
            tower.name = name.to_string();
        }

        let level = tower
            .levels
            .entry(level_id)
            .or_insert_with(|| Level::new(level_id));
        merge_level(level, &row);
        merge_switches(tower, &row);
    }

    let towers = towers
        .into_values()
        .map(|mut tower| {
            if tower.name.is_empty() {
                tower.name = format!("TOWER {}", tower.id);
            }
            tower
        })
        .collect::<Vec<_>>();

    log::info!(
        "Merged inventory into {} towers ({} rows skipped)",
        towers.len(),
        rejected.len()
    );
    MergeOutcome { towers, rejected }
}

fn merge_level(level: &mut Level, row: &RawRow) {
    for (key, value) in &row.fields {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match classify(key) {
            FieldKind::Quantity => {
                let quantity = parse_quantity(key, value, row.line);
                let total = level.quantities.entry(key.clone()).or_insert(0);
                *total = total.saturating_add(quantity);
            }
            FieldKind::Text if key == LEVEL_NAME_FIELD => level.name = Some(value.to_string()),
            FieldKind::Text => {
                level.attributes.insert(key.clone(), value.to_string());
            }
            FieldKind::Ignored => {}
        }
    }
}

fn merge_switches(tower: &mut Tower, row: &RawRow) {
    for key in row.fields.keys() {
        let Some(role) = switch_role(key) else {
            continue;
        };
        match row.value(key) {
            None | Some(EMPTY_INDICATOR) => continue,
            Some(_) => {}
        }

        let model = row.value(&format!("{key}{MODEL_SUFFIX}"));
        let slot = tower.switches.entry(role).or_insert(None);
        if let Some(model) = model {
            *slot = Some(model.to_string());
        }
    }
}
