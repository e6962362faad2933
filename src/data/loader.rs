use std::collections::HashSet;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use log::debug;
use serde::de::DeserializeOwned;

use super::model::{
    DescriptionsMap, EntityRecord, Partition, PartitionTable, PropertiesMap, SentimentRecord,
};
use crate::error::{DanedError, Result};

/// Cell contents read as missing, matching the pandas `read_csv` defaults.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(cell: &str) -> bool {
    NA_VALUES.contains(&cell)
}

fn malformed(path: &Path, reason: impl Into<String>) -> DanedError {
    DanedError::MalformedPartitionFile {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

// ---------------------------------------------------------------------------
// JSON sidecars
// ---------------------------------------------------------------------------

/// Read a JSON sidecar file into `T`.
///
/// A missing file, unreadable file or JSON of the wrong shape all surface as
/// [`DanedError::MalformedSidecar`].
pub fn load_sidecar<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let sidecar_err = |reason: String| DanedError::MalformedSidecar {
        path: path.to_path_buf(),
        reason,
    };
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => sidecar_err("file not found".to_string()),
        _ => sidecar_err(format!("reading: {e}")),
    })?;
    serde_json::from_str(&text).map_err(|e| sidecar_err(format!("parsing JSON: {e}")))
}

/// Expected layout: `{ "Q1": [["occupation", "writer"], [null, "v"]], ... }`
pub fn load_properties(path: &Path) -> Result<PropertiesMap> {
    load_sidecar(path)
}

/// Expected layout: `{ "Q1": "dansk forfatter", ... }`
pub fn load_descriptions(path: &Path) -> Result<DescriptionsMap> {
    load_sidecar(path)
}

// ---------------------------------------------------------------------------
// Delimited files
// ---------------------------------------------------------------------------

/// Which cells decide whether a row is dropped as incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropIncomplete {
    /// A missing cell in any column drops the row.
    AnyColumn,
    /// Only the requested columns are checked.
    RequiredColumns,
}

/// Read a headed delimited file and return, for each complete row, the cells
/// of `required` in the order given.
///
/// Short rows count as having missing cells. Rows longer than the header are
/// a parse error.
pub fn read_complete_rows(
    path: &Path,
    delimiter: u8,
    required: &[&str],
    drop: DropIncomplete,
) -> Result<Vec<Vec<String>>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DanedError::MissingPartitionFile {
            path: path.to_path_buf(),
        },
        _ => DanedError::Io(e),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| malformed(path, format!("reading header: {e}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let indices = required
        .iter()
        .map(|col| {
            headers
                .iter()
                .position(|h| h == col)
                .ok_or_else(|| malformed(path, format!("missing '{col}' column")))
        })
        .collect::<Result<Vec<usize>>>()?;

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| malformed(path, format!("row {row_no}: {e}")))?;
        if record.len() > headers.len() {
            return Err(malformed(
                path,
                format!(
                    "row {row_no}: expected {} fields, saw {}",
                    headers.len(),
                    record.len()
                ),
            ));
        }

        let cell = |idx: usize| record.get(idx).filter(|c| !is_missing(c));
        let complete = match drop {
            DropIncomplete::AnyColumn => {
                record.len() == headers.len() && record.iter().all(|c| !is_missing(c))
            }
            DropIncomplete::RequiredColumns => indices.iter().all(|&i| cell(i).is_some()),
        };
        if !complete {
            dropped += 1;
            continue;
        }

        rows.push(
            indices
                .iter()
                .map(|&i| cell(i).unwrap_or_default().to_string())
                .collect(),
        );
    }

    debug!(
        "{}: kept {} rows, dropped {dropped} incomplete",
        path.display(),
        rows.len()
    );
    Ok(rows)
}

// ---------------------------------------------------------------------------
// DaNED partitions
// ---------------------------------------------------------------------------

/// Parse a class label. Integral floats (`1.0`) are accepted.
fn parse_label(raw: &str) -> Option<u8> {
    let value = match raw.trim().parse::<i64>() {
        Ok(i) => i,
        Err(_) => {
            let f = raw.trim().parse::<f64>().ok()?;
            if f.fract() != 0.0 {
                return None;
            }
            f as i64
        }
    };
    match value {
        0 => Some(0),
        1 => Some(1),
        _ => None,
    }
}

/// Load one tab-separated partition and join each QID against the sidecars.
///
/// File layout: header row with at least `qid`, `sentence` and `class`.
/// Rows with a missing cell in any column are dropped. QIDs absent from a
/// sidecar enrich to `None`.
///
/// `class` must be 0 or 1; any other value fails the whole partition with
/// [`DanedError::MalformedPartitionFile`] rather than dropping the row.
pub fn load_partition(
    path: &Path,
    partition: Partition,
    properties: &PropertiesMap,
    descriptions: &DescriptionsMap,
) -> Result<PartitionTable> {
    let rows = read_complete_rows(
        path,
        b'\t',
        &["qid", "sentence", "class"],
        DropIncomplete::AnyColumn,
    )?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.into_iter().enumerate() {
        let [qid, sentence, class]: [String; 3] = row
            .try_into()
            .map_err(|_| malformed(path, format!("row {i}: wrong column count")))?;
        let label = parse_label(&class)
            .ok_or_else(|| malformed(path, format!("row {i}: class '{class}' is not 0 or 1")))?;

        let kg = properties.get(&qid).cloned();
        let description = descriptions.get(&qid).cloned();
        records.push(EntityRecord {
            qid,
            sentence,
            label,
            kg,
            description,
        });
    }

    Ok(PartitionTable::new(partition, records))
}

// ---------------------------------------------------------------------------
// Sentiment files
// ---------------------------------------------------------------------------

/// Load a comma-separated sentiment file, keeping `valence` and `text`.
///
/// Only those two columns decide whether a row is incomplete; any other
/// columns (such as a leading index) are ignored.
pub fn load_sentiment(path: &Path) -> Result<Vec<SentimentRecord>> {
    let rows = read_complete_rows(
        path,
        b',',
        &["valence", "text"],
        DropIncomplete::RequiredColumns,
    )?;

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            let valence = row[0].trim().parse::<f64>().map_err(|_| {
                malformed(path, format!("row {i}: valence '{}' is not a number", row[0]))
            })?;
            Ok(SentimentRecord {
                valence,
                text: row[1].clone(),
            })
        })
        .collect()
}

/// Remove repeated `(valence, text)` rows, keeping the first occurrence.
pub fn drop_duplicates(records: Vec<SentimentRecord>) -> Vec<SentimentRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert((r.valence.to_bits(), r.text.clone())))
        .collect()
}
