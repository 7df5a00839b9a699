//! CSV ingest of experimental (and replayed predicted) creep curves.
//!
//! Two tables, mirroring the layout of a typical creep test workbook:
//!
//! - an **info** table, one row per test: `test`, `stress`
//! - a wide **data** table with a `<test>_time` and `<test>_strain` column
//!   per test; columns may have different lengths (trailing cells empty)
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Cell-level validation** (skip bad cells, but report what happened)
//! - **Deterministic behavior**: test order follows the include list, else the info table
//! - **Separation of concerns**: no fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use tracing::{info, warn};

use crate::domain::{Curve, TestCase};
use crate::error::AppError;

const TIME_SUFFIX: &str = "_time";
const STRAIN_SUFFIX: &str = "_strain";

/// A cell- or row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub column: Option<String>,
    pub message: String,
}

/// Ingest output: experimental test cases in scoring order, plus anything skipped.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub cases: Vec<TestCase>,
    pub row_errors: Vec<RowError>,
}

/// A wide table read column by column, empty cells dropped.
struct WideTable {
    header_map: HashMap<String, usize>,
    columns: Vec<Vec<f64>>,
    row_errors: Vec<RowError>,
}

impl WideTable {
    fn column(&self, name: &str) -> Option<&[f64]> {
        let idx = self.header_map.get(&normalize_header_name(name))?;
        self.columns.get(*idx).map(Vec::as_slice)
    }
}

/// Load experimental test cases from an info table and a wide data table.
///
/// `include` restricts (and orders) the tests to load; names are matched
/// case-insensitively against the info table's `test` column.
pub fn load_test_cases(
    info_path: &Path,
    data_path: &Path,
    include: Option<&[String]>,
) -> Result<IngestedData, AppError> {
    let tests = read_info_table(info_path)?;
    let mut row_errors = tests.row_errors;

    let selected: Vec<(String, f64)> = match include {
        Some(names) if !names.is_empty() => names
            .iter()
            .map(|name| {
                tests
                    .rows
                    .iter()
                    .find(|(test, _)| test.eq_ignore_ascii_case(name.trim()))
                    .cloned()
                    .ok_or_else(|| {
                        AppError::invalid_input(format!(
                            "Test '{name}' is not listed in info table '{}'.",
                            info_path.display()
                        ))
                    })
            })
            .collect::<Result<_, _>>()?,
        _ => tests.rows,
    };
    if selected.is_empty() {
        return Err(AppError::insufficient_data(format!(
            "No tests found in info table '{}'.",
            info_path.display()
        )));
    }

    let table = read_wide_table(data_path)?;
    let mut cases = Vec::with_capacity(selected.len());
    for (name, stress) in selected {
        let time_col = format!("{name}{TIME_SUFFIX}");
        let strain_col = format!("{name}{STRAIN_SUFFIX}");
        let x = table.column(&time_col).ok_or_else(|| {
            AppError::invalid_input(format!("Missing required column `{time_col}` in '{}'.", data_path.display()))
        })?;
        let y = table.column(&strain_col).ok_or_else(|| {
            AppError::invalid_input(format!("Missing required column `{strain_col}` in '{}'.", data_path.display()))
        })?;
        let curve = Curve::new(x.to_vec(), y.to_vec())
            .map_err(|e| AppError::invalid_input(format!("Test '{name}': {e}")))?;
        cases.push(TestCase { name, stress, curve });
    }
    row_errors.extend(table.row_errors);

    info!(
        tests = cases.len(),
        skipped_cells = row_errors.len(),
        "loaded experimental data"
    );

    Ok(IngestedData { cases, row_errors })
}

/// Load one curve per test name from a wide table (e.g. saved simulator output).
///
/// Unlike experimental data this never rejects the schema: a missing column
/// or ragged pair yields a curve the evaluator will refuse to score.
pub fn load_curves(path: &Path, names: &[String]) -> Result<Vec<Curve>, AppError> {
    let table = read_wide_table(path)?;
    for e in &table.row_errors {
        warn!(line = e.line, column = ?e.column, "{}", e.message);
    }

    let curves = names
        .iter()
        .map(|name| {
            let x = table.column(&format!("{name}{TIME_SUFFIX}"));
            let y = table.column(&format!("{name}{STRAIN_SUFFIX}"));
            match (x, y) {
                (Some(x), Some(y)) => Curve {
                    x: x.to_vec(),
                    y: y.to_vec(),
                },
                _ => {
                    warn!(test = %name, path = %path.display(), "no predicted curve columns");
                    Curve::default()
                }
            }
        })
        .collect();
    Ok(curves)
}

struct InfoTable {
    rows: Vec<(String, f64)>,
    row_errors: Vec<RowError>,
}

fn read_info_table(path: &Path) -> Result<InfoTable, AppError> {
    let mut reader = open_reader(path)?;
    let headers = reader
        .headers()
        .map_err(|e| AppError::invalid_input(format!("Failed to read headers of '{}': {e}", path.display())))?
        .clone();
    let header_map = build_header_map(&headers);

    let test_idx = *header_map
        .get("test")
        .ok_or_else(|| AppError::invalid_input(format!("Missing required column `test` in '{}'.", path.display())))?;
    let stress_idx = *header_map
        .get("stress")
        .ok_or_else(|| AppError::invalid_input(format!("Missing required column `stress` in '{}'.", path.display())))?;

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and lines are 1-based.
        let line = idx + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    column: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let Some(test) = get_cell(&record, test_idx) else {
            continue;
        };
        match get_cell(&record, stress_idx).map(parse_f64) {
            Some(Ok(stress)) => rows.push((test.to_string(), stress)),
            Some(Err(message)) => row_errors.push(RowError {
                line,
                column: Some("stress".to_string()),
                message,
            }),
            None => row_errors.push(RowError {
                line,
                column: Some("stress".to_string()),
                message: format!("Missing stress for test '{test}'."),
            }),
        }
    }

    Ok(InfoTable { rows, row_errors })
}

fn read_wide_table(path: &Path) -> Result<WideTable, AppError> {
    let mut reader = open_reader(path)?;
    let headers = reader
        .headers()
        .map_err(|e| AppError::invalid_input(format!("Failed to read headers of '{}': {e}", path.display())))?
        .clone();
    let header_map = build_header_map(&headers);
    let mut columns = vec![Vec::new(); headers.len()];
    let mut row_errors = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    column: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        for (col, column) in columns.iter_mut().enumerate() {
            let Some(cell) = get_cell(&record, col) else {
                continue;
            };
            match parse_f64(cell) {
                Ok(v) => column.push(v),
                Err(message) => row_errors.push(RowError {
                    line,
                    column: headers.get(col).map(str::to_string),
                    message,
                }),
            }
        }
    }

    Ok(WideTable {
        header_map,
        columns,
        row_errors,
    })
}

fn open_reader(path: &Path) -> Result<csv::Reader<File>, AppError> {
    let file = File::open(path).map_err(|e| AppError::io(format!("Failed to open CSV '{}': {e}", path.display())))?;
    Ok(csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn get_cell(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_f64(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(format!("Non-finite value '{s}'.")),
        Err(_) => Err(format!("Invalid number '{s}'.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_tmp(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("creep-calib-ingest-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_ragged_columns_in_include_order() {
        let info = write_tmp("info_a.csv", "\u{feff}Test,Stress\nG32,80\nG44,100\n");
        let data = write_tmp(
            "data_a.csv",
            "G32_time,G32_strain,G44_time,G44_strain\n0,0,0,0\n1,0.1,2,0.3\n2,0.2,,\n",
        );
        let include = vec!["g44".to_string(), "G32".to_string()];
        let ingested = load_test_cases(&info, &data, Some(&include)).unwrap();
        assert_eq!(ingested.cases.len(), 2);
        assert_eq!(ingested.cases[0].name, "G44");
        assert_eq!(ingested.cases[0].stress, 100.0);
        assert_eq!(ingested.cases[0].curve.x, vec![0.0, 2.0]);
        assert_eq!(ingested.cases[1].curve.y, vec![0.0, 0.1, 0.2]);
        assert!(ingested.row_errors.is_empty());
    }

    #[test]
    fn bad_cells_are_reported_not_fatal() {
        let info = write_tmp("info_b.csv", "test,stress\nA,abc\nB,90\n");
        let data = write_tmp("data_b.csv", "B_time,B_strain\n0,0\nx,oops\n1,0.5\n");
        let ingested = load_test_cases(&info, &data, None).unwrap();
        assert_eq!(ingested.cases.len(), 1);
        assert_eq!(ingested.cases[0].curve.len(), 2);
        assert_eq!(ingested.row_errors.len(), 3);
        assert_eq!(ingested.row_errors[0].line, 2);
    }

    #[test]
    fn missing_columns_and_unknown_tests_fail() {
        let info = write_tmp("info_c.csv", "test,stress\nA,80\n");
        let data = write_tmp("data_c.csv", "A_time\n0\n1\n");
        assert!(load_test_cases(&info, &data, None).is_err());
        let include = vec!["Z".to_string()];
        assert!(load_test_cases(&info, &data, Some(&include)).is_err());
        let missing = write_tmp("info_d.csv", "name,stress\nA,80\n");
        assert!(load_test_cases(&missing, &data, None).is_err());
    }

    #[test]
    fn predicted_curves_tolerate_missing_columns() {
        let data = write_tmp("pred_e.csv", "A_time,A_strain\n0,0\n1,0.5\n");
        let curves = load_curves(&data, &["A".to_string(), "B".to_string()]).unwrap();
        assert_eq!(curves[0].len(), 2);
        assert!(curves[1].is_empty());
    }
}
