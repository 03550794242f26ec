//! CSV and spreadsheet test data.
//!
//! Both formats share one layout: a header row followed by one record per row.
//!
//! | TestName | Website | ExpectedTitle | ButtonText | Environment | Priority |
//! |----------|---------|---------------|------------|-------------|----------|
//!
//! Header names are matched case-insensitively and in this order. Rows whose
//! cells are all blank are skipped.

use std::fs::File;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use super::model::{Priority, WebsiteTestData};
use crate::result::{SitecheckError, SitecheckResult};

/// Expected header row
pub const HEADERS: [&str; 6] = [
    "TestName",
    "Website",
    "ExpectedTitle",
    "ButtonText",
    "Environment",
    "Priority",
];

/// Check a header row against [`HEADERS`]
///
/// # Errors
///
/// Returns a parse error naming the first mismatching column
pub fn validate_header(cells: &[String], source_name: &str) -> SitecheckResult<()> {
    for (i, expected) in HEADERS.iter().enumerate() {
        let actual = cells.get(i).map_or("", |c| c.trim());
        if !expected.eq_ignore_ascii_case(actual) {
            return Err(SitecheckError::parse(
                source_name,
                format!("expected header '{expected}' in column {} but found '{actual}'", i + 1),
            ));
        }
    }
    Ok(())
}

/// Build a record from one row of cells; `row` is the 1-based row number
///
/// # Errors
///
/// Returns a parse error carrying the row number when required cells are
/// blank or the priority is unknown
pub fn record_from_cells(
    cells: &[String],
    row: usize,
    source_name: &str,
) -> SitecheckResult<WebsiteTestData> {
    let cell = |i: usize| cells.get(i).map(|c| c.trim().to_string()).unwrap_or_default();
    let row_err = |e: SitecheckError| SitecheckError::parse(source_name, format!("row {row}: {e}"));

    let priority = match cell(5).as_str() {
        "" => Priority::default(),
        p => p.parse().map_err(row_err)?,
    };

    WebsiteTestData::builder()
        .test_name(cell(0))
        .website(cell(1))
        .expected_title(cell(2))
        .button_text(cell(3))
        .environment(cell(4))
        .priority(priority)
        .build()
        .map_err(row_err)
}

fn is_blank(cells: &[String]) -> bool {
    cells.iter().all(|c| c.trim().is_empty())
}

/// Parse CSV from any reader
///
/// # Errors
///
/// Returns a parse error on malformed CSV, a bad header, or an invalid row
pub fn parse_csv<R: std::io::Read>(
    reader: R,
    source_name: &str,
) -> SitecheckResult<Vec<WebsiteTestData>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| SitecheckError::parse(source_name, e.to_string()))?
        .iter()
        .map(ToString::to_string)
        .collect();
    validate_header(&header, source_name)?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 2;
        let record =
            result.map_err(|e| SitecheckError::parse(source_name, format!("row {row}: {e}")))?;
        let cells: Vec<String> = record.iter().map(ToString::to_string).collect();
        if is_blank(&cells) {
            continue;
        }
        records.push(record_from_cells(&cells, row, source_name)?);
    }
    Ok(records)
}

/// Read a CSV file
pub fn read_csv(path: impl AsRef<Path>) -> SitecheckResult<Vec<WebsiteTestData>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let records = parse_csv(file, &path.display().to_string())?;
    tracing::debug!(source = %path.display(), count = records.len(), "loaded CSV test data");
    Ok(records)
}

/// Render a spreadsheet cell as trimmed text.
///
/// Whole numbers lose their fractional part, so an ID typed as `42` reads
/// back as `"42"` rather than `"42.0"`.
#[must_use]
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string().trim().to_string(),
    }
}

/// Read the first worksheet of a spreadsheet (xlsx, xls, ods)
pub fn read_excel(path: impl AsRef<Path>) -> SitecheckResult<Vec<WebsiteTestData>> {
    let path = path.as_ref();
    let source_name = path.display().to_string();
    let rows = read_sheet_rows(path)?;

    let mut iter = rows.into_iter();
    let header = iter
        .next()
        .ok_or_else(|| SitecheckError::parse(&source_name, "no header row found"))?;
    validate_header(&header, &source_name)?;

    let mut records = Vec::new();
    for (i, cells) in iter.enumerate() {
        if is_blank(&cells) {
            continue;
        }
        records.push(record_from_cells(&cells, i + 2, &source_name)?);
    }
    tracing::debug!(source = %source_name, count = records.len(), "loaded spreadsheet test data");
    Ok(records)
}

fn read_sheet_rows(path: &Path) -> SitecheckResult<Vec<Vec<String>>> {
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} not found", path.display()),
        )
        .into());
    }
    let source_name = path.display().to_string();
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| SitecheckError::parse(&source_name, e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SitecheckError::parse(&source_name, "workbook has no sheets"))?
        .map_err(|e| SitecheckError::parse(&source_name, e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::result::ErrorKind;

    const CSV: &str = "\
TestName,Website,ExpectedTitle,ButtonText,Environment,Priority
GitHub Homepage,GitHub,GitHub,Sign up,dev,high
JUnit Docs,JUnit,JUnit,,staging,medium
,,,,,
Maven Central,Maven,Maven,,prod,LOW
";

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    mod header_tests {
        use super::*;

        #[test]
        fn test_header_case_insensitive() {
            let header = cells(&[
                "testname", "WEBSITE", "ExpectedTitle", "buttontext", "Environment", "priority",
            ]);
            assert!(validate_header(&header, "h").is_ok());
        }

        #[test]
        fn test_header_mismatch() {
            let header = cells(&["Name", "Website"]);
            let err = validate_header(&header, "data.csv").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ParseError);
            assert!(err.to_string().contains("TestName"));
        }

        #[test]
        fn test_header_too_short() {
            let header = cells(&["TestName", "Website", "ExpectedTitle"]);
            let err = validate_header(&header, "data.csv").unwrap_err();
            assert!(err.to_string().contains("ButtonText"));
        }
    }

    mod csv_tests {
        use super::*;

        #[test]
        fn test_parse_csv() {
            let data = parse_csv(CSV.as_bytes(), "data.csv").unwrap();
            assert_eq!(data.len(), 3);

            assert_eq!(data[0].button_text.as_deref(), Some("Sign up"));
            assert_eq!(data[0].priority, Priority::High);
            assert!(data[1].button_text.is_none());
            assert_eq!(data[1].environment, "staging");
            assert_eq!(data[2].priority, Priority::Low);
            assert_eq!(data[2].website_url, "https://maven.apache.org");
        }

        #[test]
        fn test_missing_website_reports_row() {
            let csv = "TestName,Website,ExpectedTitle,ButtonText,Environment,Priority\nOnly Name,,,,,\n";
            let err = parse_csv(csv.as_bytes(), "data.csv").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ParseError);
            assert!(err.to_string().contains("row 2"));
        }

        #[test]
        fn test_short_row_uses_defaults() {
            let csv = "TestName,Website,ExpectedTitle,ButtonText,Environment,Priority\nShort,Selenium\n";
            let data = parse_csv(csv.as_bytes(), "data.csv").unwrap();
            assert_eq!(data[0].environment, "dev");
            assert_eq!(data[0].priority, Priority::Medium);
        }

        #[test]
        fn test_read_csv_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("data.csv");
            std::fs::write(&path, CSV).unwrap();
            assert_eq!(read_csv(&path).unwrap().len(), 3);
        }

        #[test]
        fn test_read_csv_missing() {
            let err = read_csv("/no/such/file.csv").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
    }

    mod excel_tests {
        use super::*;

        #[test]
        fn test_cell_text() {
            assert_eq!(cell_text(&Data::Empty), "");
            assert_eq!(cell_text(&Data::String("  GitHub ".to_string())), "GitHub");
            assert_eq!(cell_text(&Data::Float(42.0)), "42");
            assert_eq!(cell_text(&Data::Float(1.5)), "1.5");
            assert_eq!(cell_text(&Data::Int(7)), "7");
            assert_eq!(cell_text(&Data::Bool(true)), "true");
        }

        #[test]
        fn test_record_from_cells() {
            let row = cells(&["Selenium", "Selenium", "Selenium", "", "", "high"]);
            let data = record_from_cells(&row, 2, "data.xlsx").unwrap();
            assert_eq!(data.website_url, "https://selenium.dev");
            assert_eq!(data.priority, Priority::High);
        }

        #[test]
        fn test_read_excel_missing() {
            let err = read_excel("/no/such/book.xlsx").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }

        #[test]
        fn test_read_excel_garbage() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("broken.xlsx");
            std::fs::write(&path, b"not a zip archive").unwrap();
            let err = read_excel(&path).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ParseError);
        }
    }
}
