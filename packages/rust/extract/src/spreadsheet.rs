//! `.xlsx` requirement sheet reader.
//!
//! The first worksheet's first row is the header. Columns are matched by
//! name, so their order does not matter and extra columns are ignored.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use tracing::{debug, warn};

use srsgen_shared::{ERROR_MARKER, Result, SpreadsheetRow, SrsError, Upload};

/// Column names every requirement sheet must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "S.No",
    "User Code",
    "Description",
    "Function",
    "Function Code",
];

/// Extract a requirement sheet into requirement bullets.
///
/// Never fails: problems are reported inline as a text starting with
/// [`ERROR_MARKER`] (wrong columns) or containing `Error` (unreadable file),
/// which the input selector later rejects.
pub fn extract_spreadsheet(upload: &Upload) -> String {
    match read_spreadsheet(upload) {
        Ok(rows) => rows
            .iter()
            .map(|row| format!("\n{}", row.to_line()))
            .collect(),
        Err(SrsError::InputValidation { message }) => format!("{ERROR_MARKER} {message}"),
        Err(e) => {
            warn!(file = %upload.filename, error = %e, "spreadsheet extraction failed");
            format!("Error reading spreadsheet: {e}")
        }
    }
}

/// Read the first worksheet of an `.xlsx` upload into typed rows.
pub fn read_spreadsheet(upload: &Upload) -> Result<Vec<SpreadsheetRow>> {
    if upload.extension().as_deref() != Some("xlsx") {
        return Err(SrsError::input(format!(
            "Spreadsheet must be an .xlsx workbook (got '{}')",
            upload.filename
        )));
    }

    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(upload.bytes.as_slice()))
        .map_err(|e| SrsError::parse(format!("{}: {e}", upload.filename)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SrsError::parse(format!("{}: workbook has no sheets", upload.filename)))?
        .map_err(|e| SrsError::parse(format!("{}: {e}", upload.filename)))?;

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .map(|cells| cells.iter().map(cell_to_string).collect())
        .unwrap_or_default();
    let body: Vec<Vec<String>> = rows
        .map(|cells| cells.iter().map(cell_to_string).collect())
        .collect();

    debug!(file = %upload.filename, columns = header.len(), rows = body.len(), "read worksheet");
    rows_from_table(&header, &body)
}

/// Map a header row plus data rows onto [`SpreadsheetRow`]s.
///
/// Rows whose cells are all blank are skipped.
pub fn rows_from_table(header: &[String], rows: &[Vec<String>]) -> Result<Vec<SpreadsheetRow>> {
    let position = |name: &str| header.iter().position(|h| h.trim() == name);

    let mut indices = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = position(name).ok_or_else(|| {
            SrsError::input(format!(
                "Spreadsheet must include columns: {}",
                REQUIRED_COLUMNS.join(", ")
            ))
        })?;
    }
    let [serial, user_code, description, function, function_code] = indices;

    let cell = |row: &[String], idx: usize| {
        row.get(idx)
            .map(|c| c.trim().to_string())
            .unwrap_or_default()
    };

    Ok(rows
        .iter()
        .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
        .map(|row| SpreadsheetRow {
            serial: cell(row, serial),
            user_code: cell(row, user_code),
            description: cell(row, description),
            function: cell(row, function),
            function_code: cell(row, function_code),
        })
        .collect())
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.to_string(),
        _ => cell.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    fn header() -> Vec<String> {
        strings(&["S.No", "User Code", "Description", "Function", "Function Code"])
    }

    /// Build a minimal single-sheet `.xlsx` with inline-string cells.
    pub(crate) fn xlsx_bytes(rows: &[Vec<&str>]) -> Vec<u8> {
        let mut sheet_rows = String::new();
        for (r, row) in rows.iter().enumerate() {
            sheet_rows.push_str(&format!(r#"<row r="{}">"#, r + 1));
            for (c, value) in row.iter().enumerate() {
                let col = (b'A' + c as u8) as char;
                sheet_rows.push_str(&format!(
                    r#"<c r="{col}{}" t="inlineStr"><is><t>{value}</t></is></c>"#,
                    r + 1
                ));
            }
            sheet_rows.push_str("</row>");
        }

        let files = [
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#.to_string(),
            ),
            (
                "_rels/.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#.to_string(),
            ),
            (
                "xl/workbook.xml",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#.to_string(),
            ),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#.to_string(),
            ),
            (
                "xl/worksheets/sheet1.xml",
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{sheet_rows}</sheetData></worksheet>"#
                ),
            ),
        ];

        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in files {
            zip.start_file(name, zip::write::FileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn conforming_table_yields_one_row_per_record() {
        let rows = vec![
            strings(&["1", "USR_001", "User can sign in", "Login", "FUN_001"]),
            strings(&["2", "USR_002", "User can reset password", "Reset", "FUN_002"]),
            strings(&["3", "USR_003", "Admin can lock accounts", "Lock", "FUN_003"]),
        ];
        let parsed = rows_from_table(&header(), &rows).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].user_code, "USR_001");
        assert_eq!(parsed[2].function_code, "FUN_003");
    }

    #[test]
    fn column_order_does_not_matter() {
        let header = strings(&[
            "Function Code",
            "Function",
            "Description",
            "User Code",
            "S.No",
            "Owner",
        ]);
        let rows = vec![strings(&["FUN_009", "Export", "Export to CSV", "USR_009", "9", "ops"])];
        let parsed = rows_from_table(&header, &rows).unwrap();
        assert_eq!(parsed[0].to_line(), "- USR_009 (FUN_009): Export — Export to CSV");
        assert_eq!(parsed[0].serial, "9");
    }

    #[test]
    fn missing_column_is_validation_error() {
        let header = strings(&["S.No", "User Code", "Description", "Function"]);
        let err = rows_from_table(&header, &[]).unwrap_err();
        assert!(matches!(err, SrsError::InputValidation { .. }));
        assert!(err.to_string().contains("Function Code"));
    }

    #[test]
    fn blank_rows_are_skipped() {
        let rows = vec![
            strings(&["1", "USR_001", "Sign in", "Login", "FUN_001"]),
            strings(&["", " ", "", "", ""]),
            strings(&["2", "USR_002", "Sign out", "Logout", "FUN_002"]),
        ];
        assert_eq!(rows_from_table(&header(), &rows).unwrap().len(), 2);
    }

    #[test]
    fn extract_xlsx_upload() {
        let bytes = xlsx_bytes(&[
            vec!["S.No", "User Code", "Description", "Function", "Function Code"],
            vec!["1", "USR_001", "User can sign in", "Login", "FUN_001"],
            vec!["2", "USR_002", "User can sign out", "Logout", "FUN_002"],
        ]);
        let text = extract_spreadsheet(&Upload::new("reqs.xlsx", bytes));
        assert_eq!(
            text,
            "\n- USR_001 (FUN_001): Login — User can sign in\n\
             - USR_002 (FUN_002): Logout — User can sign out"
        );
    }

    #[test]
    fn extract_xlsx_with_wrong_columns_reports_marker() {
        let bytes = xlsx_bytes(&[vec!["Id", "Summary"], vec!["1", "Login"]]);
        let text = extract_spreadsheet(&Upload::new("reqs.xlsx", bytes));
        assert!(text.starts_with(ERROR_MARKER));
        assert!(text.contains("S.No, User Code, Description, Function, Function Code"));
    }

    #[test]
    fn unreadable_workbook_reports_error_text() {
        let text = extract_spreadsheet(&Upload::new("reqs.xlsx", b"not a zip".to_vec()));
        assert!(text.contains("Error"));
    }

    #[test]
    fn non_xlsx_upload_is_rejected() {
        let text = extract_spreadsheet(&Upload::new("reqs.csv", b"a,b".to_vec()));
        assert!(text.starts_with(ERROR_MARKER));
    }
}
