use std::path::{Path, PathBuf};

use search_logging::search_info;

use crate::filename::export_filename;
use crate::persist::{AtomicFileWriter, PersistError};

/// Lets spreadsheet tools detect UTF-8 (the data is mostly CJK text).
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Rendered placeholder for an empty table cell.
const EMPTY_CELL: &str = "-";

#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub keyword: String,
    /// Local time, already formatted for the file name (`YYYYmmdd_HHMMSS`).
    pub timestamp: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub row_count: usize,
    pub filename: String,
    pub path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no rows to export")]
    NoRows,
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Writes the table as a BOM-prefixed CSV file into `dir`.
pub fn export_csv(dir: &Path, request: &ExportRequest) -> Result<ExportSummary, ExportError> {
    if request.rows.is_empty() {
        return Err(ExportError::NoRows);
    }

    let content = encode_csv(&request.headers, &request.rows)?;
    let filename = export_filename(&request.keyword, &request.timestamp);
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let path = writer.write(&filename, &content)?;
    search_info!(
        "exported {} rows to {}",
        request.rows.len(),
        path.display()
    );

    Ok(ExportSummary {
        row_count: request.rows.len(),
        filename,
        path,
    })
}

/// BOM, header line, then one line per row. Cells are cleaned with
/// [`clean_cell`] and quoted only when they need it.
pub fn encode_csv(headers: &[String], rows: &[Vec<String>]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv_writer(UTF8_BOM.to_vec());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row.iter().map(|cell| clean_cell(cell)))?;
    }
    writer.into_inner().map_err(|err| ExportError::Io(err.into_error()))
}

/// Collapses whitespace runs to one space and blanks the placeholder.
pub fn clean_cell(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed == EMPTY_CELL {
        String::new()
    } else {
        collapsed
    }
}

fn csv_writer(buffer: Vec<u8>) -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn quoting_follows_csv_rules() {
        let mut writer = csv_writer(Vec::new());
        writer
            .write_record(["a,b", "He said \"hi\"", "line\nbreak", "plain"])
            .unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(
            out,
            "\"a,b\",\"He said \"\"hi\"\"\",\"line\nbreak\",plain\n"
        );
    }

    #[test]
    fn encoded_file_starts_with_bom() {
        let bytes = encode_csv(&strings(&["标题", "PMID"]), &[strings(&["A", "1"])]).unwrap();
        assert_eq!(&bytes[..3], &UTF8_BOM);
        let text = std::str::from_utf8(&bytes[3..]).unwrap();
        assert_eq!(text, "标题,PMID\nA,1\n");
    }

    #[test]
    fn cells_are_cleaned_before_quoting() {
        assert_eq!(clean_cell("  multi \n line\ttext "), "multi line text");
        assert_eq!(clean_cell(" - "), "");
        assert_eq!(clean_cell("-5"), "-5");

        let bytes = encode_csv(&strings(&["a", "b"]), &[strings(&["-", "x,\ny"])]).unwrap();
        let text = std::str::from_utf8(&bytes[3..]).unwrap();
        assert_eq!(text, "a,b\n,\"x, y\"\n");
    }
}
