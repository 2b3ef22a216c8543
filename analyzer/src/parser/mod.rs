//! Dataset loader with encoding and delimiter auto-detection.
//!
//! Reads a delimited file into a [`RawTable`] of text cells. No type
//! coercion happens here; the cleaner owns every format rule.

use std::path::Path;

use crate::error::{DataLoadError, LoadResult};
use crate::logs::{log_info, log_success};
use crate::models::{RawRow, RawTable};

const UTF8_BOM: char = '\u{feff}';

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let (charset, _confidence, _language) = chardet::detect(bytes);

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.into_owned()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        // UTF-8 and anything unrecognised: lossy UTF-8
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };

    match decoded.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_string(),
        None => decoded,
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Load a dataset file with auto-detection of encoding and delimiter.
///
/// # Example
/// ```ignore
/// let table = load_table("google playstore data.csv")?;
/// println!("{} rows, columns: {}", table.len(), table.headers.join(", "));
/// ```
pub fn load_table<P: AsRef<Path>>(path: P) -> LoadResult<RawTable> {
    let path = path.as_ref();
    log_info(format!("📖 Reading {}", path.display()));

    let bytes = std::fs::read(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let table = parse_bytes(&bytes)?;
    log_success(format!(
        "Read {} rows x {} columns",
        table.len(),
        table.headers.len()
    ));
    Ok(table)
}

/// Parse raw file bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes(bytes: &[u8]) -> LoadResult<RawTable> {
    if bytes.is_empty() {
        return Err(DataLoadError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);
    log_info(format!(
        "Detected encoding {} and separator '{}'",
        encoding,
        format_delimiter(delimiter)
    ));

    parse_str(&content, delimiter)
}

/// Parse decoded text with an explicit delimiter.
///
/// Rows shorter than the header are padded with absent cells; longer rows
/// are rejected. Every required column must be present in the header.
pub fn parse_str(content: &str, delimiter: char) -> LoadResult<RawTable> {
    if content.trim().is_empty() {
        return Err(DataLoadError::EmptyFile);
    }

    let delimiter = u8::try_from(delimiter)
        .map_err(|_| DataLoadError::Malformed(format!("unsupported delimiter '{}'", delimiter)))?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(DataLoadError::NoHeaders);
    }

    let missing = RawTable::new(headers.clone(), Vec::new()).missing_required_columns();
    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns(missing));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 2);

        // Blank line
        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }

        if record.len() > headers.len() {
            return Err(DataLoadError::RaggedRow {
                line,
                expected: headers.len(),
                found: record.len(),
            });
        }

        let mut cells: Vec<Option<String>> = record.iter().map(|v| Some(v.to_string())).collect();
        cells.resize(headers.len(), None);
        rows.push(RawRow::new(rows.len(), line, cells));
    }

    Ok(RawTable::new(headers, rows))
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str =
        "App,Category,Rating,Reviews,Size,Installs,Type,Price,Content Rating,Genres";

    #[test]
    fn test_simple_csv() {
        let csv = format!(
            "{}\nSketch,ART_AND_DESIGN,4.5,215644,25M,\"50,000,000+\",Free,0,Teen,Art & Design\n",
            HEADER
        );
        let table = parse_str(&csv, ',').unwrap();

        assert_eq!(table.headers.len(), 10);
        assert_eq!(table.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.index, 0);
        assert_eq!(row.line, 2);
        assert_eq!(row.cell(0), Some("Sketch"));
        assert_eq!(row.cell(5), Some("50,000,000+"));
        assert_eq!(row.cell(9), Some("Art & Design"));
    }

    #[test]
    fn test_short_row_padded_with_absent_cells() {
        let csv = format!("{}\nSketch,ART_AND_DESIGN,4.5\n", HEADER);
        let table = parse_str(&csv, ',').unwrap();

        let row = &table.rows[0];
        assert_eq!(row.cells.len(), 10);
        assert_eq!(row.cell(2), Some("4.5"));
        assert_eq!(row.cell(3), None);
    }

    #[test]
    fn test_long_row_rejected() {
        let csv = format!("{}\na,b,c,d,e,f,g,h,i,j,k\n", HEADER);
        let err = parse_str(&csv, ',').unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::RaggedRow { line: 2, expected: 10, found: 11 }
        ));
    }

    #[test]
    fn test_empty_lines_skipped() {
        let row = "a,b,1,2,s,3,Free,0,Everyone,g";
        let csv = format!("{}\n{}\n\n{}\n", HEADER, row, row);
        let table = parse_str(&csv, ',').unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_missing_required_columns() {
        let err = parse_str("App,Category,Reviews\nx,y,1\n", ',').unwrap_err();
        match err {
            DataLoadError::MissingColumns(cols) => {
                assert!(cols.contains(&"Rating".to_string()));
                assert!(cols.contains(&"Content Rating".to_string()));
                assert!(!cols.contains(&"App".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_str("", ','), Err(DataLoadError::EmptyFile)));
        assert!(matches!(parse_bytes(b""), Err(DataLoadError::EmptyFile)));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_semicolon_file_auto() {
        let csv = "App;Category;Rating;Reviews;Installs;Type;Price;Content Rating\n\
                   x;GAME;4.1;10;100+;Free;0;Everyone\n";
        let table = parse_bytes(csv.as_bytes()).unwrap();
        assert_eq!(table.headers.len(), 8);
        assert_eq!(table.rows[0].cell(4), Some("100+"));
    }

    #[test]
    fn test_bom_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(
            b"App,Category,Rating,Reviews,Installs,Type,Price,Content Rating\n",
        );
        let table = parse_bytes(&bytes).unwrap();
        assert_eq!(table.headers[0], "App");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_table("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        writeln!(file, "Sketch,ART_AND_DESIGN,4.5,215644,25M,\"5,000+\",Free,0,Teen,Art").unwrap();
        file.flush().unwrap();

        let table = load_table(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].cell(5), Some("5,000+"));
    }
}
