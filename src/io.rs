//! Loading dispersion tables from delimited text and spreadsheet files
//!
//! The format is chosen from the file extension, compared case-insensitively:
//! - `csv` is read with the `csv` crate
//! - `xls`, `xlsx` and `ods` are read with `calamine`, using the first worksheet
//!
//! In every format the first row holds the column names.
//! Cells that are empty or do not parse as a number become `None`.
use std::{
    fmt::Display,
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use calamine::{open_workbook, Data, Ods, Range, Reader, Xls, Xlsx};

use crate::{
    dataset::{Dataset, Table},
    error::{Error, Result},
};

/// Tabular file formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Comma-separated values
    Csv,

    /// Legacy Excel workbook
    Xls,

    /// Office Open XML workbook
    Xlsx,

    /// OpenDocument spreadsheet
    Ods,
}
impl Format {
    /// Picks the format from the extension of `path`.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedFormat`] if the extension is missing or unknown.
    ///
    /// # Example
    /// ```
    /// # use latticefit::io::Format;
    /// assert_eq!(Format::from_path("run.CSV").unwrap(), Format::Csv);
    /// assert_eq!(Format::from_path("run.ods").unwrap(), Format::Ods);
    /// assert!(Format::from_path("run.txt").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        match extension.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xls" => Ok(Self::Xls),
            "xlsx" => Ok(Self::Xlsx),
            "ods" => Ok(Self::Ods),
            _ => Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: extension.to_string(),
            }),
        }
    }

    /// True for the formats read through a workbook.
    #[must_use]
    pub fn is_spreadsheet(self) -> bool {
        !matches!(self, Self::Csv)
    }
}
impl Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Xls => write!(f, "xls"),
            Self::Xlsx => write!(f, "xlsx"),
            Self::Ods => write!(f, "ods"),
        }
    }
}

/// Reads every column of the file at `path`.
///
/// # Errors
/// - [`Error::UnsupportedFormat`] for an unknown extension
/// - [`Error::Io`], [`Error::Csv`] or [`Error::Spreadsheet`] if the file cannot be read
/// - [`Error::EmptyWorkbook`] if a spreadsheet has no worksheet
pub fn load_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    log::info!("Loading {} as {format}", path.display());

    let table = match format {
        Format::Csv => read_csv(File::open(path)?)?,
        Format::Xls => read_workbook(open::<Xls<_>>(path)?, path)?,
        Format::Xlsx => read_workbook(open::<Xlsx<_>>(path)?, path)?,
        Format::Ods => read_workbook(open::<Ods<_>>(path)?, path)?,
    };

    log::debug!("Read {} rows with columns {:?}", table.len(), table.headers());
    Ok(table)
}

/// Loads the dispersion dataset (`x` = `ppc`, `y` = `f`) from the file at `path`.
///
/// Rows missing either value are skipped with a warning.
///
/// # Errors
/// Everything [`load_table`] returns, plus:
/// - [`Error::MissingColumn`] if `f` or `ppc` is absent
/// - [`Error::NoData`] if no row holds both values
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    load_table(path)?.to_dispersion()
}

/// Reads a comma-separated table with a header row.
///
/// Rows may differ in length; missing trailing cells are `None`.
///
/// # Errors
/// Returns [`Error::Csv`] if the input is not valid CSV.
///
/// # Example
/// ```
/// # use latticefit::io::read_csv;
/// let table = read_csv("ppc,f\n30,10.5\n60,\n".as_bytes()).unwrap();
/// assert_eq!(table.column("f"), Some(&[Some(10.5), None][..]));
/// ```
pub fn read_csv(reader: impl Read) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut table = Table::new(headers);
    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(parse_cell));
    }

    Ok(table)
}

fn open<R>(path: &Path) -> Result<R>
where
    R: Reader<BufReader<File>>,
    calamine::Error: From<R::Error>,
{
    Ok(open_workbook::<R, _>(path).map_err(calamine::Error::from)?)
}

/// Reads the first worksheet of an open workbook.
fn read_workbook<R>(mut workbook: R, path: &Path) -> Result<Table>
where
    R: Reader<BufReader<File>>,
    calamine::Error: From<R::Error>,
{
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(calamine::Error::from)?,
        None => return Err(Error::EmptyWorkbook(path.to_path_buf())),
    };

    Ok(range_to_table(&range))
}

fn range_to_table(range: &Range<Data>) -> Table {
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()).collect())
        .unwrap_or_default();

    let mut table = Table::new(headers);
    for row in rows {
        table.push_row(row.iter().map(cell_value));
    }

    table
}

#[allow(clippy::cast_precision_loss)]
fn cell_value(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(v) => Some(*v).filter(|v| v.is_finite()),
        Data::Int(v) => Some(*v as f64),
        Data::String(s) => parse_cell(s),
        _ => None,
    }
}

fn parse_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }

    cell.parse().ok().filter(|v: &f64| v.is_finite())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn temp_file(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path("a.csv").unwrap(), Format::Csv);
        assert_eq!(Format::from_path("a.XLS").unwrap(), Format::Xls);
        assert_eq!(Format::from_path("dir.v2/a.xlsx").unwrap(), Format::Xlsx);
        assert_eq!(Format::from_path("a.Ods").unwrap(), Format::Ods);
        assert!(Format::Ods.is_spreadsheet());
        assert!(!Format::Csv.is_spreadsheet());

        match Format::from_path("notes") {
            Err(Error::UnsupportedFormat { extension, .. }) => assert!(extension.is_empty()),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_load_csv() {
        let file = temp_file(".csv", b"\xEF\xBB\xBFppc, f ,comment\n30,10.5,a\n60,20.1\n90,,b\n120,35.0,c\n");
        let data = load_dataset(file.path()).unwrap();
        assert_eq!(data.points(), &[(30.0, 10.5), (60.0, 20.1), (120.0, 35.0)]);

        let table = load_table(file.path()).unwrap();
        assert_eq!(table.headers(), &["ppc", "f", "comment"]);
        assert_eq!(table.column("comment"), Some(&[None, None, None, None][..]));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = temp_file(".txt", b"ppc,f\n1,2\n");
        let err = load_dataset(file.path()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { ref extension, .. } if extension == "txt"));
        assert!(err.to_string().contains("Unsupported file format"));
    }

    #[test]
    fn test_missing_column() {
        let file = temp_file(".csv", b"ppc,freq\n1,2\n");
        match load_dataset(file.path()) {
            Err(Error::MissingColumn { missing, .. }) => assert_eq!(missing, vec!["f"]),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        assert!(matches!(load_dataset(path), Err(Error::Io(_))));
    }

    /// A one-sheet xlsx workbook. Cells are `(reference, inline string or number)`.
    fn xlsx_bytes(cells: &[(&str, &str)]) -> Vec<u8> {
        let mut sheet = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row>"#,
        );
        for (reference, value) in cells {
            if value.parse::<f64>().is_ok() {
                sheet += &format!(r#"<c r="{reference}"><v>{value}</v></c>"#);
            } else {
                sheet += &format!(r#"<c r="{reference}" t="inlineStr"><is><t>{value}</t></is></c>"#);
            }
            if reference.starts_with('B') {
                sheet += "</row><row>";
            }
        }
        sheet += "</row></sheetData></worksheet>";

        let parts = [
            (
                "xl/workbook.xml",
                r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Run" sheetId="1" r:id="rId1"/></sheets></workbook>"#.to_string(),
            ),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#.to_string(),
            ),
            ("xl/worksheets/sheet1.xml", sheet),
        ];

        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for (name, contents) in parts {
            zip.start_file(name, options).unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_load_xlsx() {
        let bytes = xlsx_bytes(&[
            ("A1", "f"),
            ("B1", "ppc"),
            ("A2", "2.251"),
            ("B2", "90.4"),
            ("A3", "n/a"),
            ("B3", "270.5"),
            ("A4", "12.64"),
            ("B4", "450.3"),
        ]);
        let file = temp_file(".XLSX", &bytes);

        let table = load_table(file.path()).unwrap();
        assert_eq!(table.headers(), &["f", "ppc"]);
        assert_eq!(table.len(), 3);

        let data = load_dataset(file.path()).unwrap();
        assert_eq!(data.points(), &[(90.4, 2.251), (450.3, 12.64)]);
    }

    #[test]
    fn test_xlsx_missing_column() {
        let bytes = xlsx_bytes(&[("A1", "frequency"), ("B1", "ppc"), ("A2", "1"), ("B2", "2")]);
        let file = temp_file(".xlsx", &bytes);
        match load_dataset(file.path()) {
            Err(Error::MissingColumn { missing, .. }) => assert_eq!(missing, vec!["f"]),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_spreadsheet_dispatch() {
        // CSV text is not a workbook, so each spreadsheet reader must reject it
        for suffix in [".xls", ".xlsx", ".ods"] {
            let file = temp_file(suffix, b"ppc,f\n1,2\n");
            assert!(
                matches!(load_table(file.path()), Err(Error::Spreadsheet(_))),
                "{suffix} was not read as a workbook"
            );
        }
    }

    #[test]
    fn test_non_finite_cells_skipped() {
        let file = temp_file(".csv", b"ppc,f\n0,1\n1,3\n2,NaN\n3,7\ninf,8\n4,9\n");
        let data = load_dataset(file.path()).unwrap();
        assert_eq!(data.points(), &[(0.0, 1.0), (1.0, 3.0), (3.0, 7.0), (4.0, 9.0)]);
    }

    #[test]
    fn test_cell_values() {
        assert_eq!(cell_value(&Data::Float(1.5)), Some(1.5));
        assert_eq!(cell_value(&Data::Int(3)), Some(3.0));
        assert_eq!(cell_value(&Data::String(" 2.25 ".into())), Some(2.25));
        assert_eq!(cell_value(&Data::String("n/a".into())), None);
        assert_eq!(cell_value(&Data::String("nan".into())), None);
        assert_eq!(cell_value(&Data::String("-inf".into())), None);
        assert_eq!(cell_value(&Data::Float(f64::NAN)), None);
        assert_eq!(cell_value(&Data::Bool(true)), None);
        assert_eq!(cell_value(&Data::Empty), None);
    }

    #[test]
    fn test_range_to_table() {
        let mut range = Range::new((0, 0), (2, 1));
        range.set_value((0, 0), Data::String("f".into()));
        range.set_value((0, 1), Data::String("ppc".into()));
        range.set_value((1, 0), Data::Float(10.5));
        range.set_value((1, 1), Data::Int(30));
        range.set_value((2, 1), Data::Int(60));

        let table = range_to_table(&range);
        assert_eq!(table.headers(), &["f", "ppc"]);
        let data = table.to_dispersion().unwrap();
        assert_eq!(data.points(), &[(30.0, 10.5)]);
    }
}
