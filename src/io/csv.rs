//! CSV reading operations.

use std::{fs::File, io::Cursor, path::Path};

use polars::{frame::DataFrame, io::SerReader, prelude::CsvReader};

use crate::{Error, Result};

/// Reads a CSV file from `path` into a Polars DataFrame.
pub(crate) fn read_csv(path: &Path) -> Result<DataFrame> {
    let origin = path.display().to_string();
    let file = File::open(path).map_err(|e| Error::load("tabular data", origin.clone(), e))?;
    CsvReader::new(file)
        .finish()
        .map_err(|e| Error::load("tabular data", origin, e))
}

/// Reads a CSV from an in-memory string.
pub(crate) fn read_csv_string(csv: &str) -> Result<DataFrame> {
    CsvReader::new(Cursor::new(csv.as_bytes()))
        .finish()
        .map_err(|e| Error::load("tabular data", "<string>", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headers_and_rows() {
        let df = read_csv_string("State,total_population\nAlpha,100\nBeta,200\n").unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        assert!(matches!(
            read_csv(Path::new("/nonexistent/pop.csv")),
            Err(Error::Load { what: "tabular data", .. })
        ));
    }
}
