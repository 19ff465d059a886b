use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::record::{Record, Table};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed CSV input: {0}")]
    Csv(#[from] csv::Error),
}

/// Read a delimited survey file into a Table.
pub fn load_csv(path: &Path) -> Result<Table, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let table = load_from_reader(file)?;
    debug!(path = %path.display(), rows = table.len(), "loaded survey table");
    Ok(table)
}

/// Deserialize records from any CSV byte stream. Fields are trimmed since
/// the common distribution of this dataset pads values with a leading space.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Table, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let mut rows = Vec::<Record>::new();
    for result in rdr.deserialize() {
        let record: Record = result?;
        rows.push(record);
    }
    Ok(Table::new(columns, rows))
}
