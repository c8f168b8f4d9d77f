use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    /// A required export is absent. Initialization halts; no partial
    /// dataset is ever returned.
    #[error("required input file is missing: `{path}`")]
    MissingFile { path: PathBuf },
    #[error("could not read `{path}`: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    /// Malformed CSV or a row that does not match the expected schema.
    #[error("malformed record in `{path}`: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}
