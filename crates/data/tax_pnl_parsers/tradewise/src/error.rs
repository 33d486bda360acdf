use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, Error)]
pub enum ParseError {
    /// One or more of the Equity / Mutual Funds / Tradewise Exits sheets was not found.
    #[error("Required sheets not found: {}", .0.join(", "))]
    MissingSections(Vec<String>),

    #[error("Invalid file type: {0}. Expected an Excel workbook (.xlsx or .xls)")]
    UnsupportedFileType(String),

    #[error("Cannot open workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Cannot read sheet '{sheet}': {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: calamine::Error,
    },
}
