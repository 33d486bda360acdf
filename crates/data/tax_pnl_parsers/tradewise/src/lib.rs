//! Parser for broker tax P&L workbooks.
//!
//! The workbook carries three loosely structured sheets: "Equity" and "Mutual Funds" hold
//! labeled totals (client name, short and long term realized profit) and "Tradewise Exits"
//! lists every closed trade, split into an equity and a mutual fund section. Values are
//! read positionally from those sheets and assembled into a [`models::ClientReport`].
//!
//! Number cells that cannot be read default to 0 and malformed rows are skipped. The only
//! hard failure once a workbook is open is a missing required sheet.

pub mod aggregates;
pub mod error;
pub mod labels;
pub mod numbers;
pub mod report;
pub mod trades;
pub mod workbook;

use std::path::Path;

use models::{ClientReport, ParserSettings};
use tracing::debug;

pub use aggregates::extract_aggregate;
pub use error::{ParseError, Result};
pub use labels::find_labeled_value;
pub use numbers::parse_lenient_number;
pub use report::{assemble, assemble_with_diagnostics, resolve_sheets, WorkbookSheets};
pub use trades::{extract_trades, ExtractionDiagnostics, SectionState, TradeExtraction};

pub const PARSER_NAME: &str = "tax_pnl";

/// Rows of cell text for one sheet, as produced by [`workbook::range_to_matrix`].
pub type RowMatrix = Vec<Vec<String>>;

pub struct TaxPnlParser {
    pub settings: ParserSettings,
}

impl TaxPnlParser {
    pub fn new() -> Self {
        Self {
            settings: ParserSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ParserSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Parse a whole workbook file (.xlsx or .xls).
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<ClientReport> {
        let sheets = workbook::read_workbook(path, &self.settings)?;
        self.parse_sheets(sheets)
    }

    /// Parse an uploaded workbook held in memory.
    pub fn parse_bytes(&self, bytes: Vec<u8>) -> Result<ClientReport> {
        let sheets = workbook::read_workbook_bytes(bytes, &self.settings)?;
        self.parse_sheets(sheets)
    }

    /// Parse already converted sheets, given as (sheet name, rows) pairs.
    pub fn parse_sheets<I>(&self, sheets: I) -> Result<ClientReport>
    where
        I: IntoIterator<Item = (String, RowMatrix)>,
    {
        let resolved = resolve_sheets(sheets, &self.settings);
        debug!(parser = PARSER_NAME, "assembling report");
        assemble(&resolved, &self.settings)
    }
}

impl Default for TaxPnlParser {
    fn default() -> Self {
        Self::new()
    }
}
