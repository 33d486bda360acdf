//! Trade extraction from the "Tradewise Exits" sheet.
//!
//! The sheet lists equity exits and mutual fund exits one after the other. Each block
//! starts with a section row ("Equity" / "Mutual Funds" in the label column) followed by a
//! repeated column header ("Symbol") and the trade rows, with blank and summary rows in
//! between. The scan is a three-state machine, [`SectionState`], advanced one row at a
//! time by [`SectionState::step`].

use models::{AssetClass, ParserSettings, SectionSentinels, TradeRecord};
use tracing::debug;

use crate::labels::{normalize_label, LABEL_COLUMN};
use crate::numbers::{cell_at, parse_lenient_days, parse_lenient_number, parse_number};

/// Number of cells a trade row has.
pub const EXIT_ROW_WIDTH: usize = 13;

/// Column offsets of a trade row.
#[derive(Debug, Clone, Copy)]
pub struct ExitColumns {
    pub symbol: usize,
    pub isin: usize,
    pub entry_date: usize,
    pub exit_date: usize,
    pub quantity: usize,
    pub buy_value: usize,
    pub sell_value: usize,
    pub profit: usize,
    pub holding_period: usize,
}

pub const EXIT_COLUMNS: ExitColumns = ExitColumns {
    symbol: LABEL_COLUMN,
    isin: 2,
    entry_date: 3,
    exit_date: 4,
    quantity: 5,
    buy_value: 6,
    sell_value: 7,
    profit: 8,
    holding_period: 9,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionState {
    #[default]
    NoSection,
    InEquity,
    InMutualFund,
}

impl SectionState {
    pub fn asset_class(self) -> Option<AssetClass> {
        match self {
            SectionState::NoSection => None,
            SectionState::InEquity => Some(AssetClass::Equity),
            SectionState::InMutualFund => Some(AssetClass::MutualFund),
        }
    }

    /// Consumes one row and returns the next state together with what the row was.
    pub fn step(self, row: &[String], settings: &ParserSettings) -> (SectionState, RowOutcome) {
        let label = normalize_label(cell_at(row, LABEL_COLUMN));

        if let Some(next) = section_for(&label, &settings.sections) {
            return (next, RowOutcome::SectionStart(next));
        }
        if label == normalize_label(&settings.sections.header) {
            return (self, RowOutcome::Header);
        }
        if !is_trade_shaped(row) {
            return (self, RowOutcome::Skipped);
        }
        let Some(asset_class) = self.asset_class() else {
            return (self, RowOutcome::Orphaned);
        };

        let trade = read_trade(row, asset_class);
        if is_excluded(&trade.symbol, &settings.excluded_symbol_patterns) {
            return (self, RowOutcome::Excluded(trade));
        }
        (self, RowOutcome::Trade(trade))
    }
}

/// Classification of a single exits row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    SectionStart(SectionState),
    Header,
    Trade(TradeRecord),
    /// Trade row dropped because its symbol matches an excluded instrument type.
    Excluded(TradeRecord),
    /// Trade-shaped row seen before any section row.
    Orphaned,
    /// Blank, summary or otherwise malformed row.
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionDiagnostics {
    pub section_rows: usize,
    pub header_rows: usize,
    pub skipped_rows: usize,
    pub excluded_rows: usize,
    pub orphaned_rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeExtraction {
    pub trades: Vec<TradeRecord>,
    pub diagnostics: ExtractionDiagnostics,
}

/// Extracts every trade of the exits sheet in row order.
pub fn extract_trades(matrix: &[Vec<String>], settings: &ParserSettings) -> TradeExtraction {
    let mut state = SectionState::NoSection;
    let mut trades = Vec::new();
    let mut diagnostics = ExtractionDiagnostics::default();

    for (row_idx, row) in matrix.iter().enumerate() {
        let (next, outcome) = state.step(row, settings);
        state = next;

        match outcome {
            RowOutcome::SectionStart(section) => {
                debug!(row = row_idx + 1, ?section, "section start");
                diagnostics.section_rows += 1;
            }
            RowOutcome::Header => diagnostics.header_rows += 1,
            RowOutcome::Trade(trade) => trades.push(trade),
            RowOutcome::Excluded(trade) => {
                debug!(row = row_idx + 1, symbol = %trade.symbol, "excluded instrument");
                diagnostics.excluded_rows += 1;
            }
            RowOutcome::Orphaned => {
                debug!(row = row_idx + 1, "trade row outside of any section");
                diagnostics.orphaned_rows += 1;
            }
            RowOutcome::Skipped => diagnostics.skipped_rows += 1,
        }
    }

    TradeExtraction { trades, diagnostics }
}

fn section_for(label: &str, sentinels: &SectionSentinels) -> Option<SectionState> {
    if label == normalize_label(&sentinels.equity) {
        Some(SectionState::InEquity)
    } else if label == normalize_label(&sentinels.mutual_funds) {
        Some(SectionState::InMutualFund)
    } else {
        None
    }
}

/// Exact width, a symbol, and numeric buy and sell values.
fn is_trade_shaped(row: &[String]) -> bool {
    let c = EXIT_COLUMNS;
    row.len() == EXIT_ROW_WIDTH
        && !cell_at(row, c.symbol).trim().is_empty()
        && parse_number(cell_at(row, c.buy_value)).is_some()
        && parse_number(cell_at(row, c.sell_value)).is_some()
}

fn read_trade(row: &[String], asset_class: AssetClass) -> TradeRecord {
    let c = EXIT_COLUMNS;
    let text = |idx: usize| cell_at(row, idx).trim().to_string();

    TradeRecord {
        symbol: text(c.symbol),
        isin: text(c.isin),
        entry_date: text(c.entry_date),
        exit_date: text(c.exit_date),
        quantity: parse_lenient_number(cell_at(row, c.quantity)),
        buy_value: parse_lenient_number(cell_at(row, c.buy_value)),
        sell_value: parse_lenient_number(cell_at(row, c.sell_value)),
        profit: parse_lenient_number(cell_at(row, c.profit)),
        holding_period_days: parse_lenient_days(cell_at(row, c.holding_period)),
        asset_class,
    }
}

fn is_excluded(symbol: &str, patterns: &[String]) -> bool {
    let symbol = symbol.to_lowercase();
    patterns
        .iter()
        .map(|p| p.trim().to_lowercase())
        .any(|p| !p.is_empty() && symbol.contains(&p))
}
