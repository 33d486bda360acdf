use models::{AssetClass, ClientReport, ParserSettings};
use tracing::{info, warn};

use crate::aggregates::extract_aggregate;
use crate::error::{ParseError, Result};
use crate::labels::{find_labeled_value, normalize_label};
use crate::trades::{extract_trades, ExtractionDiagnostics};
use crate::RowMatrix;

/// The three sheets a report is built from. `None` means the sheet was not found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkbookSheets {
    pub equity: Option<RowMatrix>,
    pub mutual_funds: Option<RowMatrix>,
    pub tradewise_exits: Option<RowMatrix>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetRole {
    Equity,
    MutualFunds,
    TradewiseExits,
}

/// Which report sheet `name` is, if any.
///
/// "Equity" and "Mutual Funds" must match exactly, the exits sheet only needs to start
/// with "Tradewise Exits" (exports suffix it with the financial year). All comparisons
/// are trimmed and case-insensitive.
pub fn sheet_role(name: &str, settings: &ParserSettings) -> Option<SheetRole> {
    let names = &settings.sheets;
    let key = normalize_label(name);

    if key == normalize_label(&names.equity) {
        Some(SheetRole::Equity)
    } else if key == normalize_label(&names.mutual_funds) {
        Some(SheetRole::MutualFunds)
    } else if key.starts_with(&normalize_label(&names.tradewise_exits_prefix)) {
        Some(SheetRole::TradewiseExits)
    } else {
        None
    }
}

/// Sheet names the report is built from: the first match of each role, in workbook order.
/// Every other sheet is left alone.
pub fn required_sheet_names(names: &[String], settings: &ParserSettings) -> Vec<String> {
    let mut seen: Vec<SheetRole> = Vec::new();
    let mut out = Vec::new();

    for name in names {
        let Some(role) = sheet_role(name, settings) else {
            continue;
        };
        if !seen.contains(&role) {
            seen.push(role);
            out.push(name.clone());
        }
    }

    out
}

/// Picks the report sheets out of a workbook by name, first matching sheet wins.
pub fn resolve_sheets<I>(sheets: I, settings: &ParserSettings) -> WorkbookSheets
where
    I: IntoIterator<Item = (String, RowMatrix)>,
{
    let mut out = WorkbookSheets::default();

    for (name, matrix) in sheets {
        let slot = match sheet_role(&name, settings) {
            Some(SheetRole::Equity) => &mut out.equity,
            Some(SheetRole::MutualFunds) => &mut out.mutual_funds,
            Some(SheetRole::TradewiseExits) => &mut out.tradewise_exits,
            None => continue,
        };

        if slot.is_none() {
            info!(sheet = %name, rows = matrix.len(), "using sheet");
            *slot = Some(matrix);
        }
    }

    out
}

/// Builds the client report. Fails only when a required sheet is missing.
pub fn assemble(sheets: &WorkbookSheets, settings: &ParserSettings) -> Result<ClientReport> {
    assemble_with_diagnostics(sheets, settings).map(|(report, _)| report)
}

/// [`assemble`] that also hands back the trade extraction counters.
pub fn assemble_with_diagnostics(
    sheets: &WorkbookSheets,
    settings: &ParserSettings,
) -> Result<(ClientReport, ExtractionDiagnostics)> {
    let (Some(equity), Some(mutual_funds), Some(exits)) = (
        sheets.equity.as_ref(),
        sheets.mutual_funds.as_ref(),
        sheets.tradewise_exits.as_ref(),
    ) else {
        return Err(ParseError::MissingSections(missing_sheets(sheets)));
    };

    let client_name = find_labeled_value(
        equity,
        &settings.client_name_label,
        &settings.default_client_name,
    )
    .unwrap_or_else(|| settings.default_client_name.clone());

    let equity_pnl = extract_aggregate(equity, AssetClass::Equity, settings);
    let mutual_fund_pnl = extract_aggregate(mutual_funds, AssetClass::MutualFund, settings);
    let extraction = extract_trades(exits, settings);
    let diagnostics = extraction.diagnostics;

    if diagnostics.orphaned_rows > 0 {
        warn!(
            rows = diagnostics.orphaned_rows,
            "trade rows found before any section row were dropped"
        );
    }
    info!(
        trades = extraction.trades.len(),
        excluded = diagnostics.excluded_rows,
        skipped = diagnostics.skipped_rows,
        "extracted trades"
    );

    let report = ClientReport {
        client_name,
        equity_pnl,
        mutual_fund_pnl,
        trades: extraction.trades,
    };
    Ok((report, diagnostics))
}

fn missing_sheets(sheets: &WorkbookSheets) -> Vec<String> {
    let mut missing = Vec::new();
    if sheets.equity.is_none() {
        missing.push("Equity".to_string());
    }
    if sheets.mutual_funds.is_none() {
        missing.push("Mutual Funds".to_string());
    }
    if sheets.tradewise_exits.is_none() {
        missing.push("Tradewise Exits".to_string());
    }
    missing
}
