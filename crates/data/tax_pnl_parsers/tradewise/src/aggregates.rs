use models::{AssetClass, ParserSettings, PnLAggregate};
use tracing::debug;

use crate::labels::{normalize_label, LABEL_COLUMN, VALUE_COLUMN};
use crate::numbers::parse_number;

/// Reads the short and long term realized profit of one asset class sheet.
///
/// Only rows with a non-blank label and a numeric value cell are considered, and the label
/// must equal one of the asset class's labels exactly (trimmed, case-insensitive). A later
/// row overwrites an earlier one for the same term. Terms never found stay 0.
pub fn extract_aggregate(
    matrix: &[Vec<String>],
    asset_class: AssetClass,
    settings: &ParserSettings,
) -> PnLAggregate {
    let labels = settings.labels_for(asset_class);
    let short_label = normalize_label(&labels.short_term);
    let long_label = normalize_label(&labels.long_term);

    let mut pnl = PnLAggregate::default();

    for (row_idx, row) in matrix.iter().enumerate() {
        if row.len() <= VALUE_COLUMN {
            continue;
        }
        let label = normalize_label(&row[LABEL_COLUMN]);
        if label.is_empty() {
            continue;
        }
        let Some(value) = parse_number(&row[VALUE_COLUMN]) else {
            continue;
        };

        if label == short_label {
            debug!(row = row_idx + 1, %value, "{} short term profit", asset_class.label());
            pnl = pnl.with_short_term(value);
        } else if label == long_label {
            debug!(row = row_idx + 1, %value, "{} long term profit", asset_class.label());
            pnl = pnl.with_long_term(value);
        }
    }

    pnl
}
