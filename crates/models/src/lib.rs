use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

// Report models

/// Asset class a trade was booked under, taken from the section it was read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
	#[serde(rename = "Equity")]
	Equity,
	#[serde(rename = "Mutual Fund")]
	MutualFund,
}

impl AssetClass {
	pub fn label(self) -> &'static str {
		match self {
			AssetClass::Equity => "Equity",
			AssetClass::MutualFund => "Mutual Fund",
		}
	}
}

/// Realized short/long term profit for one asset class.
///
/// Only the two terms are stored. `total` is derived on every read and on
/// serialization, and an incoming `total` is ignored when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "PnLAggregateWire", from = "PnLAggregateWire")]
pub struct PnLAggregate {
	short_term: Decimal,
	long_term: Decimal,
}

impl PnLAggregate {
	pub fn new(short_term: Decimal, long_term: Decimal) -> Self {
		Self { short_term, long_term }
	}

	pub fn short_term(&self) -> Decimal {
		self.short_term
	}

	pub fn long_term(&self) -> Decimal {
		self.long_term
	}

	pub fn total(&self) -> Decimal {
		self.short_term + self.long_term
	}

	pub fn with_short_term(mut self, value: Decimal) -> Self {
		self.short_term = value;
		self
	}

	pub fn with_long_term(mut self, value: Decimal) -> Self {
		self.long_term = value;
		self
	}
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PnLAggregateWire {
	short_term: Decimal,
	long_term: Decimal,
	#[serde(default, skip_deserializing)]
	total: Decimal,
}

impl From<PnLAggregate> for PnLAggregateWire {
	fn from(p: PnLAggregate) -> Self {
		Self { short_term: p.short_term, long_term: p.long_term, total: p.total() }
	}
}

impl From<PnLAggregateWire> for PnLAggregate {
	fn from(w: PnLAggregateWire) -> Self {
		PnLAggregate::new(w.short_term, w.long_term)
	}
}

/// One closed position from the "Tradewise Exits" sheet.
///
/// Dates are kept as the display text found in the sheet. `quantity`, `buy_value`,
/// `sell_value`, `profit` and `holding_period_days` are 0 whenever the source cell
/// is not a number: this is the parser's tolerance policy, callers that need strict
/// validation have to re-check the workbook themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
	pub symbol: String,
	pub isin: String,
	pub entry_date: String,
	pub exit_date: String,
	pub quantity: Decimal,
	pub buy_value: Decimal,
	pub sell_value: Decimal,
	pub profit: Decimal,
	pub holding_period_days: i64,
	pub asset_class: AssetClass,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientReport {
	#[serde(rename = "clientName")]
	pub client_name: String,
	#[serde(rename = "equityPnL")]
	pub equity_pnl: PnLAggregate,
	#[serde(rename = "mutualFundPnL")]
	pub mutual_fund_pnl: PnLAggregate,
	pub trades: Vec<TradeRecord>,
}

impl ClientReport {
	pub fn trades_of(&self, asset_class: AssetClass) -> impl Iterator<Item = &TradeRecord> {
		self.trades.iter().filter(move |t| t.asset_class == asset_class)
	}
}

// Settings models

/// Exact-match labels (compared trimmed and lower-cased) of the two realized totals.
///
/// In a settings file either label may be left out. A missing label keeps the default of
/// the asset class it belongs to, see [`ParserSettings`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateLabels {
	pub short_term: String,
	pub long_term: String,
}

impl AggregateLabels {
	pub fn equity() -> Self {
		Self {
			short_term: "short term profit".to_string(),
			long_term: "long term profit".to_string(),
		}
	}

	pub fn mutual_fund() -> Self {
		Self {
			short_term: "short term profit equity".to_string(),
			long_term: "long term profit equity".to_string(),
		}
	}

	fn or_defaults(partial: PartialAggregateLabels, defaults: Self) -> Self {
		Self {
			short_term: partial.short_term.unwrap_or(defaults.short_term),
			long_term: partial.long_term.unwrap_or(defaults.long_term),
		}
	}
}

#[derive(Deserialize)]
struct PartialAggregateLabels {
	short_term: Option<String>,
	long_term: Option<String>,
}

fn equity_labels<'de, D: Deserializer<'de>>(
	deserializer: D,
) -> Result<AggregateLabels, D::Error> {
	let partial = PartialAggregateLabels::deserialize(deserializer)?;
	Ok(AggregateLabels::or_defaults(partial, AggregateLabels::equity()))
}

fn mutual_fund_labels<'de, D: Deserializer<'de>>(
	deserializer: D,
) -> Result<AggregateLabels, D::Error> {
	let partial = PartialAggregateLabels::deserialize(deserializer)?;
	Ok(AggregateLabels::or_defaults(partial, AggregateLabels::mutual_fund()))
}

/// Label cells in the exits sheet that switch section or repeat the column header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionSentinels {
	pub equity: String,
	pub mutual_funds: String,
	pub header: String,
}

impl Default for SectionSentinels {
	fn default() -> Self {
		Self {
			equity: "equity".to_string(),
			mutual_funds: "mutual funds".to_string(),
			header: "symbol".to_string(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetNames {
	pub equity: String,
	pub mutual_funds: String,
	/// Matched as a prefix, exports append the financial year to this sheet's name.
	pub tradewise_exits_prefix: String,
}

impl Default for SheetNames {
	fn default() -> Self {
		Self {
			equity: "equity".to_string(),
			mutual_funds: "mutual funds".to_string(),
			tradewise_exits_prefix: "tradewise exits".to_string(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
	pub client_name_label: String,
	pub default_client_name: String,
	#[serde(deserialize_with = "equity_labels")]
	pub equity_labels: AggregateLabels,
	#[serde(deserialize_with = "mutual_fund_labels")]
	pub mutual_fund_labels: AggregateLabels,
	pub sections: SectionSentinels,
	pub sheets: SheetNames,
	/// Trades whose symbol contains one of these (case-insensitive) are dropped.
	pub excluded_symbol_patterns: Vec<String>,
}

impl Default for ParserSettings {
	fn default() -> Self {
		Self {
			client_name_label: "client name".to_string(),
			default_client_name: "Guest".to_string(),
			equity_labels: AggregateLabels::equity(),
			mutual_fund_labels: AggregateLabels::mutual_fund(),
			sections: SectionSentinels::default(),
			sheets: SheetNames::default(),
			excluded_symbol_patterns: ["Buyback", "F&O", "Commodity", "Currency"]
				.iter()
				.map(|s| s.to_string())
				.collect(),
		}
	}
}

impl ParserSettings {
	pub fn labels_for(&self, asset_class: AssetClass) -> &AggregateLabels {
		match asset_class {
			AssetClass::Equity => &self.equity_labels,
			AssetClass::MutualFund => &self.mutual_fund_labels,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rust_decimal_macros::dec;

	#[test]
	fn test_pnl_total_is_derived() {
		let pnl = PnLAggregate::new(dec!(1500.50), dec!(-200.25));
		assert_eq!(pnl.total(), dec!(1300.25));

		let pnl = pnl.with_long_term(dec!(0));
		assert_eq!(pnl.total(), dec!(1500.50));
	}

	#[test]
	fn test_pnl_serializes_total() {
		let pnl = PnLAggregate::new(dec!(10), dec!(5));
		let value = serde_json::to_value(pnl).unwrap();
		assert_eq!(value["shortTerm"], serde_json::json!(10.0));
		assert_eq!(value["longTerm"], serde_json::json!(5.0));
		assert_eq!(value["total"], serde_json::json!(15.0));
	}

	#[test]
	fn test_pnl_deserialize_recomputes_total() {
		let pnl: PnLAggregate =
			serde_json::from_str(r#"{"shortTerm": 1.5, "longTerm": 2.5, "total": 999}"#).unwrap();
		assert_eq!(pnl.total(), dec!(4));
	}

	#[test]
	fn test_report_json_keys() {
		let report = ClientReport {
			client_name: "Jane Doe".to_string(),
			equity_pnl: PnLAggregate::default(),
			mutual_fund_pnl: PnLAggregate::default(),
			trades: vec![TradeRecord {
				symbol: "TCS".to_string(),
				isin: "INE467B01029".to_string(),
				entry_date: "2023-01-02".to_string(),
				exit_date: "2023-06-30".to_string(),
				quantity: dec!(2),
				buy_value: dec!(1000),
				sell_value: dec!(1200),
				profit: dec!(200),
				holding_period_days: 179,
				asset_class: AssetClass::MutualFund,
			}],
		};
		let value = serde_json::to_value(&report).unwrap();
		assert_eq!(value["clientName"], "Jane Doe");
		assert!(value.get("equityPnL").is_some());
		assert!(value.get("mutualFundPnL").is_some());
		assert_eq!(value["trades"][0]["assetClass"], "Mutual Fund");
		assert_eq!(value["trades"][0]["holdingPeriodDays"], 179);
		assert_eq!(value["trades"][0]["buyValue"], serde_json::json!(1000.0));
	}

	#[test]
	fn test_settings_partial_json_keeps_defaults() {
		let settings: ParserSettings =
			serde_json::from_str(r#"{"default_client_name": "Unknown"}"#).unwrap();
		assert_eq!(settings.default_client_name, "Unknown");
		assert_eq!(settings.client_name_label, "client name");
		assert_eq!(settings.sections.header, "symbol");
		assert_eq!(settings.excluded_symbol_patterns.len(), 4);
	}

	#[test]
	fn test_partial_equity_labels_keep_equity_defaults() {
		let settings: ParserSettings =
			serde_json::from_str(r#"{"equity_labels": {"short_term": "stcg"}}"#).unwrap();
		assert_eq!(settings.equity_labels.short_term, "stcg");
		assert_eq!(settings.equity_labels.long_term, "long term profit");
		assert_eq!(settings.mutual_fund_labels, AggregateLabels::mutual_fund());
	}

	#[test]
	fn test_partial_mutual_fund_labels_keep_mutual_fund_defaults() {
		let settings: ParserSettings =
			serde_json::from_str(r#"{"mutual_fund_labels": {"long_term": "ltcg"}}"#).unwrap();
		assert_eq!(settings.mutual_fund_labels.short_term, "short term profit equity");
		assert_eq!(settings.mutual_fund_labels.long_term, "ltcg");
		assert_eq!(settings.equity_labels, AggregateLabels::equity());
	}

	#[test]
	fn test_empty_labels_object_is_all_defaults() {
		let settings: ParserSettings =
			serde_json::from_str(r#"{"equity_labels": {}, "mutual_fund_labels": {}}"#).unwrap();
		assert_eq!(settings, ParserSettings::default());
	}

	#[test]
	fn test_labels_for_asset_class() {
		let settings = ParserSettings::default();
		assert_eq!(settings.labels_for(AssetClass::Equity).short_term, "short term profit");
		assert_eq!(
			settings.labels_for(AssetClass::MutualFund).long_term,
			"long term profit equity"
		);
	}
}
