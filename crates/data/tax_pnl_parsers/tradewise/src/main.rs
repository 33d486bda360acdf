use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use models::{AssetClass, ClientReport};
use tax_pnl::TaxPnlParser;

/// Convert a broker tax P&L workbook into a JSON report.
#[derive(Parser, Debug)]
#[command(name = "tax_pnl_parser", version)]
struct Cli {
    /// Tax P&L workbook (.xlsx or .xls)
    file: PathBuf,

    /// Parser settings JSON. Defaults to ./settings.json when present.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Single-line JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tax_pnl=info,tax_pnl_parser=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let settings = settings_loader::load_settings_with_fallback(cli.settings.as_ref())?;
    let parser = TaxPnlParser::new().with_settings(settings);

    eprintln!("📖 [{}] Parsing {}", tax_pnl::PARSER_NAME, cli.file.display());

    let report = parser
        .parse_file(&cli.file)
        .with_context(|| format!("Failed parsing {}", cli.file.display()))?;

    let json = if cli.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Cannot write {}", path.display()))?;
            eprintln!("✅ Report written to: {}", path.display());
        }
        None => println!("{}", json),
    }

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &ClientReport) {
    eprintln!("\n📊 Summary for {}:", report.client_name);
    eprintln!("─────────────────────────────────────────");
    for (label, pnl) in [
        ("Equity", &report.equity_pnl),
        ("Mutual Funds", &report.mutual_fund_pnl),
    ] {
        eprintln!(
            "✓ {}: short term {}, long term {}, total {}",
            label,
            pnl.short_term(),
            pnl.long_term(),
            pnl.total()
        );
    }
    eprintln!(
        "✓ Trades: {} equity, {} mutual fund",
        report.trades_of(AssetClass::Equity).count(),
        report.trades_of(AssetClass::MutualFund).count()
    );
    eprintln!("─────────────────────────────────────────");
}
