//! Plain-text report adapter implementing ReportPort.
//!
//! Renders the metrics block and the trade journal. Ratios are shown ×100
//! with two decimals; money gets thousands separators.

use std::fmt::Write as _;
use std::fs;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BacktestError;
use crate::domain::metrics::MetricsRecord;
use crate::domain::trade::Trade;
use crate::ports::report_port::ReportPort;

pub struct TextReportAdapter;

impl ReportPort for TextReportAdapter {
    fn write(&self, result: &BacktestResult, output_path: &str) -> Result<(), BacktestError> {
        fs::write(output_path, render(result))?;
        Ok(())
    }
}

/// `$1,234,567.89`, with a leading minus for negatives.
pub fn format_money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}

pub fn format_pct(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

pub fn format_sharpe(sharpe: Option<f64>) -> String {
    match sharpe {
        Some(s) => format!("{:.2}", s),
        None => "undefined".to_string(),
    }
}

pub fn format_metrics(metrics: &MetricsRecord) -> String {
    let rows = [
        ("Initial Capital", format_money(metrics.initial_capital)),
        ("Final Portfolio Value", format_money(metrics.final_value)),
        ("Total Return (%)", format_pct(metrics.total_return)),
        ("Max Drawdown (%)", format_pct(metrics.max_drawdown)),
        ("Annualized Return (%)", format_pct(metrics.annualized_return)),
        (
            "Annualized Volatility (%)",
            format_pct(metrics.annualized_volatility),
        ),
        ("Sharpe Ratio", format_sharpe(metrics.sharpe_ratio)),
    ];

    let mut out = String::new();
    for (label, value) in rows {
        let _ = writeln!(out, "{label}: {value}");
    }
    out
}

pub fn format_journal(trades: &[Trade]) -> String {
    if trades.is_empty() {
        return "No trades executed.\n".to_string();
    }
    let mut out = String::new();
    for trade in trades {
        let _ = writeln!(out, "{}", trade.journal_line());
    }
    out
}

pub fn render(result: &BacktestResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Backtest Report: {} ===", result.symbol);
    if let (Some(first), Some(last)) = (result.days.first(), result.days.last()) {
        let _ = writeln!(out, "Period: {} to {}", first.date, last.date);
    }
    let _ = writeln!(
        out,
        "Trading Days: {} (volatility: {} standard deviation)",
        result.metrics.trading_days, result.metrics.volatility_convention
    );

    out.push_str("\n--- Performance Metrics ---\n");
    out.push_str(&format_metrics(&result.metrics));

    let _ = writeln!(
        out,
        "\n--- Trade Journal ({} trades) ---",
        result.simulation.trades.len()
    );
    out.push_str(&format_journal(&result.simulation.trades));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::{run_backtest, BacktestConfig};
    use crate::domain::metrics::VolatilityConvention;
    use crate::domain::series::Day;
    use crate::domain::signal::Signal;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn sample_result() -> BacktestResult {
        let days = vec![
            Day::new(d(1), 100.0, Signal::Buy),
            Day::new(d(2), 110.0, Signal::Hold),
            Day::new(d(3), 110.0, Signal::Sell),
        ];
        let config = BacktestConfig {
            symbol: "TSLA".into(),
            initial_capital: 100_000.0,
            start_date: None,
            end_date: None,
            volatility: VolatilityConvention::Sample,
        };
        run_backtest(days, &config, None).unwrap()
    }

    #[test]
    fn money_grouping() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(999.5), "$999.50");
        assert_eq!(format_money(1000.0), "$1,000.00");
        assert_eq!(format_money(100_000.0), "$100,000.00");
        assert_eq!(format_money(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_money(-2500.0), "-$2,500.00");
    }

    #[test]
    fn pct_and_sharpe() {
        assert_eq!(format_pct(0.1), "10.00%");
        assert_eq!(format_pct(-0.0525), "-5.25%");
        assert_eq!(format_sharpe(Some(1.234)), "1.23");
        assert_eq!(format_sharpe(None), "undefined");
    }

    #[test]
    fn metrics_block_lists_every_figure() {
        let text = format_metrics(&sample_result().metrics);
        assert!(text.contains("Initial Capital: $100,000.00"));
        assert!(text.contains("Final Portfolio Value: $110,000.00"));
        assert!(text.contains("Total Return (%): 10.00%"));
        assert!(text.contains("Max Drawdown (%): 0.00%"));
        assert!(text.contains("Annualized Return (%):"));
        assert!(text.contains("Annualized Volatility (%):"));
        assert!(text.contains("Sharpe Ratio:"));
    }

    #[test]
    fn journal_lists_trades_in_order() {
        let text = format_journal(&sample_result().simulation.trades);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("2024-01-01: BUY 1000 shares @ $100.00"));
        assert!(lines[1].starts_with("2024-01-03: SELL ALL 1000 shares @ $110.00"));
    }

    #[test]
    fn empty_journal_message() {
        assert_eq!(format_journal(&[]), "No trades executed.\n");
    }

    #[test]
    fn write_creates_report_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.txt");
        TextReportAdapter
            .write(&sample_result(), path.to_str().unwrap())
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("=== Backtest Report: TSLA ==="));
        assert!(content.contains("Period: 2024-01-01 to 2024-01-03"));
        assert!(content.contains("--- Trade Journal (2 trades) ---"));
    }
}
