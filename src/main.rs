use anyhow::Result;
use chrono::Datelike;
use chrono::Days;
use chrono::NaiveDate;
use chrono::Weekday;
use frontier_rs::error::AnalysisError;
use frontier_rs::portfolio::AnalysisEngine;
use frontier_rs::portfolio::BacktestConfig;
use frontier_rs::portfolio::FrontierConfig;
use frontier_rs::portfolio::Instrument;
use frontier_rs::portfolio::PerformanceMetrics;
use frontier_rs::portfolio::PriceSeriesProvider;
use frontier_rs::portfolio::Series;
use prettytable::Cell;
use prettytable::Table;
use prettytable::row;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::Distribution;
use rand_distr::Normal;

/// Seeded random-walk price source standing in for a market data feed.
struct SyntheticProvider {
  seed: u64,
}

impl SyntheticProvider {
  fn path(&self, index: usize, start: NaiveDate, end: NaiveDate) -> Result<Series, AnalysisError> {
    let drift = 0.0004 - 0.0001 * index as f64;
    let sigma = 0.010 + 0.002 * index as f64;
    let normal = Normal::new(0.0, 1.0).map_err(|e| AnalysisError::Retrieval(e.to_string()))?;
    let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(7919 * index as u64));

    let mut dates = Vec::new();
    let mut values = Vec::new();
    let mut price = 100.0;
    let mut day = start;

    while day <= end {
      if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
        dates.push(day);
        values.push(price);
        price *= 1.0 + drift + sigma * normal.sample(&mut rng);
      }
      day = day
        .checked_add_days(Days::new(1))
        .ok_or_else(|| AnalysisError::Retrieval("date overflow".to_string()))?;
    }

    Ok(Series::new(dates, values))
  }
}

impl PriceSeriesProvider for SyntheticProvider {
  fn fetch_price_series(
    &self,
    tickers: &[String],
    start: NaiveDate,
    end: NaiveDate,
  ) -> Result<Vec<Series>, AnalysisError> {
    tickers
      .iter()
      .enumerate()
      .map(|(i, ticker)| {
        let series = self.path(i, start, end)?;
        if series.is_empty() {
          return Err(AnalysisError::Retrieval(format!(
            "no rows for ticker {ticker}"
          )));
        }
        Ok(series)
      })
      .collect()
  }
}

fn pct(x: f64) -> String {
  format!("{:.2}%", x * 100.0)
}

fn num(x: f64) -> String {
  format!("{x:.2}")
}

fn metric_table(portfolio: &PerformanceMetrics, benchmark: &PerformanceMetrics) -> Table {
  let mut table = Table::new();
  table.add_row(row!["Metric", "Portfolio", "Benchmark"]);
  table.add_row(row!["CAGR", pct(portfolio.cagr), pct(benchmark.cagr)]);
  table.add_row(row![
    "Annual Volatility",
    pct(portfolio.annual_volatility),
    pct(benchmark.annual_volatility)
  ]);
  table.add_row(row![
    "Max Drawdown",
    pct(portfolio.max_drawdown),
    pct(benchmark.max_drawdown)
  ]);
  table.add_row(row![
    "Calmar Ratio",
    num(portfolio.calmar_ratio),
    num(benchmark.calmar_ratio)
  ]);
  table.add_row(row![
    "Sharpe Ratio",
    num(portfolio.sharpe_ratio),
    num(benchmark.sharpe_ratio)
  ]);
  table.add_row(row![
    "Sortino Ratio",
    num(portfolio.sortino_ratio),
    num(benchmark.sortino_ratio)
  ]);
  table.add_row(row!["VaR 95%", pct(portfolio.var_95), pct(benchmark.var_95)]);
  table.add_row(row![
    "Best Year",
    pct(portfolio.best_year),
    pct(benchmark.best_year)
  ]);
  table.add_row(row![
    "Worst Year",
    pct(portfolio.worst_year),
    pct(benchmark.worst_year)
  ]);
  table.add_row(row!["Win Rate", pct(portfolio.win_rate), pct(benchmark.win_rate)]);
  if let Some(beta) = portfolio.beta {
    table.add_row(row!["Beta", num(beta), "1.00"]);
  }
  table
}

fn main() -> Result<()> {
  let provider = SyntheticProvider { seed: 42 };
  let start = NaiveDate::from_ymd_opt(2018, 1, 2).expect("valid date");
  let end = NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date");

  let instruments = vec![
    Instrument::new("VTI".into(), 0.60, 0.03),
    Instrument::new("VXUS".into(), 0.25, 0.07),
    Instrument::new("BND".into(), 0.15, 0.035),
  ];
  let benchmark = vec![Instrument::new("SPY".into(), 1.0, 0.09)];

  let engine = AnalysisEngine::new(
    FrontierConfig {
      num_portfolios: 20_000,
      seed: Some(42),
      ..FrontierConfig::default()
    },
    BacktestConfig::default(),
  );

  let frontier = engine.efficient_frontier_from(&provider, &instruments, start, end)?;

  println!(
    "Efficient frontier, {} sampled candidates",
    frontier.config.num_portfolios
  );
  let mut table = Table::new();
  let mut header = row!["Portfolio", "Return", "Volatility", "Sharpe"];
  for ticker in &frontier.tickers {
    header.add_cell(Cell::new(ticker));
  }
  table.add_row(header);
  for p in &frontier.portfolios {
    let mut r = row![
      p.label,
      pct(p.annual_return),
      pct(p.annual_volatility),
      num(p.sharpe_ratio)
    ];
    for w in &p.weights {
      r.add_cell(Cell::new(&pct(*w)));
    }
    table.add_row(r);
  }
  table.printstd();

  let backtest = engine.backtest_from(&provider, &instruments, &benchmark, start, end)?;

  println!(
    "\nBacktest {} -> {}: portfolio {:.2}, benchmark {:.2} (from {:.0} invested)",
    backtest.start,
    backtest.end,
    backtest.final_portfolio_value,
    backtest.final_benchmark_value,
    engine.backtest_config().initial_investment
  );
  if let (Some(p), Some(b)) = (backtest.portfolio_metrics, backtest.benchmark_metrics) {
    metric_table(&p, &b).printstd();
  }

  Ok(())
}
