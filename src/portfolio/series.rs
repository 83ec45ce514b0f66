//! # Dated Series
//!
//! Ordered `(date, value)` observations stored as parallel vectors, used for
//! prices, periodic returns and cumulative value paths. Alignment intersects
//! date sets; missing leading/trailing observations are dropped, never
//! filled.

use std::collections::BTreeSet;
use std::collections::HashSet;

use chrono::Datelike;
use chrono::NaiveDate;
use impl_new_derive::ImplNew;

use crate::error::AnalysisError;

/// A dated value series with strictly ascending dates.
#[derive(ImplNew, Clone, Debug, Default, PartialEq)]
pub struct Series {
  /// Observation dates, ascending.
  pub dates: Vec<NaiveDate>,
  /// One value per date.
  pub values: Vec<f64>,
}

impl Series {
  /// Number of observations.
  pub fn len(&self) -> usize {
    self.dates.len()
  }

  /// True when the series holds no observations.
  pub fn is_empty(&self) -> bool {
    self.dates.is_empty()
  }

  /// First observation date, if any.
  pub fn first_date(&self) -> Option<NaiveDate> {
    self.dates.first().copied()
  }

  /// Last observation date, if any.
  pub fn last_date(&self) -> Option<NaiveDate> {
    self.dates.last().copied()
  }

  /// Period-over-period fractional change, `v[t]/v[t-1] - 1`.
  ///
  /// The leading undefined observation is dropped, so the output is one
  /// shorter than `self`.
  pub fn pct_change(&self) -> Series {
    let mut dates = Vec::with_capacity(self.len().saturating_sub(1));
    let mut values = Vec::with_capacity(self.len().saturating_sub(1));

    for i in 1..self.len() {
      dates.push(self.dates[i]);
      values.push(self.values[i] / self.values[i - 1] - 1.0);
    }

    Series::new(dates, values)
  }

  /// Cumulative value path `initial * prod(1 + r_t)` over a return series.
  ///
  /// Dates are carried over unchanged.
  pub fn cumulative(&self, initial: f64) -> Series {
    let mut acc = initial;
    let values = self
      .values
      .iter()
      .map(|r| {
        acc *= 1.0 + r;
        acc
      })
      .collect();

    Series::new(self.dates.clone(), values)
  }

  /// Keep the last observation of each calendar month.
  pub fn resample_month_end(&self) -> Series {
    let mut dates = Vec::new();
    let mut values = Vec::new();

    for i in 0..self.len() {
      let is_last_of_month = match self.dates.get(i + 1) {
        Some(next) => {
          (next.year(), next.month()) != (self.dates[i].year(), self.dates[i].month())
        }
        None => true,
      };
      if is_last_of_month {
        dates.push(self.dates[i]);
        values.push(self.values[i]);
      }
    }

    Series::new(dates, values)
  }

  /// Restrict the series to observations within `[start, end]` inclusive.
  pub fn clip(&self, start: NaiveDate, end: NaiveDate) -> Series {
    let mut dates = Vec::new();
    let mut values = Vec::new();

    for (d, v) in self.dates.iter().zip(self.values.iter()) {
      if *d >= start && *d <= end {
        dates.push(*d);
        values.push(*v);
      }
    }

    Series::new(dates, values)
  }
}

/// Align series by intersecting their date sets.
///
/// Only dates present in every input survive. Errors when the intersection
/// is empty or no input is given.
pub fn align(series: &[Series]) -> Result<Vec<Series>, AnalysisError> {
  let first = series
    .first()
    .ok_or_else(|| AnalysisError::data("no series to align"))?;

  let mut common: BTreeSet<NaiveDate> = first.dates.iter().copied().collect();
  for s in &series[1..] {
    let dates: HashSet<NaiveDate> = s.dates.iter().copied().collect();
    common.retain(|d| dates.contains(d));
  }

  if common.is_empty() {
    return Err(AnalysisError::data("no overlapping dates across series"));
  }

  let aligned = series
    .iter()
    .map(|s| {
      let mut dates = Vec::with_capacity(common.len());
      let mut values = Vec::with_capacity(common.len());
      for (d, v) in s.dates.iter().zip(s.values.iter()) {
        if common.contains(d) {
          dates.push(*d);
          values.push(*v);
        }
      }
      Series::new(dates, values)
    })
    .collect();

  Ok(aligned)
}
