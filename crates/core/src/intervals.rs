//! Producer win-interval aggregation.
//!
//! Given the set of winning records (as `producers` text plus year),
//! this module splits composite producer fields into individual names,
//! groups win years per producer, computes the year gap between each
//! pair of consecutive wins, and selects the global minimum- and
//! maximum-interval tie sets.
//!
//! The whole computation is a pure function over its input: callers are
//! responsible for fetching the winner rows and (optionally) caching
//! the result.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::sanitize::sanitize;

/// A producer's gap between two consecutive wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalRecord {
    pub producer: String,
    pub interval: i32,
    pub previous_win: i32,
    pub following_win: i32,
}

/// The aggregate answer: all producers holding the smallest gap and all
/// producers holding the largest gap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationResult {
    pub min: Vec<IntervalRecord>,
    pub max: Vec<IntervalRecord>,
}

impl AggregationResult {
    /// True iff no producer has two or more wins. The lists are always
    /// both empty or both non-empty.
    pub fn is_empty(&self) -> bool {
        self.min.is_empty() && self.max.is_empty()
    }
}

/// Split a composite `producers` field into individual sanitized names.
///
/// The field encodes multiple producers with two delimiter forms,
/// applied in a fixed order: the literal `" and "` is normalized to a
/// comma first, then the string is split on commas. Each piece is
/// trimmed and sanitized; pieces that end up empty (e.g. from a
/// trailing comma) are dropped.
pub fn split_producers(producers: &str) -> Vec<String> {
    producers
        .replace(" and ", ",")
        .split(',')
        .map(|name| sanitize(name.trim()))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Group win years by individual producer.
///
/// A `BTreeMap` keeps producer iteration order deterministic (sorted by
/// sanitized name); within one producer, years keep the insertion order
/// of the input rows. Duplicate years are retained.
fn map_producers_to_years<'a, I>(rows: I) -> BTreeMap<String, Vec<i32>>
where
    I: IntoIterator<Item = (&'a str, i32)>,
{
    let mut producer_years: BTreeMap<String, Vec<i32>> = BTreeMap::new();
    for (producers, year) in rows {
        for producer in split_producers(producers) {
            producer_years.entry(producer).or_default().push(year);
        }
    }
    producer_years
}

/// Compute the global min/max win-interval tie sets.
///
/// For each producer the year list is sorted ascending (stable), then
/// every adjacent pair yields one interval. A strictly smaller interval
/// resets the min set; an equal one appends. Symmetric for the max set.
/// Producers with fewer than two wins contribute nothing; if no
/// producer has two wins the result is empty.
pub fn aggregate<'a, I>(rows: I) -> AggregationResult
where
    I: IntoIterator<Item = (&'a str, i32)>,
{
    let producer_years = map_producers_to_years(rows);

    let mut min_interval = i32::MAX;
    let mut max_interval = i32::MIN;
    let mut min_results: Vec<IntervalRecord> = Vec::new();
    let mut max_results: Vec<IntervalRecord> = Vec::new();

    for (producer, mut years) in producer_years {
        years.sort();

        for pair in years.windows(2) {
            let (previous_win, following_win) = (pair[0], pair[1]);
            let interval = following_win - previous_win;

            if interval < min_interval {
                min_interval = interval;
                min_results.clear();
            }
            if interval == min_interval {
                min_results.push(IntervalRecord {
                    producer: producer.clone(),
                    interval,
                    previous_win,
                    following_win,
                });
            }

            if interval > max_interval {
                max_interval = interval;
                max_results.clear();
            }
            if interval == max_interval {
                max_results.push(IntervalRecord {
                    producer: producer.clone(),
                    interval,
                    previous_win,
                    following_win,
                });
            }
        }
    }

    AggregationResult {
        min: min_results,
        max: max_results,
    }
}
