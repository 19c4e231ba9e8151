//! Sort and shuffle policies for a page of items

use rand::Rng;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, SortError};
use crate::path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Largest (or latest) first.
    Most,
    /// Smallest (or oldest) first.
    Least,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Recent,
    Liked,
    Commented,
}

impl Metric {
    /// Property path the metric is read from.
    pub fn path(&self) -> &'static str {
        match self {
            Metric::Recent => "created_time",
            Metric::Liked => "likes.count",
            Metric::Commented => "comments.count",
        }
    }
}

/// Ordering applied to a page before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortSpec {
    #[default]
    None,
    Random,
    By { direction: Direction, metric: Metric },
}

impl FromStr for SortSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => return Ok(SortSpec::None),
            "random" => return Ok(SortSpec::Random),
            _ => {}
        }

        let (direction, metric) = s.split_once('-').ok_or(ConfigError::Invalid("sort"))?;
        let direction = match direction {
            "most" => Direction::Most,
            "least" => Direction::Least,
            _ => return Err(ConfigError::Invalid("sort")),
        };
        let metric = match metric {
            "recent" => Metric::Recent,
            "liked" => Metric::Liked,
            "commented" => Metric::Commented,
            _ => return Err(ConfigError::Invalid("sort")),
        };

        Ok(SortSpec::By { direction, metric })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortSpec::None => f.write_str("none"),
            SortSpec::Random => f.write_str("random"),
            SortSpec::By { direction, metric } => {
                let direction = match direction {
                    Direction::Most => "most",
                    Direction::Least => "least",
                };
                let metric = match metric {
                    Metric::Recent => "recent",
                    Metric::Liked => "liked",
                    Metric::Commented => "commented",
                };
                write!(f, "{direction}-{metric}")
            }
        }
    }
}

/// Reorder `items` according to `spec`.
///
/// `rng` is only consulted for [`SortSpec::Random`]. Metric sorts are stable
/// and fail with [`SortError`] when a metric is missing or when two values
/// cannot be compared.
pub fn order<T, R>(items: Vec<T>, spec: &SortSpec, rng: &mut R) -> Result<Vec<T>, SortError>
where
    T: AsRef<Value>,
    R: Rng + ?Sized,
{
    match spec {
        SortSpec::None => Ok(items),
        SortSpec::Random => {
            let mut items = items;
            shuffle(&mut items, rng);
            Ok(items)
        }
        SortSpec::By { direction, metric } => sort_by_metric(items, *direction, *metric),
    }
}

/// Fisher–Yates shuffle.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

fn sort_by_metric<T: AsRef<Value>>(
    items: Vec<T>,
    direction: Direction,
    metric: Metric,
) -> Result<Vec<T>, SortError> {
    // A single item is never compared, so its metric is never looked at.
    if items.len() < 2 {
        return Ok(items);
    }

    let metric_path = metric.path();
    let mut keyed = items
        .into_iter()
        .map(|item| {
            let key = path::resolve(item.as_ref(), metric_path)
                .filter(|value| !value.is_null())
                .cloned()
                .ok_or(SortError::MissingMetric(metric_path))?;
            Ok((key, item))
        })
        .collect::<Result<Vec<_>, SortError>>()?;

    let all_numbers = keyed.iter().all(|(key, _)| key.is_number());
    let all_strings = keyed.iter().all(|(key, _)| key.is_string());
    if !all_numbers && !all_strings {
        return Err(SortError::Incomparable(metric_path));
    }

    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = compare_keys(a, b);
        match direction {
            Direction::Most => ordering.reverse(),
            Direction::Least => ordering,
        }
    });

    Ok(keyed.into_iter().map(|(_, item)| item).collect())
}

fn compare_keys(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
