//! Groups dated posts into the year/month tree rendered by the archive page.
//! The tree ([`Archive`]) is the only shape that is built; the flattened
//! year-to-posts listing is derived from it by [`Archive::flatten`].

use crate::date::{month_name, month_number};
use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Anything that may carry a creation timestamp. Items without one are left
/// out of the archive.
pub trait Dated {
    fn created_at(&self) -> Option<DateTime<Utc>>;
}

impl<T: Dated + ?Sized> Dated for &T {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        (**self).created_at()
    }
}

/// Lets `(path, file)` pairs from a map iterator be archived by the file.
impl<K, T: Dated> Dated for (K, T) {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.1.created_at()
    }
}

/// The direction in which years and months are listed. Posts inside a month
/// are always listed newest day first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Ascending,
    Descending,
}

impl Default for Order {
    fn default() -> Self {
        Order::Descending
    }
}

/// An inclusive range of calendar years. The end is normally the current
/// year at build time and is always supplied by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    /// Fails with [`Error::InvalidYearRange`] if `start` is after `end`.
    pub fn new(start: i32, end: i32) -> Result<YearRange> {
        if start > end {
            return Err(Error::InvalidYearRange { start, end });
        }
        Ok(YearRange { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}

/// The archive tree. Neither a [`Year`] nor a [`Month`] is ever empty.
#[derive(Debug)]
pub struct Archive<T> {
    pub years: Vec<Year<T>>,
}

#[derive(Debug)]
pub struct Year<T> {
    pub year: i32,
    pub months: Vec<Month<T>>,
}

#[derive(Debug)]
pub struct Month<T> {
    /// 1-based calendar month.
    pub month: u32,

    /// Sorted by day of the month, latest first.
    pub items: Vec<T>,
}

impl<T> Month<T> {
    /// The English month name, e.g. `June`.
    pub fn name(&self) -> &'static str {
        month_name(self.month)
    }

    /// The zero-padded month number, e.g. `06`.
    pub fn number(&self) -> String {
        month_number(self.month)
    }
}

/// A year and all of its posts with the month level removed.
#[derive(Debug)]
pub struct FlatYear<T> {
    pub year: i32,
    pub items: Vec<T>,
}

impl<T> Archive<T> {
    /// The total number of archived items.
    pub fn len(&self) -> usize {
        self.years
            .iter()
            .flat_map(|year| year.months.iter())
            .map(|month| month.items.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Projects the tree onto a list of years, each holding its posts in the
    /// same order they appear in the tree.
    pub fn flatten(&self) -> Vec<FlatYear<&T>> {
        self.years
            .iter()
            .map(|year| FlatYear {
                year: year.year,
                items: year
                    .months
                    .iter()
                    .flat_map(|month| month.items.iter())
                    .collect(),
            })
            .collect()
    }
}

/// Builds the archive for every item whose creation date falls inside
/// `range`. Years and months are listed in `order`; within a month items are
/// sorted by day descending, and items sharing a day keep their input order.
pub fn build_archive<T, I>(items: I, range: YearRange, order: Order) -> Archive<T>
where
    T: Dated,
    I: IntoIterator<Item = T>,
{
    let mut buckets: BTreeMap<i32, BTreeMap<u32, Vec<(u32, T)>>> = BTreeMap::new();
    for item in items {
        let created_at = match item.created_at() {
            Some(created_at) if range.contains(created_at.year()) => created_at,
            _ => continue,
        };
        buckets
            .entry(created_at.year())
            .or_default()
            .entry(created_at.month())
            .or_default()
            .push((created_at.day(), item));
    }

    let months_of = |months: BTreeMap<u32, Vec<(u32, T)>>| -> Vec<Month<T>> {
        let months = months.into_iter().map(|(month, mut days)| {
            // stable, so same-day items stay in input order
            days.sort_by(|(a, _), (b, _)| b.cmp(a));
            Month {
                month,
                items: days.into_iter().map(|(_, item)| item).collect(),
            }
        });
        match order {
            Order::Ascending => months.collect(),
            Order::Descending => months.rev().collect(),
        }
    };

    let years = buckets.into_iter().map(|(year, months)| Year {
        year,
        months: months_of(months),
    });
    Archive {
        years: match order {
            Order::Ascending => years.collect(),
            Order::Descending => years.rev().collect(),
        },
    }
}

/// The result of a fallible archive operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error configuring the archive.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Returned when the first year of a [`YearRange`] comes after the last.
    InvalidYearRange { start: i32, end: i32 },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidYearRange { start, end } => write!(
                f,
                "invalid archive year range: start year {} is after end year {}",
                start, end
            ),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidYearRange { .. } => None,
        }
    }
}
