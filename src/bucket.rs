//! Filtering and grouping of transactions into category, day, period and month buckets.
//!
//! Every bucket tracks income and expense separately so the same buckets serve
//! both the single-metric views and the combined overall view.

use std::{collections::HashMap, fmt::Display, hash::Hash};

use serde::{Serialize, Serializer};
use time::Date;

use crate::{
    models::{Category, Transaction, TransactionKind},
    window::{MonthKey, TimeRange, week_start},
};

/// Which transaction types pass the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFilter {
    /// Only income transactions.
    Income,
    /// Only expense transactions.
    Expense,
    /// Both income and expense transactions.
    Any,
}

impl TypeFilter {
    /// Whether a transaction of `kind` passes the filter.
    pub fn matches(self, kind: TransactionKind) -> bool {
        match self {
            Self::Income => kind == TransactionKind::Income,
            Self::Expense => kind == TransactionKind::Expense,
            Self::Any => true,
        }
    }
}

/// The key of a period bucket, which depends on the selected [TimeRange].
///
/// Displayed and serialized as `YYYY-MM-DD` for week starts and `YYYY-MM` for
/// months. Only one variant is produced for a given range, so ordering within a
/// variant is all that matters and it matches the string ordering of the keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodKey {
    /// The Sunday that starts a week.
    WeekStart(Date),
    /// A calendar month.
    Month(MonthKey),
}

impl PeriodKey {
    /// The period containing `date` for `range`.
    ///
    /// The month and year ranges share the `YYYY-MM` granularity.
    pub fn for_date(date: Date, range: TimeRange) -> Self {
        match range {
            TimeRange::Week => Self::WeekStart(week_start(date)),
            TimeRange::Month | TimeRange::Year => Self::Month(MonthKey::of(date)),
        }
    }
}

impl Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WeekStart(date) => write!(
                f,
                "{:04}-{:02}-{:02}",
                date.year(),
                u8::from(date.month()),
                date.day()
            ),
            Self::Month(month) => month.fmt(f),
        }
    }
}

impl Serialize for PeriodKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Running sums for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tally {
    /// The sum of income amounts.
    pub income: f64,
    /// The sum of expense amounts.
    pub expense: f64,
    /// The number of transactions added.
    pub count: usize,
}

impl Tally {
    fn add(&mut self, transaction: &Transaction) {
        match transaction.kind {
            TransactionKind::Income => self.income += transaction.amount,
            TransactionKind::Expense => self.expense += transaction.amount,
        }
        self.count += 1;
    }

    /// Income minus expense.
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }

    /// The sum of all amounts regardless of type.
    ///
    /// For buckets built with a single-type filter this is the sum of that type.
    pub fn total(&self) -> f64 {
        self.income + self.expense
    }
}

/// The transactions of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBucket<'a> {
    /// The category the transactions refer to.
    pub category: &'a Category,
    /// The sums for the category.
    pub tally: Tally,
}

/// The transactions of one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    /// The calendar day.
    pub date: Date,
    /// The sums for the day.
    pub tally: Tally,
}

/// The transactions of one period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodBucket {
    /// The week start or month of the period.
    pub key: PeriodKey,
    /// The sums for the period.
    pub tally: Tally,
}

/// The transactions of one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBucket {
    /// The calendar month.
    pub month: MonthKey,
    /// The sums for the month.
    pub tally: Tally,
}

/// The filtered transactions grouped four ways.
///
/// Ordering guarantees:
/// - `by_category` is in order of first appearance in the input.
/// - `by_day`, `by_period` and `by_month` are in ascending key order.
#[derive(Debug, Clone, PartialEq)]
pub struct Buckets<'a> {
    /// The range used to derive period keys.
    pub range: TimeRange,
    /// The inclusive lower bound used for filtering.
    pub window_start: Date,
    /// Transactions grouped by resolvable category.
    pub by_category: Vec<CategoryBucket<'a>>,
    /// Transactions grouped by calendar day.
    pub by_day: Vec<DayBucket>,
    /// Transactions grouped by range-dependent period.
    pub by_period: Vec<PeriodBucket>,
    /// Transactions grouped by calendar month.
    pub by_month: Vec<MonthBucket>,
    /// The sums over every filtered transaction, categorized or not.
    pub totals: Tally,
}

/// A list of buckets in insertion order with a hash index for lookups.
struct OrderedBuckets<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, Tally)>,
}

impl<K: Copy + Eq + Hash> OrderedBuckets<K> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn tally_mut(&mut self, key: K) -> &mut Tally {
        let position = *self.index.entry(key).or_insert_with(|| {
            self.entries.push((key, Tally::default()));
            self.entries.len() - 1
        });

        &mut self.entries[position].1
    }

    fn into_insertion_order(self) -> Vec<(K, Tally)> {
        self.entries
    }
}

impl<K: Copy + Eq + Hash + Ord> OrderedBuckets<K> {
    fn into_sorted(self) -> Vec<(K, Tally)> {
        let mut entries = self.entries;
        entries.sort_by_key(|(key, _)| *key);
        entries
    }
}

/// Filters `transactions` by type and window and groups the survivors.
///
/// A transaction is kept when its type passes `type_filter` and its date is on
/// or after `window_start`. Transactions whose category is missing or does not
/// resolve against `categories` are left out of `by_category` only.
pub fn bucket<'a>(
    transactions: &[Transaction],
    categories: &'a [Category],
    type_filter: TypeFilter,
    window_start: Date,
    range: TimeRange,
) -> Buckets<'a> {
    let categories_by_id: HashMap<&str, &'a Category> = categories
        .iter()
        .map(|category| (category.id.as_str(), category))
        .collect();

    let mut by_category: OrderedBuckets<&str> = OrderedBuckets::new();
    let mut by_day: OrderedBuckets<Date> = OrderedBuckets::new();
    let mut by_period: OrderedBuckets<PeriodKey> = OrderedBuckets::new();
    let mut by_month: OrderedBuckets<MonthKey> = OrderedBuckets::new();
    let mut totals = Tally::default();
    let mut uncategorized = 0;

    for transaction in transactions
        .iter()
        .filter(|t| type_filter.matches(t.kind) && t.date >= window_start)
    {
        totals.add(transaction);

        match transaction
            .category_id
            .as_deref()
            .and_then(|id| categories_by_id.get(id).copied())
        {
            Some(category) => by_category.tally_mut(category.id.as_str()).add(transaction),
            None => uncategorized += 1,
        }

        by_day.tally_mut(transaction.date).add(transaction);
        by_period
            .tally_mut(PeriodKey::for_date(transaction.date, range))
            .add(transaction);
        by_month
            .tally_mut(MonthKey::of(transaction.date))
            .add(transaction);
    }

    if uncategorized > 0 {
        tracing::warn!(
            "{uncategorized} transactions have no known category and were left out of the category totals"
        );
    }

    let by_category = by_category
        .into_insertion_order()
        .into_iter()
        .filter_map(|(id, tally)| {
            categories_by_id
                .get(id)
                .map(|&category| CategoryBucket { category, tally })
        })
        .collect();

    let buckets = Buckets {
        range,
        window_start,
        by_category,
        by_day: by_day
            .into_sorted()
            .into_iter()
            .map(|(date, tally)| DayBucket { date, tally })
            .collect(),
        by_period: by_period
            .into_sorted()
            .into_iter()
            .map(|(key, tally)| PeriodBucket { key, tally })
            .collect(),
        by_month: by_month
            .into_sorted()
            .into_iter()
            .map(|(month, tally)| MonthBucket { month, tally })
            .collect(),
        totals,
    };

    tracing::debug!(
        "bucketed {} of {} transactions from {window_start} into {} categories, {} days and {} periods",
        totals.count,
        transactions.len(),
        buckets.by_category.len(),
        buckets.by_day.len(),
        buckets.by_period.len(),
    );

    buckets
}
