//! Report generation business logic.
//!
//! This module filters orders by reporting period, totals them per requester
//! and turns them into export rows. Everything here is a pure transform over
//! a snapshot; callers re-run it on every new snapshot instead of patching
//! previous results. Periods are keyed only on the order's submission date.

use crate::entities::OrderModel;
use chrono::{Datelike, Days, Months, NaiveDate};
use std::collections::{BTreeSet, HashMap};

/// Named reporting periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodMode {
    /// Today only
    Today,
    /// The day before today
    Yesterday,
    /// Monday to Sunday of the current week
    ThisWeek,
    /// The current calendar month
    ThisMonth,
    /// The current calendar year
    ThisYear,
    /// Explicit boundaries
    Custom,
}

/// Inclusive date range with the mode that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    /// How the range was chosen
    pub mode: PeriodMode,
    /// First day, inclusive
    pub start: NaiveDate,
    /// Last day, inclusive
    pub end: NaiveDate,
}

impl ReportPeriod {
    /// Computes a preset range relative to `today`.
    ///
    /// `Custom` has no boundaries of its own and starts as today only.
    #[must_use]
    pub fn preset(mode: PeriodMode, today: NaiveDate) -> Self {
        let (start, end) = match mode {
            PeriodMode::Today | PeriodMode::Custom => (today, today),
            PeriodMode::Yesterday => {
                let yesterday = today.pred_opt().unwrap_or(today);
                (yesterday, yesterday)
            }
            PeriodMode::ThisWeek => {
                let monday = today - Days::new(u64::from(today.weekday().num_days_from_monday()));
                (monday, monday + Days::new(6))
            }
            PeriodMode::ThisMonth => {
                let first = today.with_day(1).unwrap_or(today);
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(today);
                (first, last)
            }
            PeriodMode::ThisYear => {
                let first = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                let last = NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today);
                (first, last)
            }
        };
        Self { mode, start, end }
    }

    /// An explicit range.
    #[must_use]
    pub const fn custom(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            mode: PeriodMode::Custom,
            start,
            end,
        }
    }

    /// Overrides the first day; the period becomes `Custom`.
    #[must_use]
    pub const fn with_start(self, start: NaiveDate) -> Self {
        Self::custom(start, self.end)
    }

    /// Overrides the last day; the period becomes `Custom`.
    #[must_use]
    pub const fn with_end(self, end: NaiveDate) -> Self {
        Self::custom(self.start, end)
    }

    /// Whether `date` falls inside the period, both bounds included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// File name of a history export for this period.
    #[must_use]
    pub fn export_filename(&self) -> String {
        format!(
            "history_export_{}_to_{}.csv",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Orders whose submission date is inside `[start, end]`, in input order.
#[must_use]
pub fn filter_by_range(
    orders: &[OrderModel],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<&OrderModel> {
    let period = ReportPeriod::custom(start, end);
    orders.iter().filter(|o| period.contains(o.order_date)).collect()
}

/// Orders inside `period`, newest date first, as shown in the history list.
#[must_use]
pub fn orders_in_period<'a>(
    orders: &'a [OrderModel],
    period: &ReportPeriod,
) -> Vec<&'a OrderModel> {
    let mut filtered = filter_by_range(orders, period.start, period.end);
    sort_newest_first(&mut filtered);
    filtered
}

/// Sorts by submission date descending; same-day orders keep their order.
pub fn sort_newest_first(orders: &mut [&OrderModel]) {
    orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
}

/// Views offered on the live orders dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFilter {
    /// Submitted today
    Today,
    /// Submitted yesterday
    Yesterday,
    /// Everything
    All,
}

impl DayFilter {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::All => "all",
        }
    }

    /// File name of a dashboard export taken on `today`.
    #[must_use]
    pub fn export_filename(self, today: NaiveDate) -> String {
        format!("orders_export_{}_{}.csv", self.as_str(), today.format("%Y-%m-%d"))
    }
}

/// Orders matching a dashboard filter, in input order.
#[must_use]
pub fn orders_for_day_filter(
    orders: &[OrderModel],
    filter: DayFilter,
    today: NaiveDate,
) -> Vec<&OrderModel> {
    let target = match filter {
        DayFilter::All => return orders.iter().collect(),
        DayFilter::Today => today,
        DayFilter::Yesterday => today.pred_opt().unwrap_or(today),
    };
    filter_by_range(orders, target, target)
}

/// Headline numbers for a set of orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    /// Number of orders
    pub order_count: usize,
    /// Sum of order totals
    pub total_amount: i64,
    /// Orders not yet paid
    pub unpaid_count: usize,
}

/// Counts and sums a set of orders.
#[must_use]
pub fn period_totals<'a>(orders: impl IntoIterator<Item = &'a OrderModel>) -> PeriodTotals {
    orders.into_iter().fold(PeriodTotals::default(), |mut acc, o| {
        acc.order_count += 1;
        acc.total_amount = acc.total_amount.saturating_add(o.total_amount);
        if !o.is_paid {
            acc.unpaid_count += 1;
        }
        acc
    })
}

/// One row of the per-person statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequesterTotal {
    /// Requester name
    pub name: String,
    /// Number of orders
    pub count: usize,
    /// Sum of their order totals
    pub total_amount: i64,
}

/// One row per requester, highest spender first. Ties keep first-seen order.
#[must_use]
pub fn aggregate_by_requester<'a>(
    orders: impl IntoIterator<Item = &'a OrderModel>,
) -> Vec<RequesterTotal> {
    let mut rows: Vec<RequesterTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for order in orders {
        let name = order.requester_name.as_str();
        let position = *index.entry(name).or_insert_with(|| {
            rows.push(RequesterTotal {
                name: name.to_string(),
                count: 0,
                total_amount: 0,
            });
            rows.len() - 1
        });
        if let Some(row) = rows.get_mut(position) {
            row.count += 1;
            row.total_amount = row.total_amount.saturating_add(order.total_amount);
        }
    }

    rows.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
    rows
}

/// Restricts export to the selected ids; an empty selection means everything.
#[must_use]
pub fn select_for_export<'a>(
    orders: &[&'a OrderModel],
    selected: &BTreeSet<i64>,
) -> Vec<&'a OrderModel> {
    if selected.is_empty() {
        return orders.to_vec();
    }
    orders
        .iter()
        .copied()
        .filter(|o| selected.contains(&o.id))
        .collect()
}

/// Fixed header of the export table.
pub const EXPORT_HEADER: [&str; 8] = [
    "訂單日期",
    "訂單類別",
    "訂購人",
    "餐點內容",
    "備註",
    "總金額",
    "付款狀態",
    "出餐狀態",
];

const ITEM_SEPARATOR: &str = "; ";

/// Export table: the fixed header plus one row per order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    /// Column titles
    pub header: Vec<String>,
    /// One entry per order, same width as the header
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    /// True when no order made it into the table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

const fn paid_label(is_paid: bool) -> &'static str {
    if is_paid { "已付款" } else { "未付款" }
}

/// `"Fried Rice x1; Soup x2"`
#[must_use]
pub fn format_line_summary(order: &OrderModel) -> String {
    order
        .line_items
        .0
        .iter()
        .map(|item| format!("{} x{}", item.item_name, item.quantity))
        .collect::<Vec<_>>()
        .join(ITEM_SEPARATOR)
}

/// Renders orders into export rows, preserving input order.
#[must_use]
pub fn to_export_rows<'a>(orders: impl IntoIterator<Item = &'a OrderModel>) -> ExportTable {
    let rows = orders
        .into_iter()
        .map(|o| {
            vec![
                o.order_date.format("%Y-%m-%d").to_string(),
                o.category.label().to_string(),
                o.requester_name.clone(),
                format_line_summary(o),
                o.combined_note.clone(),
                o.total_amount.to_string(),
                paid_label(o.is_paid).to_string(),
                o.status.label().to_string(),
            ]
        })
        .collect();

    ExportTable {
        header: EXPORT_HEADER.iter().map(ToString::to_string).collect(),
        rows,
    }
}
