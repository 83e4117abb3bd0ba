use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{Booking, NailDesign, Service, WaitlistEntry};

// ── Sorting ──

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Single-key sort toggled by header clicks.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SortState<K> {
    pub key: Option<K>,
    pub direction: SortDirection,
}

impl<K> Default for SortState<K> {
    fn default() -> Self {
        Self {
            key: None,
            direction: SortDirection::Ascending,
        }
    }
}

pub trait SortBy<K> {
    fn compare_by(&self, other: &Self, key: K) -> Ordering;
}

impl<K: Copy + PartialEq> SortState<K> {
    /// Clicking the ascending column again flips it; any other click starts
    /// ascending on the clicked column.
    pub fn request(&mut self, key: K) {
        self.direction = if self.key == Some(key) && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        self.key = Some(key);
    }

    pub fn apply<T: SortBy<K>>(&self, items: &mut [T]) {
        let Some(key) = self.key else {
            return;
        };
        items.sort_by(|a, b| {
            let ord = a.compare_by(b, key);
            match self.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BookingSortKey {
    ServiceDate,
    TotalAmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CatalogSortKey {
    Name,
    Price,
    Duration,
    TrendScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WaitlistSortKey {
    StartTime,
    Price,
    Name,
}

fn by_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn by_day(a: Option<&str>, b: Option<&str>) -> Ordering {
    let day_a = a.and_then(parse_day);
    let day_b = b.and_then(parse_day);
    day_a.cmp(&day_b).then_with(|| a.cmp(&b))
}

impl SortBy<BookingSortKey> for Booking {
    fn compare_by(&self, other: &Self, key: BookingSortKey) -> Ordering {
        match key {
            BookingSortKey::ServiceDate => by_day(
                self.service_date.as_deref(),
                other.service_date.as_deref(),
            )
            .then_with(|| self.start_time.cmp(&other.start_time)),
            BookingSortKey::TotalAmount => self.total_amount.total_cmp(&other.total_amount),
        }
    }
}

impl SortBy<CatalogSortKey> for Service {
    fn compare_by(&self, other: &Self, key: CatalogSortKey) -> Ordering {
        match key {
            CatalogSortKey::Name => by_text(&self.name, &other.name),
            CatalogSortKey::Price => self.price.total_cmp(&other.price),
            CatalogSortKey::Duration => self.duration.cmp(&other.duration),
            CatalogSortKey::TrendScore => Ordering::Equal,
        }
    }
}

impl SortBy<CatalogSortKey> for NailDesign {
    fn compare_by(&self, other: &Self, key: CatalogSortKey) -> Ordering {
        match key {
            CatalogSortKey::Name => by_text(&self.name, &other.name),
            CatalogSortKey::Price => self
                .price
                .unwrap_or(0.0)
                .total_cmp(&other.price.unwrap_or(0.0)),
            CatalogSortKey::TrendScore => self.trend_score.total_cmp(&other.trend_score),
            CatalogSortKey::Duration => Ordering::Equal,
        }
    }
}

impl SortBy<WaitlistSortKey> for WaitlistEntry {
    fn compare_by(&self, other: &Self, key: WaitlistSortKey) -> Ordering {
        match key {
            WaitlistSortKey::StartTime => self.start_time.cmp(&other.start_time),
            WaitlistSortKey::Price => self.price.total_cmp(&other.price),
            WaitlistSortKey::Name => by_text(&self.name, &other.name),
        }
    }
}

// ── Waitlist filtering ──

/// Store picker value: every store, or one store by exact name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StoreFilter {
    #[default]
    All,
    Store(String),
}

impl StoreFilter {
    pub const ALL: &'static str = "all";

    pub fn matches(&self, store: &str) -> bool {
        match self {
            StoreFilter::All => true,
            StoreFilter::Store(name) => name == store,
        }
    }
}

impl From<String> for StoreFilter {
    fn from(s: String) -> Self {
        if s == Self::ALL {
            StoreFilter::All
        } else {
            StoreFilter::Store(s)
        }
    }
}

impl From<&str> for StoreFilter {
    fn from(s: &str) -> Self {
        StoreFilter::from(s.to_string())
    }
}

impl From<StoreFilter> for String {
    fn from(filter: StoreFilter) -> Self {
        match filter {
            StoreFilter::All => StoreFilter::ALL.to_string(),
            StoreFilter::Store(name) => name,
        }
    }
}

/// Entries on `date` (calendar-day match) at the selected store.
pub fn filter_waitlist(
    entries: &[WaitlistEntry],
    date: NaiveDate,
    store: &StoreFilter,
) -> Vec<WaitlistEntry> {
    entries
        .iter()
        .filter(|e| parse_day(&e.date) == Some(date) && store.matches(&e.store))
        .cloned()
        .collect()
}

/// Store picker options: `"all"` followed by each distinct store in first-seen
/// order.
pub fn unique_stores(entries: &[WaitlistEntry]) -> Vec<String> {
    let mut stores = vec![StoreFilter::ALL.to_string()];
    for entry in entries {
        if !entry.store.is_empty() && !stores.contains(&entry.store) {
            stores.push(entry.store.clone());
        }
    }
    stores
}

/// Days of `year`/`month` that have at least one waitlist entry.
pub fn appointment_days(entries: &[WaitlistEntry], year: i32, month: u32) -> Vec<u32> {
    entries
        .iter()
        .filter_map(|e| parse_day(&e.date))
        .filter(|d| d.year() == year && d.month() == month)
        .map(|d| d.day())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ── Formatting ──

/// Calendar day of a date or timestamp string. Offsets are not converted: the
/// day is the one written in the string.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// "Jan 02, 2025"
pub fn format_date(s: Option<&str>) -> String {
    s.and_then(parse_day)
        .map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| "Invalid Date".to_string())
}

/// `HH:MM` prefix of a time-of-day string.
pub fn format_clock(s: Option<&str>) -> String {
    match s {
        Some(t) if !t.is_empty() => t.chars().take(5).collect(),
        _ => "N/A".to_string(),
    }
}

/// "150,000 VND"
pub fn format_amount(amount: f64) -> String {
    format!("{} VND", group_thousands(amount))
}

/// en-US digit grouping with at most three fraction digits.
pub fn group_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = (value * 1000.0).round() / 1000.0;
    let negative = rounded < 0.0;
    let abs = rounded.abs();
    let whole = abs.trunc();

    let digits = format!("{whole:.0}");
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let frac = format!("{:.3}", abs - whole);
    let frac = frac.trim_start_matches('0').trim_end_matches('0');
    let frac = if frac == "." { "" } else { frac };

    let sign = if negative && (whole > 0.0 || !frac.is_empty()) {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}{frac}")
}

pub fn format_waitlist_price(price: f64) -> String {
    format!("{price}đ")
}

// ── Month calendar ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Previous,
    Current,
    Next,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayCell {
    pub day: u32,
    pub kind: CellKind,
    pub marked: bool,
    pub selected: bool,
}

/// Six-week month view, Monday first.
#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub weekdays: [&'static str; 7],
    pub cells: Vec<DayCell>,
}

const GRID_CELLS: usize = 42;

impl MonthGrid {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let days = days_in_month(first)?;
        let lead = first.weekday().num_days_from_monday();
        let prev_days = days_in_month(first - Duration::days(1))?;

        let mut cells = Vec::with_capacity(GRID_CELLS);
        for day in (prev_days - lead + 1)..=prev_days {
            cells.push(DayCell {
                day,
                kind: CellKind::Previous,
                marked: false,
                selected: false,
            });
        }
        for day in 1..=days {
            cells.push(DayCell {
                day,
                kind: CellKind::Current,
                marked: false,
                selected: false,
            });
        }
        let mut next = 1;
        while cells.len() < GRID_CELLS {
            cells.push(DayCell {
                day: next,
                kind: CellKind::Next,
                marked: false,
                selected: false,
            });
            next += 1;
        }

        Some(Self {
            year,
            month,
            month_name: first.format("%B").to_string(),
            weekdays: ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"],
            cells,
        })
    }

    /// Flag days of this month that have appointments.
    pub fn mark(mut self, days: &[u32]) -> Self {
        for cell in &mut self.cells {
            if cell.kind == CellKind::Current && days.contains(&cell.day) {
                cell.marked = true;
            }
        }
        self
    }

    pub fn select(mut self, date: NaiveDate) -> Self {
        if date.year() == self.year && date.month() == self.month {
            for cell in &mut self.cells {
                cell.selected = cell.kind == CellKind::Current && cell.day == date.day();
            }
        }
        self
    }
}

/// Move a (year, month) cursor by `delta` months.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

fn days_in_month(first: NaiveDate) -> Option<u32> {
    let (y, m) = shift_month(first.year(), first.month(), 1);
    let next_first = NaiveDate::from_ymd_opt(y, m, 1)?;
    let first_of_this = NaiveDate::from_ymd_opt(first.year(), first.month(), 1)?;
    u32::try_from((next_first - first_of_this).num_days()).ok()
}
