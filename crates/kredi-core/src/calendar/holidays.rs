//! Business-day calendars used to roll payment dates forward.
//!
//! The Turkish table covers the fixed-date national holidays and the
//! Ramazan / Kurban Bayramı periods for 2020-2030. Religious holidays are
//! announced yearly, so callers can add or correct dates through
//! `extra_holidays`.

use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::KrediError;
use crate::KrediResult;

/// Longest run of consecutive non-business days tolerated when rolling forward.
const MAX_ROLL_DAYS: u32 = 31;

/// Fixed-date national holidays as (month, day).
const TR_FIXED_HOLIDAYS: [(u32, u32); 7] = [
    (1, 1),   // Yılbaşı
    (4, 23),  // Ulusal Egemenlik ve Çocuk Bayramı
    (5, 1),   // Emek ve Dayanışma Günü
    (5, 19),  // Atatürk'ü Anma, Gençlik ve Spor Bayramı
    (7, 15),  // Demokrasi ve Milli Birlik Günü
    (8, 30),  // Zafer Bayramı
    (10, 29), // Cumhuriyet Bayramı
];

/// Religious holidays as (year, month, day, length in days).
const TR_RELIGIOUS_HOLIDAYS: [(i32, u32, u32, u32); 22] = [
    // Ramazan Bayramı
    (2020, 5, 24, 3),
    (2021, 5, 13, 3),
    (2022, 5, 2, 3),
    (2023, 4, 21, 3),
    (2024, 4, 10, 3),
    (2025, 3, 30, 3),
    (2026, 3, 20, 3),
    (2027, 3, 9, 3),
    (2028, 2, 26, 3),
    (2029, 2, 14, 3),
    (2030, 2, 4, 3),
    // Kurban Bayramı
    (2020, 7, 31, 4),
    (2021, 7, 20, 4),
    (2022, 7, 9, 4),
    (2023, 6, 28, 4),
    (2024, 6, 16, 4),
    (2025, 6, 6, 4),
    (2026, 5, 27, 4),
    (2027, 5, 16, 4),
    (2028, 5, 5, 4),
    (2029, 4, 24, 4),
    (2030, 4, 13, 4),
];

/// Which built-in holiday table to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayCalendarKind {
    /// Turkish national and religious holidays plus weekends.
    #[default]
    Turkey,
    /// Saturdays and Sundays only.
    WeekendsOnly,
}

/// A source of non-business days.
pub trait HolidayCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool;

    fn is_business_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.is_holiday(date)
    }

    /// `date` itself when it is a business day, otherwise the next one.
    fn next_business_day(&self, date: NaiveDate) -> KrediResult<NaiveDate> {
        let mut current = date;
        for _ in 0..=MAX_ROLL_DAYS {
            if self.is_business_day(current) {
                return Ok(current);
            }
            current = current.checked_add_days(Days::new(1)).ok_or_else(|| {
                KrediError::DateError(format!("date overflow rolling forward from {date}"))
            })?;
        }
        Err(KrediError::DateError(format!(
            "no business day within {MAX_ROLL_DAYS} days of {date}"
        )))
    }
}

/// Holiday table built from a [`HolidayCalendarKind`] plus caller-supplied dates.
#[derive(Debug, Clone, Default)]
pub struct BusinessCalendar {
    kind: HolidayCalendarKind,
    extra: BTreeSet<NaiveDate>,
}

impl BusinessCalendar {
    pub fn new(kind: HolidayCalendarKind, extra: &[NaiveDate]) -> Self {
        Self {
            kind,
            extra: extra.iter().copied().collect(),
        }
    }
}

impl HolidayCalendar for BusinessCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        if self.extra.contains(&date) {
            return true;
        }
        match self.kind {
            HolidayCalendarKind::WeekendsOnly => false,
            HolidayCalendarKind::Turkey => is_turkish_holiday(date),
        }
    }
}

fn is_turkish_holiday(date: NaiveDate) -> bool {
    let (month, day) = (date.month(), date.day());
    // 15 Temmuz became a public holiday in 2017.
    if TR_FIXED_HOLIDAYS
        .iter()
        .any(|&(m, d)| m == month && d == day && !(m == 7 && date.year() < 2017))
    {
        return true;
    }

    TR_RELIGIOUS_HOLIDAYS
        .iter()
        .filter(|&&(year, ..)| year == date.year())
        .any(|&(year, m, d, len)| {
            NaiveDate::from_ymd_opt(year, m, d)
                .map(|first| {
                    let offset = (date - first).num_days();
                    offset >= 0 && offset < len as i64
                })
                .unwrap_or(false)
        })
}
