//! The immutable, offset-aware temporal value.
//!
//! A [`Temporal`] is always anchored to a UTC offset; there is no naive
//! variant. Every operation that "changes" a value returns a new one.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Timelike,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TemporalError;
use crate::tz::Zone;

/// Earliest representable instant, `0001-01-01T00:00:00Z`, in Unix seconds.
pub const MIN_TIMESTAMP: i64 = -62_135_596_800;
/// Latest representable whole second, `9999-12-31T23:59:59Z`, in Unix seconds.
pub const MAX_TIMESTAMP: i64 = 253_402_300_799;

// ── Unit ────────────────────────────────────────────────────────────────────

/// Calendar units used for shifting and humanizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    /// All units, largest first.
    pub const DESCENDING: [Unit; 7] = [
        Unit::Year,
        Unit::Month,
        Unit::Week,
        Unit::Day,
        Unit::Hour,
        Unit::Minute,
        Unit::Second,
    ];

    /// Nominal length in seconds. Months and years use the mean Gregorian length.
    pub fn seconds(self) -> i64 {
        match self {
            Unit::Second => 1,
            Unit::Minute => 60,
            Unit::Hour => 3_600,
            Unit::Day => 86_400,
            Unit::Week => 604_800,
            Unit::Month => 2_629_746,
            Unit::Year => 31_556_952,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Unit::Second => "second",
            Unit::Minute => "minute",
            Unit::Hour => "hour",
            Unit::Day => "day",
            Unit::Week => "week",
            Unit::Month => "month",
            Unit::Year => "year",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Temporal ────────────────────────────────────────────────────────────────

/// An immutable point in time with a UTC offset.
///
/// Equality and hashing consider both the instant and the offset: the same
/// instant rendered at `+00:00` and at `+09:00` are different values. Use
/// [`Temporal::same_instant`] or [`Temporal::cmp_instant`] to compare the
/// instant alone. [`Ord`] sorts by instant and breaks ties by offset.
///
/// # Examples
///
/// ```
/// use tempora::{Temporal, Zone};
///
/// let t = Temporal::new(2023, 1, 1, 12, 30, 0, 0, &Zone::Utc).unwrap();
/// assert_eq!(t.to_iso8601(), "2023-01-01T12:30:00+00:00");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Temporal {
    inner: DateTime<FixedOffset>,
}

impl Temporal {
    /// Build a value from calendar components interpreted in `zone`.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::InvalidDateComponent`] if any component is out
    /// of range (month 13, February 30th, hour 24, ...) or the year falls
    /// outside `1..=9999`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        nanosecond: u32,
        zone: &Zone,
    ) -> Result<Self, TemporalError> {
        let naive = checked_naive(year, month, day, hour, minute, second, nanosecond)?;
        Self::from_local(&naive, zone)
    }

    /// Place a wall-clock time in `zone`.
    pub(crate) fn from_local(naive: &NaiveDateTime, zone: &Zone) -> Result<Self, TemporalError> {
        if !(1..=9999).contains(&naive.year()) {
            return Err(TemporalError::InvalidDateComponent(format!(
                "year {} is outside 1..=9999",
                naive.year()
            )));
        }
        Self::from_datetime(zone.localize(naive)).map_err(|_| {
            TemporalError::InvalidDateComponent(format!("'{naive}' is outside the supported range"))
        })
    }

    /// Adopt an offset-aware chrono value.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::NumericRange`] if the instant lies outside
    /// `0001-01-01T00:00:00Z ..= 9999-12-31T23:59:59.999999999Z`, or if its
    /// wall-clock year in `inner`'s offset falls outside `1..=9999`.
    pub fn from_datetime(inner: DateTime<FixedOffset>) -> Result<Self, TemporalError> {
        let utc_year = inner.naive_utc().year();
        if !(1..=9999).contains(&utc_year) {
            return Err(TemporalError::NumericRange(format!(
                "instant {} is outside the representable range",
                inner.to_rfc3339()
            )));
        }
        let local_year = inner.naive_local().year();
        if !(1..=9999).contains(&local_year) {
            return Err(TemporalError::NumericRange(format!(
                "instant {} falls in year {local_year} at offset {}",
                inner.naive_utc(),
                inner.offset()
            )));
        }
        Ok(Self { inner })
    }

    /// The instant `seconds` + `nanoseconds` after the Unix epoch, in UTC.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::NumericRange`] outside the representable range.
    pub fn from_timestamp(seconds: i64, nanoseconds: u32) -> Result<Self, TemporalError> {
        if !(MIN_TIMESTAMP..=MAX_TIMESTAMP).contains(&seconds) || nanoseconds >= 1_000_000_000 {
            return Err(TemporalError::NumericRange(format!(
                "timestamp {seconds}.{nanoseconds:09} is outside the representable range"
            )));
        }
        let utc = DateTime::from_timestamp(seconds, nanoseconds).ok_or_else(|| {
            TemporalError::NumericRange(format!("timestamp {seconds} is not representable"))
        })?;
        Self::from_datetime(utc.fixed_offset())
    }

    pub fn year(&self) -> i32 {
        self.inner.year()
    }

    pub fn month(&self) -> u32 {
        self.inner.month()
    }

    pub fn day(&self) -> u32 {
        self.inner.day()
    }

    pub fn hour(&self) -> u32 {
        self.inner.hour()
    }

    pub fn minute(&self) -> u32 {
        self.inner.minute()
    }

    pub fn second(&self) -> u32 {
        self.inner.second()
    }

    pub fn nanosecond(&self) -> u32 {
        self.inner.nanosecond()
    }

    /// The sub-second part as a fraction in `[0, 1)`.
    pub fn fraction(&self) -> f64 {
        f64::from(self.inner.nanosecond()) / 1e9
    }

    pub fn offset(&self) -> FixedOffset {
        *self.inner.offset()
    }

    pub fn datetime(&self) -> DateTime<FixedOffset> {
        self.inner
    }

    pub fn date(&self) -> NaiveDate {
        self.inner.date_naive()
    }

    pub fn naive_local(&self) -> NaiveDateTime {
        self.inner.naive_local()
    }

    pub fn naive_utc(&self) -> NaiveDateTime {
        self.inner.naive_utc()
    }

    /// Whole seconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.inner.timestamp()
    }

    /// Nanoseconds since the Unix epoch.
    pub fn timestamp_nanos(&self) -> i128 {
        i128::from(self.inner.timestamp()) * 1_000_000_000
            + i128::from(self.inner.timestamp_subsec_nanos())
    }

    /// The same instant expressed in another zone.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::NumericRange`] if the wall-clock year in
    /// `zone` falls outside `1..=9999` (the first and last hours of the range).
    pub fn to_zone(&self, zone: &Zone) -> Result<Self, TemporalError> {
        Self::from_datetime(zone.at_utc(&self.inner.naive_utc()))
    }

    /// The same wall-clock time read in another zone (a different instant).
    pub fn replace_zone(&self, zone: &Zone) -> Result<Self, TemporalError> {
        Self::from_local(&self.inner.naive_local(), zone)
    }

    /// The same instant at UTC.
    pub fn to_utc(&self) -> Self {
        Self {
            inner: self.inner.naive_utc().and_utc().fixed_offset(),
        }
    }

    pub fn same_instant(&self, other: &Self) -> bool {
        self.inner.naive_utc() == other.inner.naive_utc()
    }

    pub fn cmp_instant(&self, other: &Self) -> Ordering {
        self.inner.naive_utc().cmp(&other.inner.naive_utc())
    }

    /// Shift by `amount` units.
    ///
    /// Months and years move the calendar fields, clamping the day to the
    /// end of the target month (January 31st plus one month is February
    /// 28th or 29th). Other units add an exact number of seconds. The offset
    /// is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::NumericRange`] if the result is not representable.
    pub fn shift(&self, unit: Unit, amount: i64) -> Result<Self, TemporalError> {
        let overflow = || {
            TemporalError::NumericRange(format!(
                "shifting {} by {amount} {unit}(s) overflows",
                self.to_iso8601()
            ))
        };
        match unit {
            Unit::Month | Unit::Year => {
                let months = if unit == Unit::Year {
                    amount.checked_mul(12).ok_or_else(overflow)?
                } else {
                    amount
                };
                let local = self.inner.naive_local();
                let total = i64::from(local.year()) * 12 + i64::from(local.month0());
                let total = total.checked_add(months).ok_or_else(overflow)?;
                let year = i32::try_from(total.div_euclid(12)).map_err(|_| overflow())?;
                let month = total.rem_euclid(12) as u32 + 1;
                let day = local.day().min(days_in_month(year, month));
                let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(overflow)?;
                let shifted = date.and_time(local.time());
                let utc = shifted - chrono::Duration::seconds(i64::from(self.offset().local_minus_utc()));
                let inner = DateTime::from_naive_utc_and_offset(utc, self.offset());
                Self::from_datetime(inner)
            }
            _ => {
                let seconds = amount.checked_mul(unit.seconds()).ok_or_else(overflow)?;
                let delta = chrono::Duration::try_seconds(seconds).ok_or_else(overflow)?;
                let inner = self.inner.checked_add_signed(delta).ok_or_else(overflow)?;
                Self::from_datetime(inner)
            }
        }
    }

    /// Render as ISO-8601 / RFC 3339 with a numeric offset.
    ///
    /// Fractional seconds are printed with 3, 6 or 9 digits as needed and
    /// omitted when zero.
    pub fn to_iso8601(&self) -> String {
        self.inner.to_rfc3339_opts(SecondsFormat::AutoSi, false)
    }
}

impl PartialEq for Temporal {
    fn eq(&self, other: &Self) -> bool {
        self.same_instant(other) && self.offset() == other.offset()
    }
}

impl Eq for Temporal {}

impl Hash for Temporal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.naive_utc().hash(state);
        self.offset().local_minus_utc().hash(state);
    }
}

impl PartialOrd for Temporal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Temporal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_instant(other).then_with(|| {
            self.offset()
                .local_minus_utc()
                .cmp(&other.offset().local_minus_utc())
        })
    }
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Temporal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Temporal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let dt = DateTime::parse_from_rfc3339(&s).map_err(serde::de::Error::custom)?;
        Temporal::from_datetime(dt).map_err(serde::de::Error::custom)
    }
}

// ── Calendar helpers ────────────────────────────────────────────────────────

pub(crate) fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}

/// Gregorian date of an ISO week date.
///
/// Week 1 is the week (Monday to Sunday) containing January 4th, i.e. the
/// first week with a Thursday in the new year. `weekday` runs from 1
/// (Monday) to 7 (Sunday).
pub(crate) fn iso_week_date(year: i32, week: u32, weekday: u32) -> Result<NaiveDate, TemporalError> {
    let invalid = |what: String| TemporalError::InvalidDateComponent(what);
    if !(1..=9999).contains(&year) {
        return Err(invalid(format!("ISO year {year} is outside 1..=9999")));
    }
    if !(1..=7).contains(&weekday) {
        return Err(invalid(format!("ISO weekday {weekday} is outside 1..=7")));
    }
    let jan4 = NaiveDate::from_ymd_opt(year, 1, 4)
        .ok_or_else(|| invalid(format!("ISO year {year} is not representable")))?;
    let weeks_in_year = NaiveDate::from_ymd_opt(year, 12, 28)
        .map(|d| d.iso_week().week())
        .unwrap_or(52);
    if !(1..=weeks_in_year).contains(&week) {
        return Err(invalid(format!(
            "ISO week {week} is outside 1..={weeks_in_year} for {year}"
        )));
    }
    let week1_monday =
        jan4 - chrono::Duration::days(i64::from(jan4.weekday().number_from_monday()) - 1);
    let date = week1_monday + chrono::Duration::days(i64::from((week - 1) * 7 + weekday - 1));
    if !(1..=9999).contains(&date.year()) {
        return Err(invalid(format!(
            "ISO week date {year}-W{week:02}-{weekday} falls outside 1..=9999"
        )));
    }
    Ok(date)
}

/// Validate calendar components one by one so the error names the culprit.
pub(crate) fn checked_naive(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    nanosecond: u32,
) -> Result<NaiveDateTime, TemporalError> {
    let invalid = |what: String| Err(TemporalError::InvalidDateComponent(what));
    if !(1..=9999).contains(&year) {
        return invalid(format!("year {year} is outside 1..=9999"));
    }
    if !(1..=12).contains(&month) {
        return invalid(format!("month {month} is outside 1..=12"));
    }
    let max_day = days_in_month(year, month);
    if !(1..=max_day).contains(&day) {
        return invalid(format!("day {day} is outside 1..={max_day} for {year}-{month:02}"));
    }
    if hour > 23 {
        return invalid(format!("hour {hour} is outside 0..=23"));
    }
    if minute > 59 {
        return invalid(format!("minute {minute} is outside 0..=59"));
    }
    if second > 59 {
        return invalid(format!("second {second} is outside 0..=59"));
    }
    if nanosecond >= 1_000_000_000 {
        return invalid(format!("fraction {nanosecond}ns is not below one second"));
    }
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_nano_opt(hour, minute, second, nanosecond))
        .ok_or_else(|| {
            TemporalError::InvalidDateComponent(format!(
                "{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}"
            ))
        })
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> Temporal {
        Temporal::new(y, m, d, h, mi, s, 0, &Zone::Utc).unwrap()
    }

    fn fixed(secs: i32) -> Zone {
        Zone::Fixed(FixedOffset::east_opt(secs).unwrap())
    }

    #[test]
    fn test_new_rejects_invalid_components() {
        let cases = [
            (2023, 13, 1, 0, 0, 0),
            (2023, 2, 29, 0, 0, 0),
            (2023, 4, 31, 0, 0, 0),
            (2023, 1, 1, 24, 0, 0),
            (2023, 1, 1, 0, 61, 0),
            (2023, 1, 1, 0, 0, 60),
            (0, 1, 1, 0, 0, 0),
        ];
        for (y, m, d, h, mi, s) in cases {
            let err = Temporal::new(y, m, d, h, mi, s, 0, &Zone::Utc).unwrap_err();
            assert!(
                matches!(err, TemporalError::InvalidDateComponent(_)),
                "{y}-{m}-{d} {h}:{mi}:{s} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_new_accepts_leap_day() {
        let t = Temporal::new(2024, 2, 29, 0, 0, 0, 0, &Zone::Utc).unwrap();
        assert_eq!((t.month(), t.day()), (2, 29));
    }

    #[test]
    fn test_equality_requires_same_offset() {
        let a = utc(2023, 1, 1, 12, 0, 0);
        let b = a.to_zone(&fixed(9 * 3600)).unwrap();
        assert!(a.same_instant(&b));
        assert_eq!(a.cmp_instant(&b), Ordering::Equal);
        assert_ne!(a, b);
        assert_eq!(b.hour(), 21);
    }

    #[test]
    fn test_replace_zone_keeps_wall_time() {
        let t = utc(2023, 1, 1, 12, 0, 0);
        let moved = t.replace_zone(&fixed(3600)).unwrap();
        assert_eq!(moved.hour(), 12);
        assert_eq!(moved.timestamp(), t.timestamp() - 3600);
    }

    #[test]
    fn test_to_zone_keeps_local_year_in_range() {
        let first = Temporal::from_timestamp(MIN_TIMESTAMP, 0).unwrap();
        let err = first.to_zone(&fixed(-5 * 3600)).unwrap_err();
        assert!(matches!(err, TemporalError::NumericRange(_)), "got: {err}");
        assert_eq!(first.to_zone(&fixed(5 * 3600)).unwrap().year(), 1);

        let last = Temporal::from_timestamp(MAX_TIMESTAMP, 0).unwrap();
        let err = last.to_zone(&fixed(5 * 3600)).unwrap_err();
        assert!(matches!(err, TemporalError::NumericRange(_)), "got: {err}");
        assert_eq!(last.to_zone(&fixed(-5 * 3600)).unwrap().year(), 9999);
    }

    #[test]
    fn test_ordering_is_by_instant_first() {
        let early = utc(2023, 1, 1, 0, 0, 0).to_zone(&fixed(14 * 3600)).unwrap();
        let late = utc(2023, 1, 1, 0, 0, 1);
        assert!(early < late);
    }

    #[test]
    fn test_from_timestamp() {
        let t = Temporal::from_timestamp(1_672_531_200, 0).unwrap();
        assert_eq!(t, utc(2023, 1, 1, 0, 0, 0));
        assert_eq!(t.timestamp(), 1_672_531_200);
    }

    #[test]
    fn test_from_timestamp_out_of_range() {
        let err = Temporal::from_timestamp(MAX_TIMESTAMP + 1, 0).unwrap_err();
        assert!(matches!(err, TemporalError::NumericRange(_)));
        assert!(Temporal::from_timestamp(MIN_TIMESTAMP - 1, 0).is_err());
        assert!(Temporal::from_timestamp(MAX_TIMESTAMP, 999_999_999).is_ok());
    }

    #[test]
    fn test_shift_exact_units() {
        let t = utc(2023, 1, 1, 0, 0, 0);
        assert_eq!(t.shift(Unit::Hour, 25).unwrap(), utc(2023, 1, 2, 1, 0, 0));
        assert_eq!(t.shift(Unit::Week, -1).unwrap(), utc(2022, 12, 25, 0, 0, 0));
        assert_eq!(t.shift(Unit::Second, 59).unwrap(), utc(2023, 1, 1, 0, 0, 59));
    }

    #[test]
    fn test_shift_month_clamps_day() {
        let t = utc(2024, 1, 31, 8, 0, 0);
        assert_eq!(t.shift(Unit::Month, 1).unwrap(), utc(2024, 2, 29, 8, 0, 0));
        assert_eq!(t.shift(Unit::Month, -2).unwrap(), utc(2023, 11, 30, 8, 0, 0));
        assert_eq!(
            utc(2024, 2, 29, 0, 0, 0).shift(Unit::Year, 1).unwrap(),
            utc(2025, 2, 28, 0, 0, 0)
        );
    }

    #[test]
    fn test_shift_keeps_offset() {
        let zone = fixed(-5 * 3600);
        let t = Temporal::new(2023, 3, 1, 9, 0, 0, 0, &zone).unwrap();
        let shifted = t.shift(Unit::Month, 1).unwrap();
        assert_eq!(shifted.offset(), t.offset());
        assert_eq!((shifted.month(), shifted.hour()), (4, 9));
    }

    #[test]
    fn test_shift_overflow_is_numeric_range() {
        let t = utc(9999, 12, 31, 0, 0, 0);
        assert!(matches!(
            t.shift(Unit::Day, 1).unwrap_err(),
            TemporalError::NumericRange(_)
        ));
        assert!(t.shift(Unit::Year, i64::MAX).is_err());
    }

    #[test]
    fn test_to_iso8601() {
        let t = Temporal::new(2023, 6, 5, 7, 8, 9, 120_000_000, &fixed(19800)).unwrap();
        assert_eq!(t.to_iso8601(), "2023-06-05T07:08:09.120+05:30");
        assert_eq!(utc(2023, 1, 1, 0, 0, 0).to_string(), "2023-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_fraction() {
        let t = Temporal::new(2023, 1, 1, 0, 0, 0, 250_000_000, &Zone::Utc).unwrap();
        assert_eq!(t.fraction(), 0.25);
    }

    #[test]
    fn test_serde_roundtrip_as_string() {
        let t = Temporal::new(2023, 6, 5, 7, 8, 9, 0, &fixed(-3600)).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"2023-06-05T07:08:09-01:00\"");
        let back: Temporal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_iso_week_date_follows_first_thursday_rule() {
        // 2023-01-01 is a Sunday, so ISO week 1 starts on Monday 2023-01-02.
        assert_eq!(
            iso_week_date(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
        );
        // 2026-01-01 is a Thursday, so week 1 starts in the previous year.
        assert_eq!(
            iso_week_date(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 29).unwrap()
        );
        assert_eq!(
            iso_week_date(2020, 53, 7).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 3).unwrap()
        );
    }

    #[test]
    fn test_iso_week_date_agrees_with_chrono() {
        for (year, week, weekday) in [(2015, 53, 4), (2024, 10, 3), (1999, 52, 6), (2000, 1, 1)] {
            let expected = NaiveDate::from_isoywd_opt(
                year,
                week,
                chrono::Weekday::try_from((weekday - 1) as u8).unwrap(),
            )
            .unwrap();
            assert_eq!(iso_week_date(year, week, weekday).unwrap(), expected);
        }
    }

    #[test]
    fn test_iso_week_date_rejects_out_of_range() {
        // 2023 has 52 ISO weeks.
        assert!(iso_week_date(2023, 53, 1).is_err());
        assert!(iso_week_date(2023, 0, 1).is_err());
        assert!(iso_week_date(2023, 1, 8).is_err());
        assert!(iso_week_date(2023, 1, 0).is_err());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2023, 12), 31);
    }
}
