//! Text parsing.
//!
//! Two modes:
//!
//! - **ISO-8601** (no formats given): calendar dates (`2023-01-05`,
//!   `20230105`, `2023/01/05`), ordinal dates (`2023-005`), week dates
//!   (`2023-W01-4`), reduced precision (`2023-01`, `2023`), an optional time
//!   after `T` or a single space, and an optional `Z`/`±HH[:mm]` offset.
//! - **Templates**: each [`FormatTemplate`] is tried in order. A template
//!   that does not match the text structurally is skipped; the first one that
//!   does is final, so a structurally matching but invalid date (month 13) is
//!   an error rather than a reason to try the next template.

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime, Offset, Timelike, Utc};
use regex::Regex;
use tracing::{debug, trace};

use crate::epoch::Decimal;
use crate::error::TemporalError;
use crate::format::{FormatTemplate, Formats, Token};
use crate::locale::{Locale, LocaleRegistry};
use crate::tz::parse_fixed_offset;
use crate::value::{checked_naive, is_leap_year, iso_week_date, Temporal};

/// An offset as it appeared in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OffsetToken {
    Fixed(FixedOffset),
    /// A zone name (`ZZZ` token), resolved later by the caller.
    Named(String),
}

/// Validated calendar fields from a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedComponents {
    naive: NaiveDateTime,
    offset: Option<OffsetToken>,
}

impl ParsedComponents {
    pub fn year(&self) -> i32 {
        self.naive.year()
    }

    pub fn month(&self) -> u32 {
        self.naive.month()
    }

    pub fn day(&self) -> u32 {
        self.naive.day()
    }

    pub fn hour(&self) -> u32 {
        self.naive.hour()
    }

    pub fn minute(&self) -> u32 {
        self.naive.minute()
    }

    pub fn second(&self) -> u32 {
        self.naive.second()
    }

    pub fn nanosecond(&self) -> u32 {
        self.naive.nanosecond()
    }

    /// The wall-clock time, to be read in [`ParsedComponents::offset`] if present.
    pub fn naive(&self) -> NaiveDateTime {
        self.naive
    }

    pub fn offset(&self) -> Option<&OffsetToken> {
        self.offset.as_ref()
    }

    pub fn into_parts(self) -> (NaiveDateTime, Option<OffsetToken>) {
        (self.naive, self.offset)
    }
}

// ── Parser ──────────────────────────────────────────────────────────────────

/// Parses text into [`ParsedComponents`] using one locale's names.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'l> {
    locale: &'l Locale,
}

impl Default for Parser<'static> {
    fn default() -> Self {
        Self::new(LocaleRegistry::global().default_locale())
    }
}

impl<'l> Parser<'l> {
    pub fn new(locale: &'l Locale) -> Self {
        Self { locale }
    }

    /// Parse `text` with the ISO-8601 grammar, or with `formats` in order.
    ///
    /// # Arguments
    ///
    /// * `text` - The input text
    /// * `formats` - Templates to try in order; `None` selects ISO-8601
    /// * `normalize_whitespace` - Collapse runs of whitespace to one space and trim first
    ///
    /// # Errors
    ///
    /// - [`TemporalError::ParserMatch`] if the text matches no grammar or template
    /// - [`TemporalError::InvalidDateComponent`] if it matches but a field is out of range
    /// - [`TemporalError::NumericRange`] for `X`/`x` timestamps outside the supported range
    ///
    /// # Examples
    ///
    /// ```
    /// use tempora::{Formats, Parser};
    ///
    /// let parser = Parser::default();
    /// let parsed = parser.parse("2023-01-05T10:30:00+02:00", None, false).unwrap();
    /// assert_eq!((parsed.year(), parsed.hour()), (2023, 10));
    ///
    /// let formats = Formats::new(&["DD/MM/YYYY", "YYYY"]).unwrap();
    /// let parsed = parser.parse("05/01/2023", Some(&formats), false).unwrap();
    /// assert_eq!(parsed.month(), 1);
    /// ```
    pub fn parse(
        &self,
        text: &str,
        formats: Option<&Formats>,
        normalize_whitespace: bool,
    ) -> Result<ParsedComponents, TemporalError> {
        let normalized;
        let text = if normalize_whitespace {
            normalized = collapse_whitespace(text);
            normalized.as_str()
        } else {
            text
        };

        match formats {
            Some(formats) => self.parse_formats(text, formats),
            None => self.parse_iso(text),
        }
    }

    fn parse_formats(&self, text: &str, formats: &Formats) -> Result<ParsedComponents, TemporalError> {
        for template in formats.iter() {
            if let Some(parsed) = self.try_template(template, text)? {
                debug!(format = template.as_str(), "template matched");
                return Ok(parsed);
            }
            trace!(format = template.as_str(), "template did not match, trying next");
        }
        Err(TemporalError::ParserMatch(format!(
            "'{text}' does not match any of the formats {formats}"
        )))
    }

    /// `Ok(None)` when the template does not match; any later failure is final.
    fn try_template(
        &self,
        template: &FormatTemplate,
        text: &str,
    ) -> Result<Option<ParsedComponents>, TemporalError> {
        let Some(captures) = template.captures(self.locale, text)? else {
            return Ok(None);
        };
        let mut fields = RawFields::default();
        for (token, value) in captures {
            fields.apply(self.locale, token, value)?;
        }
        fields.build(false).map(Some)
    }

    fn parse_iso(&self, text: &str) -> Result<ParsedComponents, TemporalError> {
        let no_match = || {
            TemporalError::ParserMatch(format!(
                "'{text}' is not an ISO-8601 date; pass a format to parse other layouts"
            ))
        };

        let spaces = text.matches(' ').count();
        let has_t = text.contains('T');
        if spaces > 1 || (spaces == 1 && has_t) {
            return Err(no_match());
        }
        let (date_part, time_part) = match text.split_once(['T', ' ']) {
            Some((date, time)) => (date, Some(time)),
            None => (text, None),
        };

        let mut fields = None;
        for template in iso_date_templates() {
            if let Some(captures) = template.captures(self.locale, date_part)? {
                let mut raw = RawFields::default();
                for (token, value) in captures {
                    raw.apply(self.locale, token, value)?;
                }
                fields = Some(raw);
                break;
            }
        }
        let mut fields = fields.ok_or_else(no_match)?;

        if let Some(time_part) = time_part {
            let date_basic = basic_date(date_part);
            let time = split_time(time_part).ok_or_else(no_match)?;
            let time_basic = time.basic();
            if let (Some(date_basic), Some(time_basic)) = (date_basic, time_basic) {
                if date_basic != time_basic {
                    return Err(TemporalError::ParserMatch(format!(
                        "'{text}' mixes basic and extended ISO-8601 forms"
                    )));
                }
            }
            fields.apply_time(&time)?;
        }

        fields.build(true)
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── ISO-8601 pieces ─────────────────────────────────────────────────────────

const ISO_DATE_LAYOUTS: &[&str] = &[
    "YYYY-MM-DD",
    "YYYY-M-DD",
    "YYYY-M-D",
    "YYYY/MM/DD",
    "YYYY/M/DD",
    "YYYY/M/D",
    "YYYY.MM.DD",
    "YYYY.M.DD",
    "YYYY.M.D",
    "YYYYMMDD",
    "YYYY-DDDD",
    "YYYYDDDD",
    "YYYY-MM",
    "YYYY/MM",
    "YYYY.MM",
    "YYYY",
    "W",
];

fn iso_date_templates() -> &'static [FormatTemplate] {
    static TEMPLATES: OnceLock<Vec<FormatTemplate>> = OnceLock::new();
    TEMPLATES.get_or_init(|| {
        ISO_DATE_LAYOUTS
            .iter()
            .filter_map(|layout| FormatTemplate::new(layout).ok())
            .collect()
    })
}

/// `Some(true)` for a basic date (`20230105`), `Some(false)` for an extended
/// one, `None` when the form is ambiguous (a bare year).
fn basic_date(date: &str) -> Option<bool> {
    if date.len() <= 4 {
        None
    } else {
        Some(!date.contains(['-', '/', '.']))
    }
}

struct TimeFields<'t> {
    hour: &'t str,
    minute: Option<&'t str>,
    second: Option<&'t str>,
    fraction: Option<&'t str>,
    offset: Option<&'t str>,
    colons: bool,
}

impl TimeFields<'_> {
    fn basic(&self) -> Option<bool> {
        if self.minute.is_none() {
            None
        } else {
            Some(!self.colons)
        }
    }
}

fn extended_time() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([0-9]{2})(?::([0-9]{2})(?::([0-9]{2})(?:[.,]([0-9]+))?)?)?$")
            .expect("extended time pattern is valid")
    })
}

fn basic_time() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([0-9]{2})(?:([0-9]{2})(?:([0-9]{2})(?:[.,]([0-9]+))?)?)?$")
            .expect("basic time pattern is valid")
    })
}

fn offset_suffix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:[zZ]|[+-][0-9]{2}(?::?[0-9]{2})?)$").expect("offset suffix pattern is valid")
    })
}

/// Split `HH[:mm[:ss[.f]]][offset]`; `None` if the shape is wrong.
fn split_time(time: &str) -> Option<TimeFields<'_>> {
    let (body, offset) = match time.find(['+', '-', 'Z', 'z']) {
        Some(at) => (&time[..at], Some(&time[at..])),
        None => (time, None),
    };
    if let Some(offset) = offset {
        if !offset_suffix().is_match(offset) {
            return None;
        }
    }
    let colons = body.contains(':');
    let pattern = if colons { extended_time() } else { basic_time() };
    let caps = pattern.captures(body)?;
    Some(TimeFields {
        hour: caps.get(1)?.as_str(),
        minute: caps.get(2).map(|m| m.as_str()),
        second: caps.get(3).map(|m| m.as_str()),
        fraction: caps.get(4).map(|m| m.as_str()),
        offset,
        colons,
    })
}

fn iso_week_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^([0-9]{4})-?W([0-9]{2})(?:-?([1-7]))?$").expect("week date pattern is valid")
    })
}

// ── Field collection ────────────────────────────────────────────────────────

/// Fields as read from the text, before calendar validation.
#[derive(Debug, Default)]
struct RawFields {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    day_of_year: Option<u32>,
    iso_week: Option<(i32, u32, u32)>,
    weekday: Option<u32>,
    hour: u32,
    minute: u32,
    second: u32,
    nanosecond: u32,
    /// `Some(true)` for pm.
    pm: Option<bool>,
    timestamp: Option<(i64, u32)>,
    offset: Option<OffsetToken>,
}

fn invalid(detail: String) -> TemporalError {
    TemporalError::InvalidDateComponent(detail)
}

fn number<T: FromStr>(text: &str, what: &str) -> Result<T, TemporalError> {
    text.parse()
        .map_err(|_| invalid(format!("{what} '{text}' is not a valid number")))
}

/// 1-based position of `text` in `names`, ignoring case.
fn position_of(names: &[String], text: &str) -> Option<u32> {
    let text = text.to_lowercase();
    names
        .iter()
        .position(|name| name.to_lowercase() == text)
        .map(|i| i as u32 + 1)
}

/// Nanoseconds from fraction digits; digits beyond the ninth are dropped.
fn fraction_nanos(digits: &str) -> Result<u32, TemporalError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(format!("fraction '{digits}' is not a valid number")));
    }
    let mut padded: String = digits.chars().take(9).collect();
    while padded.len() < 9 {
        padded.push('0');
    }
    number(&padded, "fraction")
}

impl RawFields {
    fn apply(&mut self, locale: &Locale, token: Token, text: &str) -> Result<(), TemporalError> {
        match token {
            Token::Year4 => self.year = Some(number(text, "year")?),
            Token::Year2 => {
                let yy: i32 = number(text, "year")?;
                self.year = Some(if yy > 68 { 1900 + yy } else { 2000 + yy });
            }
            Token::MonthName | Token::MonthAbbr => {
                let names = if token == Token::MonthName {
                    locale.month_names()
                } else {
                    locale.month_abbreviations()
                };
                let month = position_of(names, text)
                    .ok_or_else(|| invalid(format!("'{text}' is not a month name")))?;
                self.month = Some(month);
            }
            Token::Month2 | Token::Month => self.month = Some(number(text, "month")?),
            Token::DayOfYear3 | Token::DayOfYear => {
                self.day_of_year = Some(number(text, "day of year")?)
            }
            Token::Day2 | Token::Day => self.day = Some(number(text, "day")?),
            Token::DayOrdinal => {
                let digits: String = text.chars().take_while(char::is_ascii_digit).collect();
                self.day = Some(number(&digits, "day")?);
            }
            Token::WeekdayName | Token::WeekdayAbbr => {
                let names = if token == Token::WeekdayName {
                    locale.day_names()
                } else {
                    locale.day_abbreviations()
                };
                let weekday = position_of(names, text)
                    .ok_or_else(|| invalid(format!("'{text}' is not a weekday name")))?;
                self.weekday = Some(weekday);
            }
            Token::WeekdayNumber => self.weekday = Some(number(text, "weekday")?),
            Token::Hour2 | Token::Hour | Token::Hour12x2 | Token::Hour12 => {
                self.hour = number(text, "hour")?
            }
            Token::Minute2 | Token::Minute => self.minute = number(text, "minute")?,
            Token::Second2 | Token::Second => self.second = number(text, "second")?,
            Token::Fraction => self.nanosecond = fraction_nanos(text)?,
            Token::ZoneName => self.offset = Some(OffsetToken::Named(text.to_string())),
            Token::Offset => {
                let offset = parse_fixed_offset(text)
                    .ok_or_else(|| invalid(format!("'{text}' is not a valid UTC offset")))?;
                self.offset = Some(OffsetToken::Fixed(offset));
            }
            Token::Meridian => {
                let lower = text.to_lowercase();
                let [am, pm] = locale.meridians();
                self.pm = if lower == *pm {
                    Some(true)
                } else if lower == *am {
                    Some(false)
                } else {
                    return Err(invalid(format!("'{text}' is not a meridian")));
                };
            }
            Token::Timestamp => {
                let seconds: Decimal = text.parse()?;
                self.timestamp = Some(seconds.to_parts()?);
            }
            Token::TimestampMillis => {
                let millis: i64 = text.parse().map_err(|_| {
                    TemporalError::NumericRange(format!("millisecond timestamp '{text}' overflows"))
                })?;
                let nanos = millis.rem_euclid(1_000) as u32 * 1_000_000;
                self.timestamp = Some((millis.div_euclid(1_000), nanos));
            }
            Token::IsoWeek => {
                let caps = iso_week_pattern()
                    .captures(text)
                    .ok_or_else(|| invalid(format!("'{text}' is not an ISO week date")))?;
                let year = number(&caps[1], "ISO year")?;
                let week = number(&caps[2], "ISO week")?;
                let weekday = match caps.get(3) {
                    Some(m) => number(m.as_str(), "ISO weekday")?,
                    None => 1,
                };
                self.iso_week = Some((year, week, weekday));
            }
        }
        Ok(())
    }

    fn apply_time(&mut self, time: &TimeFields<'_>) -> Result<(), TemporalError> {
        self.hour = number(time.hour, "hour")?;
        if let Some(minute) = time.minute {
            self.minute = number(minute, "minute")?;
        }
        if let Some(second) = time.second {
            self.second = number(second, "second")?;
        }
        if let Some(fraction) = time.fraction {
            self.nanosecond = fraction_nanos(fraction)?;
        }
        if let Some(offset) = time.offset {
            let offset = parse_fixed_offset(offset)
                .ok_or_else(|| invalid(format!("'{offset}' is not a valid UTC offset")))?;
            self.offset = Some(OffsetToken::Fixed(offset));
        }
        Ok(())
    }

    fn hour_24(&self) -> Result<u32, TemporalError> {
        match self.pm {
            None => Ok(self.hour),
            Some(_) if self.hour == 0 || self.hour > 12 => Err(invalid(format!(
                "hour {} is outside 1..=12 on a 12-hour clock",
                self.hour
            ))),
            Some(true) if self.hour < 12 => Ok(self.hour + 12),
            Some(false) if self.hour == 12 => Ok(0),
            Some(_) => Ok(self.hour),
        }
    }

    fn date(&self) -> Result<NaiveDate, TemporalError> {
        if let Some((year, week, weekday)) = self.iso_week {
            return iso_week_date(year, week, weekday);
        }
        let year = self.year.unwrap_or(1);
        if let Some(ordinal) = self.day_of_year {
            if !(1..=9999).contains(&year) {
                return Err(invalid(format!("year {year} is outside 1..=9999")));
            }
            let days = if is_leap_year(year) { 366 } else { 365 };
            return NaiveDate::from_yo_opt(year, ordinal).ok_or_else(|| {
                invalid(format!("day of year {ordinal} is outside 1..={days} for {year}"))
            });
        }
        let (month, day) = (self.month.unwrap_or(1), self.day.unwrap_or(1));
        checked_naive(year, month, day, 0, 0, 0, 0).map(|naive| naive.date())
    }

    /// `allow_hour_24` admits `24:00:00` as midnight of the next day.
    fn build(self, allow_hour_24: bool) -> Result<ParsedComponents, TemporalError> {
        if let Some((seconds, nanos)) = self.timestamp {
            let instant = Temporal::from_timestamp(seconds, nanos)?;
            return Ok(ParsedComponents {
                naive: instant.naive_utc(),
                offset: Some(OffsetToken::Fixed(Utc.fix())),
            });
        }

        let date = self.date()?;
        if let Some(weekday) = self.weekday {
            let actual = date.weekday().number_from_monday();
            if weekday != actual {
                return Err(invalid(format!(
                    "{date} is weekday {actual}, not weekday {weekday}"
                )));
            }
        }

        let hour = self.hour_24()?;
        let naive = if hour == 24 && allow_hour_24 {
            if self.minute != 0 || self.second != 0 || self.nanosecond != 0 {
                return Err(invalid(
                    "hour 24 is only valid as 24:00:00 (midnight of the next day)".to_string(),
                ));
            }
            let next = date
                .succ_opt()
                .filter(|next| next.year() <= 9999)
                .ok_or_else(|| invalid(format!("24:00 on {date} is past year 9999")))?;
            checked_naive(next.year(), next.month(), next.day(), 0, 0, 0, 0)?
        } else {
            checked_naive(
                date.year(),
                date.month(),
                date.day(),
                hour,
                self.minute,
                self.second,
                self.nanosecond,
            )?
        };

        Ok(ParsedComponents {
            naive,
            offset: self.offset,
        })
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn iso(text: &str) -> Result<ParsedComponents, TemporalError> {
        Parser::default().parse(text, None, false)
    }

    fn with(text: &str, formats: &[&str]) -> Result<ParsedComponents, TemporalError> {
        Parser::default().parse(text, Some(&Formats::new(formats).unwrap()), false)
    }

    fn naive(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        checked_naive(y, m, d, h, mi, s, 0).unwrap()
    }

    fn fixed(secs: i32) -> Option<OffsetToken> {
        Some(OffsetToken::Fixed(FixedOffset::east_opt(secs).unwrap()))
    }

    #[test]
    fn test_iso_calendar_dates() {
        for text in ["2023-01-05", "20230105", "2023/01/05", "2023.1.5", "2023-1-05"] {
            let parsed = iso(text).unwrap();
            assert_eq!(parsed.naive(), naive(2023, 1, 5, 0, 0, 0), "{text}");
            assert_eq!(parsed.offset(), None);
        }
    }

    #[test]
    fn test_iso_reduced_precision() {
        assert_eq!(iso("2023-06").unwrap().naive(), naive(2023, 6, 1, 0, 0, 0));
        assert_eq!(iso("2023").unwrap().naive(), naive(2023, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_iso_ordinal_and_week_dates() {
        assert_eq!(iso("2023-032").unwrap().naive(), naive(2023, 2, 1, 0, 0, 0));
        assert_eq!(iso("2023032").unwrap().naive(), naive(2023, 2, 1, 0, 0, 0));
        assert_eq!(iso("2023-W01-1").unwrap().naive(), naive(2023, 1, 2, 0, 0, 0));
        assert_eq!(iso("2023W017").unwrap().naive(), naive(2023, 1, 8, 0, 0, 0));
        assert_eq!(iso("2023-W05").unwrap().naive(), naive(2023, 1, 30, 0, 0, 0));
    }

    #[test]
    fn test_iso_ordinal_out_of_range() {
        let err = iso("2023-366").unwrap_err();
        assert!(matches!(err, TemporalError::InvalidDateComponent(_)), "got: {err}");
        assert!(iso("2024-366").is_ok());
    }

    #[test]
    fn test_iso_time_and_offset() {
        let parsed = iso("2023-01-05T10:30:15.250+05:30").unwrap();
        assert_eq!(parsed.naive(), naive(2023, 1, 5, 10, 30, 15).with_nanosecond(250_000_000).unwrap());
        assert_eq!(parsed.offset(), fixed(19_800).as_ref());

        let parsed = iso("2023-01-05 10:30Z").unwrap();
        assert_eq!(parsed.naive(), naive(2023, 1, 5, 10, 30, 0));
        assert_eq!(parsed.offset(), fixed(0).as_ref());

        assert_eq!(iso("2023-01-05T10-0800").unwrap().offset(), fixed(-8 * 3600).as_ref());
        assert_eq!(iso("2023-01-05T10:00:00-03").unwrap().offset(), fixed(-3 * 3600).as_ref());
    }

    #[test]
    fn test_iso_basic_time() {
        let parsed = iso("20230105T103015,5").unwrap();
        assert_eq!(parsed.naive(), naive(2023, 1, 5, 10, 30, 15).with_nanosecond(500_000_000).unwrap());
    }

    #[test]
    fn test_iso_fraction_truncates_to_nanoseconds() {
        let parsed = iso("2023-01-05T00:00:00.1234567891").unwrap();
        assert_eq!(parsed.nanosecond(), 123_456_789);
    }

    #[test]
    fn test_iso_mixed_basic_and_extended_is_rejected() {
        for text in ["20230105T10:30", "2023-01-05T1030"] {
            let err = iso(text).unwrap_err();
            assert!(matches!(err, TemporalError::ParserMatch(_)), "{text}: {err}");
        }
    }

    #[test]
    fn test_iso_hour_24_rolls_to_next_day() {
        assert_eq!(iso("2023-12-31T24:00").unwrap().naive(), naive(2024, 1, 1, 0, 0, 0));
        assert_eq!(iso("2023-02-28T24:00:00.0").unwrap().naive(), naive(2023, 3, 1, 0, 0, 0));
        let err = iso("2023-01-01T24:01").unwrap_err();
        assert!(matches!(err, TemporalError::InvalidDateComponent(_)), "got: {err}");
        assert!(iso("9999-12-31T24:00").is_err());
    }

    #[test]
    fn test_template_rejects_hour_24() {
        let err = with("2023-01-01 24:00", &["YYYY-MM-DD HH:mm"]).unwrap_err();
        assert!(matches!(err, TemporalError::InvalidDateComponent(_)), "got: {err}");
    }

    #[test]
    fn test_non_ascii_digits_do_not_match() {
        for text in ["\u{662}\u{660}\u{662}\u{663}-01-05", "2023-01-05T10:00:00.\u{665}"] {
            let err = iso(text).unwrap_err();
            assert!(matches!(err, TemporalError::ParserMatch(_)), "{text}: {err}");
        }
        let err = with("\u{661}\u{665}\u{660}\u{660}", &["x"]).unwrap_err();
        assert!(matches!(err, TemporalError::ParserMatch(_)), "got: {err}");
        let err = with("2023-01-05 \u{665}", &["YYYY-MM-DD S"]).unwrap_err();
        assert!(matches!(err, TemporalError::ParserMatch(_)), "got: {err}");
    }

    #[test]
    fn test_fraction_nanos_rejects_non_digits() {
        assert_eq!(fraction_nanos("5").unwrap(), 500_000_000);
        assert!(matches!(
            fraction_nanos("\u{665}").unwrap_err(),
            TemporalError::InvalidDateComponent(_)
        ));
    }

    #[test]
    fn test_iso_not_a_date() {
        for text in ["not a date", "", "2023-01-05T", "2023-01-05 10:00 extra", "2023-01-05T10:00 +01"] {
            let err = iso(text).unwrap_err();
            assert!(matches!(err, TemporalError::ParserMatch(_)), "{text:?}: {err}");
        }
    }

    #[test]
    fn test_iso_invalid_component() {
        for text in ["2023-13-01", "2023-02-29", "2023-01-01T25:00", "2023-01-01T10:60"] {
            let err = iso(text).unwrap_err();
            assert!(matches!(err, TemporalError::InvalidDateComponent(_)), "{text}: {err}");
        }
    }

    #[test]
    fn test_normalize_whitespace() {
        let parser = Parser::default();
        assert!(parser.parse("  2023-01-05   10:00 ", None, false).is_err());
        let parsed = parser.parse("  2023-01-05   10:00 ", None, true).unwrap();
        assert_eq!(parsed.naive(), naive(2023, 1, 5, 10, 0, 0));
    }

    #[test]
    fn test_template_first_structural_match_wins() {
        // "01/02/2023" fits both layouts; the first one decides.
        let parsed = with("01/02/2023", &["MM/DD/YYYY", "DD/MM/YYYY"]).unwrap();
        assert_eq!((parsed.month(), parsed.day()), (1, 2));
        let parsed = with("01/02/2023", &["DD/MM/YYYY", "MM/DD/YYYY"]).unwrap();
        assert_eq!((parsed.month(), parsed.day()), (2, 1));
    }

    #[test]
    fn test_template_invalid_match_is_terminal() {
        // The first template matches structurally but month 13 is invalid.
        let err = with("13/01/2023", &["MM/DD/YYYY", "DD/MM/YYYY"]).unwrap_err();
        assert!(matches!(err, TemporalError::InvalidDateComponent(_)), "got: {err}");
    }

    #[test]
    fn test_template_skips_non_matching() {
        let parsed = with("2023 Mar 5", &["YYYY-MM-DD", "YYYY MMM D"]).unwrap();
        assert_eq!(parsed.naive(), naive(2023, 3, 5, 0, 0, 0));
        let err = with("whatever", &["YYYY-MM-DD", "X"]).unwrap_err();
        assert!(matches!(err, TemporalError::ParserMatch(_)));
        assert!(err.to_string().contains("[YYYY-MM-DD, X]"), "got: {err}");
    }

    #[test]
    fn test_template_names_meridian_and_ordinal() {
        let parsed = with("Sunday, March 5th 2023 3:07 pm", &["dddd, MMMM Do YYYY h:mm a"]).unwrap();
        assert_eq!(parsed.naive(), naive(2023, 3, 5, 15, 7, 0));
        let parsed = with("12:30 AM", &["hh:mm A"]).unwrap();
        assert_eq!((parsed.hour(), parsed.minute()), (0, 30));
    }

    #[test]
    fn test_template_weekday_must_agree_with_date() {
        let err = with("Monday 2023-03-05", &["dddd YYYY-MM-DD"]).unwrap_err();
        assert!(matches!(err, TemporalError::InvalidDateComponent(_)), "got: {err}");
    }

    #[test]
    fn test_template_two_digit_year() {
        assert_eq!(with("99", &["YY"]).unwrap().year(), 1999);
        assert_eq!(with("68", &["YY"]).unwrap().year(), 2068);
    }

    #[test]
    fn test_template_timestamps() {
        let parsed = with("1672531200.5", &["X"]).unwrap();
        assert_eq!(parsed.naive(), naive(2023, 1, 1, 0, 0, 0).with_nanosecond(500_000_000).unwrap());
        assert_eq!(parsed.offset(), fixed(0).as_ref());

        let parsed = with("-1500", &["x"]).unwrap();
        assert_eq!(parsed.naive(), naive(1969, 12, 31, 23, 59, 58).with_nanosecond(500_000_000).unwrap());

        let err = with("999999999999999", &["X"]).unwrap_err();
        assert!(matches!(err, TemporalError::NumericRange(_)), "got: {err}");
    }

    #[test]
    fn test_template_zone_name_and_offset() {
        let parsed = with("2023-06-01 12:00 Europe/Paris", &["YYYY-MM-DD HH:mm ZZZ"]).unwrap();
        assert_eq!(parsed.offset(), Some(&OffsetToken::Named("Europe/Paris".to_string())));
        let parsed = with("2023-06-01 12:00 -0430", &["YYYY-MM-DD HH:mm Z"]).unwrap();
        assert_eq!(parsed.offset(), fixed(-(4 * 3600 + 1800)).as_ref());
        let err = with("2023-06-01 12:00 +25:00", &["YYYY-MM-DD HH:mm ZZ"]).unwrap_err();
        assert!(matches!(err, TemporalError::InvalidDateComponent(_)), "got: {err}");
    }

    #[test]
    fn test_template_week_and_day_of_year() {
        assert_eq!(with("2020-W53-7", &["W"]).unwrap().naive(), naive(2021, 1, 3, 0, 0, 0));
        assert_eq!(with("2024 060", &["YYYY DDDD"]).unwrap().naive(), naive(2024, 2, 29, 0, 0, 0));
    }

    #[test]
    fn test_template_in_other_locale() {
        let fr = LocaleRegistry::global().get("fr").unwrap();
        let formats = Formats::single("D MMMM YYYY").unwrap();
        let parsed = Parser::new(fr).parse("14 juillet 1789", Some(&formats), false).unwrap();
        assert_eq!(parsed.naive(), naive(1789, 7, 14, 0, 0, 0));
    }
}
