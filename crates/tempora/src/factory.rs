//! Construction of [`Temporal`] values from heterogeneous inputs.
//!
//! [`Factory::construct`] inspects an [`Input`] and routes it to one of the
//! construction paths:
//!
//! | Input | Result |
//! |-------|--------|
//! | `Absent` | the current instant (UTC, or converted to `tzinfo`) |
//! | `Temporal` | a copy (converted to `tzinfo` when given) |
//! | `DateTime` with offset | adopted (converted to `tzinfo` when given) |
//! | `DateTime` without offset, `Date` | wall time read in `tzinfo`, else per [`NaivePolicy`] |
//! | `Numeric` | Unix seconds, fraction kept to the nanosecond |
//! | `TimeTuple` | `timegm`-style arithmetic, in UTC |
//! | `IsoCalendar` | ISO week date at midnight, then as a naive date |
//! | `Text` | parsed (ISO-8601 or `formats`); `tzinfo` replaces any parsed offset |
//! | `Unsupported` | [`TemporalError::UnsupportedInputType`] |

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::epoch::{Decimal, Epoch};
use crate::error::TemporalError;
use crate::format::Formats;
use crate::locale::LocaleRegistry;
use crate::parser::{OffsetToken, Parser};
use crate::tz::{resolve, TzExpr, Zone};
use crate::value::{iso_week_date, Temporal};

// ── Input ───────────────────────────────────────────────────────────────────

/// Every input shape the factory recognises, plus a catch-all.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Input {
    #[default]
    Absent,
    Temporal(Temporal),
    /// A calendar timestamp; `offset` is `None` for a naive value.
    DateTime {
        naive: NaiveDateTime,
        offset: Option<chrono::FixedOffset>,
    },
    Date(NaiveDate),
    Numeric(Epoch),
    TimeTuple(TimeTuple),
    /// ISO year, ISO week (1-based) and ISO weekday (1 = Monday).
    IsoCalendar {
        year: i32,
        week: u32,
        weekday: u32,
    },
    Text(String),
    /// Anything else; the string names the shape for the error message.
    Unsupported(String),
}

impl Input {
    pub fn kind(&self) -> &str {
        match self {
            Input::Absent => "absent",
            Input::Temporal(_) => "temporal",
            Input::DateTime { offset: Some(_), .. } => "aware datetime",
            Input::DateTime { offset: None, .. } => "naive datetime",
            Input::Date(_) => "date",
            Input::Numeric(_) => "numeric",
            Input::TimeTuple(_) => "time tuple",
            Input::IsoCalendar { .. } => "iso calendar",
            Input::Text(_) => "text",
            Input::Unsupported(kind) => kind,
        }
    }
}

impl From<Temporal> for Input {
    fn from(value: Temporal) -> Self {
        Input::Temporal(value)
    }
}

impl From<NaiveDateTime> for Input {
    fn from(naive: NaiveDateTime) -> Self {
        Input::DateTime {
            naive,
            offset: None,
        }
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Input {
    fn from(value: DateTime<Tz>) -> Self {
        Input::DateTime {
            naive: value.naive_local(),
            offset: Some(value.offset().fix()),
        }
    }
}

impl From<NaiveDate> for Input {
    fn from(date: NaiveDate) -> Self {
        Input::Date(date)
    }
}

impl From<Epoch> for Input {
    fn from(epoch: Epoch) -> Self {
        Input::Numeric(epoch)
    }
}

impl From<i64> for Input {
    fn from(seconds: i64) -> Self {
        Input::Numeric(Epoch::Int(seconds))
    }
}

impl From<f64> for Input {
    fn from(seconds: f64) -> Self {
        Input::Numeric(Epoch::Float(seconds))
    }
}

impl From<Decimal> for Input {
    fn from(seconds: Decimal) -> Self {
        Input::Numeric(Epoch::Decimal(seconds))
    }
}

impl From<TimeTuple> for Input {
    fn from(tuple: TimeTuple) -> Self {
        Input::TimeTuple(tuple)
    }
}

impl From<(i32, u32, u32)> for Input {
    fn from((year, week, weekday): (i32, u32, u32)) -> Self {
        Input::IsoCalendar {
            year,
            week,
            weekday,
        }
    }
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Input::Text(text.to_string())
    }
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Input::Text(text)
    }
}

impl<T: Into<Input>> From<Option<T>> for Input {
    fn from(value: Option<T>) -> Self {
        value.map_or(Input::Absent, Into::into)
    }
}

// ── TimeTuple ───────────────────────────────────────────────────────────────

/// A broken-down UTC time (`struct tm` layout).
///
/// Only `month` is range-checked; `day`, `hour`, `minute` and `second` roll
/// over arithmetically (day 32 of January is February 1st). `weekday`,
/// `yearday` and `isdst` are derived data and ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeTuple {
    pub year: i32,
    pub month: u32,
    pub day: i64,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
    pub weekday: u32,
    pub yearday: u32,
    pub isdst: i32,
}

impl TimeTuple {
    pub fn new(year: i32, month: u32, day: i64, hour: i64, minute: i64, second: i64) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            ..Self::default()
        }
    }

    /// Unix seconds for this tuple read as UTC.
    ///
    /// # Errors
    ///
    /// - [`TemporalError::InvalidDateComponent`] if the month is outside `1..=12`
    ///   or the year outside `1..=9999`
    /// - [`TemporalError::NumericRange`] if the rolled-over total overflows
    pub fn to_timestamp(&self) -> Result<i64, TemporalError> {
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .filter(|_| (1..=9999).contains(&self.year))
            .ok_or_else(|| {
                TemporalError::InvalidDateComponent(format!(
                    "time tuple month {}-{:02} is not valid",
                    self.year, self.month
                ))
            })?;
        let overflow = || TemporalError::NumericRange(format!("time tuple {self:?} overflows"));
        let epoch_days = first.signed_duration_since(epoch_date()).num_days();
        let days = epoch_days
            .checked_add(self.day)
            .and_then(|d| d.checked_sub(1))
            .ok_or_else(overflow)?;
        days.checked_mul(24)
            .and_then(|h| h.checked_add(self.hour))
            .and_then(|h| h.checked_mul(60))
            .and_then(|m| m.checked_add(self.minute))
            .and_then(|m| m.checked_mul(60))
            .and_then(|s| s.checked_add(self.second))
            .ok_or_else(overflow)
    }
}

fn epoch_date() -> NaiveDate {
    DateTime::<Utc>::UNIX_EPOCH.date_naive()
}

// ── Options ─────────────────────────────────────────────────────────────────

/// How a wall time without an offset is placed on the timeline when no
/// `tzinfo` is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NaivePolicy {
    #[default]
    Utc,
    Local,
}

/// Options for [`Factory::construct`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructOptions {
    /// Templates for text input, tried in order; `None` selects ISO-8601.
    pub formats: Option<Formats>,
    pub tzinfo: TzExpr,
    pub normalize_whitespace: bool,
    /// Locale for name-based template tokens; unknown codes use the default.
    pub locale: Option<String>,
    pub naive_policy: NaivePolicy,
}

/// A dynamically typed keyword argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum KwArg {
    Str(String),
    Strs(Vec<String>),
    Bool(bool),
    Int(i64),
    Tz(TzExpr),
}

impl From<&str> for KwArg {
    fn from(s: &str) -> Self {
        KwArg::Str(s.to_string())
    }
}

impl From<Vec<&str>> for KwArg {
    fn from(items: Vec<&str>) -> Self {
        KwArg::Strs(items.into_iter().map(str::to_string).collect())
    }
}

impl From<bool> for KwArg {
    fn from(b: bool) -> Self {
        KwArg::Bool(b)
    }
}

impl From<i64> for KwArg {
    fn from(i: i64) -> Self {
        KwArg::Int(i)
    }
}

impl From<TzExpr> for KwArg {
    fn from(expr: TzExpr) -> Self {
        KwArg::Tz(expr)
    }
}

impl ConstructOptions {
    pub fn with_formats(mut self, formats: Formats) -> Self {
        self.formats = Some(formats);
        self
    }

    pub fn with_tzinfo(mut self, tzinfo: impl Into<TzExpr>) -> Self {
        self.tzinfo = tzinfo.into();
        self
    }

    pub fn with_normalize_whitespace(mut self, normalize: bool) -> Self {
        self.normalize_whitespace = normalize;
        self
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = Some(locale.to_string());
        self
    }

    pub fn with_naive_policy(mut self, policy: NaivePolicy) -> Self {
        self.naive_policy = policy;
        self
    }

    /// Build options from keyword arguments.
    ///
    /// Recognised keys: `formats` (alias `fmt`), `tzinfo` (alias `tz`),
    /// `normalize_whitespace`, `locale`.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::InvalidArgumentCombination`] for an unknown
    /// key or a value of the wrong kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempora::{ConstructOptions, KwArg};
    ///
    /// let opts = ConstructOptions::from_kwargs(&[("tzinfo", KwArg::from("Europe/Paris"))]).unwrap();
    /// assert!(!opts.tzinfo.is_absent());
    /// assert!(ConstructOptions::from_kwargs(&[("unsupported_kw", KwArg::Int(1))]).is_err());
    /// ```
    pub fn from_kwargs(kwargs: &[(&str, KwArg)]) -> Result<Self, TemporalError> {
        let mut options = Self::default();
        for (key, value) in kwargs {
            let wrong_kind = || {
                TemporalError::InvalidArgumentCombination(format!(
                    "keyword '{key}' does not accept {value:?}"
                ))
            };
            match (*key, value) {
                ("formats" | "fmt", KwArg::Str(template)) => {
                    options.formats = Some(Formats::single(template)?)
                }
                ("formats" | "fmt", KwArg::Strs(templates)) => {
                    options.formats = Some(Formats::new(templates.as_slice())?)
                }
                ("tzinfo" | "tz", KwArg::Str(name)) => options.tzinfo = TzExpr::from(name.as_str()),
                ("tzinfo" | "tz", KwArg::Tz(expr)) => options.tzinfo = expr.clone(),
                ("normalize_whitespace", KwArg::Bool(flag)) => options.normalize_whitespace = *flag,
                ("locale", KwArg::Str(code)) => options.locale = Some(code.clone()),
                ("formats" | "fmt" | "tzinfo" | "tz" | "normalize_whitespace" | "locale", _) => {
                    return Err(wrong_kind())
                }
                (other, _) => {
                    return Err(TemporalError::InvalidArgumentCombination(format!(
                        "unexpected keyword argument '{other}'"
                    )))
                }
            }
        }
        Ok(options)
    }
}

// ── Clock ───────────────────────────────────────────────────────────────────

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ── Factory ─────────────────────────────────────────────────────────────────

/// Builds [`Temporal`] values; holds the clock and the locale registry.
#[derive(Debug, Clone, Default)]
pub struct Factory<C = SystemClock> {
    clock: C,
    registry: Option<Arc<LocaleRegistry>>,
}

impl Factory<SystemClock> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> Factory<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            registry: None,
        }
    }

    /// Use `registry` instead of the process-wide one.
    pub fn with_registry(mut self, registry: LocaleRegistry) -> Self {
        self.registry = Some(Arc::new(registry));
        self
    }

    fn registry(&self) -> &LocaleRegistry {
        self.registry
            .as_deref()
            .unwrap_or_else(|| LocaleRegistry::global())
    }

    /// Construct a value from `input`.
    ///
    /// # Errors
    ///
    /// - [`TemporalError::InvalidArgumentCombination`] if `formats` is given for non-text input
    /// - [`TemporalError::UnsupportedInputType`] for [`Input::Unsupported`]
    /// - parse, timezone, component and range errors from the selected path
    ///
    /// # Examples
    ///
    /// ```
    /// use tempora::{ConstructOptions, Factory};
    ///
    /// let factory = Factory::new();
    /// let opts = ConstructOptions::default().with_tzinfo("+02:00");
    /// let t = factory.construct("2023-01-05T10:00:00", &opts).unwrap();
    /// assert_eq!(t.to_iso8601(), "2023-01-05T10:00:00+02:00");
    /// ```
    pub fn construct(
        &self,
        input: impl Into<Input>,
        options: &ConstructOptions,
    ) -> Result<Temporal, TemporalError> {
        let input = input.into();
        if options.formats.is_some() && !matches!(input, Input::Text(_)) {
            return Err(TemporalError::InvalidArgumentCombination(format!(
                "formats cannot be combined with {} input",
                input.kind()
            )));
        }
        debug!(input = input.kind(), tzinfo = ?options.tzinfo, "constructing temporal value");

        match input {
            Input::Absent => convert(self.utcnow()?, &options.tzinfo),
            Input::Temporal(value) => convert(value, &options.tzinfo),
            Input::DateTime {
                naive,
                offset: Some(offset),
            } => convert(Temporal::from_local(&naive, &Zone::Fixed(offset))?, &options.tzinfo),
            Input::DateTime { naive, offset: None } => place_naive(&naive, options),
            Input::Date(date) => place_naive(&NaiveDateTime::from(date), options),
            Input::Numeric(epoch) => {
                let (seconds, nanos) = epoch.to_parts()?;
                convert(Temporal::from_timestamp(seconds, nanos)?, &options.tzinfo)
            }
            Input::TimeTuple(tuple) => {
                convert(Temporal::from_timestamp(tuple.to_timestamp()?, 0)?, &options.tzinfo)
            }
            Input::IsoCalendar {
                year,
                week,
                weekday,
            } => {
                let date = iso_week_date(year, week, weekday)?;
                place_naive(&NaiveDateTime::from(date), options)
            }
            Input::Text(text) => self.from_text(&text, options),
            Input::Unsupported(kind) => Err(TemporalError::UnsupportedInputType(kind)),
        }
    }

    fn from_text(&self, text: &str, options: &ConstructOptions) -> Result<Temporal, TemporalError> {
        let locale = self.registry().resolve(options.locale.as_deref());
        let parsed = Parser::new(locale).parse(
            text,
            options.formats.as_ref(),
            options.normalize_whitespace,
        )?;
        let (naive, offset) = parsed.into_parts();

        if !options.tzinfo.is_absent() {
            let zone = resolve(&options.tzinfo, Zone::Utc)?;
            return Temporal::from_local(&naive, &zone);
        }
        match offset {
            Some(OffsetToken::Fixed(offset)) => Temporal::from_local(&naive, &Zone::Fixed(offset)),
            Some(OffsetToken::Named(name)) => {
                let zone = resolve(&TzExpr::Name(name), Zone::Utc)?;
                Temporal::from_local(&naive, &zone)
            }
            None => place_naive(&naive, options),
        }
    }

    /// The current instant in `tzinfo`; an absent expression means the local zone.
    pub fn now(&self, tzinfo: impl Into<TzExpr>) -> Result<Temporal, TemporalError> {
        let zone = resolve(&tzinfo.into(), Zone::Local)?;
        self.utcnow()?.to_zone(&zone)
    }

    /// The current instant at UTC.
    pub fn utcnow(&self) -> Result<Temporal, TemporalError> {
        Temporal::from_datetime(self.clock.now().fixed_offset())
    }
}

/// Same instant, expressed in `tzinfo` when one is given.
fn convert(value: Temporal, tzinfo: &TzExpr) -> Result<Temporal, TemporalError> {
    if tzinfo.is_absent() {
        return Ok(value);
    }
    value.to_zone(&resolve(tzinfo, Zone::Utc)?)
}

fn place_naive(naive: &NaiveDateTime, options: &ConstructOptions) -> Result<Temporal, TemporalError> {
    let fallback = match options.naive_policy {
        NaivePolicy::Utc => Zone::Utc,
        NaivePolicy::Local => Zone::Local,
    };
    let zone = resolve(&options.tzinfo, fallback)?;
    Temporal::from_local(naive, &zone)
}

// ── Free functions ──────────────────────────────────────────────────────────

/// [`Factory::construct`] on a default factory.
pub fn construct(
    input: impl Into<Input>,
    options: &ConstructOptions,
) -> Result<Temporal, TemporalError> {
    Factory::new().construct(input, options)
}

/// Construct with default options.
///
/// # Examples
///
/// ```
/// use tempora::get;
///
/// let t = get(1_672_531_200_i64).unwrap();
/// assert_eq!(t.to_iso8601(), "2023-01-01T00:00:00+00:00");
/// assert_eq!(get((2023, 1, 1)).unwrap().day(), 2);
/// ```
pub fn get(input: impl Into<Input>) -> Result<Temporal, TemporalError> {
    construct(input, &ConstructOptions::default())
}

pub fn now(tzinfo: impl Into<TzExpr>) -> Result<Temporal, TemporalError> {
    Factory::new().now(tzinfo)
}

pub fn utcnow() -> Result<Temporal, TemporalError> {
    Factory::new().utcnow()
}

// ── Tests ───────────────────────────────────────────────────────────────────
