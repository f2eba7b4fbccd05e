//! # tempora
//!
//! Timezone-aware datetime construction.
//!
//! Every path produces a [`Temporal`]: an immutable value that always carries
//! a UTC offset. Inputs may be absent (the current instant), another value,
//! a chrono timestamp or date, a Unix epoch number, a broken-down time tuple,
//! an ISO week date, or text in ISO-8601 or a caller-supplied layout.
//!
//! ```
//! use tempora::{construct, get, ConstructOptions, Formats};
//!
//! let t = get("2023-01-05T10:30:00+01:00").unwrap();
//! assert_eq!(t.hour(), 10);
//!
//! let opts = ConstructOptions::default()
//!     .with_formats(Formats::new(&["DD/MM/YYYY HH:mm", "YYYY"]).unwrap())
//!     .with_tzinfo("Europe/Paris");
//! let t = construct("14/07/2023 09:00", &opts).unwrap();
//! assert_eq!(t.to_iso8601(), "2023-07-14T09:00:00+02:00");
//! ```
//!
//! ## Modules
//!
//! - [`factory`]: Input dispatch, construction options, clocks
//! - [`parser`]: ISO-8601 grammar and multi-template parsing
//! - [`format`]: Format template tokenizer and compiler
//! - [`tz`]: Timezone expressions and their resolution
//! - [`value`]: The `Temporal` value and calendar units
//! - [`epoch`]: Integer, float and exact-decimal epoch numbers
//! - [`humanize`]: Relative-time phrases (`"in an hour"`) in both directions
//! - [`locale`]: Locale tables and the process-wide registry
//! - [`error`]: Error types

pub mod epoch;
pub mod error;
pub mod factory;
pub mod format;
pub mod humanize;
pub mod locale;
pub mod parser;
pub mod tz;
pub mod value;

pub use epoch::{Decimal, Epoch};
pub use error::{Result, TemporalError};
pub use factory::{
    construct, get, now, utcnow, Clock, ConstructOptions, Factory, FixedClock, Input, KwArg,
    NaivePolicy, SystemClock, TimeTuple,
};
pub use format::{FormatTemplate, Formats};
pub use humanize::{dehumanize, humanize, humanize_with, Granularity, Humanizer};
pub use locale::{Locale, LocaleRegistry, UnitPhrase, DEFAULT_LOCALE};
pub use parser::{OffsetToken, ParsedComponents, Parser};
pub use tz::{resolve, TzExpr, Zone};
pub use value::{Temporal, Unit, MAX_TIMESTAMP, MIN_TIMESTAMP};
