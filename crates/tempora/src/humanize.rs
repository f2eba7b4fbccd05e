//! Relative-time phrases in both directions.
//!
//! [`humanize`] turns the distance between two values into a phrase such as
//! `"in an hour"` or `"3 days ago"`. [`dehumanize`] reads such a phrase back
//! and applies it to a reference value.
//!
//! The two are not inverses. Humanizing rounds to a single unit, so
//! `dehumanize(r, humanize(r, t))` lands in the same unit bucket as `t`, not
//! on `t` itself.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::TemporalError;
use crate::locale::{Locale, LocaleRegistry};
use crate::value::{Temporal, Unit};

/// Which units a phrase is expressed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// The largest unit whose locale threshold the distance reaches.
    #[default]
    Auto,
    /// Always this unit; the count is truncated, so it may be zero.
    Unit(Unit),
    /// Break the distance down into these units, largest first.
    Units(Vec<Unit>),
}

/// Humanizes and dehumanizes with one locale.
#[derive(Debug, Clone, Copy)]
pub struct Humanizer<'l> {
    locale: &'l Locale,
}

impl<'l> Humanizer<'l> {
    pub fn new(locale: &'l Locale) -> Self {
        Self { locale }
    }

    /// Look up `code` in the process-wide registry, falling back to the default locale.
    pub fn for_code(code: &str) -> Humanizer<'static> {
        Humanizer::new(LocaleRegistry::global().resolve(Some(code)))
    }

    pub fn humanize(&self, reference: &Temporal, target: &Temporal) -> Result<String, TemporalError> {
        self.humanize_with(reference, target, &Granularity::Auto)
    }

    pub fn humanize_with(
        &self,
        reference: &Temporal,
        target: &Temporal,
        granularity: &Granularity,
    ) -> Result<String, TemporalError> {
        let delta = whole_seconds_between(reference, target);
        let sign = if delta < 0 { -1 } else { 1 };
        let magnitude = delta.abs();

        match granularity {
            Granularity::Auto => {
                for unit in Unit::DESCENDING {
                    let Some(phrase) = self.locale.unit(unit) else {
                        continue;
                    };
                    if magnitude >= phrase.threshold {
                        let count = ((magnitude as f64) / (unit.seconds() as f64)).round() as i64;
                        let text = self.describe(unit, count.max(1))?;
                        return Ok(self.locale.relative(&text, sign));
                    }
                }
                Ok(self.locale.now_phrase().to_string())
            }
            Granularity::Unit(unit) => {
                let text = self.describe(*unit, magnitude / unit.seconds())?;
                Ok(self.locale.relative(&text, sign))
            }
            Granularity::Units(units) => {
                let mut units = units.clone();
                units.sort_unstable_by(|a, b| b.cmp(a));
                units.dedup();
                let Some(&smallest) = units.last() else {
                    return Err(TemporalError::InvalidArgumentCombination(
                        "granularity unit list is empty".to_string(),
                    ));
                };

                let mut remaining = magnitude;
                let mut parts = Vec::new();
                for unit in units {
                    let count = remaining / unit.seconds();
                    remaining -= count * unit.seconds();
                    if count != 0 {
                        parts.push(self.describe(unit, count)?);
                    }
                }
                if parts.is_empty() {
                    parts.push(self.describe(smallest, 0)?);
                }
                if parts.len() > 1 {
                    if let Some(word) = self.locale.conjunction() {
                        parts.insert(parts.len() - 1, word.to_string());
                    }
                }
                Ok(self.locale.relative(&parts.join(" "), sign))
            }
        }
    }

    fn describe(&self, unit: Unit, count: i64) -> Result<String, TemporalError> {
        self.locale.describe(unit, count).ok_or_else(|| {
            TemporalError::InvalidArgumentCombination(format!(
                "locale '{}' has no phrase for {unit}",
                self.locale.code()
            ))
        })
    }

    /// Apply a relative-time phrase to `reference`.
    ///
    /// # Errors
    ///
    /// - [`TemporalError::UnrecognizedPhrase`] if the phrase names no unit
    ///   (and is not the "now" phrase), or does not fit exactly one of the
    ///   past/future wrappers
    /// - [`TemporalError::NumericRange`] if the shift leaves the supported range
    pub fn dehumanize(&self, reference: &Temporal, phrase: &str) -> Result<Temporal, TemporalError> {
        let unrecognized = || {
            TemporalError::UnrecognizedPhrase(format!(
                "'{phrase}' is not a relative time in locale '{}'",
                self.locale.code()
            ))
        };
        let text = phrase.trim().to_lowercase();

        let mut shifts = Vec::new();
        for pattern in self.locale.phrase_patterns() {
            if let Some(caps) = pattern.plural.captures(&text) {
                let count: i64 = caps[1].parse().map_err(|_| {
                    TemporalError::NumericRange(format!("count '{}' in '{phrase}' overflows", &caps[1]))
                })?;
                shifts.push((pattern.unit, count));
            } else if pattern.singular.is_match(&text) {
                shifts.push((pattern.unit, 1));
            }
        }
        trace!(phrase, ?shifts, "dehumanize matched units");

        let directions = self.locale.direction_patterns().ok_or_else(unrecognized)?;
        if shifts.is_empty() {
            return if directions.now.is_match(&text) {
                Ok(*reference)
            } else {
                Err(unrecognized())
            };
        }

        // Exactly one wrapper must fit; "in 2 days ago" fits both.
        let sign = match (directions.past.is_match(&text), directions.future.is_match(&text)) {
            (true, false) => -1,
            (false, true) => 1,
            _ => return Err(unrecognized()),
        };

        shifts.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        shifts
            .into_iter()
            .try_fold(*reference, |value, (unit, count)| value.shift(unit, sign * count))
    }
}

fn whole_seconds_between(reference: &Temporal, target: &Temporal) -> i64 {
    let nanos = target.timestamp_nanos() - reference.timestamp_nanos();
    // Both instants lie within years 1..=9999, so the quotient fits.
    (nanos / 1_000_000_000) as i64
}

// ── Free functions ──────────────────────────────────────────────────────────

/// Describe `target` relative to `reference` in the locale `locale`.
///
/// Unknown locale codes fall back to the default locale.
///
/// # Examples
///
/// ```
/// use tempora::{humanize, Temporal, Unit, Zone};
///
/// let now = Temporal::new(2023, 1, 1, 12, 0, 0, 0, &Zone::Utc).unwrap();
/// let later = now.shift(Unit::Hour, 1).unwrap();
/// assert_eq!(humanize(&now, &later, "en").unwrap(), "in an hour");
/// assert_eq!(humanize(&later, &now, "en").unwrap(), "an hour ago");
/// ```
pub fn humanize(reference: &Temporal, target: &Temporal, locale: &str) -> Result<String, TemporalError> {
    Humanizer::for_code(locale).humanize(reference, target)
}

pub fn humanize_with(
    reference: &Temporal,
    target: &Temporal,
    locale: &str,
    granularity: &Granularity,
) -> Result<String, TemporalError> {
    Humanizer::for_code(locale).humanize_with(reference, target, granularity)
}

/// Shift `reference` by a relative-time phrase such as `"in 2 days"`.
///
/// # Examples
///
/// ```
/// use tempora::{dehumanize, Temporal, Zone};
///
/// let now = Temporal::new(2023, 1, 1, 12, 0, 0, 0, &Zone::Utc).unwrap();
/// let then = dehumanize(&now, "3 hours ago", "en").unwrap();
/// assert_eq!(then.hour(), 9);
/// ```
pub fn dehumanize(reference: &Temporal, phrase: &str, locale: &str) -> Result<Temporal, TemporalError> {
    Humanizer::for_code(locale).dehumanize(reference, phrase)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tz::Zone;

    fn reference() -> Temporal {
        Temporal::new(2023, 6, 15, 12, 0, 0, 0, &Zone::Utc).unwrap()
    }

    fn plus(seconds: i64) -> Temporal {
        reference().shift(Unit::Second, seconds).unwrap()
    }

    fn en(seconds: i64) -> String {
        humanize(&reference(), &plus(seconds), "en").unwrap()
    }

    #[test]
    fn test_humanize_hour() {
        assert_eq!(en(3_600), "in an hour");
        assert_eq!(en(-3_600), "an hour ago");
    }

    #[test]
    fn test_humanize_thresholds() {
        assert_eq!(en(0), "just now");
        assert_eq!(en(9), "just now");
        assert_eq!(en(-9), "just now");
        assert_eq!(en(10), "in 10 seconds");
        assert_eq!(en(44), "in 44 seconds");
        assert_eq!(en(45), "in a minute");
        assert_eq!(en(-150), "3 minutes ago");
        assert_eq!(en(2_699), "in 45 minutes");
        assert_eq!(en(2_700), "in an hour");
        assert_eq!(en(79_200), "in a day");
        assert_eq!(en(-3 * 86_400), "3 days ago");
        assert_eq!(en(7 * 86_400), "in a week");
        assert_eq!(en(30 * 86_400), "in a month");
        assert_eq!(en(-400 * 86_400), "a year ago");
        assert_eq!(en(5 * 365 * 86_400), "in 5 years");
    }

    #[test]
    fn test_humanize_other_locales() {
        let target = plus(2 * 3_600);
        assert_eq!(humanize(&reference(), &target, "es").unwrap(), "en 2 horas");
        assert_eq!(humanize(&target, &reference(), "fr_FR").unwrap(), "il y a 2 heures");
    }

    #[test]
    fn test_humanize_unknown_locale_uses_default() {
        assert_eq!(humanize(&reference(), &plus(3_600), "xx").unwrap(), "in an hour");
    }

    #[test]
    fn test_humanize_forced_unit() {
        let g = Granularity::Unit(Unit::Hour);
        let text = humanize_with(&reference(), &plus(90 * 60), "en", &g).unwrap();
        assert_eq!(text, "in an hour");
        let text = humanize_with(&reference(), &plus(59 * 60), "en", &g).unwrap();
        assert_eq!(text, "in 0 hours");
        let text = humanize_with(&reference(), &plus(-3 * 86_400), "en", &Granularity::Unit(Unit::Minute)).unwrap();
        assert_eq!(text, "4320 minutes ago");
    }

    #[test]
    fn test_humanize_multiple_units() {
        let g = Granularity::Units(vec![Unit::Minute, Unit::Hour]);
        let text = humanize_with(&reference(), &plus(2 * 3_600 + 30 * 60), "en", &g).unwrap();
        assert_eq!(text, "in 2 hours and 30 minutes");

        let g = Granularity::Units(vec![Unit::Day, Unit::Hour, Unit::Minute]);
        let text = humanize_with(&reference(), &plus(-(86_400 + 3_600 + 120)), "en", &g).unwrap();
        assert_eq!(text, "a day an hour and 2 minutes ago");

        let text = humanize_with(&reference(), &plus(5), "en", &g).unwrap();
        assert_eq!(text, "in 0 minutes");

        let err = humanize_with(&reference(), &plus(5), "en", &Granularity::Units(vec![])).unwrap_err();
        assert!(matches!(err, TemporalError::InvalidArgumentCombination(_)));
    }

    #[test]
    fn test_dehumanize_hour_bucket() {
        let phrase = en(3_600);
        let shifted = dehumanize(&reference(), &phrase, "en").unwrap();
        assert_eq!(shifted, plus(3_600));
        assert_eq!(humanize(&reference(), &shifted, "en").unwrap(), phrase);
    }

    #[test]
    fn test_dehumanize_is_lossy() {
        // 100 minutes humanizes to "in 2 hours", which reads back as 120 minutes.
        let phrase = en(100 * 60);
        assert_eq!(phrase, "in 2 hours");
        let shifted = dehumanize(&reference(), &phrase, "en").unwrap();
        assert_eq!(shifted, plus(2 * 3_600));
    }

    #[test]
    fn test_dehumanize_past_and_calendar_units() {
        let t = dehumanize(&reference(), "2 months ago", "en").unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (2023, 4, 15));
        let t = dehumanize(&reference(), "In A Year", "en").unwrap();
        assert_eq!(t.year(), 2024);
    }

    #[test]
    fn test_dehumanize_compound_phrase() {
        let t = dehumanize(&reference(), "in 2 hours and 30 minutes", "en").unwrap();
        assert_eq!(t, plus(2 * 3_600 + 30 * 60));
    }

    #[test]
    fn test_dehumanize_other_locales() {
        let t = dehumanize(&reference(), "hace 3 días", "es").unwrap();
        assert_eq!(t, plus(-3 * 86_400));
        let t = dehumanize(&reference(), "dans une heure", "fr").unwrap();
        assert_eq!(t, plus(3_600));
    }

    #[test]
    fn test_dehumanize_now() {
        assert_eq!(dehumanize(&reference(), "just now", "en").unwrap(), reference());
        assert_eq!(dehumanize(&reference(), "maintenant", "fr").unwrap(), reference());
    }

    #[test]
    fn test_dehumanize_unrecognized() {
        for phrase in ["sometime soon", "", "2 hours", "in a jiffy"] {
            let err = dehumanize(&reference(), phrase, "en").unwrap_err();
            assert!(matches!(err, TemporalError::UnrecognizedPhrase(_)), "{phrase:?}: {err}");
        }
    }

    #[test]
    fn test_dehumanize_rejects_both_directions() {
        for phrase in ["in 2 days ago", "in an hour ago"] {
            let err = dehumanize(&reference(), phrase, "en").unwrap_err();
            assert!(matches!(err, TemporalError::UnrecognizedPhrase(_)), "{phrase:?}: {err}");
        }
    }

    #[test]
    fn test_dehumanize_custom_locale() {
        let locale = Locale::new("xx", "nu", "{0} sedan", "om {0}")
            .with_unit(Unit::Day, 79_200, "en dag", "{0} dagar");
        let humanizer = Humanizer::new(&locale);
        let t = humanizer.dehumanize(&reference(), "om 2 dagar").unwrap();
        assert_eq!(t, plus(2 * 86_400));
        assert_eq!(humanizer.humanize(&reference(), &t).unwrap(), "om 2 dagar");
        let err = humanizer
            .humanize_with(&reference(), &t, &Granularity::Unit(Unit::Hour))
            .unwrap_err();
        assert!(matches!(err, TemporalError::InvalidArgumentCombination(_)));
    }
}
