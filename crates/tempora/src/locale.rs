//! Locale tables for humanizing, dehumanizing and name-based parsing.
//!
//! A [`Locale`] holds, per [`Unit`], the minimum magnitude (in seconds) at
//! which the unit is used and its singular/plural phrases, plus the
//! past/future wrappers (`"{0} ago"`, `"in {0}"`). It also carries the month
//! and weekday names the parser needs for `MMMM`/`dddd`-style tokens.
//!
//! The [`LocaleRegistry`] is keyed by normalized locale code (`en_US` and
//! `en-us` are the same key; `fr-CA` falls back to `fr`). The process-wide
//! registry returned by [`LocaleRegistry::global`] is built once and never
//! mutated, so concurrent readers need no locking.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::debug;

use crate::value::Unit;

/// Code of the locale used when none is given or the requested one is unknown.
pub const DEFAULT_LOCALE: &str = "en";

/// How a single unit is phrased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitPhrase {
    /// Minimum magnitude, in seconds, for this unit to be chosen.
    pub threshold: i64,
    /// Phrase for a count of one (`"an hour"`).
    pub singular: String,
    /// Phrase template for other counts; `{0}` is replaced by the count (`"{0} hours"`).
    pub plural: String,
}

/// A compiled dehumanize matcher for one unit.
#[derive(Debug, Clone)]
pub(crate) struct PhrasePattern {
    pub unit: Unit,
    pub singular: Regex,
    pub plural: Regex,
}

#[derive(Debug, Clone)]
pub(crate) struct DirectionPatterns {
    pub past: Regex,
    pub future: Regex,
    pub now: Regex,
}

/// A named table of thresholds, phrases and calendar names.
#[derive(Debug, Clone)]
pub struct Locale {
    code: String,
    now: String,
    past: String,
    future: String,
    and_word: Option<String>,
    units: BTreeMap<Unit, UnitPhrase>,
    month_names: Vec<String>,
    month_abbreviations: Vec<String>,
    day_names: Vec<String>,
    day_abbreviations: Vec<String>,
    meridians: [String; 2],
    ordinal_suffixes: Vec<String>,
    phrase_patterns: OnceLock<Vec<PhrasePattern>>,
    direction_patterns: OnceLock<Option<DirectionPatterns>>,
}

impl Locale {
    /// Start a locale with its relative-time wrappers.
    ///
    /// `past` and `future` must contain `{0}`, which is replaced by the
    /// unit phrase. Units, names and meridians are added with the `with_*`
    /// methods; a locale without names cannot parse `MMMM`/`dddd` tokens.
    pub fn new(code: &str, now: &str, past: &str, future: &str) -> Self {
        Self {
            code: normalize_code(code),
            now: now.to_string(),
            past: past.to_string(),
            future: future.to_string(),
            and_word: None,
            units: BTreeMap::new(),
            month_names: Vec::new(),
            month_abbreviations: Vec::new(),
            day_names: Vec::new(),
            day_abbreviations: Vec::new(),
            meridians: ["am".to_string(), "pm".to_string()],
            ordinal_suffixes: Vec::new(),
            phrase_patterns: OnceLock::new(),
            direction_patterns: OnceLock::new(),
        }
    }

    pub fn with_unit(mut self, unit: Unit, threshold: i64, singular: &str, plural: &str) -> Self {
        self.units.insert(
            unit,
            UnitPhrase {
                threshold,
                singular: singular.to_string(),
                plural: plural.to_string(),
            },
        );
        self
    }

    pub fn with_conjunction(mut self, word: &str) -> Self {
        self.and_word = Some(word.to_string());
        self
    }

    /// Month names, January first.
    pub fn with_months(mut self, names: &[&str], abbreviations: &[&str]) -> Self {
        self.month_names = names.iter().map(|s| s.to_string()).collect();
        self.month_abbreviations = abbreviations.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Weekday names, Monday first.
    pub fn with_days(mut self, names: &[&str], abbreviations: &[&str]) -> Self {
        self.day_names = names.iter().map(|s| s.to_string()).collect();
        self.day_abbreviations = abbreviations.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_meridians(mut self, am: &str, pm: &str) -> Self {
        self.meridians = [am.to_lowercase(), pm.to_lowercase()];
        self
    }

    pub fn with_ordinal_suffixes(mut self, suffixes: &[&str]) -> Self {
        self.ordinal_suffixes = suffixes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// The phrase for a magnitude below every threshold (`"just now"`).
    pub fn now_phrase(&self) -> &str {
        &self.now
    }

    pub fn conjunction(&self) -> Option<&str> {
        self.and_word.as_deref()
    }

    pub fn unit(&self, unit: Unit) -> Option<&UnitPhrase> {
        self.units.get(&unit)
    }

    /// Render `count` of `unit`: the singular phrase for ±1, the plural
    /// template otherwise. Returns `None` if the locale has no phrase for the unit.
    pub fn describe(&self, unit: Unit, count: i64) -> Option<String> {
        let phrase = self.units.get(&unit)?;
        if count.unsigned_abs() == 1 {
            Some(phrase.singular.clone())
        } else {
            Some(phrase.plural.replace("{0}", &count.unsigned_abs().to_string()))
        }
    }

    /// Wrap a phrase in the past or future template according to `sign`.
    pub fn relative(&self, phrase: &str, sign: i64) -> String {
        let template = if sign < 0 { &self.past } else { &self.future };
        template.replace("{0}", phrase)
    }

    pub(crate) fn month_names(&self) -> &[String] {
        &self.month_names
    }

    pub(crate) fn month_abbreviations(&self) -> &[String] {
        &self.month_abbreviations
    }

    pub(crate) fn day_names(&self) -> &[String] {
        &self.day_names
    }

    pub(crate) fn day_abbreviations(&self) -> &[String] {
        &self.day_abbreviations
    }

    pub(crate) fn meridians(&self) -> &[String; 2] {
        &self.meridians
    }

    pub(crate) fn ordinal_suffixes(&self) -> &[String] {
        &self.ordinal_suffixes
    }

    /// Per-unit matchers for dehumanize, compiled on first use.
    pub(crate) fn phrase_patterns(&self) -> &[PhrasePattern] {
        self.phrase_patterns.get_or_init(|| {
            self.units
                .iter()
                .filter_map(|(unit, phrase)| {
                    let singular = phrase_regex(&regex::escape(&phrase.singular.to_lowercase()))?;
                    let plural = phrase_regex(&template_regex(&phrase.plural, r"([0-9]+)"))?;
                    Some(PhrasePattern {
                        unit: *unit,
                        singular,
                        plural,
                    })
                })
                .collect()
        })
    }

    /// Full-string matchers for the past/future wrappers and the "now" phrase.
    pub(crate) fn direction_patterns(&self) -> Option<&DirectionPatterns> {
        self.direction_patterns
            .get_or_init(|| {
                let whole = |template: &str| {
                    Regex::new(&format!("^{}$", template_regex(template, ".*"))).ok()
                };
                Some(DirectionPatterns {
                    past: whole(&self.past)?,
                    future: whole(&self.future)?,
                    now: phrase_regex(&regex::escape(&self.now.to_lowercase()))?,
                })
            })
            .as_ref()
    }
}

/// Escape a `{0}` template and substitute `replacement` for the placeholder.
fn template_regex(template: &str, replacement: &str) -> String {
    template
        .to_lowercase()
        .split("{0}")
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(replacement)
}

fn phrase_regex(body: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?:^|\b){body}(?:$|\b)")).ok()
}

pub(crate) fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase().replace('_', "-")
}

// ── Built-in locales ────────────────────────────────────────────────────────

fn english() -> Locale {
    Locale::new("en", "just now", "{0} ago", "in {0}")
        .with_conjunction("and")
        .with_unit(Unit::Second, 10, "a second", "{0} seconds")
        .with_unit(Unit::Minute, 45, "a minute", "{0} minutes")
        .with_unit(Unit::Hour, 2_700, "an hour", "{0} hours")
        .with_unit(Unit::Day, 79_200, "a day", "{0} days")
        .with_unit(Unit::Week, 554_400, "a week", "{0} weeks")
        .with_unit(Unit::Month, 2_419_200, "a month", "{0} months")
        .with_unit(Unit::Year, 29_808_000, "a year", "{0} years")
        .with_months(
            &[
                "January", "February", "March", "April", "May", "June", "July", "August",
                "September", "October", "November", "December",
            ],
            &["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"],
        )
        .with_days(
            &["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"],
            &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        )
        .with_meridians("am", "pm")
        .with_ordinal_suffixes(&["st", "nd", "rd", "th"])
}

fn spanish() -> Locale {
    Locale::new("es", "ahora", "hace {0}", "en {0}")
        .with_conjunction("y")
        .with_unit(Unit::Second, 10, "un segundo", "{0} segundos")
        .with_unit(Unit::Minute, 45, "un minuto", "{0} minutos")
        .with_unit(Unit::Hour, 2_700, "una hora", "{0} horas")
        .with_unit(Unit::Day, 79_200, "un día", "{0} días")
        .with_unit(Unit::Week, 554_400, "una semana", "{0} semanas")
        .with_unit(Unit::Month, 2_419_200, "un mes", "{0} meses")
        .with_unit(Unit::Year, 29_808_000, "un año", "{0} años")
        .with_months(
            &[
                "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto",
                "septiembre", "octubre", "noviembre", "diciembre",
            ],
            &["ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic"],
        )
        .with_days(
            &["lunes", "martes", "miércoles", "jueves", "viernes", "sábado", "domingo"],
            &["lun", "mar", "mié", "jue", "vie", "sáb", "dom"],
        )
        .with_meridians("am", "pm")
        .with_ordinal_suffixes(&["º"])
}

fn french() -> Locale {
    Locale::new("fr", "maintenant", "il y a {0}", "dans {0}")
        .with_conjunction("et")
        .with_unit(Unit::Second, 10, "une seconde", "{0} secondes")
        .with_unit(Unit::Minute, 45, "une minute", "{0} minutes")
        .with_unit(Unit::Hour, 2_700, "une heure", "{0} heures")
        .with_unit(Unit::Day, 79_200, "un jour", "{0} jours")
        .with_unit(Unit::Week, 554_400, "une semaine", "{0} semaines")
        .with_unit(Unit::Month, 2_419_200, "un mois", "{0} mois")
        .with_unit(Unit::Year, 29_808_000, "un an", "{0} ans")
        .with_months(
            &[
                "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août",
                "septembre", "octobre", "novembre", "décembre",
            ],
            &[
                "janv", "févr", "mars", "avr", "mai", "juin", "juil", "août", "sept", "oct",
                "nov", "déc",
            ],
        )
        .with_days(
            &["lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche"],
            &["lun", "mar", "mer", "jeu", "ven", "sam", "dim"],
        )
        .with_meridians("am", "pm")
        .with_ordinal_suffixes(&["er", "e"])
}

// ── LocaleRegistry ──────────────────────────────────────────────────────────

/// Read-only lookup of locales by code.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    locales: HashMap<String, Arc<Locale>>,
    default: Arc<Locale>,
}

impl Default for LocaleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LocaleRegistry {
    /// A registry holding the built-in locales (`en`, `es`, `fr`), defaulting to `en`.
    pub fn new() -> Self {
        let default = Arc::new(english());
        let mut locales = HashMap::new();
        locales.insert(default.code().to_string(), Arc::clone(&default));
        for locale in [spanish(), french()] {
            locales.insert(locale.code().to_string(), Arc::new(locale));
        }
        Self { locales, default }
    }

    /// The process-wide registry of built-in locales.
    pub fn global() -> &'static LocaleRegistry {
        static REGISTRY: OnceLock<LocaleRegistry> = OnceLock::new();
        REGISTRY.get_or_init(LocaleRegistry::new)
    }

    /// Add (or replace) a locale before the registry is shared.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        let locale = Arc::new(locale);
        if locale.code() == self.default.code() {
            self.default = Arc::clone(&locale);
        }
        self.locales.insert(locale.code().to_string(), locale);
        self
    }

    /// Look a locale up by code, falling back from `lang-region` to `lang`.
    pub fn get(&self, code: &str) -> Option<&Locale> {
        let code = normalize_code(code);
        if let Some(locale) = self.locales.get(&code) {
            return Some(locale.as_ref());
        }
        let lang = code.split('-').next()?;
        self.locales.get(lang).map(|l| l.as_ref())
    }

    /// Like [`get`](Self::get), but unknown or absent codes yield the default locale.
    pub fn resolve(&self, code: Option<&str>) -> &Locale {
        match code {
            None => self.default.as_ref(),
            Some(code) => self.get(code).unwrap_or_else(|| {
                debug!(locale = code, fallback = self.default.code(), "unknown locale, using default");
                self.default.as_ref()
            }),
        }
    }

    pub fn default_locale(&self) -> &Locale {
        self.default.as_ref()
    }

    /// Registered codes, sorted.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.locales.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
