//! Format templates.
//!
//! A template such as `"YYYY-MM-DD HH:mm:ss ZZ"` is tokenized once and
//! compiled to an anchored, case-insensitive regular expression with one
//! capture group per token. Text between tokens matches literally; wrap a
//! run in brackets (`"[at]"`) to stop it from being read as tokens.
//!
//! | Token | Matches |
//! |-------|---------|
//! | `YYYY` / `YY` | four-digit year / two-digit year (69–99 → 19xx, else 20xx) |
//! | `MMMM` / `MMM` | month name / abbreviation (locale) |
//! | `MM` / `M` | month, two digits / one or two digits |
//! | `DDDD` / `DDD` | day of year, three digits / one to three digits |
//! | `DD` / `D` / `Do` | day of month / ordinal day (`1st`, locale suffixes) |
//! | `dddd` / `ddd` / `d` | weekday name / abbreviation (locale) / ISO number 1–7 |
//! | `HH` `H` `hh` `h` | hour (24h / 12h) |
//! | `mm` `m` `ss` `s` | minute, second |
//! | `S…` | fractional second, any number of digits |
//! | `ZZZ` | zone name (`Europe/Paris`) |
//! | `ZZ` / `Z` | UTC offset (`+05:30`, `-0800`, `+05`, `Z`) |
//! | `A` / `a` | meridian (locale) |
//! | `X` / `x` | Unix seconds (optionally fractional) / Unix milliseconds |
//! | `W` | ISO week date (`2023-W05-2`, `2023W052`) |

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::TemporalError;
use crate::locale::Locale;

/// A single template token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    Year4,
    Year2,
    MonthName,
    MonthAbbr,
    Month2,
    Month,
    DayOfYear3,
    DayOfYear,
    Day2,
    Day,
    DayOrdinal,
    WeekdayName,
    WeekdayAbbr,
    WeekdayNumber,
    Hour2,
    Hour,
    Hour12x2,
    Hour12,
    Minute2,
    Minute,
    Second2,
    Second,
    Fraction,
    ZoneName,
    Offset,
    Meridian,
    Timestamp,
    TimestampMillis,
    IsoWeek,
}

/// Longest spellings first so that `MMMM` wins over `MM`.
const SPELLINGS: &[(&str, Token)] = &[
    ("YYYY", Token::Year4),
    ("YY", Token::Year2),
    ("MMMM", Token::MonthName),
    ("MMM", Token::MonthAbbr),
    ("MM", Token::Month2),
    ("M", Token::Month),
    ("DDDD", Token::DayOfYear3),
    ("DDD", Token::DayOfYear),
    ("Do", Token::DayOrdinal),
    ("DD", Token::Day2),
    ("D", Token::Day),
    ("dddd", Token::WeekdayName),
    ("ddd", Token::WeekdayAbbr),
    ("d", Token::WeekdayNumber),
    ("HH", Token::Hour2),
    ("H", Token::Hour),
    ("hh", Token::Hour12x2),
    ("h", Token::Hour12),
    ("mm", Token::Minute2),
    ("m", Token::Minute),
    ("ss", Token::Second2),
    ("s", Token::Second),
    ("ZZZ", Token::ZoneName),
    ("ZZ", Token::Offset),
    ("Z", Token::Offset),
    ("A", Token::Meridian),
    ("a", Token::Meridian),
    ("X", Token::Timestamp),
    ("x", Token::TimestampMillis),
    ("W", Token::IsoWeek),
];

impl Token {
    fn uses_locale(self) -> bool {
        matches!(
            self,
            Token::MonthName
                | Token::MonthAbbr
                | Token::DayOrdinal
                | Token::WeekdayName
                | Token::WeekdayAbbr
                | Token::Meridian
        )
    }

    /// The regex for this token. Never contains capture groups.
    fn pattern(self, locale: &Locale) -> String {
        match self {
            Token::Year4 => r"[0-9]{4}".to_string(),
            Token::Year2 | Token::Month2 | Token::Day2 => r"[0-9]{2}".to_string(),
            Token::Hour2 | Token::Hour12x2 | Token::Minute2 | Token::Second2 => {
                r"[0-9]{2}".to_string()
            }
            Token::Month | Token::Day | Token::Hour | Token::Hour12 => r"[0-9]{1,2}".to_string(),
            Token::Minute | Token::Second => r"[0-9]{1,2}".to_string(),
            Token::DayOfYear3 => r"[0-9]{3}".to_string(),
            Token::DayOfYear => r"[0-9]{1,3}".to_string(),
            Token::DayOrdinal => format!(r"[0-9]{{1,2}}{}", alternation(locale.ordinal_suffixes())),
            Token::MonthName => alternation(locale.month_names()),
            Token::MonthAbbr => alternation(locale.month_abbreviations()),
            Token::WeekdayName => alternation(locale.day_names()),
            Token::WeekdayAbbr => alternation(locale.day_abbreviations()),
            Token::WeekdayNumber => "[1-7]".to_string(),
            Token::Fraction => r"[0-9]+".to_string(),
            Token::ZoneName => r"[A-Za-z_]+(?:/[A-Za-z0-9_+\-]+)*".to_string(),
            Token::Offset => r"(?:[+-][0-9]{2}(?::?[0-9]{2})?|Z)".to_string(),
            Token::Meridian => alternation(locale.meridians()),
            Token::Timestamp => r"-?[0-9]+(?:\.[0-9]+)?".to_string(),
            Token::TimestampMillis => r"-?[0-9]+".to_string(),
            Token::IsoWeek => r"[0-9]{4}-?W[0-9]{2}(?:-?[1-7])?".to_string(),
        }
    }
}

/// `(?:a|b|c)` over escaped choices, longest first; a never-matching class when empty.
fn alternation(choices: &[String]) -> String {
    if choices.is_empty() {
        return r"[^\s\S]".to_string();
    }
    let mut sorted: Vec<&String> = choices.iter().collect();
    sorted.sort_by_key(|s| std::cmp::Reverse(s.chars().count()));
    let escaped: Vec<String> = sorted.into_iter().map(|s| regex::escape(s)).collect();
    format!("(?:{})", escaped.join("|"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Token(Token),
}

// ── FormatTemplate ──────────────────────────────────────────────────────────

/// A tokenized format template.
///
/// # Examples
///
/// ```
/// use tempora::FormatTemplate;
///
/// let template = FormatTemplate::new("YYYY-MM-DD [at] HH:mm").unwrap();
/// assert_eq!(template.as_str(), "YYYY-MM-DD [at] HH:mm");
/// assert!(FormatTemplate::new("YYYY [oops").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct FormatTemplate {
    source: String,
    parts: Vec<Part>,
    compiled: OnceLock<Regex>,
}

impl FormatTemplate {
    /// Tokenize a template.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::InvalidArgumentCombination`] for an
    /// unterminated `[` escape.
    pub fn new(source: &str) -> Result<Self, TemporalError> {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while !rest.is_empty() {
            if let Some(escaped) = rest.strip_prefix('[') {
                let end = escaped.find(']').ok_or_else(|| {
                    TemporalError::InvalidArgumentCombination(format!(
                        "unterminated '[' in format '{source}'"
                    ))
                })?;
                literal.push_str(&escaped[..end]);
                rest = &escaped[end + 1..];
                continue;
            }

            let fraction_len = rest.bytes().take_while(|&b| b == b'S').count();
            let token = if fraction_len > 0 {
                Some((Token::Fraction, fraction_len))
            } else {
                SPELLINGS
                    .iter()
                    .find(|(spelling, _)| rest.starts_with(spelling))
                    .map(|(spelling, token)| (*token, spelling.len()))
            };

            match token {
                Some((token, len)) => {
                    if !literal.is_empty() {
                        parts.push(Part::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(Part::Token(token));
                    rest = &rest[len..];
                }
                None => {
                    let ch = rest.chars().next().unwrap_or_default();
                    literal.push(ch);
                    rest = &rest[ch.len_utf8()..];
                }
            }
        }
        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            parts,
            compiled: OnceLock::new(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub(crate) fn tokens(&self) -> impl Iterator<Item = Token> + '_ {
        self.parts.iter().filter_map(|p| match p {
            Part::Token(t) => Some(*t),
            Part::Literal(_) => None,
        })
    }

    fn uses_locale(&self) -> bool {
        self.tokens().any(Token::uses_locale)
    }

    fn build_regex(&self, locale: &Locale) -> Result<Regex, TemporalError> {
        let mut pattern = String::from("(?i)^");
        for part in &self.parts {
            match part {
                Part::Literal(text) => pattern.push_str(&regex::escape(text)),
                Part::Token(token) => {
                    pattern.push('(');
                    pattern.push_str(&token.pattern(locale));
                    pattern.push(')');
                }
            }
        }
        pattern.push('$');
        Regex::new(&pattern).map_err(|e| {
            TemporalError::InvalidArgumentCombination(format!(
                "format '{}' cannot be compiled: {e}",
                self.source
            ))
        })
    }

    /// Match the whole of `text`; on success return each token with the text it matched.
    ///
    /// Templates without locale-dependent tokens compile once and are reused.
    pub(crate) fn captures<'t>(
        &self,
        locale: &Locale,
        text: &'t str,
    ) -> Result<Option<Vec<(Token, &'t str)>>, TemporalError> {
        let owned;
        let regex = if self.uses_locale() {
            owned = self.build_regex(locale)?;
            &owned
        } else {
            match self.compiled.get() {
                Some(regex) => regex,
                None => {
                    let regex = self.build_regex(locale)?;
                    self.compiled.get_or_init(|| regex)
                }
            }
        };

        let Some(caps) = regex.captures(text) else {
            return Ok(None);
        };
        let values = self
            .tokens()
            .enumerate()
            .filter_map(|(i, token)| caps.get(i + 1).map(|m| (token, m.as_str())))
            .collect();
        Ok(Some(values))
    }
}

impl PartialEq for FormatTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Display for FormatTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// ── Formats ─────────────────────────────────────────────────────────────────

/// An ordered list of templates; the first one that matches wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Formats(Vec<FormatTemplate>);

impl Formats {
    /// # Errors
    ///
    /// Returns [`TemporalError::InvalidArgumentCombination`] if the list is
    /// empty or a template is malformed.
    pub fn new<S: AsRef<str>>(templates: &[S]) -> Result<Self, TemporalError> {
        if templates.is_empty() {
            return Err(TemporalError::InvalidArgumentCombination(
                "format list is empty".to_string(),
            ));
        }
        templates
            .iter()
            .map(|t| FormatTemplate::new(t.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Formats)
    }

    pub fn single(template: &str) -> Result<Self, TemporalError> {
        Self::new(&[template])
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormatTemplate> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<FormatTemplate> for Formats {
    fn from(template: FormatTemplate) -> Self {
        Formats(vec![template])
    }
}

impl fmt::Display for Formats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(FormatTemplate::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
