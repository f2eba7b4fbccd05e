//! Timezone expression resolution.
//!
//! A [`TzExpr`] is whatever the caller handed us to describe a desired
//! zone: nothing at all, a zone name, a fixed offset, or an already
//! resolved [`Zone`]. [`resolve`] turns it into a [`Zone`], which knows how
//! to compute the UTC offset for an instant and how to place a wall-clock
//! time on the timeline.
//!
//! The resolver never picks a default on its own. Call-sites pass the zone
//! to use for [`TzExpr::Absent`] explicitly (UTC for the UTC-now path, the
//! system zone for the local-now path).

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{
    DateTime, FixedOffset, Local, LocalResult, NaiveDateTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use regex::Regex;

use crate::error::TemporalError;

// ── Zone ────────────────────────────────────────────────────────────────────

/// A resolved timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// Coordinated Universal Time.
    Utc,
    /// The host system's zone, as reported by the OS.
    Local,
    /// A constant offset from UTC.
    Fixed(FixedOffset),
    /// An IANA zone from the bundled database.
    Named(Tz),
}

impl Zone {
    /// The UTC offset in effect at the given UTC instant.
    pub fn offset_at(&self, utc: &NaiveDateTime) -> FixedOffset {
        match self {
            Zone::Utc => Utc.fix(),
            Zone::Local => Local.offset_from_utc_datetime(utc).fix(),
            Zone::Fixed(offset) => *offset,
            Zone::Named(tz) => tz.offset_from_utc_datetime(utc).fix(),
        }
    }

    /// Express a UTC instant in this zone.
    pub fn at_utc(&self, utc: &NaiveDateTime) -> DateTime<FixedOffset> {
        DateTime::from_naive_utc_and_offset(*utc, self.offset_at(utc))
    }

    /// Place a wall-clock time in this zone.
    ///
    /// Ambiguous wall times (a DST fold) take the earlier offset. Wall times
    /// that do not exist (a DST gap) are moved forward by the length of the
    /// gap, so 02:30 on a spring-forward night becomes 03:30.
    pub fn localize(&self, local: &NaiveDateTime) -> DateTime<FixedOffset> {
        let offset = match self.local_offset(local) {
            Some(offset) => offset,
            // The offset in effect before the transition.
            None => self.offset_at(&(*local - chrono::Duration::days(1))),
        };
        let utc = *local - chrono::Duration::seconds(offset.local_minus_utc() as i64);
        self.at_utc(&utc)
    }

    fn local_offset(&self, local: &NaiveDateTime) -> Option<FixedOffset> {
        match self {
            Zone::Utc => Some(Utc.fix()),
            Zone::Fixed(offset) => Some(*offset),
            Zone::Local => earliest(Local.offset_from_local_datetime(local).map(|o| o.fix())),
            Zone::Named(tz) => earliest(tz.offset_from_local_datetime(local).map(|o| o.fix())),
        }
    }

    /// The zone's display name (`"UTC"`, `"local"`, `"+05:30"`, or an IANA name).
    pub fn name(&self) -> String {
        match self {
            Zone::Utc => "UTC".to_string(),
            Zone::Local => "local".to_string(),
            Zone::Fixed(offset) => format_offset(offset),
            Zone::Named(tz) => tz.name().to_string(),
        }
    }
}

fn earliest(result: LocalResult<FixedOffset>) -> Option<FixedOffset> {
    match result {
        LocalResult::Single(offset) => Some(offset),
        LocalResult::Ambiguous(first, _) => Some(first),
        LocalResult::None => None,
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Zone {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_zone(s)
    }
}

impl From<Tz> for Zone {
    fn from(tz: Tz) -> Self {
        Zone::Named(tz)
    }
}

impl From<FixedOffset> for Zone {
    fn from(offset: FixedOffset) -> Self {
        Zone::Fixed(offset)
    }
}

// ── TzExpr ──────────────────────────────────────────────────────────────────

/// A caller-supplied description of a timezone, not yet resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TzExpr {
    /// No zone given; the call-site decides the default.
    #[default]
    Absent,
    /// A zone name or fixed-offset string (`"Europe/Paris"`, `"+05:30"`, `"local"`).
    Name(String),
    /// A fixed offset value.
    Offset(FixedOffset),
    /// An already resolved zone, adopted as-is.
    Zone(Zone),
}

impl TzExpr {
    pub fn is_absent(&self) -> bool {
        matches!(self, TzExpr::Absent)
    }
}

impl From<&str> for TzExpr {
    fn from(s: &str) -> Self {
        TzExpr::Name(s.to_string())
    }
}

impl From<String> for TzExpr {
    fn from(s: String) -> Self {
        TzExpr::Name(s)
    }
}

impl From<FixedOffset> for TzExpr {
    fn from(offset: FixedOffset) -> Self {
        TzExpr::Offset(offset)
    }
}

impl From<Zone> for TzExpr {
    fn from(zone: Zone) -> Self {
        TzExpr::Zone(zone)
    }
}

impl From<Tz> for TzExpr {
    fn from(tz: Tz) -> Self {
        TzExpr::Zone(Zone::Named(tz))
    }
}

impl<T: Into<TzExpr>> From<Option<T>> for TzExpr {
    fn from(value: Option<T>) -> Self {
        value.map_or(TzExpr::Absent, Into::into)
    }
}

// ── resolve ─────────────────────────────────────────────────────────────────

/// Resolve a timezone expression.
///
/// `absent` is returned for [`TzExpr::Absent`].
///
/// # Errors
///
/// Returns [`TemporalError::UnknownTimeZone`] if a name is neither a known
/// IANA zone nor a fixed-offset expression.
///
/// # Examples
///
/// ```
/// use tempora::tz::{resolve, TzExpr, Zone};
///
/// let zone = resolve(&TzExpr::from("+05:30"), Zone::Utc).unwrap();
/// assert_eq!(zone.name(), "+05:30");
/// assert_eq!(resolve(&TzExpr::Absent, Zone::Utc).unwrap(), Zone::Utc);
/// ```
pub fn resolve(expr: &TzExpr, absent: Zone) -> Result<Zone, TemporalError> {
    match expr {
        TzExpr::Absent => Ok(absent),
        TzExpr::Name(name) => parse_zone(name),
        TzExpr::Offset(offset) => Ok(Zone::Fixed(*offset)),
        TzExpr::Zone(zone) => Ok(*zone),
    }
}

fn parse_zone(s: &str) -> Result<Zone, TemporalError> {
    let name = s.trim();
    match name {
        "" => return Err(TemporalError::UnknownTimeZone("empty zone name".to_string())),
        "local" | "Local" | "LOCAL" => return Ok(Zone::Local),
        "utc" | "UTC" | "Z" | "z" => return Ok(Zone::Utc),
        _ => {}
    }

    if let Ok(tz) = name.parse::<Tz>() {
        return Ok(Zone::Named(tz));
    }

    let bare = name
        .strip_prefix("UTC")
        .or_else(|| name.strip_prefix("GMT"))
        .unwrap_or(name);
    parse_fixed_offset(bare)
        .map(Zone::Fixed)
        .ok_or_else(|| TemporalError::UnknownTimeZone(format!("'{}'", s)))
}

fn offset_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([+-])([0-9]{2})(?::?([0-9]{2}))?$").expect("offset pattern is valid")
    })
}

/// Parse `Z`, `±HH`, `±HHmm` or `±HH:mm` into a fixed offset.
pub(crate) fn parse_fixed_offset(s: &str) -> Option<FixedOffset> {
    if s.eq_ignore_ascii_case("z") {
        return Some(Utc.fix());
    }
    let caps = offset_pattern().captures(s)?;
    let hours: i32 = caps[2].parse().ok()?;
    let minutes: i32 = caps.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    let seconds = hours * 3600 + minutes * 60;
    FixedOffset::east_opt(if &caps[1] == "-" { -seconds } else { seconds })
}

/// Format an offset as `±HH:MM` (seconds are appended only when non-zero).
pub(crate) fn format_offset(offset: &FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    let sign = if secs >= 0 { '+' } else { '-' };
    let abs = secs.unsigned_abs();
    let (hours, minutes, seconds) = (abs / 3600, (abs % 3600) / 60, abs % 60);
    if seconds == 0 {
        format!("{sign}{hours:02}:{minutes:02}")
    } else {
        format!("{sign}{hours:02}:{minutes:02}:{seconds:02}")
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, m: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_resolve_absent_uses_call_site_default() {
        assert_eq!(resolve(&TzExpr::Absent, Zone::Utc).unwrap(), Zone::Utc);
        assert_eq!(resolve(&TzExpr::Absent, Zone::Local).unwrap(), Zone::Local);
    }

    #[test]
    fn test_resolve_iana_name() {
        let zone = resolve(&"America/New_York".into(), Zone::Utc).unwrap();
        assert_eq!(zone, Zone::Named(chrono_tz::America::New_York));
        assert_eq!(zone.name(), "America/New_York");
    }

    #[test]
    fn test_resolve_legacy_alias() {
        let zone = resolve(&"US/Pacific".into(), Zone::Utc).unwrap();
        assert_eq!(zone.name(), "US/Pacific");
    }

    #[test]
    fn test_resolve_fixed_offsets() {
        let cases = [
            ("+05:30", 5 * 3600 + 30 * 60),
            ("-0800", -8 * 3600),
            ("+02", 2 * 3600),
            ("UTC+01:00", 3600),
            ("Z", 0),
        ];
        for (input, secs) in cases {
            let zone = resolve(&input.into(), Zone::Local).unwrap();
            let expected = if secs == 0 {
                Zone::Utc
            } else {
                Zone::Fixed(FixedOffset::east_opt(secs).unwrap())
            };
            assert_eq!(zone, expected, "input: {input}");
        }
    }

    #[test]
    fn test_resolve_local_and_utc_keywords() {
        assert_eq!(resolve(&"local".into(), Zone::Utc).unwrap(), Zone::Local);
        assert_eq!(resolve(&"utc".into(), Zone::Local).unwrap(), Zone::Utc);
    }

    #[test]
    fn test_resolve_unknown_zone_is_error() {
        let err = resolve(&"Mars/Olympus_Mons".into(), Zone::Utc).unwrap_err();
        assert!(matches!(err, TemporalError::UnknownTimeZone(_)));
        assert!(err.to_string().contains("Unknown timezone"), "got: {err}");
    }

    #[test]
    fn test_resolve_rejects_out_of_range_offset() {
        assert!(resolve(&"+25:00".into(), Zone::Utc).is_err());
        assert!(resolve(&"+05:75".into(), Zone::Utc).is_err());
    }

    #[test]
    fn test_resolve_adopts_existing_values() {
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        assert_eq!(
            resolve(&TzExpr::Offset(offset), Zone::Utc).unwrap(),
            Zone::Fixed(offset)
        );
        let zone = Zone::Named(chrono_tz::Asia::Tokyo);
        assert_eq!(resolve(&TzExpr::Zone(zone), Zone::Utc).unwrap(), zone);
    }

    #[test]
    fn test_named_zone_offset_follows_dst() {
        let zone = Zone::Named(chrono_tz::America::New_York);
        let winter = zone.offset_at(&naive(2026, 1, 15, 12, 0));
        let summer = zone.offset_at(&naive(2026, 7, 15, 12, 0));
        assert_eq!(winter.local_minus_utc(), -5 * 3600);
        assert_eq!(summer.local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_localize_gap_moves_forward() {
        // 2026-03-08 02:30 does not exist in New York.
        let zone = Zone::Named(chrono_tz::America::New_York);
        let dt = zone.localize(&naive(2026, 3, 8, 2, 30));
        assert_eq!(dt.naive_local(), naive(2026, 3, 8, 3, 30));
        assert_eq!(dt.offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_localize_fold_takes_earlier_offset() {
        // 2026-11-01 01:30 happens twice in New York.
        let zone = Zone::Named(chrono_tz::America::New_York);
        let dt = zone.localize(&naive(2026, 11, 1, 1, 30));
        assert_eq!(dt.offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_format_offset() {
        assert_eq!(format_offset(&FixedOffset::east_opt(19800).unwrap()), "+05:30");
        assert_eq!(format_offset(&FixedOffset::west_opt(28800).unwrap()), "-08:00");
        assert_eq!(format_offset(&FixedOffset::east_opt(0).unwrap()), "+00:00");
    }

    #[test]
    fn test_zone_from_str() {
        let zone: Zone = "Europe/Paris".parse().unwrap();
        assert_eq!(zone.to_string(), "Europe/Paris");
        assert!("nowhere".parse::<Zone>().is_err());
    }
}
