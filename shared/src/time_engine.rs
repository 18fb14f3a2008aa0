//! Wall-clock time and zone lookup primitives
//!
//! Provides the minute-granularity `WallTime` type used on every zone card,
//! plus name resolution against the IANA database (exact names, a small alias
//! table, and bare city-name lookup).

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// Minutes in one day; slider positions live in `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// A wall-clock time of day at minute granularity (00:00 - 23:59).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WallTime {
    hour: u32,
    minute: u32,
}

impl WallTime {
    /// Construct from hour/minute, rejecting out-of-range components.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Construct from minutes since midnight, wrapping into one day.
    ///
    /// Negative values wrap backwards: `-30` becomes `23:30`.
    pub fn from_minutes(minutes: i64) -> Self {
        let m = minutes.rem_euclid(MINUTES_PER_DAY) as u32;
        Self {
            hour: m / 60,
            minute: m % 60,
        }
    }

    /// Strictly parse an `HH:MM` string.
    pub fn parse(s: &str) -> Option<Self> {
        let (h, m) = s.trim().split_once(':')?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return None;
        }
        Self::new(h.parse().ok()?, m.parse().ok()?)
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Minutes since midnight (the slider position for this time).
    pub fn minutes(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    /// This time shifted by a signed number of minutes, wrapped into one day.
    pub fn shifted(&self, delta_minutes: i64) -> Self {
        Self::from_minutes(self.minutes() as i64 + delta_minutes)
    }

    /// Combine with a calendar date into a naive local datetime.
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        let time = NaiveTime::from_num_seconds_from_midnight_opt(self.minutes() * 60, 0)
            .unwrap_or(NaiveTime::MIN);
        date.and_time(time)
    }
}

impl std::fmt::Display for WallTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Where a zone's offset comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneSource {
    /// A fixed offset from UTC, in minutes. Used for the UTC seed entry.
    Fixed(i32),
    /// An IANA zone; the offset is read from the database per instant.
    Iana(Tz),
}

impl ZoneSource {
    /// UTC offset in minutes at the given instant.
    pub fn offset_minutes_at(&self, instant: DateTime<Utc>) -> i32 {
        match self {
            ZoneSource::Fixed(minutes) => *minutes,
            ZoneSource::Iana(tz) => {
                instant.with_timezone(tz).offset().fix().local_minus_utc() / 60
            }
        }
    }

    /// Map a naive local datetime in this zone back to a UTC instant.
    ///
    /// An ambiguous local time (fall-back overlap) resolves to the earlier
    /// instant; a nonexistent local time (spring-forward gap) falls back to
    /// the caller's last-known offset.
    pub fn local_to_utc(&self, local: NaiveDateTime, fallback_offset_minutes: i32) -> DateTime<Utc> {
        match self {
            ZoneSource::Fixed(minutes) => {
                (local - chrono::Duration::minutes(*minutes as i64)).and_utc()
            }
            ZoneSource::Iana(tz) => match tz.from_local_datetime(&local) {
                LocalResult::Single(dt) => dt.with_timezone(&Utc),
                LocalResult::Ambiguous(earlier, _) => earlier.with_timezone(&Utc),
                LocalResult::None => {
                    (local - chrono::Duration::minutes(fallback_offset_minutes as i64)).and_utc()
                }
            },
        }
    }
}

/// A successfully resolved zone name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedZone {
    /// Canonical display name ("UTC", "IST", or an IANA name).
    pub name: String,
    pub source: ZoneSource,
}

/// Resolve free-form user input to a zone.
///
/// Tries, in order: the alias table (UTC/GMT/IST), an exact IANA name, and a
/// case-insensitive match on the city segment of IANA names ("tokyo" finds
/// Asia/Tokyo, "new york" finds America/New_York). Returns `None` when
/// nothing matches.
pub fn resolve_zone(query: &str) -> Option<ResolvedZone> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.to_lowercase().as_str() {
        "utc" => {
            return Some(ResolvedZone {
                name: "UTC".to_string(),
                source: ZoneSource::Fixed(0),
            })
        }
        "gmt" => {
            return Some(ResolvedZone {
                name: "GMT".to_string(),
                source: ZoneSource::Fixed(0),
            })
        }
        "ist" | "india standard time" => {
            return Some(ResolvedZone {
                name: "IST".to_string(),
                source: ZoneSource::Iana(chrono_tz::Asia::Kolkata),
            })
        }
        _ => {}
    }

    if let Ok(tz) = trimmed.parse::<Tz>() {
        return Some(ResolvedZone {
            name: tz.name().to_string(),
            source: ZoneSource::Iana(tz),
        });
    }

    let city = trimmed.to_lowercase().replace(' ', "_");
    chrono_tz::TZ_VARIANTS
        .iter()
        .find(|tz| {
            tz.name()
                .rsplit('/')
                .next()
                .is_some_and(|segment| segment.eq_ignore_ascii_case(&city))
        })
        .map(|tz| ResolvedZone {
            name: tz.name().to_string(),
            source: ZoneSource::Iana(*tz),
        })
}

/// Search IANA zones by name (case-insensitive partial match).
pub fn search_zones(query: &str) -> Vec<Tz> {
    let query_lower = query.to_lowercase();
    chrono_tz::TZ_VARIANTS
        .iter()
        .filter(|tz| tz.name().to_lowercase().contains(&query_lower))
        .copied()
        .collect()
}

/// Format an offset in minutes as "UTC±hh:mm".
pub fn format_offset(offset_minutes: i32) -> String {
    let sign = if offset_minutes >= 0 { "+" } else { "-" };
    let abs_minutes = offset_minutes.abs();
    format!("UTC{}{:02}:{:02}", sign, abs_minutes / 60, abs_minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wall_time() {
        assert_eq!(WallTime::parse("09:00"), WallTime::new(9, 0));
        assert_eq!(WallTime::parse("23:59"), WallTime::new(23, 59));
        assert_eq!(WallTime::parse("9:05"), WallTime::new(9, 5));
        assert_eq!(WallTime::parse("24:00"), None);
        assert_eq!(WallTime::parse("12:60"), None);
        assert_eq!(WallTime::parse("12"), None);
        assert_eq!(WallTime::parse("12:5"), None);
        assert_eq!(WallTime::parse(""), None);
    }

    #[test]
    fn test_from_minutes_wraps() {
        assert_eq!(WallTime::from_minutes(90), WallTime::new(1, 30).unwrap());
        assert_eq!(WallTime::from_minutes(1440), WallTime::new(0, 0).unwrap());
        assert_eq!(WallTime::from_minutes(-30), WallTime::new(23, 30).unwrap());
    }

    #[test]
    fn test_shifted_wraps_across_midnight() {
        let t = WallTime::new(1, 30).unwrap();
        assert_eq!(t.shifted(-330), WallTime::new(20, 0).unwrap());
        assert_eq!(t.shifted(24 * 60), t);
    }

    #[test]
    fn test_display_format() {
        assert_eq!(WallTime::new(9, 5).unwrap().to_string(), "09:05");
    }

    #[test]
    fn test_resolve_aliases() {
        let utc = resolve_zone("utc").unwrap();
        assert_eq!(utc.name, "UTC");
        assert_eq!(utc.source, ZoneSource::Fixed(0));

        let ist = resolve_zone("IST").unwrap();
        assert_eq!(ist.name, "IST");
        let now = Utc::now();
        assert_eq!(ist.source.offset_minutes_at(now), 330);
    }

    #[test]
    fn test_resolve_exact_iana_name() {
        let tokyo = resolve_zone("Asia/Tokyo").unwrap();
        assert_eq!(tokyo.name, "Asia/Tokyo");
        assert_eq!(tokyo.source.offset_minutes_at(Utc::now()), 540);
    }

    #[test]
    fn test_resolve_city_segment() {
        assert_eq!(resolve_zone("tokyo").unwrap().name, "Asia/Tokyo");
        assert_eq!(resolve_zone("New York").unwrap().name, "America/New_York");
        assert_eq!(resolve_zone("not-a-real-place"), None);
    }

    #[test]
    fn test_ambiguous_local_time_takes_earlier_instant() {
        // US fall-back 2024: 01:30 on Nov 3 happens twice in New York.
        let tz: Tz = "America/New_York".parse().unwrap();
        let source = ZoneSource::Iana(tz);
        let local = WallTime::new(1, 30)
            .unwrap()
            .on(NaiveDate::from_ymd_opt(2024, 11, 3).unwrap());
        let instant = source.local_to_utc(local, -240);
        // The earlier pass is still EDT (UTC-4).
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap());
    }

    #[test]
    fn test_gapped_local_time_uses_fallback_offset() {
        // US spring-forward 2024: 02:30 on Mar 10 does not exist in New York.
        let tz: Tz = "America/New_York".parse().unwrap();
        let source = ZoneSource::Iana(tz);
        let local = WallTime::new(2, 30)
            .unwrap()
            .on(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        let instant = source.local_to_utc(local, -300);
        assert_eq!(instant, Utc.with_ymd_and_hms(2024, 3, 10, 7, 30, 0).unwrap());
    }

    #[test]
    fn test_search_zones() {
        let results = search_zones("kolkata");
        assert!(results.iter().any(|tz| tz.name() == "Asia/Kolkata"));
        assert!(search_zones("zzzz-nowhere").is_empty());
    }

    #[test]
    fn test_format_offset() {
        assert_eq!(format_offset(0), "UTC+00:00");
        assert_eq!(format_offset(330), "UTC+05:30");
        assert_eq!(format_offset(-480), "UTC-08:00");
    }
}
