//! Wall-clock conversion
//!
//! The engine only needs one primitive from a timezone library: "what local
//! minute of the day was this instant". [`LocalClock`] is that seam.
//! [`FacilityClock`] resolves a facility's timezone string to either an IANA
//! zone (DST-aware, via `chrono-tz`) or a literal fixed offset.

use crate::error::ConfigError;
use chrono::{DateTime, FixedOffset, NaiveTime, Offset, Timelike, Utc};
use chrono_tz::Tz;

/// Converts an instant to local minutes since midnight
pub trait LocalClock: Send + Sync {
    fn minutes_since_midnight(&self, instant: DateTime<Utc>) -> u32;
}

/// Clock with a constant UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedOffsetClock {
    offset: FixedOffset,
}

impl FixedOffsetClock {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    pub fn from_offset_minutes(minutes: i32) -> Result<Self, ConfigError> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(|offset| Self { offset })
            .ok_or(ConfigError::OffsetOutOfRange(minutes))
    }

    /// Resolve a timezone string: UTC aliases or a literal offset such as
    /// `-05:00`, `+0530`, `+02` or `UTC+01:00`.
    pub fn from_timezone(timezone: &str) -> Result<Self, ConfigError> {
        parse_offset_minutes(timezone)
            .ok_or_else(|| ConfigError::UnknownTimezone(timezone.to_string()))
            .and_then(Self::from_offset_minutes)
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset.local_minus_utc() / 60
    }
}

impl LocalClock for FixedOffsetClock {
    fn minutes_since_midnight(&self, instant: DateTime<Utc>) -> u32 {
        let local = instant.with_timezone(&self.offset);
        local.hour() * 60 + local.minute()
    }
}

/// A facility's clock: an IANA zone or a fixed offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FacilityClock {
    Zone(Tz),
    Fixed(FixedOffsetClock),
}

impl FacilityClock {
    /// Resolve `timezone` as a UTC alias or literal offset first, then as an
    /// IANA zone name. `utc_offset_minutes` only applies to names neither
    /// form recognises.
    pub fn resolve(timezone: &str, utc_offset_minutes: Option<i32>) -> Result<Self, ConfigError> {
        if let Ok(clock) = FixedOffsetClock::from_timezone(timezone) {
            return Ok(FacilityClock::Fixed(clock));
        }
        if let Ok(zone) = timezone.trim().parse::<Tz>() {
            return Ok(FacilityClock::Zone(zone));
        }
        match utc_offset_minutes {
            Some(minutes) => FixedOffsetClock::from_offset_minutes(minutes).map(FacilityClock::Fixed),
            None => Err(ConfigError::UnknownTimezone(timezone.to_string())),
        }
    }

    pub fn utc() -> Self {
        FacilityClock::Fixed(FixedOffsetClock::utc())
    }
}

impl LocalClock for FacilityClock {
    fn minutes_since_midnight(&self, instant: DateTime<Utc>) -> u32 {
        match self {
            FacilityClock::Zone(zone) => {
                let local = instant.with_timezone(zone);
                local.hour() * 60 + local.minute()
            }
            FacilityClock::Fixed(clock) => clock.minutes_since_midnight(instant),
        }
    }
}

fn parse_offset_minutes(timezone: &str) -> Option<i32> {
    let tz = timezone.trim();
    if ["UTC", "Etc/UTC", "GMT", "Etc/GMT", "Z"]
        .iter()
        .any(|alias| tz.eq_ignore_ascii_case(alias))
    {
        return Some(0);
    }

    let tz = tz
        .strip_prefix("UTC")
        .or_else(|| tz.strip_prefix("GMT"))
        .unwrap_or(tz);
    let (sign, rest) = match tz.chars().next()? {
        '+' => (1, &tz[1..]),
        '-' => (-1, &tz[1..]),
        _ => return None,
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        1 | 2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if minutes >= 60 {
        return None;
    }
    Some(sign * (hours * 60 + minutes))
}

/// Minutes since midnight for a scheduled `HH:MM` or `HH:MM:SS` start
pub fn parse_clock_time(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
        .map(|t| t.hour() * 60 + t.minute())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_utc_clock() {
        let clock = FixedOffsetClock::utc();
        assert_eq!(clock.minutes_since_midnight(instant("2024-03-01T07:45:30Z")), 465);
    }

    #[test]
    fn test_negative_offset_wraps_to_previous_day() {
        let clock = FixedOffsetClock::from_timezone("-05:00").unwrap();
        assert_eq!(clock.offset_minutes(), -300);
        // 03:10 UTC is 22:10 the day before
        assert_eq!(clock.minutes_since_midnight(instant("2024-03-01T03:10:00Z")), 1330);
    }

    #[test]
    fn test_timezone_forms() {
        assert_eq!(parse_offset_minutes("UTC"), Some(0));
        assert_eq!(parse_offset_minutes("etc/utc"), Some(0));
        assert_eq!(parse_offset_minutes("+0530"), Some(330));
        assert_eq!(parse_offset_minutes("UTC-08:00"), Some(-480));
        assert_eq!(parse_offset_minutes("+02"), Some(120));
        assert_eq!(parse_offset_minutes("America/New_York"), None);
        assert_eq!(parse_offset_minutes("+05:75"), None);
    }

    #[test]
    fn test_unknown_timezone_is_config_error() {
        let err = FixedOffsetClock::from_timezone("Europe/Paris").unwrap_err();
        assert_eq!(err, ConfigError::UnknownTimezone("Europe/Paris".to_string()));
    }

    #[test]
    fn test_zone_follows_daylight_saving() {
        let clock = FacilityClock::resolve("America/New_York", None).unwrap();
        assert_eq!(clock, FacilityClock::Zone(chrono_tz::America::New_York));
        // EST in January, EDT in July: both are 07:30 local
        assert_eq!(clock.minutes_since_midnight(instant("2024-01-15T12:30:00Z")), 450);
        assert_eq!(clock.minutes_since_midnight(instant("2024-07-15T11:30:00Z")), 450);
    }

    #[test]
    fn test_resolve_prefers_literal_offsets() {
        let clock = FacilityClock::resolve("-05:00", Some(60)).unwrap();
        assert_eq!(clock, FacilityClock::Fixed(FixedOffsetClock::from_offset_minutes(-300).unwrap()));
        assert_eq!(FacilityClock::resolve("UTC", None).unwrap(), FacilityClock::utc());
    }

    #[test]
    fn test_resolve_unknown_name() {
        assert_eq!(
            FacilityClock::resolve("Mars/Olympus_Mons", None).unwrap_err(),
            ConfigError::UnknownTimezone("Mars/Olympus_Mons".to_string())
        );
        let clock = FacilityClock::resolve("Mars/Olympus_Mons", Some(-300)).unwrap();
        assert_eq!(clock.minutes_since_midnight(instant("2024-07-15T12:30:00Z")), 450);
    }

    #[test]
    fn test_offset_out_of_range() {
        assert_eq!(
            FixedOffsetClock::from_offset_minutes(25 * 60).unwrap_err(),
            ConfigError::OffsetOutOfRange(1500)
        );
    }

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(parse_clock_time("07:30"), Some(450));
        assert_eq!(parse_clock_time("07:30:00"), Some(450));
        assert_eq!(parse_clock_time("7:30"), Some(450));
        assert_eq!(parse_clock_time("25:00"), None);
        assert_eq!(parse_clock_time(""), None);
    }
}
