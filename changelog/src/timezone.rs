use chrono::{NaiveDateTime, Offset, TimeZone};
use chrono_tz::{OffsetName, Tz, TZ_VARIANTS};
use tracing::warn;

/// Globally common zones, tried before the full database. Order matters:
/// the first zone matching an abbreviation or offset wins.
const COMMON_ZONES: &[Tz] = &[
    Tz::Europe__Amsterdam,
    Tz::Europe__Kiev,
    Tz::Europe__London,
    Tz::Europe__Moscow,
    Tz::America__New_York,
    Tz::America__Chicago,
    Tz::America__Denver,
    Tz::America__Los_Angeles,
    Tz::America__Sao_Paulo,
    Tz::Asia__Seoul,
    Tz::Asia__Tokyo,
    Tz::Asia__Shanghai,
    Tz::Australia__Sydney,
    Tz::Africa__Johannesburg,
];

/// Country-code mail domains that bias the candidate order.
// CST is both China Standard Time and Central Standard Time
const LOCALE_BIAS: &[(&str, Tz)] = &[("cn", Tz::Asia__Shanghai)];

/// Ranked candidate list: locale bias, common zones, then the whole
/// database.
fn candidate_zones(email: &str) -> Vec<Tz> {
    let mut zones = Vec::with_capacity(1 + COMMON_ZONES.len() + TZ_VARIANTS.len());
    let tld = email.rsplit('.').next().unwrap_or("");
    if let Some((_, tz)) = LOCALE_BIAS.iter().find(|(domain, _)| *domain == tld) {
        zones.push(*tz);
    }
    zones.extend_from_slice(COMMON_ZONES);
    zones.extend_from_slice(&TZ_VARIANTS);
    zones
}

fn zone_offset(tz: Tz, local: &NaiveDateTime) -> Option<<Tz as chrono::TimeZone>::Offset> {
    tz.offset_from_local_datetime(local).earliest()
}

/// Resolve a zone abbreviation (`CET`, `PST`, ...) against the candidate
/// list, evaluated at the given wall-clock time so daylight saving is
/// honored. Unresolvable abbreviations fall back to UTC with a warning.
#[must_use]
pub fn find_by_abbreviation(abbreviation: &str, local: &NaiveDateTime, email: &str) -> Tz {
    for tz in candidate_zones(email) {
        if let Some(offset) = zone_offset(tz, local) {
            if offset.abbreviation() == Some(abbreviation) {
                return tz;
            }
        }
    }
    warn!("could not resolve timezone {abbreviation}, assuming UTC");
    Tz::UTC
}

/// Parse a `±HHMM` string into seconds east of UTC.
#[must_use]
pub fn parse_offset(offset: &str) -> Option<i32> {
    let bytes = offset.as_bytes();
    if bytes.len() != 5 {
        return None;
    }
    let sign = match bytes[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let hours: i32 = offset[1..3].parse().ok()?;
    let minutes: i32 = offset[3..5].parse().ok()?;
    Some(sign * 60 * (60 * hours + minutes))
}

/// Resolve a numeric `±HHMM` UTC offset against the candidate list,
/// evaluated at the given wall-clock time. Unresolvable offsets fall back
/// to UTC with a warning.
#[must_use]
pub fn find_by_offset(offset: &str, local: &NaiveDateTime, email: &str) -> Tz {
    let Some(seconds) = parse_offset(offset) else {
        warn!("could not parse UTC offset {offset}, assuming UTC");
        return Tz::UTC;
    };
    for tz in candidate_zones(email) {
        if let Some(zone_offset) = zone_offset(tz, local) {
            if zone_offset.fix().local_minus_utc() == seconds {
                return tz;
            }
        }
    }
    warn!("no timezone matches offset {offset}, assuming UTC");
    Tz::UTC
}
