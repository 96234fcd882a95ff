use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::names::Locale;

/// Julian Day Number of 1 Muharram 1 AH (civil epoch, Friday 16 July 622 Julian)
const LUNAR_HIJRI_EPOCH: i64 = 1_948_440;

/// Years at which the solar Hijri 33-year intercalation pattern shifts
const SOLAR_HIJRI_BREAKS: [i64; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324,
    2394, 2456, 3178,
];

/// A single date in one calendar system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CalendarDay {
    pub year: i64,
    pub month: u32,
    pub day: u32,
    pub month_name: String,
}

/// The same day expressed in the Gregorian, solar Hijri and lunar Hijri calendars
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CalendarDate {
    pub gregorian: CalendarDay,
    pub solar_hijri: CalendarDay,
    pub lunar_hijri: CalendarDay,
    pub weekday: String,
    pub julian_day: i64,
}

/// Self-contained multi-calendar conversion.
///
/// Both Hijri calendars are civil arithmetic approximations: the solar
/// calendar follows the 33-year intercalation cycle with its historical
/// break years, and the lunar calendar is the tabular 30-year cycle with
/// alternating 30/29-day months. Neither reflects astronomical observation
/// or moon sighting. Results are exact against published tables for
/// Gregorian years 1800 through 2400; outside that range they are
/// unspecified.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarConverter {
    default_locale: Locale,
}

impl CalendarConverter {
    pub fn new(default_locale: Locale) -> Self {
        Self { default_locale }
    }

    pub fn default_locale(&self) -> Locale {
        self.default_locale
    }

    /// Convert using the configured default locale
    pub fn convert(&self, instant: DateTime<Utc>) -> CalendarDate {
        self.convert_all(instant, self.default_locale)
    }

    pub fn convert_all(&self, instant: DateTime<Utc>, locale: Locale) -> CalendarDate {
        let date = instant.date_naive();
        let (gy, gm, gd) = (i64::from(date.year()), date.month(), date.day());

        let jdn = jdn_from_gregorian(gy, gm, gd);
        let (sy, sm, sd) = solar_hijri_from_jdn(gy, jdn);
        let (ly, lm, ld) = lunar_hijri_from_jdn(jdn);

        CalendarDate {
            gregorian: day(gy, gm, gd, locale.gregorian_months()),
            solar_hijri: day(sy, sm, sd, locale.solar_hijri_months()),
            lunar_hijri: day(ly, lm, ld, locale.lunar_hijri_months()),
            weekday: locale.weekdays()[weekday_index(jdn)].to_string(),
            julian_day: jdn,
        }
    }
}

fn day(year: i64, month: u32, day: u32, months: &[&str; 12]) -> CalendarDay {
    let name = months
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or_default();

    CalendarDay {
        year,
        month,
        day,
        month_name: name.to_string(),
    }
}

/// 0 = Sunday
fn weekday_index(jdn: i64) -> usize {
    (jdn + 1).rem_euclid(7) as usize
}

/// Standard integer civil-to-JDN conversion (Fliegel & Van Flandern)
pub fn jdn_from_gregorian(year: i64, month: u32, day: u32) -> i64 {
    let month = i64::from(month);
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;

    i64::from(day) + (153 * m + 2) / 5 + 365 * y + y.div_euclid(4) - y.div_euclid(100)
        + y.div_euclid(400)
        - 32045
}

struct SolarYear {
    /// Position in the 4-year leap cycle; 0 marks a leap year
    leap: i64,
    /// March day of the Gregorian year on which the solar year begins
    march: i64,
}

// Truncating division and remainder are intentional here: the break-year
// table was derived with them and flooring shifts years before the epoch.
fn solar_year(sy: i64) -> SolarYear {
    let gy = sy + 621;
    let mut leap_solar = -14;
    let mut jp = SOLAR_HIJRI_BREAKS[0];
    let mut jump = 0;

    for &jm in &SOLAR_HIJRI_BREAKS[1..] {
        jump = jm - jp;
        if sy < jm {
            break;
        }
        leap_solar += jump / 33 * 8 + (jump % 33) / 4;
        jp = jm;
    }

    let mut n = sy - jp;
    leap_solar += n / 33 * 8 + (n % 33 + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_solar += 1;
    }

    let leap_gregorian = gy / 4 - (gy / 100 + 1) * 3 / 4 - 150;
    let march = 20 + leap_solar - leap_gregorian;

    if jump - n < 6 {
        n = n - jump + (jump + 4) / 33 * 33;
    }
    let mut leap = ((n + 1) % 33 - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    SolarYear { leap, march }
}

fn solar_hijri_from_jdn(gregorian_year: i64, jdn: i64) -> (i64, u32, u32) {
    let mut sy = gregorian_year - 621;
    let year = solar_year(sy);
    let new_year = jdn_from_gregorian(gregorian_year, 3, year.march as u32);

    let mut k = jdn - new_year;
    if k >= 0 {
        if k <= 185 {
            // First six months have 31 days
            return (sy, (1 + k / 31) as u32, (k % 31 + 1) as u32);
        }
        k -= 186;
    } else {
        // Still in the previous solar year (Dey, Bahman or Esfand)
        sy -= 1;
        k += 179;
        if year.leap == 1 {
            k += 1;
        }
    }

    (sy, (7 + k / 30) as u32, (k % 30 + 1) as u32)
}

fn lunar_hijri_to_jdn(year: i64, month: i64, day: i64) -> i64 {
    day + (59 * (month - 1) + 1).div_euclid(2)
        + (year - 1) * 354
        + (3 + 11 * year).div_euclid(30)
        + LUNAR_HIJRI_EPOCH
        - 1
}

fn ceil_div(a: i64, b: i64) -> i64 {
    -(-a).div_euclid(b)
}

fn lunar_hijri_from_jdn(jdn: i64) -> (i64, u32, u32) {
    let year = (30 * (jdn - LUNAR_HIJRI_EPOCH) + 10646).div_euclid(10631);
    // ceil((days since 29 Muharram) / 29.5) + 1
    let elapsed = jdn - (29 + lunar_hijri_to_jdn(year, 1, 1));
    let month = (ceil_div(elapsed * 2, 59) + 1).clamp(1, 12);
    let day = jdn - lunar_hijri_to_jdn(year, month, 1) + 1;

    (year, month as u32, day as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn ymd(day: &CalendarDay) -> (i64, u32, u32) {
        (day.year, day.month, day.day)
    }

    fn convert(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarConverter::default().convert_all(at(y, m, d), Locale::En)
    }

    #[test]
    fn test_jdn_reference_points() {
        assert_eq!(jdn_from_gregorian(2000, 1, 1), 2_451_545);
        assert_eq!(jdn_from_gregorian(1970, 1, 1), 2_440_588);
        assert_eq!(jdn_from_gregorian(2024, 3, 20), 2_460_390);
    }

    #[test]
    fn test_millennium_golden_vector() {
        let date = convert(2000, 1, 1);
        assert_eq!(ymd(&date.gregorian), (2000, 1, 1));
        assert_eq!(ymd(&date.solar_hijri), (1378, 10, 11));
        assert_eq!(ymd(&date.lunar_hijri), (1420, 9, 24));
        assert_eq!(date.weekday, "Saturday");
        assert_eq!(date.solar_hijri.month_name, "Dey");
        assert_eq!(date.lunar_hijri.month_name, "Ramadan");
    }

    #[test]
    fn test_solar_hijri_new_year() {
        assert_eq!(ymd(&convert(2024, 3, 20).solar_hijri), (1403, 1, 1));
        assert_eq!(ymd(&convert(2024, 3, 19).solar_hijri), (1402, 12, 29));
        assert_eq!(ymd(&convert(2023, 3, 21).solar_hijri), (1402, 1, 1));
        assert_eq!(ymd(&convert(2021, 3, 21).solar_hijri), (1400, 1, 1));
        assert_eq!(ymd(&convert(2025, 3, 21).solar_hijri), (1404, 1, 1));
    }

    #[test]
    fn test_solar_hijri_leap_year_has_thirty_days_in_esfand() {
        assert_eq!(ymd(&convert(2025, 3, 20).solar_hijri), (1403, 12, 30));
    }

    #[test]
    fn test_solar_hijri_historical_date() {
        let date = convert(1979, 2, 11);
        assert_eq!(ymd(&date.solar_hijri), (1357, 11, 22));
        assert_eq!(date.solar_hijri.month_name, "Bahman");
        assert_eq!(date.weekday, "Sunday");
    }

    #[test]
    fn test_lunar_hijri_month_starts() {
        assert_eq!(ymd(&convert(2024, 3, 11).lunar_hijri), (1445, 9, 1));
        assert_eq!(ymd(&convert(2025, 3, 1).lunar_hijri), (1446, 9, 1));
        assert_eq!(ymd(&convert(2024, 7, 8).lunar_hijri), (1446, 1, 1));
        assert_eq!(ymd(&convert(2024, 7, 7).lunar_hijri), (1445, 12, 30));
    }

    #[test]
    fn test_lunar_month_lengths_alternate() {
        for month in 1..12 {
            let length = lunar_hijri_to_jdn(1445, month + 1, 1) - lunar_hijri_to_jdn(1445, month, 1);
            let expected = if month % 2 == 1 { 30 } else { 29 };
            assert_eq!(length, expected, "month {month}");
        }
    }

    #[test]
    fn test_weekday_sequence_is_continuous() {
        let names: Vec<String> = (11..=17).map(|d| convert(2026, 10, d).weekday).collect();
        assert_eq!(
            names,
            [
                "Sunday",
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday"
            ]
        );
    }

    #[test]
    fn test_time_of_day_does_not_change_date() {
        let converter = CalendarConverter::default();
        let morning = Utc.with_ymd_and_hms(2026, 10, 17, 0, 0, 1).unwrap();
        let night = Utc.with_ymd_and_hms(2026, 10, 17, 23, 59, 59).unwrap();
        assert_eq!(
            converter.convert_all(morning, Locale::En),
            converter.convert_all(night, Locale::En)
        );
    }

    #[test]
    fn test_persian_locale_names() {
        let date = CalendarConverter::new(Locale::Fa).convert(at(2024, 3, 20));
        assert_eq!(date.solar_hijri.month_name, "فروردین");
        assert_eq!(date.weekday, "چهارشنبه");
        assert_eq!(date.lunar_hijri.month_name, "رمضان");
    }

    #[test]
    fn test_consecutive_days_never_skip_or_repeat() {
        let converter = CalendarConverter::default();
        let start = at(1990, 1, 1);
        let mut previous = converter.convert_all(start, Locale::En);

        for offset in 1..(366 * 40) {
            let current =
                converter.convert_all(start + chrono::Duration::days(offset), Locale::En);
            assert_eq!(current.julian_day, previous.julian_day + 1);

            for (prev, next) in [
                (&previous.solar_hijri, &current.solar_hijri),
                (&previous.lunar_hijri, &current.lunar_hijri),
            ] {
                let same_month = prev.year == next.year && prev.month == next.month;
                if same_month {
                    assert_eq!(next.day, prev.day + 1);
                } else {
                    assert_eq!(next.day, 1, "month rollover at jdn {}", current.julian_day);
                    assert!(prev.day >= 29);
                }
            }
            previous = current;
        }
    }
}
