use serde::{Deserialize, Serialize};

/// Name tables used when rendering a calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Locale {
    #[default]
    En,
    Fa,
}

impl From<String> for Locale {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl Locale {
    /// Parse a locale tag such as "en", "fa" or "fa-IR". Unknown tags fall back to English.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match primary.as_str() {
            "fa" | "per" | "fas" => Locale::Fa,
            _ => Locale::En,
        }
    }

    pub fn weekdays(self) -> &'static [&'static str; 7] {
        match self {
            Locale::En => &EN_WEEKDAYS,
            Locale::Fa => &FA_WEEKDAYS,
        }
    }

    pub fn gregorian_months(self) -> &'static [&'static str; 12] {
        match self {
            Locale::En => &EN_GREGORIAN_MONTHS,
            Locale::Fa => &FA_GREGORIAN_MONTHS,
        }
    }

    pub fn solar_hijri_months(self) -> &'static [&'static str; 12] {
        match self {
            Locale::En => &EN_SOLAR_HIJRI_MONTHS,
            Locale::Fa => &FA_SOLAR_HIJRI_MONTHS,
        }
    }

    pub fn lunar_hijri_months(self) -> &'static [&'static str; 12] {
        match self {
            Locale::En => &EN_LUNAR_HIJRI_MONTHS,
            Locale::Fa => &FA_LUNAR_HIJRI_MONTHS,
        }
    }
}

// Sunday first, matching (JDN + 1) mod 7
const EN_WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const FA_WEEKDAYS: [&str; 7] = [
    "یکشنبه",
    "دوشنبه",
    "سه‌شنبه",
    "چهارشنبه",
    "پنجشنبه",
    "جمعه",
    "شنبه",
];

const EN_GREGORIAN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const FA_GREGORIAN_MONTHS: [&str; 12] = [
    "ژانویه",
    "فوریه",
    "مارس",
    "آوریل",
    "مه",
    "ژوئن",
    "ژوئیه",
    "اوت",
    "سپتامبر",
    "اکتبر",
    "نوامبر",
    "دسامبر",
];

const EN_SOLAR_HIJRI_MONTHS: [&str; 12] = [
    "Farvardin",
    "Ordibehesht",
    "Khordad",
    "Tir",
    "Mordad",
    "Shahrivar",
    "Mehr",
    "Aban",
    "Azar",
    "Dey",
    "Bahman",
    "Esfand",
];

const FA_SOLAR_HIJRI_MONTHS: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

const EN_LUNAR_HIJRI_MONTHS: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi al-Awwal",
    "Rabi al-Thani",
    "Jumada al-Ula",
    "Jumada al-Akhirah",
    "Rajab",
    "Shaban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qadah",
    "Dhu al-Hijjah",
];

const FA_LUNAR_HIJRI_MONTHS: [&str; 12] = [
    "محرم",
    "صفر",
    "ربیع‌الاول",
    "ربیع‌الثانی",
    "جمادی‌الاول",
    "جمادی‌الثانی",
    "رجب",
    "شعبان",
    "رمضان",
    "شوال",
    "ذی‌القعده",
    "ذی‌الحجه",
];
