mod converter;
mod names;

pub use converter::{CalendarConverter, CalendarDate, CalendarDay};
pub use names::Locale;
