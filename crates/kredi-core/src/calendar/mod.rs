pub mod holidays;
pub mod schedule;

pub use holidays::{BusinessCalendar, HolidayCalendar, HolidayCalendarKind};
pub use schedule::{
    generate_payment_calendar, CalendarEntry, CalendarRequest, PaymentCalendar, MAX_INSTALLMENTS,
};
