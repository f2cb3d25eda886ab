pub mod format;
pub mod layout;

pub use format::{format_date, format_money, format_number, format_percent, NumberStyle};
pub use layout::{
    calendar_table, schedule_report, schedule_table, summary_table, ReportTable, ScheduleReport,
    CALENDAR_HEADERS, SCHEDULE_HEADERS,
};
