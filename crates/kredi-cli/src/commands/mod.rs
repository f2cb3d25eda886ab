pub mod args;
pub mod calendar;
pub mod plan;
