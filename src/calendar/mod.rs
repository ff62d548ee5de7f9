//! 日历层：数据模型、CalendarApi trait 与 Google Calendar v3 客户端、动作执行器

pub mod client;
pub mod executor;
pub mod mock;
pub mod types;

pub use client::{CalendarApi, CalendarError, GoogleCalendarClient};
pub use executor::CalendarExecutor;
pub use mock::MockCalendarApi;
pub use types::{
    CalendarEventResult, DeleteEventRequest, EventCreateRequest, EventDateTime, EventUpdateRequest,
    FindEventRequest,
};
