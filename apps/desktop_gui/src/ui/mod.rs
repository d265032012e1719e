//! UI layer for the dashboard: app shell, calendar, and forms.

pub mod app;
mod calendar;
mod forms;

pub use app::DashboardApp;
