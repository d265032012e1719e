pub mod api;
pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod drafts;
pub mod error;
pub mod ops;
pub mod session;

pub use api::{ApiResult, FacilitatorApi, HttpFacilitatorApi};
pub use calendar::{CalendarCell, MonthView, WeekStart};
pub use config::{load_settings, ClientSettings};
pub use dashboard::{DashboardState, LoadPhase, Notice, NoticeSeverity, Panel};
pub use error::ApiFailure;
pub use ops::{execute, load_dashboard, DashboardOutcome, DashboardRequest, Operation};
pub use session::{Credentials, Session};
