//! Backend commands queued from UI to backend worker.

use client_core::DashboardRequest;

pub enum BackendCommand {
    Execute(DashboardRequest),
    Shutdown,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Execute(request) => request.operation().name(),
            Self::Shutdown => "shutdown",
        }
    }
}
