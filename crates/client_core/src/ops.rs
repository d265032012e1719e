//! One-shot execution of dashboard requests against a [`FacilitatorApi`].

use shared::{
    domain::{EventId, SchoolId},
    protocol::{Event, Facilitator, NewEvent, NewParent, NewVolunteer, VolunteerProvisioning},
};
use tracing::{error, info, warn};

use crate::{
    api::FacilitatorApi,
    error::ApiFailure,
    session::{Credentials, Session},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardRequest {
    Load,
    CreateEvent(NewEvent),
    UpdateEvent(Event),
    DeleteEvent(EventId),
    CreateParent(NewParent),
    CreateVolunteer {
        draft: NewVolunteer,
        school_id: Option<SchoolId>,
    },
}

impl DashboardRequest {
    pub fn operation(&self) -> Operation {
        match self {
            Self::Load => Operation::Load,
            Self::CreateEvent(_) => Operation::CreateEvent,
            Self::UpdateEvent(_) => Operation::UpdateEvent,
            Self::DeleteEvent(_) => Operation::DeleteEvent,
            Self::CreateParent(_) => Operation::CreateParent,
            Self::CreateVolunteer { .. } => Operation::CreateVolunteer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    CreateEvent,
    UpdateEvent,
    DeleteEvent,
    CreateParent,
    CreateVolunteer,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::CreateEvent => "create_event",
            Self::UpdateEvent => "update_event",
            Self::DeleteEvent => "delete_event",
            Self::CreateParent => "create_parent",
            Self::CreateVolunteer => "create_volunteer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardOutcome {
    Loaded {
        facilitator: Facilitator,
        events: Vec<Event>,
    },
    EventCreated(Event),
    EventUpdated(Event),
    EventDeleted(EventId),
    ParentCreated,
    VolunteerCreated,
    /// The server answered with a non-success status.
    Rejected {
        operation: Operation,
        status: u16,
    },
    /// The request never produced a usable response.
    Failed {
        operation: Operation,
        message: String,
    },
    /// A precondition failed locally and no request was sent.
    Skipped { operation: Operation },
}

/// Loads profile and events for the session's facilitator. Returns `None`
/// without touching the network when the session is not a facilitator's.
pub async fn load_dashboard(
    api: &dyn FacilitatorApi,
    session: &Session,
) -> Option<DashboardOutcome> {
    let creds = session.facilitator_credentials()?;
    Some(execute(api, &creds, DashboardRequest::Load).await)
}

pub async fn execute(
    api: &dyn FacilitatorApi,
    creds: &Credentials,
    request: DashboardRequest,
) -> DashboardOutcome {
    let operation = request.operation();

    let result = match request {
        DashboardRequest::Load => load(api, creds).await,
        DashboardRequest::CreateEvent(draft) => api
            .create_event(creds, &draft)
            .await
            .map(DashboardOutcome::EventCreated),
        DashboardRequest::UpdateEvent(event) => {
            if event.id.0 <= 0 {
                error!(event_id = event.id.0, "refusing to update event without an id");
                return DashboardOutcome::Skipped { operation };
            }
            info!(event_id = event.id.0, "updating event");
            api.update_event(creds, &event)
                .await
                .map(DashboardOutcome::EventUpdated)
        }
        DashboardRequest::DeleteEvent(id) => api
            .delete_event(creds, id)
            .await
            .map(|()| DashboardOutcome::EventDeleted(id)),
        DashboardRequest::CreateParent(draft) => api
            .create_parent(creds, &draft)
            .await
            .map(|()| DashboardOutcome::ParentCreated),
        DashboardRequest::CreateVolunteer { draft, school_id } => {
            let body = VolunteerProvisioning::new(draft, school_id);
            api.create_volunteer(creds, &body)
                .await
                .map(|()| DashboardOutcome::VolunteerCreated)
        }
    };

    match result {
        Ok(outcome) => {
            info!(operation = operation.name(), "request succeeded");
            outcome
        }
        Err(failure) => failure_outcome(operation, failure),
    }
}

async fn load(api: &dyn FacilitatorApi, creds: &Credentials) -> Result<DashboardOutcome, ApiFailure> {
    let facilitator = api.fetch_profile(creds).await?;
    let events = api.list_events(creds).await?;
    Ok(DashboardOutcome::Loaded {
        facilitator,
        events,
    })
}

fn failure_outcome(operation: Operation, failure: ApiFailure) -> DashboardOutcome {
    match failure {
        ApiFailure::Status { status, body } => {
            warn!(operation = operation.name(), status, body = %body, "request rejected");
            if operation == Operation::Load {
                // A rejected load leaves the dashboard loading, like any other load failure.
                return DashboardOutcome::Failed {
                    operation,
                    message: format!("status {status}: {body}"),
                };
            }
            DashboardOutcome::Rejected { operation, status }
        }
        other => {
            error!(operation = operation.name(), error = %other, "request failed");
            DashboardOutcome::Failed {
                operation,
                message: other.to_string(),
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/ops_tests.rs"]
mod tests;
