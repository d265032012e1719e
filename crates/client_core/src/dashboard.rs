//! Client-side dashboard state and the transitions driven by user actions and
//! request outcomes.

use std::collections::VecDeque;

use chrono::NaiveDate;
use shared::{
    domain::EventId,
    protocol::{Event, Facilitator, NewEvent, NewParent, NewVolunteer, PLACEHOLDER_PASSWORD},
};
use tracing::warn;

use crate::{
    drafts::{Draft, EventField, ParentField, VolunteerField},
    ops::{DashboardOutcome, DashboardRequest, Operation},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Ready(Facilitator),
}

/// Ordered client copy of the facilitator's events. Order is the server's,
/// with created events appended; ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCache {
    events: Vec<Event>,
}

impl EventCache {
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn replace_all(&mut self, events: Vec<Event>) {
        self.events.clear();
        for event in events {
            if self.get(event.id).is_some() {
                warn!(event_id = event.id.0, "dropping duplicate event id from server");
                continue;
            }
            self.events.push(event);
        }
    }

    pub fn append(&mut self, event: Event) {
        if let Some(existing) = self.events.iter_mut().find(|e| e.id == event.id) {
            *existing = event;
        } else {
            self.events.push(event);
        }
    }

    pub fn remove(&mut self, id: EventId) -> bool {
        let before = self.events.len();
        self.events.retain(|event| event.id != id);
        before != self.events.len()
    }

    pub fn replace(&mut self, updated: Event) -> bool {
        match self.events.iter_mut().find(|event| event.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.events
            .iter()
            .any(|event| event.calendar_date().ok() == Some(date))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    AddEvent,
    AddParent,
    AddVolunteer,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Panels {
    pub add_event: bool,
    pub add_parent: bool,
    pub add_volunteer: bool,
}

impl Panels {
    pub fn is_open(&self, panel: Panel) -> bool {
        match panel {
            Panel::AddEvent => self.add_event,
            Panel::AddParent => self.add_parent,
            Panel::AddVolunteer => self.add_volunteer,
        }
    }

    fn toggle(&mut self, panel: Panel) {
        let flag = match panel {
            Panel::AddEvent => &mut self.add_event,
            Panel::AddParent => &mut self.add_parent,
            Panel::AddVolunteer => &mut self.add_volunteer,
        };
        *flag = !*flag;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Info,
    Error,
}

/// Message the user has to acknowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Info,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: NoticeSeverity::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub phase: LoadPhase,
    pub events: EventCache,
    pub expanded: Option<EventId>,
    pub editing: Option<Event>,
    pub panels: Panels,
    pub new_event: NewEvent,
    pub new_parent: NewParent,
    pub new_volunteer: NewVolunteer,
    pub selected_date: NaiveDate,
    notices: VecDeque<Notice>,
}

impl DashboardState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            phase: LoadPhase::Loading,
            events: EventCache::default(),
            expanded: None,
            editing: None,
            panels: Panels::default(),
            new_event: NewEvent::default(),
            new_parent: NewParent::default(),
            new_volunteer: NewVolunteer::default(),
            selected_date: today,
            notices: VecDeque::new(),
        }
    }

    pub fn facilitator(&self) -> Option<&Facilitator> {
        match &self.phase {
            LoadPhase::Ready(facilitator) => Some(facilitator),
            LoadPhase::Loading => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn toggle_expand(&mut self, id: EventId) {
        self.expanded = if self.expanded == Some(id) { None } else { Some(id) };
    }

    pub fn is_expanded(&self, id: EventId) -> bool {
        self.expanded == Some(id)
    }

    pub fn toggle_panel(&mut self, panel: Panel) {
        self.panels.toggle(panel);
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
    }

    /// Copies the cached event into the edit draft. Local only.
    pub fn begin_edit(&mut self, id: EventId) -> bool {
        match self.events.get(id) {
            Some(event) => {
                self.editing = Some(event.clone());
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn set_editing_field(&mut self, field: EventField, value: String) {
        if let Some(draft) = self.editing.take() {
            self.editing = Some(draft.with_field(field, value));
        }
    }

    pub fn set_new_event_field(&mut self, field: EventField, value: String) {
        self.new_event = std::mem::take(&mut self.new_event).with_field(field, value);
    }

    pub fn set_new_parent_field(&mut self, field: ParentField, value: String) {
        self.new_parent = std::mem::take(&mut self.new_parent).with_field(field, value);
    }

    pub fn set_new_volunteer_field(&mut self, field: VolunteerField, value: String) {
        self.new_volunteer = std::mem::take(&mut self.new_volunteer).with_field(field, value);
    }

    pub fn submit_new_event(&mut self) -> Option<DashboardRequest> {
        let draft = self.new_event.clone();
        self.require_complete(&draft)?;
        Some(DashboardRequest::CreateEvent(draft))
    }

    pub fn submit_edit(&mut self) -> Option<DashboardRequest> {
        let draft = self.editing.clone()?;
        self.require_complete(&draft)?;
        Some(DashboardRequest::UpdateEvent(draft))
    }

    pub fn request_delete(&self, id: EventId) -> DashboardRequest {
        DashboardRequest::DeleteEvent(id)
    }

    pub fn submit_new_parent(&mut self) -> Option<DashboardRequest> {
        let draft = self.new_parent.clone();
        self.require_complete(&draft)?;
        Some(DashboardRequest::CreateParent(draft))
    }

    /// Volunteers inherit the facilitator's school, so the profile must be loaded.
    pub fn submit_new_volunteer(&mut self) -> Option<DashboardRequest> {
        let school_id = self.facilitator()?.school_id;
        let draft = self.new_volunteer.clone();
        self.require_complete(&draft)?;
        Some(DashboardRequest::CreateVolunteer { draft, school_id })
    }

    fn require_complete<D: Draft>(&mut self, draft: &D) -> Option<()> {
        match draft.submit_problem() {
            None => Some(()),
            Some(problem) => {
                self.notices.push_back(Notice::error(problem));
                None
            }
        }
    }

    pub fn apply(&mut self, outcome: DashboardOutcome) {
        match outcome {
            DashboardOutcome::Loaded {
                facilitator,
                events,
            } => {
                self.phase = LoadPhase::Ready(facilitator);
                self.events.replace_all(events);
                if self.expanded.is_some_and(|id| self.events.get(id).is_none()) {
                    self.expanded = None;
                }
            }
            DashboardOutcome::EventCreated(event) => {
                self.events.append(event);
                self.new_event = NewEvent::default();
                self.notices.push_back(Notice::info("Event created!"));
            }
            DashboardOutcome::EventUpdated(event) => {
                if !self.events.replace(event.clone()) {
                    warn!(event_id = event.id.0, "updated event is not in the cached list");
                }
                self.editing = None;
                self.notices.push_back(Notice::info("Event updated!"));
            }
            DashboardOutcome::EventDeleted(id) => {
                self.events.remove(id);
                if self.expanded == Some(id) {
                    self.expanded = None;
                }
                if self.editing.as_ref().is_some_and(|draft| draft.id == id) {
                    self.editing = None;
                }
            }
            DashboardOutcome::ParentCreated => {
                self.new_parent = NewParent::default();
                self.notices.push_back(Notice::info(format!(
                    "Parent created! (Password auto-set to '{PLACEHOLDER_PASSWORD}')"
                )));
            }
            DashboardOutcome::VolunteerCreated => {
                self.new_volunteer = NewVolunteer::default();
                self.notices.push_back(Notice::info(format!(
                    "Volunteer created! (Password auto-set to '{PLACEHOLDER_PASSWORD}')"
                )));
            }
            DashboardOutcome::Rejected { operation, .. } => {
                if let Some(message) = rejection_message(operation) {
                    self.notices.push_back(Notice::error(message));
                }
            }
            // Logged where the request ran; nothing to show.
            DashboardOutcome::Failed { .. } | DashboardOutcome::Skipped { .. } => {}
        }
    }

    pub fn next_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notices.pop_front()
    }
}

fn rejection_message(operation: Operation) -> Option<&'static str> {
    match operation {
        Operation::Load => None,
        Operation::CreateEvent => Some("Failed to create event."),
        Operation::UpdateEvent => Some("Failed to update event."),
        Operation::DeleteEvent => Some("Failed to delete event."),
        Operation::CreateParent => Some("Failed to create parent."),
        Operation::CreateVolunteer => Some("Failed to create volunteer."),
    }
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
