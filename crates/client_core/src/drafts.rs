//! Form drafts as immutable values: every field change yields a new draft.

use shared::protocol::{Event, NewEvent, NewParent, NewVolunteer};

pub trait Draft: Clone {
    type Field: Copy;

    fn with_field(self, field: Self::Field, value: String) -> Self;

    /// Labels of required fields that are still blank.
    fn missing_required(&self) -> Vec<&'static str>;

    /// Filled-in fields whose value is unusable, as user-facing messages.
    fn malformed_fields(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Why the draft cannot be submitted yet, if anything.
    fn submit_problem(&self) -> Option<String> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Some(format!("Please fill in: {}", missing.join(", ")));
        }
        let malformed = self.malformed_fields();
        (!malformed.is_empty()).then(|| malformed.join(" "))
    }
}

pub const INVALID_EMAIL_MESSAGE: &str = "Email must contain '@'.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventField {
    Title,
    Kind,
    StartLocation,
    EndLocation,
    Date,
    StartTime,
    EndTime,
}

impl EventField {
    pub const ALL: [EventField; 7] = [
        Self::Title,
        Self::Kind,
        Self::StartLocation,
        Self::EndLocation,
        Self::Date,
        Self::StartTime,
        Self::EndTime,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Kind => "Type",
            Self::StartLocation => "Start Location",
            Self::EndLocation => "End Location",
            Self::Date => "Event Date",
            Self::StartTime => "Start Time",
            Self::EndTime => "End Time",
        }
    }
}

fn blank_labels<'a>(fields: impl IntoIterator<Item = (&'static str, &'a str)>) -> Vec<&'static str> {
    fields
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect()
}

impl Draft for NewEvent {
    type Field = EventField;

    fn with_field(self, field: EventField, value: String) -> Self {
        match field {
            EventField::Title => Self { title: value, ..self },
            EventField::Kind => Self { kind: value, ..self },
            EventField::StartLocation => Self {
                start_location: value,
                ..self
            },
            EventField::EndLocation => Self {
                end_location: value,
                ..self
            },
            EventField::Date => Self { date: value, ..self },
            EventField::StartTime => Self {
                start_time: value,
                ..self
            },
            EventField::EndTime => Self {
                end_time: value,
                ..self
            },
        }
    }

    fn missing_required(&self) -> Vec<&'static str> {
        blank_labels(
            EventField::ALL
                .into_iter()
                .map(|field| (field.label(), new_event_value(self, field))),
        )
    }
}

pub fn new_event_value(draft: &NewEvent, field: EventField) -> &str {
    match field {
        EventField::Title => &draft.title,
        EventField::Kind => &draft.kind,
        EventField::StartLocation => &draft.start_location,
        EventField::EndLocation => &draft.end_location,
        EventField::Date => &draft.date,
        EventField::StartTime => &draft.start_time,
        EventField::EndTime => &draft.end_time,
    }
}

pub fn event_value(event: &Event, field: EventField) -> &str {
    match field {
        EventField::Title => &event.title,
        EventField::Kind => &event.kind,
        EventField::StartLocation => &event.start_location,
        EventField::EndLocation => &event.end_location,
        EventField::Date => &event.date,
        EventField::StartTime => &event.start_time,
        EventField::EndTime => &event.end_time,
    }
}

/// The edit form has no required markers, so nothing is reported missing.
impl Draft for Event {
    type Field = EventField;

    fn with_field(self, field: EventField, value: String) -> Self {
        match field {
            EventField::Title => Self { title: value, ..self },
            EventField::Kind => Self { kind: value, ..self },
            EventField::StartLocation => Self {
                start_location: value,
                ..self
            },
            EventField::EndLocation => Self {
                end_location: value,
                ..self
            },
            EventField::Date => Self { date: value, ..self },
            EventField::StartTime => Self {
                start_time: value,
                ..self
            },
            EventField::EndTime => Self {
                end_time: value,
                ..self
            },
        }
    }

    fn missing_required(&self) -> Vec<&'static str> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentField {
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
}

impl ParentField {
    pub const ALL: [ParentField; 5] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::Address,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Email => "Email",
            Self::Phone => "Phone Number",
            Self::Address => "Home Address",
        }
    }

    pub fn value(self, draft: &NewParent) -> &str {
        match self {
            Self::FirstName => &draft.first_name,
            Self::LastName => &draft.last_name,
            Self::Email => &draft.email,
            Self::Phone => &draft.phone,
            Self::Address => &draft.address,
        }
    }
}

impl Draft for NewParent {
    type Field = ParentField;

    fn with_field(self, field: ParentField, value: String) -> Self {
        match field {
            ParentField::FirstName => Self {
                first_name: value,
                ..self
            },
            ParentField::LastName => Self {
                last_name: value,
                ..self
            },
            ParentField::Email => Self { email: value, ..self },
            ParentField::Phone => Self { phone: value, ..self },
            ParentField::Address => Self {
                address: value,
                ..self
            },
        }
    }

    fn missing_required(&self) -> Vec<&'static str> {
        blank_labels(
            ParentField::ALL
                .into_iter()
                .map(|field| (field.label(), field.value(self))),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolunteerField {
    FirstName,
    LastName,
    Birthdate,
    Email,
    Phone,
    Interest,
    PreferredSchool,
}

impl VolunteerField {
    pub const ALL: [VolunteerField; 7] = [
        Self::FirstName,
        Self::LastName,
        Self::Birthdate,
        Self::Email,
        Self::Phone,
        Self::Interest,
        Self::PreferredSchool,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Birthdate => "Birthdate (YYYY-MM-DD Format)",
            Self::Email => "Email",
            Self::Phone => "Phone Number",
            Self::Interest => "Interest",
            Self::PreferredSchool => "Preferred School",
        }
    }

    pub fn value(self, draft: &NewVolunteer) -> &str {
        match self {
            Self::FirstName => &draft.first_name,
            Self::LastName => &draft.last_name,
            Self::Birthdate => &draft.birthdate,
            Self::Email => &draft.email,
            Self::Phone => &draft.phone,
            Self::Interest => &draft.interest,
            Self::PreferredSchool => &draft.preferred_school,
        }
    }
}

impl Draft for NewVolunteer {
    type Field = VolunteerField;

    fn with_field(self, field: VolunteerField, value: String) -> Self {
        match field {
            VolunteerField::FirstName => Self {
                first_name: value,
                ..self
            },
            VolunteerField::LastName => Self {
                last_name: value,
                ..self
            },
            VolunteerField::Birthdate => Self {
                birthdate: value,
                ..self
            },
            VolunteerField::Email => Self { email: value, ..self },
            VolunteerField::Phone => Self { phone: value, ..self },
            VolunteerField::Interest => Self {
                interest: value,
                ..self
            },
            VolunteerField::PreferredSchool => Self {
                preferred_school: value,
                ..self
            },
        }
    }

    fn missing_required(&self) -> Vec<&'static str> {
        blank_labels(
            VolunteerField::ALL
                .into_iter()
                .map(|field| (field.label(), field.value(self))),
        )
    }

    fn malformed_fields(&self) -> Vec<&'static str> {
        if !self.email.trim().is_empty() && !self.email.contains('@') {
            vec![INVALID_EMAIL_MESSAGE]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::EventId;

    #[test]
    fn with_field_replaces_only_the_named_field() {
        let draft = NewEvent::default()
            .with_field(EventField::Title, "Ride".into())
            .with_field(EventField::Date, "2024-05-10".into());
        assert_eq!(draft.title, "Ride");
        assert_eq!(draft.date, "2024-05-10");
        assert_eq!(draft.kind, "");
    }

    #[test]
    fn empty_event_draft_reports_every_required_field() {
        assert_eq!(NewEvent::default().missing_required().len(), 7);
        let almost = NewEvent {
            title: "t".into(),
            kind: "k".into(),
            start_location: "a".into(),
            end_location: "b".into(),
            date: "2024-05-10".into(),
            start_time: "09:00".into(),
            end_time: "   ".into(),
        };
        assert_eq!(almost.missing_required(), vec!["End Time"]);
    }

    #[test]
    fn edit_draft_keeps_id_when_fields_change() {
        let event = Event {
            id: EventId(9),
            title: "Old".into(),
            kind: String::new(),
            start_location: String::new(),
            end_location: String::new(),
            date: String::new(),
            start_time: String::new(),
            end_time: String::new(),
        };
        let edited = event.with_field(EventField::Title, "New".into());
        assert_eq!(edited.id, EventId(9));
        assert_eq!(event_value(&edited, EventField::Title), "New");
    }

    #[test]
    fn volunteer_email_must_look_like_an_address() {
        let draft = VolunteerField::ALL
            .into_iter()
            .fold(NewVolunteer::default(), |draft, field| {
                draft.with_field(field, "x".into())
            });
        assert!(draft.missing_required().is_empty());
        assert_eq!(draft.malformed_fields(), vec![INVALID_EMAIL_MESSAGE]);
        assert_eq!(draft.submit_problem().as_deref(), Some(INVALID_EMAIL_MESSAGE));

        let draft = draft.with_field(VolunteerField::Email, "x@example.org".into());
        assert!(draft.malformed_fields().is_empty());
        assert_eq!(draft.submit_problem(), None);
    }

    #[test]
    fn blank_fields_are_reported_before_malformed_ones() {
        let draft = NewVolunteer {
            email: "not-an-address".into(),
            ..NewVolunteer::default()
        };
        let problem = draft.submit_problem().expect("problem");
        assert!(problem.starts_with("Please fill in: First Name"));
        assert!(!problem.contains("Email"));
    }

    #[test]
    fn parent_draft_keeps_waiver_across_edits() {
        let draft = NewParent::default().with_field(ParentField::Address, "1 Main St".into());
        assert!(draft.waiver);
        assert_eq!(ParentField::Address.value(&draft), "1 Main St");
    }
}
