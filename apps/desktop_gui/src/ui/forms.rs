use client_core::{
    dashboard::{DashboardState, Panel},
    drafts::{event_value, new_event_value, EventField, ParentField, VolunteerField},
    DashboardRequest,
};
use eframe::egui;
use shared::protocol::{normalize_calendar_date, SCHOOL_OPTIONS};

/// Text input bound to a draft value; yields the new text when edited.
fn field_input(ui: &mut egui::Ui, hint: &str, current: &str) -> Option<String> {
    let mut value = current.to_string();
    let response = ui.add(
        egui::TextEdit::singleline(&mut value)
            .hint_text(hint)
            .desired_width(f32::INFINITY),
    );
    response.changed().then_some(value)
}

fn panel_header(ui: &mut egui::Ui, title: &str, open: bool) -> bool {
    let chevron = if open { "⏶" } else { "⏷" };
    ui.add(
        egui::Button::new(egui::RichText::new(format!("{title}  {chevron}")).strong())
            .frame(false),
    )
    .clicked()
}

fn submit_button(ui: &mut egui::Ui, label: &str) -> bool {
    ui.add(egui::Button::new(label).min_size(egui::vec2(ui.available_width(), 28.0)))
        .clicked()
}

pub fn edit_event_form(ui: &mut egui::Ui, state: &mut DashboardState) -> Option<DashboardRequest> {
    let draft = state.editing.clone()?;
    let mut request = None;

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.heading("Edit Event");
        for field in EventField::ALL {
            let shown = match field {
                EventField::Date => normalize_calendar_date(&draft.date)
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|_| draft.date.clone()),
                _ => event_value(&draft, field).to_string(),
            };
            if let Some(value) = field_input(ui, field.label(), &shown) {
                state.set_editing_field(field, value);
            }
        }
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                request = state.submit_edit();
            }
            if ui.button("Cancel").clicked() {
                state.cancel_edit();
            }
        });
    });

    request
}

pub fn add_event_panel(ui: &mut egui::Ui, state: &mut DashboardState) -> Option<DashboardRequest> {
    let mut request = None;
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        if panel_header(ui, "Add Event", state.panels.add_event) {
            state.toggle_panel(Panel::AddEvent);
        }
        if !state.panels.add_event {
            return;
        }
        for field in EventField::ALL {
            let current = new_event_value(&state.new_event, field).to_string();
            if let Some(value) = field_input(ui, field.label(), &current) {
                state.set_new_event_field(field, value);
            }
        }
        if submit_button(ui, "Add Event") {
            request = state.submit_new_event();
        }
    });
    request
}

pub fn add_parent_panel(ui: &mut egui::Ui, state: &mut DashboardState) -> Option<DashboardRequest> {
    let mut request = None;
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        if panel_header(ui, "Add Parent", state.panels.add_parent) {
            state.toggle_panel(Panel::AddParent);
        }
        if !state.panels.add_parent {
            return;
        }
        for field in ParentField::ALL {
            let current = field.value(&state.new_parent).to_string();
            if let Some(value) = field_input(ui, field.label(), &current) {
                state.set_new_parent_field(field, value);
            }
        }
        if submit_button(ui, "Add Parent") {
            request = state.submit_new_parent();
        }
    });
    request
}

pub fn add_volunteer_panel(
    ui: &mut egui::Ui,
    state: &mut DashboardState,
) -> Option<DashboardRequest> {
    let mut request = None;
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        if panel_header(ui, "Add Volunteer", state.panels.add_volunteer) {
            state.toggle_panel(Panel::AddVolunteer);
        }
        if !state.panels.add_volunteer {
            return;
        }
        for field in VolunteerField::ALL {
            if field == VolunteerField::PreferredSchool {
                continue;
            }
            let current = field.value(&state.new_volunteer).to_string();
            if let Some(value) = field_input(ui, field.label(), &current) {
                state.set_new_volunteer_field(field, value);
            }
        }

        let mut school = state.new_volunteer.preferred_school.clone();
        let selected_text = if school.is_empty() {
            VolunteerField::PreferredSchool.label().to_string()
        } else {
            school.clone()
        };
        egui::ComboBox::from_id_salt("preferred_school")
            .width(ui.available_width())
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for option in SCHOOL_OPTIONS {
                    ui.selectable_value(&mut school, option.to_string(), option);
                }
            });
        if school != state.new_volunteer.preferred_school {
            state.set_new_volunteer_field(VolunteerField::PreferredSchool, school);
        }

        if submit_button(ui, "Add Volunteer") {
            request = state.submit_new_volunteer();
        }
    });
    request
}
