use chrono::Local;
use client_core::{
    calendar::{MonthView, WeekStart},
    DashboardOutcome, DashboardRequest, DashboardState, NoticeSeverity,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{domain::EventId, protocol::Event};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiError, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::{calendar::show_calendar, forms};

const ERROR_FILL: egui::Color32 = egui::Color32::from_rgb(111, 53, 53);
const ERROR_STROKE: egui::Color32 = egui::Color32::from_rgb(175, 96, 96);

enum CardAction {
    Toggle(EventId),
    Delete(EventId),
    Edit(EventId),
}

pub struct DashboardApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    state: DashboardState,
    month: Option<MonthView>,
    week_start: WeekStart,
    status: String,
    last_error: Option<UiError>,
}

impl DashboardApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        week_start: WeekStart,
    ) -> Self {
        let today = Local::now().date_naive();
        let mut app = Self {
            cmd_tx,
            ui_rx,
            state: DashboardState::new(today),
            month: MonthView::containing(today),
            week_start,
            status: "Starting backend worker...".to_string(),
            last_error: None,
        };
        // Without a facilitator session the worker drops this without a request.
        app.submit(DashboardRequest::Load);
        app
    }

    fn submit(&mut self, request: DashboardRequest) {
        if let Err(err) = dispatch_backend_command(&self.cmd_tx, BackendCommand::Execute(request))
        {
            self.status = err.message().to_string();
            self.last_error = Some(err);
        }
    }

    fn submit_opt(&mut self, request: Option<DashboardRequest>) {
        if let Some(request) = request {
            self.submit(request);
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => {
                    tracing::error!(context = ?err.context(), "{}", err.message());
                    self.status = err.message().to_string();
                    self.last_error = Some(err);
                }
                UiEvent::Outcome(outcome) => {
                    if matches!(outcome, DashboardOutcome::Loaded { .. }) {
                        self.status = "Dashboard loaded".to_string();
                    }
                    self.state.apply(outcome);
                }
            }
        }
    }

    fn show_error_banner(&mut self, ui: &mut egui::Ui) {
        let Some(err) = self.last_error.clone() else {
            return;
        };
        egui::Frame::NONE
            .fill(ERROR_FILL)
            .stroke(egui::Stroke::new(1.0, ERROR_STROKE))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "{}: {}",
                            err_label(err.category()),
                            err.message()
                        ))
                        .color(egui::Color32::WHITE),
                    );
                    if err.requires_reauth() {
                        ui.label(
                            egui::RichText::new("Sign in again to continue.")
                                .color(egui::Color32::WHITE),
                        );
                    }
                    if ui.button("Dismiss").clicked() {
                        self.last_error = None;
                    }
                });
            });
    }

    fn show_loading_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(40.0);
            ui.vertical_centered(|ui| {
                ui.spinner();
                ui.label("Loading facilitator dashboard...");
                ui.small(egui::RichText::new(&self.status).weak());
            });
            ui.add_space(12.0);
            self.show_error_banner(ui);
        });
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.state.next_notice().cloned() else {
            return;
        };
        let title = match notice.severity {
            NoticeSeverity::Info => "Notice",
            NoticeSeverity::Error => "Something went wrong",
        };
        egui::Window::new(title)
            .id(egui::Id::new("dashboard_notice"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(&notice.message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    self.state.dismiss_notice();
                }
            });
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("facilitator_profile").show(ctx, |ui| {
            ui.add_space(6.0);
            if let Some(facilitator) = self.state.facilitator() {
                ui.heading(format!("Welcome, {}", facilitator.display_name()));
                ui.weak(&facilitator.email);
            }
            ui.add_space(4.0);
            self.show_error_banner(ui);
        });
    }

    fn show_calendar_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("calendar_panel")
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("Event Calendar");
                ui.add_space(6.0);
                match self.month.as_mut() {
                    Some(month) => {
                        if let Some(date) = show_calendar(
                            ui,
                            month,
                            self.week_start,
                            self.state.selected_date,
                            self.state.events.events(),
                        ) {
                            self.state.select_date(date);
                        }
                    }
                    None => {
                        ui.weak("Today's month is outside the supported date range.");
                    }
                }

                ui.add_space(10.0);
                ui.label(
                    egui::RichText::new(self.state.selected_date.format("%A, %B %-d").to_string())
                        .strong(),
                );
                let selected = self.state.selected_date;
                let on_day: Vec<&Event> = self
                    .state
                    .events
                    .events()
                    .iter()
                    .filter(|event| event.calendar_date().ok() == Some(selected))
                    .collect();
                if on_day.is_empty() {
                    ui.weak("No events");
                }
                for event in on_day {
                    ui.label(format!("{} ({} - {})", event.title, event.start_time, event.end_time));
                }
            });
    }

    fn show_admin_panel(&mut self, ctx: &egui::Context) {
        let mut requests = Vec::new();
        egui::SidePanel::right("admin_actions")
            .default_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    requests.push(forms::add_event_panel(ui, &mut self.state));
                    ui.add_space(8.0);
                    requests.push(forms::add_parent_panel(ui, &mut self.state));
                    ui.add_space(8.0);
                    requests.push(forms::add_volunteer_panel(ui, &mut self.state));
                });
            });
        for request in requests {
            self.submit_opt(request);
        }
    }

    fn show_event_grid(&mut self, ctx: &egui::Context) {
        let mut actions = Vec::new();
        let mut update = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("All Events");
            ui.add_space(6.0);
            egui::ScrollArea::vertical().show(ui, |ui| {
                update = forms::edit_event_form(ui, &mut self.state);
                for event in self.state.events.events() {
                    self.show_event_card(ui, event, &mut actions);
                }
            });
        });

        self.submit_opt(update);
        for action in actions {
            match action {
                CardAction::Toggle(id) => self.state.toggle_expand(id),
                CardAction::Edit(id) => {
                    self.state.begin_edit(id);
                }
                CardAction::Delete(id) => {
                    let request = self.state.request_delete(id);
                    self.submit(request);
                }
            }
        }
    }

    fn show_event_card(&self, ui: &mut egui::Ui, event: &Event, actions: &mut Vec<CardAction>) {
        let expanded = self.state.is_expanded(event.id);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            let chevron = if expanded { "⏶" } else { "⏷" };
            let header = egui::Button::new(
                egui::RichText::new(format!("{}  {chevron}", event.title)).strong(),
            )
            .frame(false);
            if ui.add(header).clicked() {
                actions.push(CardAction::Toggle(event.id));
            }
            ui.weak(&event.kind);
            ui.label(format!("Start: {}", event.start_location));

            if expanded {
                ui.separator();
                ui.label(format!("Date: {}", event.date));
                ui.label(format!("Time: {} – {}", event.start_time, event.end_time));
                ui.label(format!("End: {}", event.end_location));
                ui.horizontal(|ui| {
                    if ui.button("Delete Event").clicked() {
                        actions.push(CardAction::Delete(event.id));
                    }
                    if ui.button("Edit Event").clicked() {
                        actions.push(CardAction::Edit(event.id));
                    }
                });
            }
        });
        ui.add_space(6.0);
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        if self.state.is_loading() {
            self.show_loading_screen(ctx);
        } else {
            self.show_header(ctx);
            self.show_calendar_panel(ctx);
            self.show_admin_panel(ctx);
            self.show_event_grid(ctx);
        }
        self.show_notice(ctx);

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

impl Drop for DashboardApp {
    fn drop(&mut self) {
        let _ = self.cmd_tx.try_send(BackendCommand::Shutdown);
    }
}
