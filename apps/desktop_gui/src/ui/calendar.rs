use chrono::{Datelike, NaiveDate};
use client_core::calendar::{MonthView, WeekStart};
use eframe::egui;
use shared::protocol::Event;

const MARKED_FILL: egui::Color32 = egui::Color32::from_rgb(76, 110, 172);

/// Month grid with event days highlighted. Returns the clicked date, if any.
pub fn show_calendar(
    ui: &mut egui::Ui,
    month: &mut MonthView,
    week_start: WeekStart,
    selected: NaiveDate,
    events: &[Event],
) -> Option<NaiveDate> {
    let mut clicked = None;

    ui.horizontal(|ui| {
        let prev = month.prev();
        if ui
            .add_enabled(prev.is_some(), egui::Button::new("<").small())
            .clicked()
        {
            if let Some(prev) = prev {
                *month = prev;
            }
        }
        ui.label(egui::RichText::new(month.title()).strong());
        let next = month.next();
        if ui
            .add_enabled(next.is_some(), egui::Button::new(">").small())
            .clicked()
        {
            if let Some(next) = next {
                *month = next;
            }
        }
    });
    ui.add_space(4.0);

    let cells = month.cells(week_start, events);
    egui::Grid::new("event_calendar_grid")
        .num_columns(7)
        .spacing(egui::vec2(4.0, 4.0))
        .show(ui, |ui| {
            for day in week_start.header() {
                ui.weak(day);
            }
            ui.end_row();

            for (index, cell) in cells.iter().enumerate() {
                let mut text = egui::RichText::new(cell.date.day().to_string());
                if !cell.in_month {
                    text = text.weak();
                }
                let mut button = egui::Button::new(text)
                    .min_size(egui::vec2(30.0, 24.0))
                    .selected(cell.date == selected);
                if cell.marked {
                    button = button.fill(MARKED_FILL);
                }
                let response = ui.add(button);
                if response.clicked() {
                    clicked = Some(cell.date);
                }
                if cell.marked {
                    response.on_hover_text("Has events");
                }
                if index % 7 == 6 {
                    ui.end_row();
                }
            }
        });

    clicked
}
