use std::sync::Arc;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use client_core::{calendar::WeekStart, load_settings, HttpFacilitatorApi, Session};
use crossbeam_channel::bounded;
use eframe::egui;
use shared::domain::{Role, UserId};
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::DashboardApp;

/// Session identity is normally handed over by the sign-in flow; here it is
/// taken from flags or the environment.
#[derive(Parser, Debug)]
#[command(about = "Facilitator dashboard")]
struct Args {
    /// Overrides the configured API origin.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long, env = "FACILITATOR_TOKEN", hide_env_values = true)]
    token: Option<String>,
    #[arg(long, env = "FACILITATOR_USER_ID")]
    user_id: Option<i64>,
    #[arg(long, env = "FACILITATOR_ROLE", default_value = "volunteer")]
    role: Role,
    #[arg(long, env = "FACILITATOR_IS_FACILITATOR", default_value_t = true)]
    facilitator: bool,
    /// Start calendar weeks on Monday instead of Sunday.
    #[arg(long)]
    monday_first: bool,
}

impl Args {
    fn session(&self) -> Session {
        Session {
            token: self.token.clone(),
            user_id: self.user_id.map(UserId),
            role: Some(self.role),
            is_facilitator: self.facilitator,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = load_settings()?;
    if let Some(api_url) = &args.api_url {
        settings = settings.with_api_url(api_url.as_str())?;
    }
    let api = HttpFacilitatorApi::new(&settings).context("failed to build http client")?;
    tracing::info!(api_url = api.api_url(), "starting facilitator dashboard");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, Arc::new(api), args.session());

    let week_start = if args.monday_first {
        WeekStart::Monday
    } else {
        WeekStart::Sunday
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Facilitator Dashboard")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([980.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Facilitator Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(cmd_tx, ui_rx, week_start)))),
    )
    .map_err(|err| anyhow!("dashboard window failed: {err}"))
}
