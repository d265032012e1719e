//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{execute, FacilitatorApi, Session};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Spawns the worker thread. Each request runs as its own task; requests are
/// neither ordered nor de-duplicated against each other.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    api: Arc<dyn FacilitatorApi>,
    session: Session,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));
            let credentials = session.facilitator_credentials();
            if credentials.is_none() {
                tracing::info!(?session, "session is not a facilitator's; requests will be skipped");
            }

            while let Ok(cmd) = cmd_rx.recv() {
                let request = match cmd {
                    BackendCommand::Execute(request) => request,
                    BackendCommand::Shutdown => break,
                };
                let Some(creds) = credentials.clone() else {
                    tracing::debug!(
                        operation = request.operation().name(),
                        "no facilitator credentials; request not sent"
                    );
                    continue;
                };

                let api = Arc::clone(&api);
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let outcome = execute(api.as_ref(), &creds, request).await;
                    if ui_tx.send(UiEvent::Outcome(outcome)).is_err() {
                        tracing::warn!("ui event channel closed before outcome was delivered");
                    }
                });
            }
            tracing::info!("backend worker stopped");
        });
    });
}
