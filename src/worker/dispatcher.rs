//! Detached background execution of slash commands.
//!
//! Every dispatched command runs on its own tracked tokio task and produces
//! exactly one terminal [`CallbackMessage`], whether it succeeds, returns an
//! error or panics. The tracker lets the server drain in-flight tasks before
//! the process exits.

use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::clients::CallbackSink;
use crate::core::models::CallbackMessage;
use crate::errors::BotError;
use crate::features::Services;

/// One slash command's background work.
#[async_trait]
pub trait Command: Send + Sync + 'static {
    /// Short name used in logs, e.g. `print_file`.
    fn name(&self) -> &'static str;

    /// Does the work and describes a successful outcome.
    async fn run(&self, services: &Services) -> Result<CallbackMessage, BotError>;

    /// Describes a failed outcome.
    fn failure(&self, error: &BotError) -> CallbackMessage;
}

#[derive(Clone)]
pub struct Dispatcher {
    services: Arc<Services>,
    sink: Arc<dyn CallbackSink>,
    tracker: TaskTracker,
}

impl Dispatcher {
    #[must_use]
    pub fn new(services: Arc<Services>, sink: Arc<dyn CallbackSink>) -> Self {
        Self {
            services,
            sink,
            tracker: TaskTracker::new(),
        }
    }

    /// Starts `command` in the background and returns its task id at once.
    pub fn dispatch<C: Command>(&self, command: C, response_url: String) -> Uuid {
        let task_id = Uuid::new_v4();
        let span = info_span!("task", %task_id, command = command.name());
        let services = Arc::clone(&self.services);
        let sink = Arc::clone(&self.sink);

        self.tracker.spawn(
            async move {
                info!("Background task started");
                let message = run_to_outcome(&command, &services).await;
                if let Err(e) = sink.deliver(&response_url, message.payload()).await {
                    error!("Failed to deliver outcome: {}", e);
                }
                info!("Background task finished");
            }
            .instrument(span),
        );

        task_id
    }

    /// Number of tasks still running.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Closes the tracker and waits for every dispatched task to finish.
    pub async fn shutdown(&self) {
        self.tracker.close();
        info!(in_flight = self.tracker.len(), "Waiting for background tasks");
        self.tracker.wait().await;
    }
}

/// Runs a command behind a catch-all boundary.
pub async fn run_to_outcome<C: Command + ?Sized>(command: &C, services: &Services) -> CallbackMessage {
    match AssertUnwindSafe(command.run(services)).catch_unwind().await {
        Ok(Ok(message)) => message,
        Ok(Err(e)) => {
            error!("Command {} failed: {}", command.name(), e);
            command.failure(&e)
        }
        Err(panic) => {
            let reason = panic_reason(panic.as_ref());
            error!("Command {} panicked: {}", command.name(), reason);
            command.failure(&BotError::GeneralError(format!("unexpected failure: {reason}")))
        }
    }
}

fn panic_reason(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
