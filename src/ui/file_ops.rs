//! Save and load of the diagram through the document store.
//!
//! Store calls run off the UI thread: on a tokio blocking task natively and
//! as a local future in the browser. Results come back over a channel that is
//! drained once per frame.

use super::state::{DiagramApp, StoreOperation, StoreOperationResult};
use crate::error::PersistenceError;
use crate::persistence::PersistenceBridge;
use eframe::egui;
use log::{error, info, warn};
use std::sync::mpsc::Sender;
use std::sync::Arc;

impl DiagramApp {
    /// Applies results of finished store operations.
    pub fn handle_pending_operations(&mut self) {
        while let Ok(result) = self.store.receiver.try_recv() {
            self.store.in_flight = None;
            match result {
                StoreOperationResult::Saved(rev) => {
                    info!("Save completed at revision {}", rev);
                    self.set_status("Diagram saved");
                }
                StoreOperationResult::Loaded(records) => {
                    self.editor.restore(&records);
                    self.set_status(format!("Loaded {} shapes", records.len()));
                }
                StoreOperationResult::Failed(operation, err) => {
                    let verb = match operation {
                        StoreOperation::Save => "Save",
                        StoreOperation::Load => "Load",
                    };
                    error!("{} failed: {}", verb, err);
                    self.set_error(format!("{} failed: {}", verb, err));
                }
            }
        }
    }

    /// Starts saving the current diagram.
    pub fn save_diagram(&mut self, ctx: &egui::Context) {
        if !self.begin_operation(StoreOperation::Save) {
            return;
        }
        let records = self.editor.records();
        let bridge = self.store.bridge.clone();
        let sender = self.store.sender.clone();
        run_store_task(ctx, bridge, sender, move |bridge| match bridge.save(&records) {
            Ok(rev) => StoreOperationResult::Saved(rev),
            Err(e) => StoreOperationResult::Failed(StoreOperation::Save, e),
        });
    }

    /// Starts loading the saved diagram. Current shapes stay until the load succeeds.
    pub fn load_diagram(&mut self, ctx: &egui::Context) {
        if !self.begin_operation(StoreOperation::Load) {
            return;
        }
        let bridge = self.store.bridge.clone();
        let sender = self.store.sender.clone();
        run_store_task(ctx, bridge, sender, |bridge| match bridge.load() {
            Ok(records) => StoreOperationResult::Loaded(records),
            Err(e) => StoreOperationResult::Failed(StoreOperation::Load, e),
        });
    }

    /// Marks `operation` as in flight, refusing if another one is still running.
    fn begin_operation(&mut self, operation: StoreOperation) -> bool {
        if let Some(running) = self.store.in_flight {
            warn!("{:?} refused, {:?} still running", operation, running);
            self.set_error(PersistenceError::Busy.to_string());
            return false;
        }
        self.store.in_flight = Some(operation);
        self.set_status(match operation {
            StoreOperation::Save => "Saving...",
            StoreOperation::Load => "Loading...",
        });
        true
    }
}

/// Runs `task` against the bridge in the background and reports its result.
///
/// Without a tokio runtime (headless tests) the task runs inline.
#[cfg(not(target_arch = "wasm32"))]
fn run_store_task<F>(
    ctx: &egui::Context,
    bridge: Arc<PersistenceBridge>,
    sender: Sender<StoreOperationResult>,
    task: F,
) where
    F: FnOnce(&PersistenceBridge) -> StoreOperationResult + Send + 'static,
{
    let ctx = ctx.clone();
    let job = move || {
        let result = task(&bridge);
        if sender.send(result).is_err() {
            warn!("Store result dropped, app is shutting down");
        }
        ctx.request_repaint();
    };
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn_blocking(job);
        }
        Err(_) => job(),
    }
}

#[cfg(target_arch = "wasm32")]
fn run_store_task<F>(
    ctx: &egui::Context,
    bridge: Arc<PersistenceBridge>,
    sender: Sender<StoreOperationResult>,
    task: F,
) where
    F: FnOnce(&PersistenceBridge) -> StoreOperationResult + 'static,
{
    let ctx = ctx.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let result = task(&bridge);
        if sender.send(result).is_err() {
            warn!("Store result dropped, app is shutting down");
        }
        ctx.request_repaint();
    });
}
