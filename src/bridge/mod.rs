//! BridgeHandle: orchestration layer wiring source, classifier, router and
//! transport.
//!
//! This struct owns the gesture broadcast channel and the two worker tasks:
//! the intake task draining raw notifications into the classifier, and the
//! router task forwarding directional gestures to the transport. Both the
//! transport capability and the level source are injected, so the whole
//! bridge runs against stubs in tests without a radio or an audio subsystem.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::classifier::PressClassifier;
use crate::config::BridgeConfig;
use crate::error::ClassifierError;
use crate::gesture::GestureEvent;
use crate::router::GestureRouter;
use crate::source::{LevelNotification, LevelSource};
use crate::transport::Transport;

/// Orchestrates the notification-to-command pipeline.
pub struct BridgeHandle {
    config: BridgeConfig,
    classifier: Arc<PressClassifier>,
    transport: Arc<dyn Transport>,
    events_tx: broadcast::Sender<GestureEvent>,
    monitoring: AtomicBool,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl BridgeHandle {
    /// Create a bridge over the given source and transport.
    ///
    /// # Errors
    /// Fails with `ClassifierError::TimerUnavailable` when constructed
    /// outside an async runtime; the classifier cannot debounce without
    /// delayed callbacks.
    pub fn new(
        source: Arc<dyn LevelSource>,
        transport: Arc<dyn Transport>,
        config: BridgeConfig,
    ) -> Result<Self, ClassifierError> {
        let (events_tx, _) = broadcast::channel(config.bridge.event_buffer.max(1));
        let classifier = Arc::new(PressClassifier::new(
            source,
            config.classifier.clone(),
            events_tx.clone(),
        )?);

        Ok(Self {
            config,
            classifier,
            transport,
            events_tx,
            monitoring: AtomicBool::new(false),
            workers: Mutex::new(Vec::new()),
        })
    }

    /// Subscribe to the gesture broadcast.
    ///
    /// Observers receive every gesture, including the press-count events the
    /// router does not forward.
    pub fn subscribe(&self) -> broadcast::Receiver<GestureEvent> {
        self.events_tx.subscribe()
    }

    /// Start consuming raw notifications.
    ///
    /// Spawns the router task and the intake task. Returns
    /// `AlreadyMonitoring` when called while running; stop first.
    pub fn start_monitoring(
        &self,
        mut notifications: mpsc::Receiver<LevelNotification>,
    ) -> Result<(), ClassifierError> {
        if self.monitoring.swap(true, Ordering::SeqCst) {
            return Err(ClassifierError::AlreadyMonitoring);
        }

        if self.config.bridge.suppress_background_silence {
            // The silent keep-alive track belongs to the platform glue; the
            // core only records that it was requested.
            log::info!("[Bridge] Background-silence keep-alive requested from platform layer");
        }

        let router = GestureRouter::new(
            Arc::clone(&self.transport),
            self.config.bridge.forward_release,
        );
        let mut gestures = self.events_tx.subscribe();
        let router_task = tokio::spawn(async move {
            loop {
                match gestures.recv().await {
                    Ok(event) => router.route(&event),
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        log::warn!("[Bridge] Router lagged, {} gestures dropped", missed);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        let classifier = Arc::clone(&self.classifier);
        let intake_task = tokio::spawn(async move {
            while let Some(notification) = notifications.recv().await {
                classifier.handle_notification(&notification);
            }
            tracing::debug!("notification stream closed");
        });

        let mut workers = self.workers.lock().expect("worker list poisoned");
        workers.push(router_task);
        workers.push(intake_task);

        log::info!(
            "[Bridge] Monitoring started (stream: {:?})",
            self.config.classifier.monitored_stream
        );
        Ok(())
    }

    /// Stop monitoring. Idempotent: stopping twice is a quiet no-op.
    ///
    /// Invalidates the classifier generation before aborting the workers, so
    /// an in-flight settle timer cannot mutate state or emit events after
    /// this returns.
    pub fn stop_monitoring(&self) {
        if !self.monitoring.swap(false, Ordering::SeqCst) {
            tracing::debug!("stop_monitoring called while already stopped");
            return;
        }

        self.classifier.invalidate();
        let mut workers = self.workers.lock().expect("worker list poisoned");
        for worker in workers.drain(..) {
            worker.abort();
        }
        log::info!("[Bridge] Monitoring stopped");
    }

    /// Whether the bridge is currently consuming notifications.
    pub fn is_monitoring(&self) -> bool {
        self.monitoring.load(Ordering::SeqCst)
    }
}

impl Drop for BridgeHandle {
    fn drop(&mut self) {
        self.stop_monitoring();
    }
}
