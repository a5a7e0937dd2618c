use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use glam::Vec3;
use voxworld_common::DebrisConfig;

use crate::error::DebrisError;
use crate::protocol::{HostMessage, WorkerMessage};
use crate::world::DebrisWorld;

const WORKER_NAME: &str = "debris-physics";

/// Host-side handle to the debris worker thread.
///
/// The worker owns its [`DebrisWorld`]; the only link is a pair of
/// channels. Requests are fire-and-forget and updates arrive as periodic
/// broadcasts, so callers [`poll`](Self::poll) whenever convenient.
pub struct DebrisService {
    tx: Option<Sender<HostMessage>>,
    rx: Receiver<WorkerMessage>,
    handle: Option<JoinHandle<()>>,
}

impl DebrisService {
    /// Start the worker. It stays idle until [`init`](Self::init).
    pub fn start(config: DebrisConfig) -> Result<Self, DebrisError> {
        let (host_tx, worker_rx) = mpsc::channel::<HostMessage>();
        let (worker_tx, host_rx) = mpsc::channel::<WorkerMessage>();
        let handle = thread::Builder::new()
            .name(WORKER_NAME.into())
            .spawn(move || run_worker(config, worker_rx, worker_tx))
            .map_err(DebrisError::Spawn)?;
        Ok(Self {
            tx: Some(host_tx),
            rx: host_rx,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.tx.is_some()
    }

    pub fn send(&self, message: HostMessage) -> Result<(), DebrisError> {
        let tx = self.tx.as_ref().ok_or(DebrisError::Disconnected)?;
        tx.send(message).map_err(|_| DebrisError::Disconnected)
    }

    /// Forward a JSON-encoded host message.
    pub fn send_json(&self, text: &str) -> Result<(), DebrisError> {
        self.send(HostMessage::from_json(text)?)
    }

    pub fn init(&self) -> Result<(), DebrisError> {
        self.send(HostMessage::Init)
    }

    pub fn spawn(&self, positions: &[Vec3]) -> Result<(), DebrisError> {
        self.send(HostMessage::spawn(positions))
    }

    /// Drain every message the worker has produced so far. Empty once
    /// terminated, even if the worker had queued more.
    pub fn poll(&self) -> Vec<WorkerMessage> {
        if !self.is_running() {
            return Vec::new();
        }
        self.rx.try_iter().collect()
    }

    /// Wait up to `timeout` for the next message.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<WorkerMessage> {
        if !self.is_running() {
            return None;
        }
        self.rx.recv_timeout(timeout).ok()
    }

    /// Stop the worker without draining its pending output.
    pub fn terminate(&mut self) {
        // Dropping the sender disconnects the worker's receive loop.
        if self.tx.take().is_none() {
            return;
        }
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.join() {
                tracing::error!(?err, "debris worker panicked");
            }
        }
        tracing::info!("debris worker terminated");
    }
}

impl Drop for DebrisService {
    fn drop(&mut self) {
        self.terminate();
    }
}

fn run_worker(config: DebrisConfig, rx: Receiver<HostMessage>, tx: Sender<WorkerMessage>) {
    let tick = Duration::from_millis(config.tick_ms.max(1));
    let mut world: Option<DebrisWorld> = None;
    let mut next_tick = Instant::now() + tick;

    loop {
        let received = if world.is_some() {
            let wait = next_tick.saturating_duration_since(Instant::now());
            rx.recv_timeout(wait)
        } else {
            rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
        };

        match received {
            Ok(HostMessage::Init) => {
                let fresh = DebrisWorld::new(config.clone());
                tracing::info!(pool = fresh.pool_size(), tick_ms = config.tick_ms, "debris world ready");
                world = Some(fresh);
                next_tick = Instant::now() + tick;
                if tx.send(WorkerMessage::Inited).is_err() {
                    break;
                }
            }
            Ok(HostMessage::Spawn { positions }) => match world.as_mut() {
                Some(w) => {
                    let points: Vec<Vec3> = positions.into_iter().map(Vec3::from).collect();
                    let slots = w.spawn(&points);
                    tracing::debug!(?slots, "debris spawned");
                }
                None => tracing::warn!("spawn before init ignored"),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let Some(w) = world.as_mut() else {
            continue;
        };
        // Catch up on missed ticks without drifting.
        while Instant::now() >= next_tick {
            next_tick += tick;
            if let Some(positions) = w.step() {
                if tx.send(WorkerMessage::update(&positions)).is_err() {
                    return;
                }
            }
        }
    }
}
