use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::api::{ApiClient, ApiError};
use crate::model::InvocationId;
use crate::state::{Outcome, PollEvent, Resource};

/// Cadence of the current/invocations/hosts/viewing pollers.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);
/// Granularity at which sleeping pollers notice stop/kick signals.
const WAKE_SLICE: Duration = Duration::from_millis(50);

struct Shared {
    stop: AtomicBool,
    kick_current: AtomicBool,
    viewing: Mutex<Option<InvocationId>>,
    seqs: [AtomicU64; 4],
}

impl Shared {
    fn next_seq(&self, resource: Resource) -> u64 {
        self.seqs[resource as usize].fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Owns the polling threads. One thread per resource: requests for a single
/// resource are serialized by construction, so ticks can never overlap, and
/// every event still carries a per-resource sequence number for the apply
/// loop's staleness guard. Threads stop when the handle drops.
pub struct Poller {
    shared: Arc<Shared>,
    threads: Vec<JoinHandle<()>>,
}

impl Poller {
    pub fn spawn(api: ApiClient, tx: Sender<PollEvent>) -> Self {
        let shared = Arc::new(Shared {
            stop: AtomicBool::new(false),
            kick_current: AtomicBool::new(false),
            viewing: Mutex::new(None),
            seqs: Default::default(),
        });

        let threads = vec![
            spawn_loop("poll-current", Arc::clone(&shared), true, {
                let api = api.clone();
                let tx = tx.clone();
                let shared = Arc::clone(&shared);
                move || {
                    let seq = shared.next_seq(Resource::Current);
                    send_outcome(
                        &tx,
                        Resource::Current,
                        seq,
                        api.current().map(Outcome::Current),
                    )
                }
            }),
            spawn_loop("poll-invocations", Arc::clone(&shared), false, {
                let api = api.clone();
                let tx = tx.clone();
                let shared = Arc::clone(&shared);
                move || {
                    let seq = shared.next_seq(Resource::Invocations);
                    send_outcome(
                        &tx,
                        Resource::Invocations,
                        seq,
                        api.invocations().map(Outcome::Invocations),
                    )
                }
            }),
            spawn_loop("poll-hosts", Arc::clone(&shared), false, {
                let api = api.clone();
                let tx = tx.clone();
                let shared = Arc::clone(&shared);
                move || {
                    let seq = shared.next_seq(Resource::Hosts);
                    send_outcome(&tx, Resource::Hosts, seq, api.hosts().map(Outcome::Hosts))
                }
            }),
            spawn_loop("poll-viewing", Arc::clone(&shared), false, {
                let shared = Arc::clone(&shared);
                move || {
                    // Only active while an invocation is being viewed.
                    let viewing = shared.viewing.lock().expect("viewing lock").clone();
                    let Some(id) = viewing else { return true };
                    let seq = shared.next_seq(Resource::Viewing);
                    send_outcome(
                        &tx,
                        Resource::Viewing,
                        seq,
                        api.invocation(&id).map(Outcome::ViewingDetail),
                    )
                }
            }),
        ];

        Self { shared, threads }
    }

    /// Point the viewing refresher at `id` (or pause it with `None`).
    pub fn set_viewing(&self, id: Option<InvocationId>) {
        *self.shared.viewing.lock().expect("viewing lock") = id;
    }

    /// Make the current poller fire now rather than at its next tick; used
    /// after a confirmed invoke/reinvoke/cancel.
    pub fn kick_current(&self) {
        self.shared.kick_current.store(true, Ordering::Relaxed);
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.shared.stop.store(true, Ordering::Relaxed);
        for handle in self.threads.drain(..) {
            let _ = handle.join();
        }
    }
}

/// Run `tick` every [`POLL_INTERVAL`] until the shared stop flag is raised or
/// the tick reports the far end of the channel gone. Only the current poller
/// honors the kick flag.
fn spawn_loop(
    name: &str,
    shared: Arc<Shared>,
    kickable: bool,
    mut tick: impl FnMut() -> bool + Send + 'static,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            loop {
                if shared.stop.load(Ordering::Relaxed) || !tick() {
                    return;
                }
                let mut slept = Duration::ZERO;
                while slept < POLL_INTERVAL {
                    if shared.stop.load(Ordering::Relaxed) {
                        return;
                    }
                    if kickable && shared.kick_current.swap(false, Ordering::Relaxed) {
                        break;
                    }
                    thread::sleep(WAKE_SLICE);
                    slept += WAKE_SLICE;
                }
            }
        })
        .expect("spawn poll thread")
}

/// Translate one request's outcome into at most one event. Server-reported
/// errors are events the apply loop routes per resource; transport failures
/// and unparseable bodies drop the tick with no state change. Returns false
/// once the receiver is gone.
fn send_outcome(
    tx: &Sender<PollEvent>,
    resource: Resource,
    seq: u64,
    outcome: Result<Outcome, ApiError>,
) -> bool {
    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(ApiError::Server(msg)) => Outcome::ServerError(msg),
        Err(err) => {
            tracing::debug!(?resource, %err, "poll tick dropped");
            return true;
        }
    };
    tx.send(PollEvent {
        resource,
        seq,
        outcome,
    })
    .is_ok()
}
