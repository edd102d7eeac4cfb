//! [`LiveService`]: the per-broker liveness handler, covering bootstrap
//! `hello`, parent-side `hello` handling, the `max-idle` config watch,
//! and heartbeat-driven `cstate` emission.

use indexmap::IndexMap;

use crate::config::{hello_receipt_key, ConfigStore, ConfigUpdate};
use crate::contracts::{CstateEvent, HeartbeatEvent};
use crate::error::{LiveError, Result};
use crate::state::{transition, CState};
use crate::transport::Transport;

/// An upstream peer: the immediate parent (first entry) or a failover
/// candidate further up the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parent {
    pub rank: u32,
    pub uri: String,
}

/// A downstream peer this service is responsible for watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Child {
    pub rank: u32,
    pub state: CState,
}

/// The two liveness thresholds. `max_idle` is dynamically reconfigured
/// via [`LiveService::handle_max_idle_update`]; `slow` is read at
/// construction and never watched, matching the historical
/// `default_slow` sitting next to the watched `max_idle` in
/// `livesrv.c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveConfig {
    pub max_idle: i64,
    pub slow: i64,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            max_idle: 5,
            slow: 3,
        }
    }
}

/// Per-broker liveness handler: tracks this broker's parent chain (if
/// any) and the children reporting up to it, and turns heartbeat ticks
/// into edge-triggered `cstate` events.
///
/// Built as a plain struct driven by `&mut self` methods called one at
/// a time from a single logical reactor thread. No internal locking,
/// single-threaded cooperative, fully serialized.
pub struct LiveService<T: Transport, C: ConfigStore> {
    rank: u32,
    is_root: bool,
    epoch: u64,
    config: LiveConfig,
    parents: Vec<Parent>,
    children: IndexMap<u32, Child>,
    transport: T,
    config_store: C,
    /// The `conf.live.max-idle` watch subscription, if the host broker
    /// registered one via [`Self::set_max_idle_watch_guard`]. Teardown is
    /// `Drop`-based: dropping the service drops this guard, which cancels
    /// the watch.
    watch_guard: Option<Box<dyn std::any::Any>>,
}

impl<T: Transport, C: ConfigStore> LiveService<T, C> {
    /// Constructs the service. Non-root brokers perform the one
    /// synchronous `hello` round trip here, before the reactor begins
    /// its main dispatch; the root never issues `hello`.
    pub fn new(rank: u32, is_root: bool, mut transport: T, config_store: C) -> Result<Self> {
        let parents = if is_root {
            Vec::new()
        } else {
            transport.hello_request(rank)?
        };
        Ok(Self {
            rank,
            is_root,
            epoch: 0,
            config: LiveConfig::default(),
            parents,
            children: IndexMap::new(),
            transport,
            config_store,
            watch_guard: None,
        })
    }

    pub fn rank(&self) -> u32 {
        self.rank
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn config(&self) -> LiveConfig {
        self.config
    }

    pub fn parents(&self) -> &[Parent] {
        &self.parents
    }

    pub fn children(&self) -> impl Iterator<Item = &Child> {
        self.children.values()
    }

    pub fn child(&self, rank: u32) -> Option<&Child> {
        self.children.get(&rank)
    }

    /// Stores the `conf.live.max-idle` watch's cancellation handle. The
    /// host broker calls this once, right after registering the watch;
    /// dropping the service (module teardown) drops the guard and so
    /// cancels the subscription, with no further action needed here.
    pub fn set_max_idle_watch_guard(&mut self, guard: Box<dyn std::any::Any>) {
        self.watch_guard = Some(guard);
    }

    /// Parent-side handling of a `live.hello` request from `child_rank`.
    ///
    /// Subscribes to `hb` the moment the children table stops being
    /// empty, records (or reuses) the child (a repeat `hello` from the
    /// same rank is idempotent and never resets existing state, mirroring
    /// `zhash_insert` failing and the C code keeping the old record),
    /// writes the hello receipt, and answers with the parent chain the
    /// child should see: this handler's own `{rank, uri}` (if available)
    /// followed by its own parents, built by concatenation rather than by
    /// temporarily mutating the shared `parents` list.
    pub fn handle_hello(&mut self, child_rank: u32) -> Result<Vec<Parent>> {
        if self.children.is_empty() {
            self.transport.subscribe_heartbeat()?;
        }

        self.children.entry(child_rank).or_insert(Child {
            rank: child_rank,
            state: CState::Ok,
        });

        let key = hello_receipt_key(child_rank);
        self.config_store.put_int(&key, self.epoch as i64)?;
        self.config_store.commit()?;

        let mut response = Vec::with_capacity(self.parents.len() + 1);
        if let Some(uri) = self.transport.self_uri() {
            response.push(Parent { rank: self.rank, uri });
        }
        response.extend(self.parents.iter().cloned());
        Ok(response)
    }

    /// Decodes and dispatches a raw `live.hello` request payload,
    /// logging and dropping on a decode failure instead of erroring out:
    /// the handler does not crash the broker.
    pub fn handle_hello_json(&mut self, raw: &[u8]) -> Result<Option<Vec<Parent>>> {
        let req: crate::contracts::HelloRequest = match serde_json::from_slice(raw) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "live.hello: bad message, dropping");
                return Ok(None);
            }
        };
        self.handle_hello(req.rank).map(Some)
    }

    /// Handles a decoded `conf.live.max-idle` watch callback. A
    /// [`ConfigUpdate::Absent`] key reverts to the default; any other
    /// lookup error retains the current value instead of silently
    /// resetting the threshold.
    pub fn handle_max_idle_update(&mut self, update: ConfigUpdate) {
        match update {
            ConfigUpdate::Value(v) => self.config.max_idle = v,
            ConfigUpdate::Absent => self.config.max_idle = LiveConfig::default().max_idle,
            ConfigUpdate::Error => {
                tracing::debug!("conf.live.max-idle: transient lookup error, retaining current value");
            }
        }
    }

    /// Runs one heartbeat tick: updates `epoch`, fetches the peer idle
    /// directory, and runs the hysteretic transition for every child,
    /// publishing a `cstate` event for each non-null transition in
    /// per-child order.
    ///
    /// A failed peer-directory lookup aborts the tick cleanly without
    /// advancing any child's state.
    pub fn handle_heartbeat(&mut self, event: HeartbeatEvent) -> Result<()> {
        self.epoch = event.epoch;

        let peers = match self.transport.peer_idle_directory() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "hb: peer directory lookup failed, skipping tick");
                return Ok(());
            }
        };

        for child in self.children.values_mut() {
            let idle = peers.get(&child.rank).copied().unwrap_or(self.epoch) as i64;
            if let Some(nstate) = transition(child.state, idle, self.config.slow, self.config.max_idle) {
                let ostate = child.state;
                child.state = nstate;
                let cstate_event = CstateEvent {
                    rank: child.rank,
                    ostate,
                    nstate,
                    parent: self.rank,
                    epoch: self.epoch,
                };
                if let Err(e) = self.transport.publish_cstate(&cstate_event) {
                    tracing::warn!(error = %e, "hb: failed publishing live.cstate");
                }
            }
        }
        Ok(())
    }

    /// Decodes and dispatches a raw `hb` event payload, logging and
    /// dropping on a decode failure.
    pub fn handle_heartbeat_json(&mut self, raw: &[u8]) -> Result<()> {
        let event: HeartbeatEvent = match serde_json::from_slice(raw) {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "hb: bad message, dropping");
                return Ok(());
            }
        };
        self.handle_heartbeat(event)
    }
}

impl<T: Transport, C: ConfigStore> Drop for LiveService<T, C> {
    fn drop(&mut self) {
        tracing::debug!(rank = self.rank, "live: service torn down");
    }
}
