//! The messaging seam: the `live.hello` request/response round trip,
//! the `hb` subscription, and `live.cstate` event publication. Modeled
//! as a trait so the reactor/routing layer (an explicit non-goal) never
//! has to exist for `LiveService`'s logic to be fully testable.

use std::collections::HashMap;

use crate::contracts::CstateEvent;
use crate::error::Result;
use crate::service::Parent;

/// Per-rank idle readings as reported by the transport's peer directory
/// (`flux_lspeer` in the historical broker). A rank with no entry is
/// simply absent from the map; `LiveService` treats that as "unbounded
/// idle."
pub type PeerIdleDirectory = HashMap<u32, u64>;

/// The host broker's request/respond/subscribe/publish surface, as far
/// as the liveness service needs it.
pub trait Transport {
    /// Issues the one synchronous `live.hello` round trip a non-root
    /// broker performs at startup, carrying its own rank. Returns the
    /// parent chain from the immediate parent outward.
    fn hello_request(&mut self, rank: u32) -> Result<Vec<Parent>>;

    /// The handler's own `{rank, uri}`, used to prepend itself to the
    /// outgoing parent list when answering a child's `hello`. `None` if
    /// the attribute isn't available (mirrors `flux_getattr` failing).
    fn self_uri(&self) -> Option<String>;

    /// Subscribes to the `hb` heartbeat event. Called exactly once, the
    /// first time the children table becomes non-empty.
    fn subscribe_heartbeat(&mut self) -> Result<()>;

    /// Reads the current peer idle directory for this heartbeat tick.
    fn peer_idle_directory(&mut self) -> Result<PeerIdleDirectory>;

    /// Publishes a `live.cstate` event for one child's state transition.
    fn publish_cstate(&mut self, event: &CstateEvent) -> Result<()>;
}
