//! Tree-structured liveness service: each broker reports its existence
//! to its parent; parents track children's idle time against a
//! configurable threshold and emit `cstate` events on health
//! transitions.
//!
//! - [`state::transition`], the hysteretic per-child state machine.
//! - [`service::LiveService`], bootstrap, hello handling, heartbeat
//!   dispatch, and dynamic `max-idle` reconfiguration.
//! - [`transport::Transport`] / [`config::ConfigStore`], the seams
//!   that keep the reactor/routing layer and the key-value store (both
//!   explicit non-goals) pluggable and mockable.
//! - [`contracts`], the wire payload shapes of the surrounding
//!   request/response contracts (`live.hello`, `hb`, `live.cstate`,
//!   `cmb.exec*`), data-only.
//!
//! Unlike `idset`, this crate does log: `tracing::warn!`/`debug!` at
//! exactly the points the historical `livesrv.c` called `flux_log(...)`
//! on a bad message or a failed lookup.

pub mod config;
pub mod contracts;
pub mod error;
pub mod service;
pub mod state;
pub mod transport;

pub use config::{ConfigStore, ConfigUpdate};
pub use error::{LiveError, Result};
pub use service::{Child, LiveConfig, LiveService, Parent};
pub use state::{transition, CState};
pub use transport::Transport;
