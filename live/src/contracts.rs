//! Data-only wire payload shapes: `live.hello`, `hb`, `live.cstate`, and
//! the `cmb.exec*` family. None of these types do networking or process
//! spawning; they exist so a caller wiring this crate into an actual
//! broker has exact, `serde`-compatible payload shapes, grounded in the
//! field names of the historical broker's `livesrv.c` and `exec.c`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::state::CState;

/// `live.hello` request payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HelloRequest {
    pub rank: u32,
}

/// `hb` event payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HeartbeatEvent {
    pub epoch: u64,
}

/// `live.cstate` event payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CstateEvent {
    pub rank: u32,
    pub ostate: CState,
    pub nstate: CState,
    pub parent: u32,
    pub epoch: u64,
}

/// Default signal for `cmb.exec.signal` when `signum` is absent.
pub const DEFAULT_SIGNAL: i32 = 15; // SIGTERM

/// `cmb.exec` request payload. The exec handler itself is an external
/// collaborator; only the contract shape lives here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecRequest {
    pub cmdline: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecState {
    Starting,
    Running,
    Exited,
    Failed,
}

/// Immediate `cmb.exec` response: the process has been launched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecResponse {
    pub rank: u32,
    pub pid: u32,
    pub state: ExecState,
}

/// A later, asynchronous response on the same transaction, carried at
/// child exit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecStatusEvent {
    pub rank: u32,
    pub pid: u32,
    pub state: ExecState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec_errno: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IoStream {
    Stdout,
    Stderr,
}

/// A stdout/stderr chunk, zio-encoded in the original; modeled here as
/// a stream tag plus raw bytes and an explicit end-of-stream flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecIoEvent {
    pub rank: u32,
    pub pid: u32,
    pub stream: IoStream,
    pub data: Vec<u8>,
    pub eof: bool,
}

/// `cmb.exec.write` request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecWriteRequest {
    pub pid: u32,
    pub stdin: Vec<u8>,
}

/// `cmb.exec.write` response: `code` is an errno, 0 on success.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExecWriteResponse {
    pub code: i32,
}

/// `cmb.exec.signal` request payload. `signum` defaults to
/// [`DEFAULT_SIGNAL`] (`SIGTERM`) when absent; delivered to the
/// process group (`kill(-pid, ...)`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExecSignalRequest {
    pub pid: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signum: Option<i32>,
}

impl ExecSignalRequest {
    pub fn signal(&self) -> i32 {
        self.signum.unwrap_or(DEFAULT_SIGNAL)
    }
}

/// One entry of a `cmb.processes` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcEntry {
    pub pid: u32,
    pub cmdline: Vec<String>,
    pub cwd: String,
    pub sender: u32,
}

/// `cmb.processes` response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessesResponse {
    pub rank: u32,
    pub procs: Vec<ProcEntry>,
}
