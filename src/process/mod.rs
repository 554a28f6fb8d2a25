//! Interpreter process management (startup/IO/health).

use std::future::Future;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout};

use crate::execution::BridgeError;

pub mod python;

/// The seam between the orchestrator and whatever actually runs Python.
pub trait PythonRuntime: Send {
    fn is_ready(&self) -> bool;

    /// Evaluate `code` in the persistent namespace.
    ///
    /// Returns the `str` of a trailing expression, or `None` when there is
    /// none or it evaluated to `None`.
    fn run_python(
        &mut self,
        code: &str,
    ) -> impl Future<Output = Result<Option<String>, BridgeError>> + Send;

    /// Whether the capture adapter has already been installed in this session.
    fn adapter_installed(&self) -> bool;

    fn mark_adapter_installed(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Loading,
    Ready,
    /// Startup failed. Terminal: the session is never retried.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Interpreter command line, e.g. `python3` or `py -3`.
    pub command: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command: "python3".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct ProcessHandle {
    pub child: Child,
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
}

struct HostChannel {
    // Held so the child is killed when the session goes away.
    _child: Child,
    stdin: ChildStdin,
    replies: Lines<BufReader<ChildStdout>>,
}

/// One long-lived interpreter process and its namespace.
pub struct InterpreterSession {
    config: RuntimeConfig,
    state: SessionState,
    channel: Option<HostChannel>,
    next_id: u64,
    adapter_installed: bool,
    version: Option<String>,
}

impl InterpreterSession {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            state: SessionState::Uninitialized,
            channel: None,
            next_id: 0,
            adapter_installed: false,
            version: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Interpreter version reported during the handshake.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Start the interpreter and wait until it is ready.
    ///
    /// Only the first call does anything; later calls return the current state.
    pub async fn load(&mut self) -> SessionState {
        if self.state != SessionState::Uninitialized {
            return self.state.clone();
        }
        self.state = SessionState::Loading;
        tracing::info!(command = %self.config.command, "starting Python runtime");

        match self.spawn_and_handshake().await {
            Ok(channel) => {
                tracing::info!(version = ?self.version, "Python runtime ready");
                self.channel = Some(channel);
                self.state = SessionState::Ready;
            }
            Err(e) => {
                tracing::error!("Python runtime failed to start: {e}");
                self.state = SessionState::Failed(e.to_string());
            }
        }
        self.state.clone()
    }

    async fn spawn_and_handshake(&mut self) -> Result<HostChannel, BridgeError> {
        let handle = python::start_python(&self.config.command, python::HOST_BOOTSTRAP)?;
        let mut replies = BufReader::new(handle.stdout).lines();

        let line = replies.next_line().await?.ok_or_else(|| {
            BridgeError::Handshake("interpreter exited before signalling readiness".into())
        })?;
        let hello: python::HostHello = serde_json::from_str(&line)
            .map_err(|e| BridgeError::Handshake(format!("unexpected greeting {line:?}: {e}")))?;
        if !hello.ready {
            return Err(BridgeError::Handshake("interpreter reported not ready".into()));
        }
        self.version = Some(hello.version);

        Ok(HostChannel {
            _child: handle.child,
            stdin: handle.stdin,
            replies,
        })
    }

    async fn exchange(&mut self, code: &str) -> Result<Option<String>, BridgeError> {
        if self.state != SessionState::Ready {
            return Err(BridgeError::NotReady);
        }
        let channel = self.channel.as_mut().ok_or(BridgeError::NotReady)?;
        self.next_id += 1;
        let id = self.next_id;

        let mut line = serde_json::to_string(&python::HostRequest { id, code })
            .map_err(|e| BridgeError::Payload(e.to_string()))?;
        line.push('\n');
        channel.stdin.write_all(line.as_bytes()).await?;
        channel.stdin.flush().await?;

        loop {
            let Some(line) = channel.replies.next_line().await? else {
                tracing::error!("interpreter closed its channel during request {id}");
                return Err(BridgeError::Disconnected);
            };
            let reply: python::HostReply = match serde_json::from_str(&line) {
                Ok(reply) => reply,
                Err(_) => {
                    tracing::warn!("ignoring stray interpreter output: {line}");
                    continue;
                }
            };
            if reply.id != Some(id) {
                tracing::warn!(expected = id, got = ?reply.id, "ignoring reply for another request");
                continue;
            }
            return match reply.error {
                Some(trace) => Err(BridgeError::Python(trace)),
                None => Ok(reply.value),
            };
        }
    }
}

impl PythonRuntime for InterpreterSession {
    fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    async fn run_python(&mut self, code: &str) -> Result<Option<String>, BridgeError> {
        self.exchange(code).await
    }

    fn adapter_installed(&self) -> bool {
        self.adapter_installed
    }

    fn mark_adapter_installed(&mut self) {
        self.adapter_installed = true;
    }
}
