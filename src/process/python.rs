//! Python interpreter process bootstrap and I/O glue.

use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};

use super::ProcessHandle;
use crate::execution::BridgeError;

/// Host loop run inside the child interpreter.
///
/// Duplicates of the original stdin/stdout carry the channel; fd 1 is then
/// pointed at stderr and fd 0 at the null device, so anything the program
/// prints outside a capture ends up on stderr. Requests are evaluated in one
/// namespace that lives as long as the process. The value of a trailing
/// expression is sent back as `str`.
pub const HOST_BOOTSTRAP: &str = r#"
import ast, asyncio, json, os, sys, traceback


def _serve():
    # Move the channel off fds 0 and 1 so nothing the program does at the
    # fd level (os.write, subprocesses) can reach it.
    channel = os.fdopen(os.dup(1), "w", encoding="utf-8")
    requests = os.fdopen(os.dup(0), "r", encoding="utf-8")
    os.dup2(2, 1)
    null = os.open(os.devnull, os.O_RDONLY)
    os.dup2(null, 0)
    os.close(null)
    sys.stdout = sys.stderr
    sys.stdin = open(os.devnull)
    namespace = {"__name__": "__main__", "__builtins__": __builtins__}
    flags = ast.PyCF_ALLOW_TOP_LEVEL_AWAIT

    def settle(value):
        if asyncio.iscoroutine(value):
            return asyncio.run(value)
        return value

    def evaluate(code):
        tree = ast.parse(code, "<exec>", "exec")
        tail = None
        if tree.body and isinstance(tree.body[-1], ast.Expr):
            tail = ast.Expression(tree.body.pop().value)
        settle(eval(compile(tree, "<exec>", "exec", flags=flags), namespace))
        if tail is None:
            return None
        return settle(eval(compile(tail, "<exec>", "eval", flags=flags), namespace))

    def reply(message):
        channel.write(json.dumps(message) + "\n")
        channel.flush()

    reply({"ready": True, "version": sys.version.split()[0]})
    for line in requests:
        line = line.strip()
        if not line:
            continue
        request_id = None
        try:
            request = json.loads(line)
            request_id = request["id"]
            value = evaluate(request["code"])
            reply({"id": request_id, "value": None if value is None else str(value)})
        except BaseException:
            reply({"id": request_id, "error": traceback.format_exc()})


_serve()
"#;

/// First line the host loop writes once it is ready for requests.
#[derive(Debug, Deserialize)]
pub struct HostHello {
    pub ready: bool,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct HostRequest<'a> {
    pub id: u64,
    pub code: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct HostReply {
    pub id: Option<u64>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Spawn `command` (program plus optional arguments) running `bootstrap`.
///
/// stderr is drained into the log so the child never blocks on a full pipe.
pub fn start_python(command: &str, bootstrap: &str) -> Result<ProcessHandle, BridgeError> {
    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or_else(|| BridgeError::Spawn {
        command: command.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty interpreter command"),
    })?;

    let mut cmd = Command::new(program);
    cmd.args(parts)
        .arg("-u") // unbuffered
        .arg("-c")
        .arg(bootstrap)
        .env("PYTHONIOENCODING", "utf-8")
        .env("PYTHONDONTWRITEBYTECODE", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child: Child = cmd.spawn().map_err(|source| BridgeError::Spawn {
        command: command.to_string(),
        source,
    })?;
    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| BridgeError::Handshake("no stdin".into()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| BridgeError::Handshake("no stdout".into()))?;

    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                tracing::debug!(target: "pyscratch::interpreter", "{line}");
            }
        });
    }

    Ok(ProcessHandle {
        child,
        stdin,
        stdout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_code_as_json_string() {
        let line = serde_json::to_string(&HostRequest { id: 7, code: "print(\"a\")\n" }).unwrap();
        assert_eq!(line, r#"{"id":7,"code":"print(\"a\")\n"}"#);
    }

    #[test]
    fn reply_value_and_error_are_optional() {
        let ok: HostReply = serde_json::from_str(r#"{"id": 1, "value": null}"#).unwrap();
        assert_eq!(ok.id, Some(1));
        assert!(ok.value.is_none() && ok.error.is_none());

        let failed: HostReply = serde_json::from_str(r#"{"id": null, "error": "Traceback"}"#).unwrap();
        assert_eq!(failed.id, None);
        assert_eq!(failed.error.as_deref(), Some("Traceback"));
    }

    #[tokio::test]
    async fn empty_command_is_a_spawn_error() {
        let err = start_python("   ", HOST_BOOTSTRAP).unwrap_err();
        assert!(matches!(err, BridgeError::Spawn { .. }));
    }
}
