//! Capture adapter: runs user source with stdout and errors captured.

use super::{BridgeError, ExecutionResult};
use crate::process::PythonRuntime;

/// Defines `_exec_and_capture` in the session namespace unless it already exists.
pub const ADAPTER_SOURCE: &str = r#"
try:
    _exec_and_capture
except NameError:
    import sys, io, traceback, json

    def _exec_and_capture(source: str):
        buf = io.StringIO()
        stdout = sys.stdout
        sys.stdout = buf
        error = None
        try:
            compiled = compile(source, '<input>', 'exec')
            exec(compiled, globals())
        except BaseException:
            error = traceback.format_exc()
        finally:
            sys.stdout = stdout
        return {'stdout': buf.getvalue(), 'error': error}
"#;

/// Install the adapter into the runtime's namespace, at most once per session.
pub async fn install_adapter<R: PythonRuntime>(runtime: &mut R) -> Result<(), BridgeError> {
    if runtime.adapter_installed() {
        return Ok(());
    }
    runtime.run_python(ADAPTER_SOURCE).await?;
    runtime.mark_adapter_installed();
    tracing::debug!("capture adapter installed");
    Ok(())
}

/// Python snippet that runs `source` through the adapter and evaluates to
/// the JSON payload.
///
/// The source is embedded as a JSON string literal, which Python reads as an
/// ordinary string literal.
pub fn capture_invocation(source: &str) -> Result<String, BridgeError> {
    let encoded = serde_json::to_string(source).map_err(|e| BridgeError::Payload(e.to_string()))?;
    Ok(format!("import json\njson.dumps(_exec_and_capture({encoded}))"))
}

/// Run `source` through the capture adapter and parse its result.
pub async fn execute_captured<R: PythonRuntime>(
    runtime: &mut R,
    source: &str,
) -> Result<ExecutionResult, BridgeError> {
    install_adapter(runtime).await?;
    let invocation = capture_invocation(source)?;
    let payload = runtime
        .run_python(&invocation)
        .await?
        .ok_or_else(|| BridgeError::Payload("adapter returned no value".into()))?;
    ExecutionResult::from_wire(&payload)
}
