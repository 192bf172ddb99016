//! Snapshot capture through the camera's HTTP API.
//!
//! The request runs on its own thread; the caller gets a
//! [`JoinHandle`] it may ignore. A failed capture is logged, never raised
//! into robot code.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{info, warn};
use yall_types::YallError;

/// Port the camera serves its HTTP API on.
pub const API_PORT: u16 = 5807;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// `http://<camera>.local:5807/capturesnapshot`
pub fn snapshot_url(camera: &str) -> String {
    format!("http://{camera}.local:{API_PORT}/capturesnapshot")
}

/// Issue the capture request and wait for the response.
///
/// `snapshot_name` is sent as the `snapname` header unless empty.
pub fn capture_snapshot(url: &str, snapshot_name: &str) -> Result<(), YallError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| YallError::Snapshot(format!("HTTP client: {e}")))?;

    let mut request = client.get(url);
    if !snapshot_name.is_empty() {
        request = request.header("snapname", snapshot_name);
    }

    let response = request
        .send()
        .map_err(|e| YallError::Snapshot(format!("{url} unreachable: {e}")))?;
    if !response.status().is_success() {
        return Err(YallError::Snapshot(format!(
            "{url} returned HTTP {}",
            response.status()
        )));
    }
    Ok(())
}

/// Run [`capture_snapshot`] on a named background thread.
///
/// # Errors
///
/// Only if the thread cannot be spawned; request failures are logged by the
/// worker and returned through the handle.
pub fn spawn_capture(url: String, snapshot_name: String) -> Result<JoinHandle<Result<(), YallError>>, YallError> {
    thread::Builder::new()
        .name("yall-snapshot".to_string())
        .spawn(move || {
            let result = capture_snapshot(&url, &snapshot_name);
            match &result {
                Ok(()) => info!(%url, snapshot = %snapshot_name, "snapshot captured"),
                Err(e) => warn!(%url, snapshot = %snapshot_name, error = %e, "snapshot failed"),
            }
            result
        })
        .map_err(|e| YallError::Snapshot(format!("failed to spawn snapshot thread: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_targets_camera_host() {
        assert_eq!(
            snapshot_url("limelight-front"),
            "http://limelight-front.local:5807/capturesnapshot"
        );
    }

    #[test]
    fn unreachable_camera_reports_through_handle() {
        // Port 9 on loopback: nothing listens, the connection is refused.
        let handle = spawn_capture("http://127.0.0.1:9/capturesnapshot".to_string(), "test".to_string())
            .unwrap();
        let result = handle.join().unwrap();
        assert!(matches!(result, Err(YallError::Snapshot(_))));
    }
}
