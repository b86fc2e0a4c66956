use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::BridgeError;

/// Seam between the scan/delete engines and the external device bridge.
/// One invocation runs one shell command on the attached device and must
/// return within the given timeout.
pub trait Bridge: Send + Sync {
    fn shell(&self, command: &str, timeout: Duration) -> Result<String, BridgeError>;
}

/// Executor backed by the `adb` command-line tool.
pub struct AdbBridge {
    program: String,
}

impl AdbBridge {
    pub fn new() -> Self {
        Self {
            program: "adb".to_string(),
        }
    }

    /// Use a bridge binary other than `adb` from PATH.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for AdbBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Bridge for AdbBridge {
    fn shell(&self, command: &str, timeout: Duration) -> Result<String, BridgeError> {
        debug!("adb shell: {}", command);

        let mut child = Command::new(&self.program)
            .arg("shell")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| {
                debug!("failed to spawn {}: {}", self.program, err);
                BridgeError::BridgeUnavailable
            })?;

        // Drain both pipes off-thread so a chatty command cannot deadlock
        // against a full pipe buffer while we wait on the child.
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let stdout_reader = thread::spawn(move || drain(stdout_pipe));
        let stderr_reader = thread::spawn(move || drain(stderr_pipe));

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(BridgeError::Timeout(timeout));
                    }
                    thread::sleep(Duration::from_millis(25));
                }
                Err(err) => {
                    let _ = child.kill();
                    return Err(BridgeError::NonZeroExit {
                        status: -1,
                        stderr: err.to_string(),
                    });
                }
            }
        };

        let stdout_bytes = stdout_reader.join().unwrap_or_default();
        let stderr_bytes = stderr_reader.join().unwrap_or_default();

        // Undecodable path bytes become U+FFFD placeholders rather than
        // aborting the whole scan.
        let stdout_text = String::from_utf8_lossy(&stdout_bytes).into_owned();

        if status.success() {
            return Ok(stdout_text);
        }

        let stderr_text = String::from_utf8_lossy(&stderr_bytes).into_owned();
        Err(classify_failure(status.code().unwrap_or(-1), &stderr_text))
    }
}

fn drain(pipe: Option<impl Read>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    buf
}

fn classify_failure(status: i32, stderr: &str) -> BridgeError {
    let lower = stderr.to_ascii_lowercase();
    if lower.contains("no devices")
        || lower.contains("device not found")
        || lower.contains("device offline")
    {
        BridgeError::DeviceNotFound
    } else if lower.contains("unauthorized") {
        BridgeError::Unauthorized
    } else {
        BridgeError::NonZeroExit {
            status,
            stderr: stderr.trim().to_string(),
        }
    }
}

/// Quote a device path for embedding in a shell command string: the POSIX
/// single-quote dance, `'` becomes `'\''`.
pub fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'/' | b'.' | b'_' | b'-'));
    if plain {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', "'\\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_leaves_plain_paths_alone() {
        assert_eq!(quote("/sdcard/DCIM/img.jpg"), "/sdcard/DCIM/img.jpg");
    }

    #[test]
    fn quote_wraps_paths_with_spaces() {
        assert_eq!(
            quote("/sdcard/Download/file name.zip"),
            "'/sdcard/Download/file name.zip'"
        );
    }

    #[test]
    fn quote_escapes_embedded_single_quotes() {
        assert_eq!(quote("/sdcard/it's.mp4"), "'/sdcard/it'\\''s.mp4'");
    }

    #[test]
    fn classify_no_device() {
        let err = classify_failure(1, "adb: no devices/emulators found");
        assert!(matches!(err, BridgeError::DeviceNotFound));
    }

    #[test]
    fn classify_unauthorized() {
        let err = classify_failure(1, "error: device unauthorized.");
        assert!(matches!(err, BridgeError::Unauthorized));
    }

    #[test]
    fn classify_other_nonzero() {
        let err = classify_failure(127, "sh: find: not found");
        match err {
            BridgeError::NonZeroExit { status, stderr } => {
                assert_eq!(status, 127);
                assert_eq!(stderr, "sh: find: not found");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
