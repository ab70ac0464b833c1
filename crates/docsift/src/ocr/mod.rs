//! OCR through an external backend executable.
//!
//! The backend is invoked tesseract-style:
//!
//! ```text
//! <backend_path> stdin stdout -l <language> [extra_args...]
//! ```
//!
//! The image bytes are written to the child's stdin and the recognized text is
//! read from its stdout. The call blocks until the process exits or its
//! timeout passes, at which point the process is killed.

use crate::core::config::OcrConfig;
use crate::{DocsiftError, Result};
use std::io::{ErrorKind, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Run OCR over an encoded image and return the trimmed recognized text.
///
/// # Errors
///
/// - `DocsiftError::MissingDependency` if the backend executable cannot be found
/// - `DocsiftError::Ocr` if the process cannot be driven, exits unsuccessfully
///   (stderr is included in the message) or outlives `config.timeout_secs`
pub fn run_ocr(image: &[u8], config: &OcrConfig) -> Result<String> {
    let mut command = Command::new(&config.backend_path);
    command
        .arg("stdin")
        .arg("stdout")
        .arg("-l")
        .arg(&config.language)
        .args(&config.extra_args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    tracing::debug!(
        backend = %config.backend_path.display(),
        language = %config.language,
        image_bytes = image.len(),
        timeout_secs = config.timeout_secs,
        "Invoking OCR backend"
    );

    let mut child = command.spawn().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            DocsiftError::MissingDependency(format!(
                "OCR backend '{}' not found. Install tesseract or configure the backend path.",
                config.backend_path.display()
            ))
        } else {
            DocsiftError::ocr_with_source(
                format!("Failed to start OCR backend '{}'", config.backend_path.display()),
                e,
            )
        }
    })?;

    let (Some(mut stdin), Some(stdout), Some(stderr)) =
        (child.stdin.take(), child.stdout.take(), child.stderr.take())
    else {
        kill(&mut child);
        return Err(DocsiftError::ocr("OCR backend pipes were not captured"));
    };

    // Pipe threads are never joined on timeout: a grandchild may keep the pipes open.
    let input = image.to_vec();
    let writer = thread::spawn(move || stdin.write_all(&input));
    let stdout_reader = drain(stdout);
    let stderr_reader = drain(stderr);

    let status = wait_with_deadline(&mut child, config)?;

    match writer.join() {
        // The backend may exit before draining its input; its exit status decides.
        Ok(Err(e)) if e.kind() != ErrorKind::BrokenPipe => {
            return Err(DocsiftError::ocr_with_source("Failed to send image to OCR backend", e));
        }
        Err(_) => return Err(DocsiftError::ocr("OCR input writer panicked")),
        _ => {}
    }

    let stdout = collect(stdout_reader)?;
    let stderr = collect(stderr_reader)?;

    if !status.success() {
        let stderr = String::from_utf8_lossy(&stderr);
        return Err(DocsiftError::ocr(format!(
            "OCR backend '{}' exited with {}: {}",
            config.backend_path.display(),
            status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&stdout).trim().to_string())
}

fn wait_with_deadline(child: &mut Child, config: &OcrConfig) -> Result<ExitStatus> {
    let deadline = Instant::now() + config.timeout();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) if Instant::now() >= deadline => {
                kill(child);
                tracing::warn!(
                    backend = %config.backend_path.display(),
                    timeout_secs = config.timeout_secs,
                    "OCR backend timed out"
                );
                return Err(DocsiftError::ocr(format!(
                    "OCR backend '{}' timed out after {} seconds",
                    config.backend_path.display(),
                    config.timeout_secs
                )));
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                kill(child);
                return Err(DocsiftError::ocr_with_source("Failed to wait for OCR backend", e));
            }
        }
    }
}

fn kill(child: &mut Child) {
    if let Err(e) = child.kill() {
        tracing::debug!(error = %e, "OCR backend already exited");
    }
    let _ = child.wait();
}

fn drain(mut pipe: impl Read + Send + 'static) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(reader: JoinHandle<std::io::Result<Vec<u8>>>) -> Result<Vec<u8>> {
    match reader.join() {
        Ok(Ok(bytes)) => Ok(bytes),
        Ok(Err(e)) => Err(DocsiftError::ocr_with_source("Failed to read OCR backend output", e)),
        Err(_) => Err(DocsiftError::ocr("OCR output reader panicked")),
    }
}
