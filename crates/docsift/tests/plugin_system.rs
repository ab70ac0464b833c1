//! Custom decoders and custom parsing backends.

use docsift::plugins::{Decoder, Detector, ParseContext, ParsingBackend, Plugin, TextSink};
use docsift::{AutoDetectBackend, Extractor, ExtractorConfig, Metadata, Result, keys};
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

struct RedactingDecoder {
    shut_down: Arc<AtomicBool>,
}

impl Plugin for RedactingDecoder {
    fn name(&self) -> &str {
        "redacting-decoder"
    }

    fn version(&self) -> String {
        "0.3.0".to_string()
    }

    fn shutdown(&self) -> Result<()> {
        self.shut_down.store(true, Ordering::SeqCst);
        Ok(())
    }
}

impl Decoder for RedactingDecoder {
    fn supported_mime_types(&self) -> &[&str] {
        &["text/plain"]
    }

    fn priority(&self) -> i32 {
        100
    }

    fn decode(
        &self,
        stream: &mut dyn Read,
        metadata: &mut Metadata,
        sink: &mut TextSink,
        _ctx: &ParseContext,
    ) -> Result<()> {
        let mut text = String::new();
        stream.read_to_string(&mut text)?;
        sink.push(&text.replace("secret", "[redacted]"));
        metadata.set("redacted", "true");
        Ok(())
    }
}

/// Backend that treats every input as one opaque record.
struct RecordBackend;

impl Detector for RecordBackend {
    fn detect(&self, _stream: &mut dyn Read, _metadata: &Metadata) -> Result<String> {
        Ok("application/x-record".to_string())
    }
}

impl ParsingBackend for RecordBackend {
    fn parse(
        &self,
        stream: &mut dyn Read,
        metadata: &mut Metadata,
        sink: &mut TextSink,
        _ctx: &ParseContext,
    ) -> Result<()> {
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes)?;
        if !metadata.contains(keys::CONTENT_TYPE) {
            metadata.set(keys::CONTENT_TYPE, "application/x-record");
        }
        metadata.add("record:size", bytes.len().to_string());
        sink.push(&format!("record of {} bytes", bytes.len()));
        Ok(())
    }
}

#[test]
fn test_higher_priority_decoder_takes_over() {
    let config = ExtractorConfig::default();
    let backend = AutoDetectBackend::with_config(&config);
    backend
        .register(Arc::new(RedactingDecoder {
            shut_down: Arc::new(AtomicBool::new(false)),
        }))
        .unwrap();
    let extractor = Extractor::with_backend(Arc::new(backend), config);

    let result = extractor
        .extract_bytes_with_hints(b"the secret plan", "", "text/plain")
        .unwrap();

    assert_eq!(result.text(), "the [redacted] plan");
    assert_eq!(result.metadata_value("redacted"), Some("true"));
    assert_eq!(result.metadata_value(keys::PARSED_BY), Some("redacting-decoder"));
}

#[test]
fn test_unregister_restores_builtin() {
    let shut_down = Arc::new(AtomicBool::new(false));
    let backend = Arc::new(AutoDetectBackend::new());
    backend
        .register(Arc::new(RedactingDecoder {
            shut_down: Arc::clone(&shut_down),
        }))
        .unwrap();
    assert!(backend.decoders().contains(&"redacting-decoder".to_string()));

    backend.unregister("redacting-decoder").unwrap();
    assert!(shut_down.load(Ordering::SeqCst));

    let extractor = Extractor::with_backend(backend, ExtractorConfig::default());
    let result = extractor
        .extract_bytes_with_hints(b"the secret plan", "", "text/plain")
        .unwrap();
    assert_eq!(result.text(), "the secret plan");
}

#[test]
fn test_decoders_are_per_backend() {
    let patched = AutoDetectBackend::new();
    patched
        .register(Arc::new(RedactingDecoder {
            shut_down: Arc::new(AtomicBool::new(false)),
        }))
        .unwrap();

    let untouched = AutoDetectBackend::new();

    assert!(patched.decoders().contains(&"redacting-decoder".to_string()));
    assert!(!untouched.decoders().contains(&"redacting-decoder".to_string()));
}

#[test]
fn test_unregister_unknown_decoder_is_noop() {
    let backend = AutoDetectBackend::new();
    let before = backend.decoders();

    backend.unregister("no-such-decoder").unwrap();

    assert_eq!(backend.decoders(), before);
}

#[test]
fn test_custom_backend_receives_hints() {
    let extractor = Extractor::with_backend(Arc::new(RecordBackend), ExtractorConfig::default());

    let hinted = extractor
        .extract_bytes_with_hints(b"12345", "row.rec", "application/x-row")
        .unwrap();
    assert_eq!(hinted.content_type(), "application/x-row");
    assert_eq!(hinted.text(), "record of 5 bytes");
    assert_eq!(hinted.metadata_value(keys::RESOURCE_NAME), Some("row.rec"));

    let sniffed = extractor.extract_bytes(b"abc").unwrap();
    assert_eq!(sniffed.content_type(), "application/x-record");
    assert_eq!(sniffed.metadata_value("record:size"), Some("3"));
}

#[test]
fn test_empty_backend_yields_empty_documents() {
    let config = ExtractorConfig::default();
    let extractor = Extractor::with_backend(Arc::new(AutoDetectBackend::empty(&config)), config);

    let result = extractor.extract_bytes_with_hints(b"some text", "a.txt", "").unwrap();

    assert_eq!(result.content_type(), "text/plain");
    assert!(result.text().is_empty());
}
