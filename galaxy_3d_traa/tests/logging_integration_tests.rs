//! Integration tests for TRAA pass logging
//!
//! Run with: cargo test --test logging_integration_tests

mod traa_test_utils;

use galaxy_3d_traa::galaxy3d::Engine;
use galaxy_3d_traa::galaxy3d::log::{Logger, LogEntry, LogSeverity};
use galaxy_3d_traa::galaxy3d::render::{ChannelFlags, CpuRenderer, Mrt, Renderer, TextureFormat};
use galaxy_3d_traa::galaxy3d::traa::{TraaConfig, TraaPass, TraaPassDesc};
use galaxy_3d_traa::galaxy3d::Error;
use std::sync::{Arc, Mutex};
use serial_test::serial;
use traa_test_utils::*;

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Captures entries emitted by the TRAA pass
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source.starts_with("galaxy3d::TraaPass") {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

fn desc(mrt: Option<Mrt>) -> TraaPassDesc {
    let renderer: Arc<Mutex<dyn Renderer>> = Arc::new(Mutex::new(CpuRenderer::new(4, 4)));
    TraaPassDesc {
        renderer,
        scene: Arc::new(flat_scene()),
        camera: Arc::new(Mutex::new(test_camera())),
        mrt,
        format: TextureFormat::R16G16B16A16_SFLOAT,
        config: TraaConfig::default(),
    }
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_missing_mrt_is_logged() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    let result = TraaPass::from_desc(desc(None));
    assert!(matches!(result, Err(Error::MissingMrtConfig)));

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].severity, LogSeverity::Error);
        assert_eq!(captured[0].message, "Missing MRT configuration");
        assert!(captured[0].file.is_some());
    }

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_missing_velocity_is_logged() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    let result = TraaPass::from_desc(desc(Some(Mrt::new(ChannelFlags::NORMAL))));
    assert!(matches!(result, Err(Error::MissingVelocityChannel)));

    {
        let captured = entries.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].message, "Missing velocity output in MRT configuration");
    }

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_lifecycle_is_logged() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);
    Engine::set_min_severity(LogSeverity::Info);

    let mut pass = TraaPass::from_desc(desc(Some(Mrt::output_velocity()))).unwrap();
    pass.render_frame().unwrap();
    pass.dispose();

    {
        let captured = entries.lock().unwrap();
        assert!(captured.iter().all(|e| e.severity >= LogSeverity::Info));
        assert!(captured.iter().any(|e| e.message.starts_with("TRAA pass ready")));
        assert!(captured.iter().any(|e| e.message == "TRAA pass disposed"));
    }

    Engine::set_min_severity(LogSeverity::Debug);
    Engine::reset_logger();
}
