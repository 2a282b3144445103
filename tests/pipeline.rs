use std::sync::Arc;

use edge_viewer_lib::convert;
use edge_viewer_lib::ffi;
use edge_viewer_lib::logging::LogSink;
use edge_viewer_lib::{Bridge, Frame, ProcessingMode};
use parking_lot::Mutex;
use tempfile::TempDir;

/// Diagonal colour gradient with a bright square in the middle.
fn scene(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let inside = x > width / 4 && x < 3 * width / 4 && y > height / 4 && y < 3 * height / 4;
            if inside {
                data.extend_from_slice(&[255, 255, 255, 180]);
            } else {
                let v = ((x + y) * 3 % 200) as u8;
                data.extend_from_slice(&[v, v / 2, 255 - v, 180]);
            }
        }
    }
    data
}

fn ready() -> Bridge {
    let mut bridge = Bridge::new();
    assert!(bridge.initialize());
    bridge
}

#[test]
fn every_mode_returns_a_full_rgba_buffer() {
    let bridge = ready();
    for (w, h) in [(1, 1), (2, 3), (17, 9), (64, 48)] {
        let input = scene(w, h);
        for mode in [0, 1, 2, 3, -7, i32::MAX] {
            let out = bridge
                .process_frame(&input, w as i32, h as i32, mode)
                .unwrap_or_else(|| panic!("{w}x{h} mode {mode} failed"));
            assert_eq!(out.len(), w * h * 4);
        }
    }
}

#[test]
fn grayscale_output_is_neutral() {
    let bridge = ready();
    let out = bridge.process_frame(&scene(20, 20), 20, 20, 2).unwrap();
    for px in out.chunks_exact(4) {
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        assert_eq!(px[3], 255);
    }
}

#[test]
fn edge_map_is_binary_and_black_input_has_no_edges() {
    let bridge = ready();
    let out = bridge.process_frame(&scene(40, 30), 40, 30, 0).unwrap();
    assert!(out
        .chunks_exact(4)
        .all(|px| (px[0] == 0 || px[0] == 255) && px[0] == px[1] && px[1] == px[2]));
    assert!(out.chunks_exact(4).any(|px| px[0] == 255));

    let black = vec![0u8; 40 * 30 * 4];
    let out = bridge.process_frame(&black, 40, 30, 0).unwrap();
    assert!(out.chunks_exact(4).all(|px| px[..3] == [0, 0, 0]));
}

#[test]
fn gradient_of_uniform_colour_is_zero() {
    let bridge = ready();
    let input = [33u8, 144, 210, 255].repeat(25 * 15);
    let out = bridge.process_frame(&input, 25, 15, 1).unwrap();
    assert!(out.chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
}

#[test]
fn mismatched_lengths_always_fail() {
    let bridge = ready();
    let input = scene(8, 8);
    assert!(bridge.process_frame(&input[..255], 8, 8, 0).is_none());
    assert!(bridge.process_frame(&input, 8, 9, 0).is_none());
    assert!(bridge.process_frame(&input, 0, 64, 0).is_none());
    assert!(bridge.process_frame(&[], 0, 0, 0).is_none());
}

#[test]
fn throughput_is_zero_then_positive() {
    let bridge = ready();
    assert_eq!(bridge.throughput(), 0.0);
    bridge.process_frame(&scene(32, 32), 32, 32, 0).unwrap();
    assert!(bridge.throughput() > 0.0);
}

#[test]
fn release_then_process_fails() {
    let mut bridge = ready();
    bridge.release();
    bridge.release();
    assert!(bridge.process_frame(&scene(4, 4), 4, 4, 2).is_none());
}

#[test]
fn identity_round_trip_keeps_rgb_and_resets_alpha() {
    let input = scene(6, 5);
    let frame = Frame::from_boundary(&input, 6, 5).unwrap();
    let back = convert::to_output_format(&convert::to_working_format(&frame).unwrap()).unwrap();
    for (a, b) in input.chunks_exact(4).zip(back.pixels()) {
        assert_eq!(&a[..3], &b[..3]);
        assert_eq!(b[3], 255);
    }
}

#[test]
fn c_abi_matches_bridge_output() {
    let input = scene(12, 10);
    let expected = ready().process_frame(&input, 12, 10, 1).unwrap();

    unsafe {
        let handle = ffi::edge_viewer_create();
        assert!(ffi::edge_viewer_initialize(handle));
        let mut len = 0usize;
        let out =
            ffi::edge_viewer_process_frame(handle, input.as_ptr(), input.len(), 12, 10, 1, &mut len);
        assert!(!out.is_null());
        assert_eq!(std::slice::from_raw_parts(out, len), expected.as_slice());
        ffi::edge_viewer_free_buffer(out, len);

        ffi::edge_viewer_release(handle);
        let again =
            ffi::edge_viewer_process_frame(handle, input.as_ptr(), input.len(), 12, 10, 1, &mut len);
        assert!(again.is_null());
        ffi::edge_viewer_destroy(handle);
    }
}

#[test]
fn open_reads_mode_from_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("edge-viewer.json");
    std::fs::write(&path, r#"{"defaultMode":"gradient_magnitude","logLevel":"debug"}"#).unwrap();

    let mut bridge = edge_viewer_lib::open(&path);
    assert_eq!(bridge.current_mode(), Some(ProcessingMode::GradientMagnitude));
    assert!(bridge.process_current(&scene(4, 4), 4, 4).is_some());
    assert_eq!(bridge.cycle_mode(), ProcessingMode::Grayscale);
}

#[test]
fn open_without_config_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let bridge = edge_viewer_lib::open(&dir.path().join("missing.json"));
    assert_eq!(bridge.current_mode(), Some(ProcessingMode::EdgeDetect));
}

#[test]
fn remembered_mode_is_used_by_the_next_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("edge-viewer.json");
    std::fs::write(&path, r#"{"logLevel":"debug","snapshotQuality":60}"#).unwrap();

    edge_viewer_lib::remember_mode(&path, ProcessingMode::Grayscale).unwrap();
    let bridge = edge_viewer_lib::open(&path);
    assert_eq!(bridge.current_mode(), Some(ProcessingMode::Grayscale));
    assert_eq!(bridge.config().jpeg_quality(), 60);
}

#[test]
fn reset_config_restores_defaults_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("edge-viewer.json");
    edge_viewer_lib::remember_mode(&path, ProcessingMode::GradientMagnitude).unwrap();

    edge_viewer_lib::reset_config(&path).unwrap();
    assert!(path.exists());
    let bridge = edge_viewer_lib::open(&path);
    assert_eq!(bridge.current_mode(), Some(ProcessingMode::EdgeDetect));
}

#[test]
fn reopened_session_reports_fresh_throughput() {
    let mut bridge = ready();
    assert!(bridge.process_frame(&scene(8, 8), 8, 8, 0).is_some());
    assert!(bridge.throughput() > 0.0);
    bridge.release();
    assert!(bridge.initialize());
    assert_eq!(bridge.throughput(), 0.0);
    assert_eq!(bridge.diagnostics().frames_processed, 0);
}

struct Recorder(Mutex<Vec<String>>);

impl LogSink for Recorder {
    fn write(&self, _level: log::Level, tag: &str, message: &str) {
        self.0.lock().push(format!("{tag}: {message}"));
    }
}

#[test]
fn rejected_frames_reach_the_log_sink() {
    let bridge = ready();
    let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
    assert!(bridge.install_log_sink(recorder.clone()));
    assert!(!bridge.install_log_sink(recorder.clone()));

    assert!(bridge.process_frame(&[1, 2, 3], 1, 1, 0).is_none());
    let lines = recorder.0.lock();
    assert!(
        lines.iter().any(|l| l.contains("frame rejected")),
        "{lines:?}"
    );
}
