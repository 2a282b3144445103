//! C ABI over [`Bridge`].
//!
//! The host owns the handle returned by [`edge_viewer_create`] and must
//! pass it to [`edge_viewer_destroy`] exactly once. Output buffers are
//! allocated here and must be returned through [`edge_viewer_free_buffer`]
//! with the length reported alongside them.

use std::ffi::{c_char, CStr, CString};
use std::ptr;
use std::sync::Arc;

use log::{Level, LevelFilter};

use crate::bridge::Bridge;
use crate::logging::{self, LogSink};
use crate::settings::BridgeConfig;

/// Host log function: `(android priority, tag, message)`, strings are
/// NUL-terminated and only valid for the duration of the call.
pub type LogCallback = extern "C" fn(priority: i32, tag: *const c_char, message: *const c_char);

struct CallbackSink(LogCallback);

impl LogSink for CallbackSink {
    fn write(&self, level: Level, tag: &str, message: &str) {
        let tag = to_c_string(tag);
        let message = to_c_string(message);
        (self.0)(logging::android_priority(level), tag.as_ptr(), message.as_ptr());
    }
}

fn to_c_string(s: &str) -> CString {
    CString::new(s.replace('\0', " ")).unwrap_or_default()
}

fn level_filter(level: i32) -> LevelFilter {
    match level {
        i32::MIN..=0 => LevelFilter::Off,
        1 => LevelFilter::Error,
        2 => LevelFilter::Warn,
        3 => LevelFilter::Info,
        4 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Create a bridge with default config. Never returns null.
#[no_mangle]
pub extern "C" fn edge_viewer_create() -> *mut Bridge {
    Box::into_raw(Box::new(Bridge::new()))
}

/// Create a bridge from a JSON config string. Falls back to defaults when
/// `config_json` is null or does not parse.
///
/// # Safety
/// `config_json` must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn edge_viewer_create_with_config(config_json: *const c_char) -> *mut Bridge {
    let config = if config_json.is_null() {
        BridgeConfig::default()
    } else {
        let raw = CStr::from_ptr(config_json).to_string_lossy();
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("invalid bridge config, using defaults: {e}");
            BridgeConfig::default()
        })
    };
    Box::into_raw(Box::new(Bridge::with_config(config)))
}

/// # Safety
/// `handle` must be null or a live pointer from `edge_viewer_create*`.
#[no_mangle]
pub unsafe extern "C" fn edge_viewer_initialize(handle: *mut Bridge) -> bool {
    match handle.as_mut() {
        Some(bridge) => bridge.initialize(),
        None => false,
    }
}

/// Process one RGBA frame.
///
/// Returns a newly allocated `width * height * 4` byte buffer and writes
/// its length to `out_len`, or returns null on failure.
///
/// # Safety
/// `handle` must be null or a live bridge pointer. `bytes` must be null or
/// valid for reads of `len` bytes for the duration of the call. `out_len`
/// must be null or valid for a write.
#[no_mangle]
pub unsafe extern "C" fn edge_viewer_process_frame(
    handle: *const Bridge,
    bytes: *const u8,
    len: usize,
    width: i32,
    height: i32,
    mode: i32,
    out_len: *mut usize,
) -> *mut u8 {
    let Some(bridge) = handle.as_ref() else {
        return ptr::null_mut();
    };
    let input: &[u8] = if bytes.is_null() || len == 0 {
        &[]
    } else {
        std::slice::from_raw_parts(bytes, len)
    };
    match bridge.process_frame(input, width, height, mode) {
        Some(out) => into_raw_buffer(out, out_len),
        None => ptr::null_mut(),
    }
}

/// Process one RGBA frame with the bridge's current mode.
///
/// # Safety
/// Same contract as [`edge_viewer_process_frame`].
#[no_mangle]
pub unsafe extern "C" fn edge_viewer_process_current(
    handle: *const Bridge,
    bytes: *const u8,
    len: usize,
    width: i32,
    height: i32,
    out_len: *mut usize,
) -> *mut u8 {
    match handle.as_ref() {
        Some(bridge) => {
            edge_viewer_process_frame(handle, bytes, len, width, height, bridge.mode_code(), out_len)
        }
        None => ptr::null_mut(),
    }
}

unsafe fn into_raw_buffer(out: Vec<u8>, out_len: *mut usize) -> *mut u8 {
    let boxed = out.into_boxed_slice();
    if let Some(len) = out_len.as_mut() {
        *len = boxed.len();
    }
    Box::into_raw(boxed) as *mut u8
}

/// Free a buffer returned by `edge_viewer_process_*`.
///
/// # Safety
/// `buffer` must be null or a pointer returned by this library that has
/// not been freed, and `len` the length reported with it.
#[no_mangle]
pub unsafe extern "C" fn edge_viewer_free_buffer(buffer: *mut u8, len: usize) {
    if buffer.is_null() {
        return;
    }
    drop(Box::from_raw(ptr::slice_from_raw_parts_mut(buffer, len)));
}

/// # Safety
/// `handle` must be null or a live bridge pointer.
#[no_mangle]
pub unsafe extern "C" fn edge_viewer_set_mode(handle: *mut Bridge, mode: i32) {
    if let Some(bridge) = handle.as_mut() {
        bridge.set_mode(mode);
    }
}

/// Advance to the next mode and return its code, or -1 for a null handle.
///
/// # Safety
/// `handle` must be null or a live bridge pointer.
#[no_mangle]
pub unsafe extern "C" fn edge_viewer_cycle_mode(handle: *mut Bridge) -> i32 {
    match handle.as_mut() {
        Some(bridge) => bridge.cycle_mode().code(),
        None => -1,
    }
}

/// # Safety
/// `handle` must be null or a live bridge pointer.
#[no_mangle]
pub unsafe extern "C" fn edge_viewer_release(handle: *mut Bridge) {
    if let Some(bridge) = handle.as_mut() {
        bridge.release();
    }
}

/// Release and free the bridge.
///
/// # Safety
/// `handle` must be null or a pointer from `edge_viewer_create*` that has
/// not already been destroyed. It must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn edge_viewer_destroy(handle: *mut Bridge) {
    if handle.is_null() {
        return;
    }
    let mut bridge = Box::from_raw(handle);
    bridge.release();
}

/// # Safety
/// `handle` must be null or a live bridge pointer.
#[no_mangle]
pub unsafe extern "C" fn edge_viewer_throughput(handle: *const Bridge) -> f32 {
    handle.as_ref().map_or(0.0, Bridge::throughput)
}

/// Route library logging to `callback`. `level` is 0 (off) through
/// 5 (trace). Only the first successful call per process takes effect.
#[no_mangle]
pub extern "C" fn edge_viewer_set_log_callback(callback: LogCallback, level: i32) -> bool {
    logging::install(Arc::new(CallbackSink(callback)), level_filter(level))
}
