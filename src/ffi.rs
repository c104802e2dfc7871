//! C boundary. Every failure becomes the operation's negative value (a null
//! handle or `false`); no error detail crosses.
//!
//! Enable logging with: `rxh_init_logging()` and `RUST_LOG=rxhandle=debug`

use std::ffi::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::slice;

use log::{debug, trace, warn};

use crate::config::Syntax;
use crate::pattern::Pattern;
use crate::types::MatchMode;

/// Opaque handle returned by `rxh_compile`. Layout is private to Rust.
pub struct RxPattern {
    pattern: Pattern,
}

/// Mode flag for `rxh_test`.
pub type RxMatchMode = u32;
pub const RXH_MODE_FULL: RxMatchMode = 0;
pub const RXH_MODE_SEARCH: RxMatchMode = 1;

static VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("RXHANDLE_BUILD_COMMIT"),
    ")\0"
);

/// View `len` bytes at `ptr`. A null pointer is only acceptable for an
/// empty buffer.
///
/// # Safety
/// A non-null `ptr` must be valid for reads of `len` bytes for `'a`.
unsafe fn bytes<'a>(ptr: *const c_char, len: usize) -> Option<&'a [u8]> {
    if ptr.is_null() {
        return (len == 0).then_some(&[][..]);
    }
    // SAFETY: upheld by the caller.
    Some(unsafe { slice::from_raw_parts(ptr.cast::<u8>(), len) })
}

/// Compile `len` bytes of `pattern` with the default dialect.
///
/// Returns null if the pattern does not compile. Embedded NUL bytes are part
/// of the pattern.
///
/// # Safety
/// `pattern` must be valid for reads of `len` bytes, or null with `len == 0`.
/// A non-null result must be released exactly once with `rxh_release`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rxh_compile(pattern: *const c_char, len: usize) -> *mut RxPattern {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        // SAFETY: upheld by the caller.
        let Some(source) = (unsafe { bytes(pattern, len) }) else {
            debug!("rxh_compile: null pattern with length {len}");
            return ptr::null_mut();
        };
        match Pattern::from_bytes(source, &Syntax::default()) {
            Ok(pattern) => {
                let handle = Box::into_raw(Box::new(RxPattern { pattern }));
                trace!("rxh_compile: {handle:p}");
                handle
            }
            Err(e) => {
                debug!("rxh_compile: {e}");
                ptr::null_mut()
            }
        }
    }));

    result.unwrap_or_else(|_| {
        warn!("rxh_compile: panic contained at boundary");
        ptr::null_mut()
    })
}

/// Shared body of the test entry points.
///
/// # Safety
/// As for `rxh_test`.
unsafe fn test_with(
    handle: *const RxPattern,
    subject: *const c_char,
    len: usize,
    mode: MatchMode,
) -> bool {
    if handle.is_null() {
        return false;
    }

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        // SAFETY: upheld by the caller.
        let handle = unsafe { &*handle };
        // SAFETY: upheld by the caller.
        let Some(subject) = (unsafe { bytes(subject, len) }) else {
            return false;
        };
        handle.pattern.test(subject, mode)
    }));

    result.unwrap_or_else(|_| {
        warn!("rxh_test: panic contained at boundary");
        false
    })
}

/// True if all `len` bytes of `subject` match the pattern end to end.
///
/// # Safety
/// `handle` must be null or a live handle from `rxh_compile`. `subject` must
/// be valid for reads of `len` bytes, or null with `len == 0`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rxh_full_match(
    handle: *const RxPattern,
    subject: *const c_char,
    len: usize,
) -> bool {
    // SAFETY: same contract.
    unsafe { test_with(handle, subject, len, MatchMode::Full) }
}

/// True if the pattern matches some substring of the `len` bytes of `subject`.
///
/// # Safety
/// As for `rxh_full_match`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rxh_search(
    handle: *const RxPattern,
    subject: *const c_char,
    len: usize,
) -> bool {
    // SAFETY: same contract.
    unsafe { test_with(handle, subject, len, MatchMode::Search) }
}

/// Mode-flag form: `RXH_MODE_FULL` or `RXH_MODE_SEARCH`. Any other value
/// returns false.
///
/// # Safety
/// As for `rxh_full_match`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rxh_test(
    handle: *const RxPattern,
    subject: *const c_char,
    len: usize,
    mode: RxMatchMode,
) -> bool {
    let mode = match mode {
        RXH_MODE_FULL => MatchMode::Full,
        RXH_MODE_SEARCH => MatchMode::Search,
        other => {
            debug!("rxh_test: unknown mode {other}");
            return false;
        }
    };
    // SAFETY: same contract.
    unsafe { test_with(handle, subject, len, mode) }
}

/// Release a handle. Null is a no-op.
///
/// # Safety
/// `handle` must be null or a live handle from `rxh_compile` that has not
/// been released. It must not be used afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rxh_release(handle: *mut RxPattern) {
    if handle.is_null() {
        return;
    }
    trace!("rxh_release: {handle:p}");
    // SAFETY: upheld by the caller; the box came from `rxh_compile`.
    drop(unsafe { Box::from_raw(handle) });
}

/// Install the `env_logger` backend. Safe to call more than once.
#[unsafe(no_mangle)]
pub extern "C" fn rxh_init_logging() {
    let _ = env_logger::try_init();
}

/// Library version and build commit, e.g. `0.1.0 (1a2b3c4)`, as a static
/// NUL-terminated string. Never free it.
#[unsafe(no_mangle)]
pub extern "C" fn rxh_version() -> *const c_char {
    VERSION.as_ptr().cast::<c_char>()
}
