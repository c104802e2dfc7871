//! Integration tests exercising the C boundary end to end.
//!
//! These call the exported functions the way a C host would: raw buffers,
//! explicit lengths, null handles. The lossy contract is the thing under
//! test: failures must come back as null or false, never as a crash.

use std::ffi::c_char;
use std::fs;
use std::ptr;

use rxhandle::ffi::{
    RXH_MODE_FULL, RXH_MODE_SEARCH, RxPattern, rxh_compile, rxh_full_match, rxh_release,
    rxh_search, rxh_test,
};
use rxhandle::{MatchMode, Pattern, PatternError, Syntax};

/// Owns a handle for the duration of a test and releases it once.
struct Handle(*mut RxPattern);

impl Handle {
    fn compile(pattern: &[u8]) -> Self {
        Self(unsafe { rxh_compile(pattern.as_ptr().cast::<c_char>(), pattern.len()) })
    }

    fn is_null(&self) -> bool {
        self.0.is_null()
    }

    fn full(&self, subject: &[u8]) -> bool {
        unsafe { rxh_full_match(self.0, subject.as_ptr().cast(), subject.len()) }
    }

    fn search(&self, subject: &[u8]) -> bool {
        unsafe { rxh_search(self.0, subject.as_ptr().cast(), subject.len()) }
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        unsafe { rxh_release(self.0) };
    }
}

// ---------------------------------------------------------------------------
// compile
// ---------------------------------------------------------------------------

#[test]
fn valid_patterns_yield_a_handle() {
    for p in ["ab", "[0-9]+", "^ab$", "(a|b)*c", r"\d{2,4}", ""] {
        assert!(!Handle::compile(p.as_bytes()).is_null(), "{p:?} should compile");
    }
}

#[test]
fn invalid_patterns_yield_null() {
    for p in ["(a", "a)(b", "[z-a]", "*", r"\"] {
        assert!(Handle::compile(p.as_bytes()).is_null(), "{p:?} should not compile");
    }
}

// ---------------------------------------------------------------------------
// test: absent handle
// ---------------------------------------------------------------------------

#[test]
fn null_handle_never_matches() {
    let s = b"anything";
    unsafe {
        assert!(!rxh_full_match(ptr::null(), s.as_ptr().cast(), s.len()));
        assert!(!rxh_search(ptr::null(), s.as_ptr().cast(), s.len()));
        assert!(!rxh_test(ptr::null(), s.as_ptr().cast(), s.len(), RXH_MODE_FULL));
        assert!(!rxh_test(ptr::null(), s.as_ptr().cast(), s.len(), RXH_MODE_SEARCH));
    }
}

#[test]
fn failed_compile_then_test_is_false_not_a_crash() {
    let h = Handle::compile(b"(a");
    assert!(h.is_null());
    assert!(!h.full(b"a"));
    assert!(!h.search(b"(a"));
}

// ---------------------------------------------------------------------------
// test: the two named semantics
// ---------------------------------------------------------------------------

#[test]
fn full_match_semantics() {
    let h = Handle::compile(b"ab");
    assert!(h.full(b"ab"));
    assert!(!h.full(b"xaby"));
}

#[test]
fn search_semantics() {
    assert!(Handle::compile(b"ab").search(b"xaby"));
    assert!(!Handle::compile(b"^ab$").search(b"xaby"));
}

#[test]
fn digits_scenario() {
    let h = Handle::compile(b"[0-9]+");
    assert!(h.full(b"42") && h.search(b"42"));
    assert!(!h.full(b"abc") && !h.search(b"abc"));
}

#[test]
fn repeated_calls_agree() {
    let h = Handle::compile(b"a+b");
    let expected = (h.full(b"xaab"), h.search(b"xaab"));
    for _ in 0..50 {
        assert_eq!((h.full(b"xaab"), h.search(b"xaab")), expected);
    }
    assert_eq!(expected, (false, true));
}

// ---------------------------------------------------------------------------
// Explicit lengths: embedded NULs and non-terminated buffers
// ---------------------------------------------------------------------------

/// A C caller using strlen() would stop at the NUL and see only "ab".
/// With an explicit length the whole buffer is evaluated.
#[test]
fn subject_is_evaluated_past_embedded_nul() {
    let h = Handle::compile(br"ab\x00cd");
    assert!(h.full(b"ab\0cd"));
    assert!(!h.full(b"ab"));

    let tail = Handle::compile(b"cd$");
    assert!(tail.search(b"ab\0cd"));
}

#[test]
fn non_terminated_subject_buffer() {
    let h = Handle::compile(b"ab");
    let buf = [b'a', b'b', b'c'];
    assert!(unsafe { rxh_full_match(h.0, buf.as_ptr().cast(), 2) });
    assert!(!unsafe { rxh_full_match(h.0, buf.as_ptr().cast(), 3) });
}

// ---------------------------------------------------------------------------
// release
// ---------------------------------------------------------------------------

#[test]
fn releasing_null_is_a_no_op() {
    unsafe {
        rxh_release(ptr::null_mut());
        rxh_release(ptr::null_mut());
    }
}

// ---------------------------------------------------------------------------
// Safe API and configuration
// ---------------------------------------------------------------------------

#[test]
fn safe_api_surfaces_the_reason() {
    match Pattern::new("(a") {
        Err(PatternError::InvalidPattern { pattern, reason }) => {
            assert_eq!(pattern, "(a");
            assert!(!reason.is_empty());
        }
        other => panic!("expected InvalidPattern, got {other:?}"),
    }
}

#[test]
fn test_all_keeps_subject_order() {
    let results = rxhandle::test_all(
        "[0-9]+",
        &Syntax::default(),
        MatchMode::Full,
        &["42", "abc", "7"],
    )
    .unwrap();
    assert_eq!(results, vec![true, false, true]);
}

#[test]
fn config_file_controls_dialect() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rx.toml");
    fs::write(&path, "case_insensitive = true\n").unwrap();

    let syntax = Syntax::load(&path).unwrap();
    let p = Pattern::with_syntax("hello", &syntax).unwrap();
    assert!(p.test(b"HeLLo", MatchMode::Full));
}

#[test]
fn bad_config_file_names_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rx.toml");
    fs::write(&path, "no_such_option = 1\n").unwrap();

    let err = Syntax::load(&path).unwrap_err();
    assert_eq!(err.exit_code(), 3);
    assert!(err.to_string().contains("rx.toml"), "{err}");
}

#[test]
fn missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Syntax::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, PatternError::Io { .. }), "{err:?}");
    assert_eq!(err.exit_code(), 2);
}
