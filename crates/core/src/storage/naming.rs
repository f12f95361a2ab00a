//! Generated file names and content type inference.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Last stamp handed out in this process.
static LAST_STAMP: AtomicU64 = AtomicU64::new(0);

/// Returns a process-wide strictly increasing stamp.
///
/// The stamp is the wall clock in nanoseconds since the Unix epoch, bumped
/// past the previous stamp whenever the clock has not advanced (coarse
/// clocks, bursts of uploads, clock steps backwards).
pub fn next_stamp() -> u64 {
    let now = now_nanos();
    let mut prev = LAST_STAMP.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(prev.saturating_add(1));
        match LAST_STAMP.compare_exchange_weak(
            prev,
            candidate,
            Ordering::AcqRel,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate,
            Err(actual) => prev = actual,
        }
    }
}

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
}

/// Lower-cased extension of an uploaded file name, including the dot.
///
/// Only ASCII alphanumerics survive; anything else yields no extension.
#[must_use]
pub fn extension_of(original_name: &str) -> String {
    let Some(ext) = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
    else {
        return String::new();
    };

    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return String::new();
    }

    format!(".{}", ext.to_ascii_lowercase())
}

/// Generates a fresh name for an upload: `{stamp}{.ext}`.
pub(crate) fn generate_name(original_name: &str) -> String {
    format!("{}{}", next_stamp(), extension_of(original_name))
}

/// Content type served for a stored file, from its extension.
#[must_use]
pub fn content_type_for(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // Generated names never carry upper-case letters or path separators,
    // whatever the client sent as the original file name.
    proptest! {
        #[test]
        fn prop_generated_name_is_flat_and_lowercase(original in ".*") {
            let name = generate_name(&original);
            prop_assert!(!name.contains('/'));
            prop_assert!(!name.contains('\\'));
            prop_assert_eq!(name.to_ascii_lowercase(), name.clone());
            prop_assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || c == '.'));
        }
    }

    // The extension of a generated name is exactly the lower-cased client extension.
    proptest! {
        #[test]
        fn prop_extension_preserved(stem in "[a-zA-Z0-9_-]{1,20}", ext in "[a-zA-Z0-9]{1,5}") {
            let name = generate_name(&format!("{stem}.{ext}"));
            let expected = format!(".{}", ext.to_ascii_lowercase());
            prop_assert!(name.ends_with(&expected));
        }
    }
}
