//! Handle generation.
//!
//! Handles keep a log-friendly shape, `name::mm:ss.ffff::Type::seq`. The
//! timestamp alone can repeat within the same tenth of a millisecond, so a
//! process-wide sequence number is appended to make every handle unique.

use chrono::{Local, Timelike};
use std::sync::atomic::{AtomicU64, Ordering};

/// Separator between handle segments.
pub const HANDLE_SEPARATOR: &str = "::";

static HANDLE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Builds a new handle for `name` and `type_tag`.
///
/// `name` must already be validated by the caller.
pub fn generate_handle(name: &str, type_tag: &str) -> String {
    let sequence = HANDLE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!(
        "{name}{sep}{stamp}{sep}{type_tag}{sep}{sequence}",
        sep = HANDLE_SEPARATOR,
        stamp = timestamp_segment()
    )
}

/// Returns the `mm:ss.ffff` segment for the current local time.
pub fn timestamp_segment() -> String {
    let now = Local::now();
    // Leap-second nanos can exceed 999_999_999; clamp to keep four digits.
    let ten_thousandths = (now.nanosecond() / 100_000).min(9_999);
    format!("{}.{:04}", now.format("%M:%S"), ten_thousandths)
}

/// Returns whether `name` can prefix a handle.
///
/// Any `:` is rejected, so the first `::` always ends the name segment.
pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains(':')
}

/// Last path segment of a type name, without generic arguments.
///
/// `alloc::vec::Vec<my_crate::Quote>` becomes `Vec`.
pub fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Type segment for handles.
///
/// Lock and cell wrappers are looked through, so a registered
/// `Mutex<Quote>` is tagged `Quote`.
pub fn type_discriminator(full: &'static str) -> &'static str {
    let mut current = full;
    loop {
        let Some((outer, inner)) = current.split_once('<') else {
            break;
        };
        if !WRAPPER_TYPES.contains(&short_type_name(outer)) {
            break;
        }
        current = last_generic_argument(inner.strip_suffix('>').unwrap_or(inner));
    }
    short_type_name(current)
}

// `lock_api::mutex::Mutex<RawMutex, T>` carries the value type last.
fn last_generic_argument(arguments: &'static str) -> &'static str {
    let mut depth = 0usize;
    let mut start = 0usize;
    for (index, ch) in arguments.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => start = index + 1,
            _ => {}
        }
    }
    arguments[start..].trim()
}

const WRAPPER_TYPES: &[&str] = &["Mutex", "RwLock", "RefCell", "Arc"];

/// Splits a handle into `(name, timestamp, type_tag, sequence)`.
pub fn split_handle(handle: &str) -> Option<(&str, &str, &str, u64)> {
    let mut parts = handle.split(HANDLE_SEPARATOR);
    let name = parts.next()?;
    let stamp = parts.next()?;
    let type_tag = parts.next()?;
    let sequence = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((name, stamp, type_tag, sequence))
}
