//! Wall-clock stamps for history entries and scene files.

/// Milliseconds since the UNIX epoch.
#[cfg(not(target_arch = "wasm32"))]
pub fn timestamp_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Milliseconds since the UNIX epoch, from the page's time origin.
#[cfg(target_arch = "wasm32")]
pub fn timestamp_millis() -> u64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|perf| (perf.time_origin() + perf.now()) as u64)
        .unwrap_or_default()
}

pub fn timestamp_secs() -> u64 {
    timestamp_millis() / 1000
}
