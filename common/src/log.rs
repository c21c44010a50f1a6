
// LOG message normalization to add period in the end
/// Usage examples:
/// - _info!(raw: format!("Url: {}", "url".to_string())); -> "Url: url"
/// - _info!(raw: "Hello"); -> "Hello"
/// - _info!("Url: {}", "url".to_string()); -> "Url: url."
/// - _info!("Hello"); -> "Hello."
#[macro_export]
macro_rules! _info {
    (raw: $msg:expr) => {{
        ::log::info!("{}", $msg)
    }};
    (raw: $fmt:literal, $($arg:expr),+ $(,)?) => {{
        ::log::info!($fmt, $($arg),+)
    }};
    ($($arg:tt)*) => {{
        ::log::info!("{}", $crate::log::normalize_message(format!($($arg)*)));
    }};
}

/// Usage examples:
/// - _error!(raw: format!("Url: {}", "url".to_string())); -> "Url: url"
/// - _error!(raw: "Hello"); -> "Hello"
/// - _error!("Url: {}", "url".to_string()); -> "Url: url."
/// - _error!("Hello"); -> "Hello."
#[macro_export]
macro_rules! _error {
    (raw: $msg:expr) => {{
        ::log::error!("{}", $msg)
    }};
    (raw: $fmt:literal, $($arg:expr),+ $(,)?) => {{
        ::log::error!($fmt, $($arg),+)
    }};
    ($($arg:tt)*) => {{
        ::log::error!("{}", $crate::log::normalize_message(format!($($arg)*)));
    }};
}

/// Same normalization as `_info!`, at warn level.
#[macro_export]
macro_rules! _warn {
    (raw: $msg:expr) => {{
        ::log::warn!("{}", $msg)
    }};
    (raw: $fmt:literal, $($arg:expr),+ $(,)?) => {{
        ::log::warn!($fmt, $($arg),+)
    }};
    ($($arg:tt)*) => {{
        ::log::warn!("{}", $crate::log::normalize_message(format!($($arg)*)));
    }};
}

/// Same normalization as `_info!`, at debug level.
#[macro_export]
macro_rules! _debug {
    (raw: $msg:expr) => {{
        ::log::debug!("{}", $msg)
    }};
    (raw: $fmt:literal, $($arg:expr),+ $(,)?) => {{
        ::log::debug!($fmt, $($arg),+)
    }};
    ($($arg:tt)*) => {{
        ::log::debug!("{}", $crate::log::normalize_message(format!($($arg)*)));
    }};
}

// append a trailing period unless the message already ends with one
pub fn normalize_message(message: String) -> String {
    if message.trim_end().ends_with('.') {
        message
    } else {
        message + "."
    }
}
