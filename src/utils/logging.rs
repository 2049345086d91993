//! Conditional logging macros gated on a module-level `ENABLE_LOGS` flag.
//!
//! Modules that want chatty diagnostics (the tracker loop, the fetch
//! pipeline) define `const ENABLE_LOGS: bool = true;` and use these macros
//! instead of the bare `log` ones, so a module can be silenced wholesale
//! without touching call sites.

/// Conditional info logging; requires `ENABLE_LOGS` in the calling module.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Conditional warn logging; requires `ENABLE_LOGS` in the calling module.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Conditional error logging; requires `ENABLE_LOGS` in the calling module.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
