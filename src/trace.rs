#![allow(unused_macros)]

// Diagnostics forward to `tracing` when the feature is on and vanish otherwise.

#[cfg(feature = "tracing")]
macro_rules! codec_warn {
    ($($arg:tt)*) => { ::tracing::warn!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! codec_warn {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "tracing")]
macro_rules! codec_debug {
    ($($arg:tt)*) => { ::tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! codec_debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "tracing")]
macro_rules! codec_trace {
    ($($arg:tt)*) => { ::tracing::trace!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! codec_trace {
    ($($arg:tt)*) => {{}};
}
