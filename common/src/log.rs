//! Logging helpers layered on top of `tracing`.

/// Target used for positive milestones, rendered with the success symbol.
pub const SUCCESS_TARGET: &str = "svcmap::success";

/// Target used for raw terminal output that must bypass the status symbols.
pub const PRINT_TARGET: &str = "svcmap::print";

#[doc(hidden)]
pub use tracing as __tracing;

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::log::__tracing::info!(target: $crate::log::SUCCESS_TARGET, $($arg)*)
    };
}
