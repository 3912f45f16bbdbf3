// Logging configuration
pub mod config;

// Diagnostic capability injected into strategies and the router
pub mod diagnostics;

// Subscriber initialization
pub mod logging;

pub use config::{LogConfig, LogFormat};
pub use diagnostics::{NoopObserver, SelectionObserver, TracingObserver};
pub use logging::init_logging;
