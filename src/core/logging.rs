//! Logging initialization

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable, e.g.
/// `RUST_LOG=arbor::mesh=trace` to follow tessellation per stem.
///
/// # Example
/// ```
/// arbor::core::logging::init();
/// log::info!("Generating plant mesh");
/// ```
pub fn init() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).try_init();
}
