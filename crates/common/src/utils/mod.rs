pub mod logging;
pub mod log_sink;
