pub mod assets;
pub mod audio;
pub mod config;
pub mod console;
pub mod intent;
mod logging;
pub mod session;
pub mod stt;
mod telemetry;
pub mod tts;

pub use logging::{init_logging, log_debug, log_debug_content, log_file_path};
pub use telemetry::init_tracing;
