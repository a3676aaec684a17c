pub mod config;
pub mod tracing;

pub use config::{default_config_path, load_config_or_default};
pub use self::tracing::{default_log_dir, init_tracing_subscriber};
