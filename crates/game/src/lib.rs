pub mod cli;
pub mod config;
pub mod logs;
pub mod runtime;
pub mod scheduling;
pub mod systems;

pub use cli::{CliOptions, Mode};
pub use config::AppConfig;
pub use runtime::{build_headless_app, HeadlessConfig, RunSummary};
pub use systems::strip::{insert_strip_resources, StripPlugin};
