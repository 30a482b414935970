//! Configuration file loading for codeswarm
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CODESWARM_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./codeswarm.toml` or `./.codeswarm.toml`
//! 4. Global: `$XDG_CONFIG_HOME/codeswarm/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileAgentConfig, FileConfig, FileModelsConfig, FileOpenRouterConfig, FileOutputConfig,
    FileOutputFormat, FileProvidersConfig, FileRetryConfig, FileTavilyConfig, FileWorkflowConfig,
};
pub use loader::ConfigLoader;
