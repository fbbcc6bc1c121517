//! Configuration system
//!
//! Structures live in `schemas` (declared with `config_struct!`), loading and
//! access helpers in `utils`.

pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::{Config, ExportConfig, HttpConfig, MetadataConfig, PricesConfig, RpcConfig};
pub use utils::{
    get_config_clone, load_config_from_path, read_config_file,
    update_config, with_config,
};
