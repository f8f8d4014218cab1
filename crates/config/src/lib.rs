//! Config file discovery and loading for envinterp.

pub mod loader;
pub mod schema;

pub use {
    loader::{CONFIG_FILENAMES, discover_and_load, find_config_file, find_config_in, load_config},
    schema::EnvinterpConfig,
};
