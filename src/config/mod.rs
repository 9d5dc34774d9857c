//! Configuration: the data directory layout and `config.toml` settings.

mod data_dir;
mod settings;

pub use data_dir::DataDir;
pub use settings::Settings;
