//! Single-command training from YAML configuration

mod loader;

pub use loader::{load_config, parse_config, train_from_spec, train_from_yaml};

#[cfg(test)]
mod tests;
