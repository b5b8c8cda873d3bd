pub mod relay_config;
