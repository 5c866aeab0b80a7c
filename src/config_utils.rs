use log::{info, warn};

/// Stand-in for the configuration-loading subsystem the suppression rule
/// targets: parses a configuration stream and emits the noisy warning,
/// with its parameters attached as key-values, when the stream is broken.
pub fn load_from_stream(name: &str, content: &str) {
    match toml::from_str::<toml::Table>(content) {
        Ok(table) => {
            info!(
                "configuration '{name}' loaded, {} top-level entries",
                table.len()
            );
        }
        Err(e) => {
            let reason = e.message().to_string();
            warn!(name = name, reason = reason; "Cannot load configuration from stream");
        }
    }
}
