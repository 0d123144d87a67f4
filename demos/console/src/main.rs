use std::{env, fs};

use solti_logger::{LoggerConfig, debug, error, info, init_local_offset, init_logger, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1) Local offset, before any thread is spawned
    init_local_offset();

    // 2) Config: JSON file from argv, defaults otherwise
    let cfg = match env::args().nth(1) {
        Some(path) => serde_json::from_str::<LoggerConfig>(&fs::read_to_string(path)?)?,
        None => LoggerConfig {
            level: "info".into(),
            format_text: true,
            format_color: true,
            ..Default::default()
        },
    };

    // 3) Logger
    let logger = init_logger(&cfg)?;
    info!("logger initialized: level={:?}", logger.level());
    if let Some(path) = logger.file_path() {
        info!("mirroring into {}", path.display());
    }

    // 4) Both call shapes
    debug!("debug entry, visible with level=debug");
    info!(user = "demo", attempt = 1, "structured fields");
    warn!("disk usage at {}%", 91);
    error!(std::io::Error::other("plain error value"));

    // 5) Reconfigure at runtime
    init_logger(&LoggerConfig {
        level: "warn".into(),
        ..cfg
    })?;
    info!("dropped after switching to warn");
    warn!("still visible");

    Ok(())
}
