use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = "portfolio-analytics";

/// Explicit override, then the configured directory, then the XDG default.
pub fn resolve_data_dir(
    cli_override: Option<&Path>,
    configured: Option<&Path>,
) -> Result<PathBuf, String> {
    if let Some(dir) = cli_override.or(configured) {
        return Ok(dir.to_path_buf());
    }
    if let Ok(dir) = std::env::var("XDG_DATA_HOME") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir).join(DATA_DIR_NAME));
        }
    }
    let home = std::env::var("HOME").map_err(|err| format!("resolve HOME: {}", err))?;
    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join(DATA_DIR_NAME))
}
