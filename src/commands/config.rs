use std::path::Path;

use anyhow::Result;

/// Print the effective configuration as TOML
pub fn cmd_config(config_path: Option<&Path>) -> Result<()> {
    let loaded = super::load_config(config_path)?;

    match &loaded.source {
        Some(path) => println!("# loaded from {}", path.display()),
        None => println!("# built-in defaults"),
    }
    for warning in &loaded.warnings {
        println!("# warning: {}", warning);
    }
    print!("{}", loaded.config.to_toml_string()?);
    Ok(())
}
