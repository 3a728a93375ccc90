//! Config command
//!
//! Manage avalia configuration.

use super::workspace::{config_path, load_config};
use super::GlobalOpts;
use anyhow::{bail, Context, Result};
use avalia_core::config::Config;
use clap::Subcommand;
use std::fs;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the default configuration file
    Init {
        /// Overwrite without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Validate the configuration file
    Validate,
}

/// Execute the config command
pub fn execute(opts: &GlobalOpts, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(opts, json),
        ConfigCommand::Init { force } => init_config(opts, force),
        ConfigCommand::Validate => validate_config(opts),
    }
}

fn show_config(opts: &GlobalOpts, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let config = load_config(opts)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let path = config_path(opts);
    println!("{}", "Configuration:".bold().underline());
    if path.exists() {
        println!("{}", path.display().to_string().dimmed());
    } else {
        println!("{}", "(defaults, no file)".dimmed());
    }
    println!();
    println!("{}", config.to_toml_string()?);
    Ok(())
}

fn init_config(opts: &GlobalOpts, force: bool) -> Result<()> {
    use colored::Colorize;

    let path = config_path(opts);

    if path.exists() && !force {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt(format!("Overwrite {}?", path.display()))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Init cancelled.");
            return Ok(());
        }
    }

    if path.exists() {
        let backup_path = format!(
            "{}.backup-{}",
            path.display(),
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        fs::copy(&path, &backup_path)?;
        println!("{} Backed up to {}", "✓".green(), backup_path);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .context(format!("Failed to create {}", parent.display()))?;
    }

    let content = format!(
        "# avalia configuration\n\n{}",
        Config::default().to_toml_string()?
    );
    fs::write(&path, content).context(format!("Failed to write {}", path.display()))?;

    println!("{} Wrote {}", "✓".green(), path.display());
    Ok(())
}

fn validate_config(opts: &GlobalOpts) -> Result<()> {
    use colored::Colorize;

    let path = config_path(opts);

    if !path.exists() {
        bail!("Configuration not found at {}", path.display());
    }

    let content = fs::read_to_string(&path)?;

    // Unknown keys are ignored by serde; point them out.
    let raw: toml::Value = toml::from_str(&content)
        .context(format!("Invalid TOML in {}", path.display()))?;
    let known = ["moderation", "comments", "alarm", "queries"];
    if let Some(table) = raw.as_table() {
        for key in table.keys().filter(|k| !known.contains(&k.as_str())) {
            println!("{} Unknown section [{}]", "⚠".yellow(), key);
        }
    }

    match Config::from_toml_str(&content) {
        Ok(_) => {
            println!("{} Configuration is valid", "✓".green());
            Ok(())
        }
        Err(e) => bail!("{} {}", "✗".red(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn opts(dir: &TempDir) -> GlobalOpts {
        GlobalOpts {
            config: None,
            data_dir: dir.path().to_path_buf(),
            user: None,
        }
    }

    #[test]
    fn test_config_path_defaults_to_data_dir() {
        let opts = GlobalOpts {
            config: None,
            data_dir: PathBuf::from(".avalia"),
            user: None,
        };
        assert_eq!(config_path(&opts), PathBuf::from(".avalia/config.toml"));
    }

    #[test]
    fn test_init_then_validate() {
        let dir = TempDir::new().unwrap();
        let opts = opts(&dir);

        init_config(&opts, true).unwrap();
        assert!(config_path(&opts).exists());
        validate_config(&opts).unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let dir = TempDir::new().unwrap();
        let opts = opts(&dir);
        fs::write(
            config_path(&opts),
            "[moderation]\nescalation_threshold = 0\n",
        )
        .unwrap();

        assert!(validate_config(&opts).is_err());
    }
}
