//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::Result;
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "geocoder.max_retries")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    // Show path
    if args.path {
        let path = Config::config_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    // Reset config
    if args.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (&args.key, &args.value) {
        // No arguments: show all config
        (None, None) => {
            show_all_config(&config);
        }

        // Key only: show that value
        (Some(key), None) => {
            if let Some(value) = config.get(key) {
                println!("{}", value);
            } else {
                eprintln!("Unknown config key: {}", key);
                eprintln!("\nAvailable keys:");
                for k in Config::available_keys() {
                    eprintln!("  {}", k);
                }
                std::process::exit(1);
            }
        }

        // Key and value: set the value
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }

        // Value without key: not valid
        (None, Some(_)) => {
            eprintln!("Error: Must specify a key to set a value");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Display all configuration values
fn show_all_config(config: &Config) {
    print!("{}", render_config(config));
}

/// Every known key grouped by section, strings quoted
fn render_config(config: &Config) -> String {
    let mut output = String::new();
    let mut current = "";

    for key in Config::available_keys() {
        let Some((section, name)) = key.split_once('.') else {
            continue;
        };
        if section != current {
            if !current.is_empty() {
                output.push('\n');
            }
            output.push_str(&format!("[{}]\n", section));
            current = section;
        }

        let value = config.get(key).unwrap_or_default();
        if value.parse::<f64>().is_ok() {
            output.push_str(&format!("{} = {}\n", name, value));
        } else {
            output.push_str(&format!("{} = {:?}\n", name, value));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_every_key() {
        let output = render_config(&Config::default());

        for key in Config::available_keys() {
            let (_, name) = key.split_once('.').unwrap();
            assert!(output.contains(&format!("\n{} = ", name)), "missing {}", key);
        }
        assert!(output.starts_with("[services]\n"));
        assert!(output.contains("\n\n[geocoder]\nmax_retries = 5\n"));
        assert!(output.contains("format = \"text\"\n"));
    }

    #[test]
    fn test_render_reflects_changes() {
        let mut config = Config::default();
        config.set("geocoder.delay_ms", "250").unwrap();
        config
            .set("output.map_link", "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}")
            .unwrap();

        let output = render_config(&config);
        assert!(output.contains("delay_ms = 250\n"));
        assert!(output.contains(
            "map_link = \"https://www.openstreetmap.org/?mlat={lat}&mlon={lng}\"\n"
        ));
    }
}
