//! Print the resolved sandbox runtime configuration

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use kata_config::{ConfigLoader, RuntimeConfig};
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser)]
#[command(
    name = "kata-config",
    about = "Resolve and print the sandbox runtime configuration",
    version
)]
struct Args {
    /// Print which config files were tried and why
    #[arg(long, short)]
    verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Toml)]
    format: Format,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Toml,
    Debug,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let env_filter = if args.verbose {
        EnvFilter::from_default_env()
            .add_directive(tracing_subscriber::filter::LevelFilter::DEBUG.into())
    } else {
        EnvFilter::from_default_env()
            .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let loader = ConfigLoader::new();
    tracing::debug!("Config file candidates: {:?}", loader.candidates());

    let (config, source) = loader
        .load_with_source()
        .context("Failed to load runtime configuration")?;

    match source {
        Some(path) => eprintln!("Using configuration file {}", path.display()),
        None => eprintln!("Using built-in defaults"),
    }

    print!("{}", render(&config, args.format)?);

    Ok(())
}

fn render(config: &RuntimeConfig, format: Format) -> Result<String> {
    match format {
        Format::Toml => {
            toml::to_string_pretty(config).context("Failed to serialize runtime configuration")
        }
        Format::Debug => Ok(format!("{:#?}\n", config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kata_config::config::default_runtime_config;

    #[test]
    fn test_render_toml() {
        let out = render(&default_runtime_config(), Format::Toml).unwrap();
        assert!(out.contains("hypervisor_type = \"qemu\""));
        assert!(out.contains("proxy_type = \"kataBuiltInProxy\""));
        assert!(out.contains("[hypervisor_config]"));
        assert!(out.contains("machine_type = \"pc\""));
        assert!(out.contains("msize_9p = 8192"));
    }

    #[test]
    fn test_render_debug() {
        let out = render(&default_runtime_config(), Format::Debug).unwrap();
        assert!(out.contains("default_mem_sz: 2048"));
    }
}
