mod reporter;

use std::env;
use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use strictargs_core::{CliManifest, ParsedCommand, StrictArgs};
use strictargs_render::CliRenderer;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use reporter::ExitReporter;

const MANIFEST: &str = include_str!("../fake-cli.toml");
const MANIFEST_ENV: &str = "STRICTARGS_MANIFEST";
const LOG_ENV: &str = "STRICTARGS_LOG";

fn main() -> Result<()> {
    init_tracing();

    let manifest = load_manifest()?;
    let mut cli = manifest
        .build()?
        .with_renderer(CliRenderer::new().with_color(io::stdout().is_terminal()))
        .with_reporter(ExitReporter::new(&manifest.cli.name));
    register_listeners(&mut cli)?;

    cli.parse_env()?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_manifest() -> Result<CliManifest> {
    match env::var_os(MANIFEST_ENV) {
        Some(path) => {
            debug!(path = ?path, "loading manifest");
            CliManifest::from_path(&path)
                .with_context(|| format!("Failed to load manifest {}", path.to_string_lossy()))
        }
        None => Ok(CliManifest::from_toml_str(MANIFEST)?),
    }
}

/// Listeners for the demo commands. A custom manifest may leave any of them
/// out; only the commands it declares get one.
fn register_listeners(cli: &mut StrictArgs) -> Result<()> {
    if cli.global_flag("json").is_some() {
        cli.add_hook(|command: &ParsedCommand, _args: &[String]| -> Result<()> {
            if command.is_present("json") {
                println!("{}", serde_json::to_string_pretty(command)?);
            }
            Ok(())
        });
    }

    if cli.command("start").is_some() {
        cli.add_command_listener("start", |command: &ParsedCommand, _args: &[String]| -> Result<()> {
            let server = command.args()?.first().map(String::as_str).unwrap_or("default");
            println!("Starting {server} on port {}", command.get("port")?);
            if command.is_present("open") {
                println!("Opening browser");
            }
            Ok(())
        })?;
    }

    if cli.command("status").is_some() {
        cli.add_command_listener("status", |_command: &ParsedCommand, _args: &[String]| -> Result<()> {
            println!("Status check!");
            Ok(())
        })?;
    }

    if cli.command("admin").is_some() {
        cli.add_command_listener("admin", |_command: &ParsedCommand, _args: &[String]| -> Result<()> {
            println!("Opening the admin page.");
            Ok(())
        })?;
    }

    Ok(())
}
