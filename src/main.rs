#![forbid(unsafe_code)]

mod client;
mod config;
mod constants;
mod gui;
mod host;
mod images;
mod job;
mod notify;
mod panel;
mod params;
mod resolver;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level as TraceLevel, error, info};
use tracing_subscriber::FmtSubscriber;

use client::RefineClient;
use config::Config;
use host::LocalHost;
use notify::{NotificationKind, Surface};
use panel::{Action, GalleryState, Panel};
use params::ParamForm;

#[derive(Parser, Debug)]
#[command(name = "refine-print-panel")]
#[command(version, about = "Image print panel for the local refine service", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Refine service endpoint
    #[arg(long, value_name = "URL", global = true)]
    endpoint: Option<String>,

    /// Directory holding the project images
    #[arg(long, value_name = "DIR", global = true)]
    images_dir: Option<PathBuf>,

    /// Directory copies are written to
    #[arg(long, value_name = "DIR", global = true)]
    output_dir: Option<PathBuf>,

    /// Runs the window when omitted
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the backend path of every project image
    List,

    /// Send a print job without opening the window
    Print {
        /// Image to print; copied to the printer drive when needed
        #[arg(value_name = "FILE")]
        file: String,

        /// Task ID (generated from the current time when omitted)
        #[arg(long)]
        taskid: Option<String>,

        #[arg(long)]
        width: Option<String>,

        #[arg(long)]
        height: Option<String>,

        #[arg(long)]
        left: Option<String>,

        #[arg(long)]
        top: Option<String>,
    },

    /// Send an arbitrary API request built from KEY=VALUE pairs
    Send {
        #[arg(value_name = "KEY=VALUE", required = true, value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

fn parse_param(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{arg}'")),
    }
}

fn parse_level(level: &str) -> TraceLevel {
    match level.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    }
}

fn subscriber(level: TraceLevel) -> FmtSubscriber {
    FmtSubscriber::builder().with_max_level(level).finish()
}

fn load_config(cli: &Cli) -> Result<Config> {
    let path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_from(&path)?;
    config.apply_env_overrides();

    if let Some(endpoint) = &cli.endpoint {
        config.service.endpoint = endpoint.clone();
    }
    if let Some(dir) = &cli.images_dir {
        config.storage.images_dir = Some(dir.clone());
    }
    if let Some(dir) = &cli.output_dir {
        config.storage.output_dir = Some(dir.clone());
    }
    Ok(config)
}

fn build_host(config: &Config) -> Arc<LocalHost> {
    let host = LocalHost::new(config.images_dir(), config.output_dir());
    if let Some(resource_dir) = &config.storage.resource_dir
        && let Err(e) = host.seed_from(resource_dir)
    {
        error!(error = %e, dir = %resource_dir.display(), "Failed to seed project images");
    }
    Arc::new(host)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let env_level = std::env::var("LOG_LEVEL").ok();

    // Config loading logs through a temporary subscriber until we know the configured level
    let config = tracing::subscriber::with_default(
        subscriber(parse_level(env_level.as_deref().unwrap_or("info"))),
        || load_config(&cli),
    )?;

    let log_level = parse_level(env_level.as_deref().unwrap_or(&config.log_level));
    tracing::subscriber::set_global_default(subscriber(log_level))
        .context("Failed to install tracing subscriber")?;

    let host = build_host(&config);
    info!(images = %host.images_dir().display(), endpoint = %config.service.endpoint, "Starting panel");

    let client = RefineClient::new(&config.service).context("Failed to build HTTP client")?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let Some(command) = cli.command else {
        let panel = Panel::new(&config, host, client, Surface::Overlay);
        return gui::run_gui(panel, runtime.handle().clone(), &config);
    };

    let mut panel = Panel::new(&config, host, client, Surface::Log);
    match command {
        Command::List => {
            runtime.block_on(panel.run(Action::LoadImages));
            match panel.gallery() {
                GalleryState::Ready(images) => {
                    for image in images {
                        println!("{}", image.backend_path);
                    }
                }
                GalleryState::Failed(e) => bail!("Failed to list images: {e}"),
                GalleryState::Empty | GalleryState::Loading => {}
            }
        }
        Command::Print {
            file,
            taskid,
            width,
            height,
            left,
            top,
        } => {
            let form = panel.print_form_mut();
            form.file_path = file;
            form.taskid = taskid.unwrap_or_default();
            if let Some(width) = width {
                form.width = width;
            }
            if let Some(height) = height {
                form.height = height;
            }
            if let Some(left) = left {
                form.left = left;
            }
            if let Some(top) = top {
                form.top = top;
            }

            runtime.block_on(panel.run(Action::SendPrint));
            println!("{}", panel.print_result());
            if !panel.last_print().is_some_and(|response| response.is_success()) {
                bail!("Print job was not accepted");
            }
        }
        Command::Send { params } => {
            let form = panel.params_mut();
            *form = ParamForm::new();
            for (key, value) in params {
                form.add(key, value);
            }

            runtime.block_on(panel.run(Action::SubmitApi));
            println!("{}", panel.api_result());
            if panel
                .notifier()
                .last()
                .is_some_and(|n| n.kind == NotificationKind::Error)
            {
                bail!("API request failed");
            }
        }
    }

    Ok(())
}
