//! CLI command implementations

use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Subcommand};
use streamshare_core::network::discover_lan_address;
use streamshare_core::tracing_setup::{CliLogLevel, init_tracing};
use streamshare_core::{
    ContentRegistry, FileDescriptor, ServerConfig, StreamShareConfig, StreamShareError,
    bind_available_port, resolve,
};
use streamshare_web::{AppState, ConsoleProgress, SilentObserver, TransferObserver, run_server};
use tracing::{info, warn};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Share files and accept uploads until Ctrl+C
    Start(StartArgs),
}

/// Arguments of `streamshare start`.
#[derive(Args, Debug)]
pub struct StartArgs {
    /// Files to share; with none, only uploads are accepted
    pub files: Vec<PathBuf>,

    /// First port to try [env: STREAMSHARE_PORT, default: 3000]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Do not open the landing page in a browser
    #[arg(long)]
    pub no_open: bool,

    /// Hide the download progress line
    #[arg(short, long)]
    pub quiet: bool,

    /// Directory uploads are written to [default: current directory]
    #[arg(long)]
    pub upload_dir: Option<PathBuf>,

    /// Console log level, overridden by RUST_LOG
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: CliLogLevel,

    /// Write a full trace log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Handle the CLI command
///
/// # Errors
/// Returns the first fatal startup or server error.
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Start(args) => start_sharing(args).await,
    }
}

/// Resolves the files, binds a port and serves until shutdown.
///
/// # Errors
/// - `StreamShareError::Validation` - Files were given but none is usable
/// - `StreamShareError::Port` - No port in the probed range could be bound
/// - `StreamShareError::Io` - The upload directory is unusable
pub async fn start_sharing(args: StartArgs) -> anyhow::Result<()> {
    init_tracing(args.log_level.as_tracing_level(), args.log_file.as_deref())
        .context("Failed to initialize logging")?;

    let mut config = StreamShareConfig::from_env();
    if let Some(port) = args.port {
        config.server.base_port = port;
    }
    if args.no_open {
        config.server.open_browser = false;
    }

    let descriptors = resolve_files(&args.files).await?;
    let upload_dir = prepare_upload_dir(args.upload_dir).await?;
    let registry = Arc::new(ContentRegistry::new(descriptors));

    let listener = bind_available_port(
        IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        config.server.base_port,
        config.server.max_port_attempts,
    )
    .await
    .map_err(StreamShareError::from)?;
    let port = listener
        .local_addr()
        .map_err(StreamShareError::from)?
        .port();
    let server_config = ServerConfig::new(port, discover_lan_address());

    println!(
        "{}",
        banner(&registry.snapshot(), &server_config, &upload_dir)
    );

    if config.server.open_browser {
        open_browser(&server_config.local_url());
    }

    let observer: Arc<dyn TransferObserver> = if args.quiet {
        Arc::new(SilentObserver)
    } else {
        Arc::new(ConsoleProgress)
    };
    let state = AppState::new(
        registry,
        server_config,
        &config.transfer,
        upload_dir,
        observer,
    );

    run_server(listener, state)
        .await
        .context("Server stopped unexpectedly")?;
    Ok(())
}

/// Resolves every requested path, skipping the ones that fail.
///
/// # Errors
/// - `StreamShareError::Validation` - Paths were given and none resolved
async fn resolve_files(paths: &[PathBuf]) -> Result<Vec<FileDescriptor>, StreamShareError> {
    let mut descriptors = Vec::with_capacity(paths.len());

    for path in paths {
        match resolve(path).await {
            Ok(descriptor) => {
                info!(
                    path = %descriptor.absolute_path.display(),
                    size = descriptor.size_bytes,
                    "Sharing file"
                );
                descriptors.push(descriptor);
            }
            Err(e) => warn!(error = %e, "Skipping file"),
        }
    }

    if !paths.is_empty() && descriptors.is_empty() {
        return Err(StreamShareError::Validation {
            reason: "none of the given files could be shared".to_string(),
        });
    }
    Ok(descriptors)
}

async fn prepare_upload_dir(requested: Option<PathBuf>) -> Result<PathBuf, StreamShareError> {
    let dir = match requested {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    tokio::fs::create_dir_all(&dir).await?;
    // Canonical so re-uploads match the registry entry they overwrite.
    Ok(tokio::fs::canonicalize(&dir).await?)
}

fn banner(files: &[Arc<FileDescriptor>], server: &ServerConfig, upload_dir: &Path) -> String {
    let mut lines = vec![
        String::new(),
        "StreamShare is live!".to_string(),
        "-----------------------------------".to_string(),
    ];

    if files.is_empty() {
        lines.push("Sharing: nothing yet, waiting for uploads".to_string());
    } else {
        lines.push("Sharing:".to_string());
        for file in files {
            lines.push(format!(
                "  {} ({:.2} MB)",
                file.display_name,
                file.size_bytes as f64 / (1024.0 * 1024.0)
            ));
        }
    }

    lines.push(format!("Local:   {}", server.local_url()));
    lines.push(format!("Network: {}", server.network_url()));
    lines.push(format!("Uploads: {}", upload_dir.display()));
    lines.push("-----------------------------------".to_string());
    lines.push("Press Ctrl+C to stop".to_string());
    lines.join("\n")
}

/// Program and arguments that open `url` in the default browser.
fn browser_command(url: &str) -> (&'static str, Vec<String>) {
    if cfg!(target_os = "macos") {
        ("open", vec![url.to_string()])
    } else if cfg!(target_os = "windows") {
        // The empty string is the window title `start` expects first.
        (
            "cmd",
            vec![
                "/C".to_string(),
                "start".to_string(),
                String::new(),
                url.to_string(),
            ],
        )
    } else {
        ("xdg-open", vec![url.to_string()])
    }
}

fn open_browser(url: &str) {
    let (program, args) = browser_command(url);

    match tokio::process::Command::new(program)
        .args(&args)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
    {
        Ok(mut child) => {
            tokio::spawn(async move {
                let _ = child.wait().await;
            });
        }
        Err(e) => warn!(program, error = %e, "Could not open a browser"),
    }
}
