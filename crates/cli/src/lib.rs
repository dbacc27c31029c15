use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use doc_model::LoadedHistoryItem;
use serde::Serialize;
use serde_json::Value;
use std::ffi::OsString;
use std::path::PathBuf;
use storage::{initial_window_size, Resolution, SettingsFile};
use viewer_core::{
    open_document_viewer, zoom_in, zoom_out, AppContext, FsDocumentSource, RecordingNavigator,
    SessionSnapshot, ViewerConfig,
};

#[derive(Debug, Parser)]
#[command(name = "pagetile-cli")]
#[command(about = "Pagetile viewer shell")]
pub struct Cli {
    /// Directory holding settings.json. Defaults to the platform data directory.
    #[arg(long, global = true, env = "PAGETILE_SETTINGS_DIR", value_name = "DIR")]
    settings_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Read or change persisted viewer settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Open a PDF in the viewer session and print the resulting state.
    Open {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Step the persisted page tile scale.
    Zoom {
        #[arg(value_enum)]
        direction: ZoomDirection,
    },
    /// Print the startup window size and position for a monitor.
    WindowSize {
        #[arg(long)]
        monitor_width: u32,
        #[arg(long)]
        monitor_height: u32,
    },
    /// Print CLI version.
    Version,
}

#[derive(Debug, Subcommand)]
enum SettingsAction {
    /// Print every viewer setting, stored or default.
    Show,
    /// Print the stored JSON value of a key, or null.
    Get { key: String },
    /// Store a JSON value under a key.
    Set {
        key: String,
        #[arg(value_name = "JSON")]
        value: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ZoomDirection {
    In,
    Out,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OpenOutput {
    route: String,
    session: SessionSnapshot,
    history: Vec<LoadedHistoryItem>,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    if let Commands::Version = cli.command {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let store = match cli.settings_dir {
        Some(dir) => SettingsFile::with_root(dir),
        None => SettingsFile::from_default_project().context("failed to locate settings")?,
    };
    tracing::debug!(path = %store.path().display(), "using settings file");

    if let Commands::WindowSize { monitor_width, monitor_height } = cli.command {
        let monitor = Resolution { width: monitor_width, height: monitor_height };
        return print_json(&initial_window_size(&store, monitor));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start runtime")?;
    let ctx = AppContext::new(ViewerConfig::default(), store, runtime.handle());

    runtime.block_on(async {
        match cli.command {
            Commands::Settings { action } => run_settings(&ctx, action).await,
            Commands::Open { file } => run_open(&ctx, &file),
            Commands::Zoom { direction } => run_zoom(&ctx, direction).await,
            Commands::WindowSize { .. } | Commands::Version => Ok(()),
        }
    })
}

async fn run_settings(ctx: &AppContext, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => {
            let snapshot =
                ctx.try_load_viewer_settings().await.context("failed to load settings")?;
            print_json(&snapshot)
        }
        SettingsAction::Get { key } => {
            let value = ctx.settings.read(&key).await.context("failed to read setting")?;
            print_json(&value.unwrap_or(Value::Null))
        }
        SettingsAction::Set { key, value } => {
            let value: Value = serde_json::from_str(&value)
                .with_context(|| format!("value for {key} is not valid JSON"))?;
            ctx.settings.bridge().write(&key, value).wait().await.context("failed to save setting")
        }
    }
}

fn run_open(ctx: &AppContext, file: &std::path::Path) -> Result<()> {
    let filepath = file.to_str().context("file path is not valid UTF-8")?;

    let mut navigator = RecordingNavigator::default();
    open_document_viewer(ctx, &mut navigator, filepath);
    ctx.load_document(&FsDocumentSource).context("failed to open document")?;

    let route = navigator.visited.last().map(|route| route.to_path()).unwrap_or_default();
    print_json(&OpenOutput { route, session: ctx.session.snapshot(), history: ctx.history.items() })
}

async fn run_zoom(ctx: &AppContext, direction: ZoomDirection) -> Result<()> {
    let current = ctx.display.scale.load(doc_model::DEFAULT_SCALE).await?;
    let next = match direction {
        ZoomDirection::In => zoom_in(current),
        ZoomDirection::Out => zoom_out(current),
    };

    ctx.display.scale.set(next).wait().await.context("failed to save scale")?;
    println!("{next}");
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
