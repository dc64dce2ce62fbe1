mod app;
mod components;
mod config;
mod error;
mod event;
mod handler;
mod logging;
mod materials;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::app::{App, DisplaySettings};
use crate::config::{AppConfig, GeneralConfig, LogConfig, TreeConfig};
use crate::error::{AppError, Result};
use crate::event::{spawn_fetch, Event, EventHandler};
use crate::materials::source::{resolve_module, CatalogFile, RecordSource};
use crate::tui::{install_panic_hook, Tui};

/// Browse a module's study materials as folders in the terminal.
#[derive(Parser, Debug)]
#[command(name = "smb", version, about)]
struct Cli {
    /// Catalog JSON file (overrides `general.catalog` in config)
    catalog: Option<PathBuf>,

    /// Module id or slug to open (defaults to the first module)
    #[arg(short, long)]
    module: Option<String>,

    /// Path to a config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start in the flat view
    #[arg(long)]
    flat: bool,

    /// Use ASCII markers instead of nerd font icons
    #[arg(long)]
    no_icons: bool,

    /// Log filter directive, e.g. "debug" or "study_materials_tui=trace"
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the catalog's modules and exit
    Modules,
}

impl Cli {
    /// Flags expressed as a config layer so they merge like any other source.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                catalog: self
                    .catalog
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
                module: self.module.clone(),
                mouse: None,
                view_mode: self.flat.then(|| "flat".to_string()),
            },
            tree: TreeConfig {
                use_icons: self.no_icons.then_some(false),
                show_counts: None,
            },
            log: LogConfig {
                level: self.log_level.clone(),
                file: None,
            },
            ..AppConfig::default()
        }
    }
}

async fn print_modules(source: &CatalogFile) -> Result<()> {
    for module in source.modules().await? {
        let slug = if module.slug.is_empty() {
            "-"
        } else {
            module.slug.as_str()
        };
        println!("{:<24} {:<20} {}", module.id, slug, module.title);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));
    let config = loaded.config;

    let catalog_path = config.catalog().map(PathBuf::from).ok_or_else(|| {
        AppError::InvalidPath(
            "no catalog given; pass a path or set general.catalog in config".into(),
        )
    })?;
    if !catalog_path.is_file() {
        return Err(AppError::InvalidPath(format!(
            "{} is not a file",
            catalog_path.display()
        )));
    }
    let source = CatalogFile::new(catalog_path);

    if let Some(Command::Modules) = cli.command {
        return print_modules(&source).await;
    }

    logging::init(&config.log_file(), config.log_level())?;
    for path in &loaded.sources {
        tracing::debug!(file = %path.display(), "config layer");
    }
    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }
    tracing::info!(catalog = %source.path().display(), "starting");

    let module = resolve_module(&source, config.module()).await?;
    let theme = theme::resolve_theme(&config.theme);
    let settings = DisplaySettings {
        use_icons: config.use_icons(),
        show_counts: config.show_counts(),
    };

    install_panic_hook();

    let mut tui = Tui::new(config.mouse_enabled())?;
    let mut events = EventHandler::new(Duration::from_millis(50));
    spawn_fetch(source, module.id.clone(), events.sender());
    let mut app = App::new(module, config.view_mode(), settings);

    loop {
        tui.draw(|frame| ui::render(&mut app, &theme, frame))?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
            Event::RecordsLoaded(result) => app.handle_records_loaded(result),
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    tracing::info!("exiting");
    Ok(())
}
