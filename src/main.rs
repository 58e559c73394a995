use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use royal_brew::banner::{BannerInfo, print_banner, print_session_summary};
use royal_brew::commands::{CommandRegistry, CommandResult};
use royal_brew::config::{Config, Setting};
use royal_brew::consts::{DEFAULT_BREW_SECONDS, DEFAULT_PRODUCT_ID, default_db_path};
use royal_brew::events::{MessageContext, ProductId};
use royal_brew::page::Page;
use royal_brew::product::{Catalog, ProductSource};
use royal_brew::timer::format_display;
use royal_brew::widgets::ProductDetail;

#[derive(Parser)]
#[command(name = "royal-brew", version, about = "A storefront for the patient tea drinker.")]
struct Cli {
    #[command(subcommand)]
    command: Option<CliCommand>,

    /// Product id to show (overrides the stored setting)
    #[arg(short, long)]
    product: Option<String>,

    /// JSON product catalog (defaults to the built-in house blends)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Brew countdown length in seconds (overrides the stored setting)
    #[arg(short, long)]
    brew_seconds: Option<u32>,

    /// SQLite database for settings (use :memory: for ephemeral)
    #[arg(short, long)]
    db: Option<String>,

    /// Start without a cart icon on the page
    #[arg(long, default_value_t = false)]
    no_cart: bool,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Store a setting (brew_seconds, product)
    Set { key: String, value: String },
    /// Remove a stored setting
    Unset { key: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => {
            let path = default_db_path()?;
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            path.to_string_lossy().into_owned()
        }
    };
    let config = Config::open(&db_path)?;

    if let Some(command) = &cli.command {
        return match command {
            CliCommand::Set { key, value } => handle_set(&config, key, value),
            CliCommand::Unset { key } => handle_unset(&config, key),
        };
    }

    let brew_seconds = match cli.brew_seconds {
        Some(secs) => secs,
        None => config.brew_seconds()?.unwrap_or(DEFAULT_BREW_SECONDS),
    };
    let product_id = match cli.product {
        Some(id) => ProductId::new(id),
        None => config
            .product()?
            .unwrap_or_else(|| ProductId::new(DEFAULT_PRODUCT_ID)),
    };
    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin(),
    };

    // Wire the page: one shared context, widgets only know the context.
    let context = MessageContext::new();
    let mut detail = ProductDetail::new(context.clone(), product_id.clone(), brew_seconds);
    match catalog.get_record(&product_id).await? {
        Some(record) => detail.bind(record),
        None => eprintln!("warning: product {product_id} not found, page stays loading"),
    }
    let mut page = Page::new(context, detail);
    if !cli.no_cart {
        page.mount_cart();
    }

    let product_label = match page.detail().name() {
        Some(name) => format!("{name} [{product_id}]"),
        None => format!("(loading) [{product_id}]"),
    };
    let settings_label = if db_path == ":memory:" {
        "ephemeral"
    } else {
        db_path.as_str()
    };
    print_banner(&BannerInfo {
        product: &product_label,
        brew_time: &format_display(brew_seconds),
        cart: if cli.no_cart { "not mounted" } else { "mounted" },
        settings: settings_label,
    });

    let registry = CommandRegistry::new();

    // REPL — async stdin so Ctrl+C is caught at the prompt too
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("\nbrew> ");
        io::stdout().flush()?;

        let line = tokio::select! {
            result = lines.next_line() => {
                match result {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        // Ctrl+D (EOF)
                        println!();
                        break;
                    }
                    Err(e) => {
                        eprintln!("input error: {}", e);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match registry.dispatch(input, &mut page).await {
            CommandResult::Quit => break,
            CommandResult::Handled => {}
            CommandResult::NotACommand => {
                println!("type /help for available commands");
            }
        }
    }

    let cart_count = page.cart_count();
    drop(page);
    print_session_summary(cart_count);
    Ok(())
}

fn handle_set(config: &Config, key: &str, value: &str) -> Result<()> {
    let setting: Setting = key.parse()?;
    config.set_setting(setting, value)?;
    println!("✓ {setting} = {}", value.trim());
    Ok(())
}

fn handle_unset(config: &Config, key: &str) -> Result<()> {
    let setting: Setting = key.parse()?;
    config.remove(setting.key())?;
    println!("✓ {setting} cleared");
    Ok(())
}
