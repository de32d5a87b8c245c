//! Storefront entry-point: loads settings, wires the REST record source and
//! renders product pages to the terminal.

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use storefront::StorefrontSettings;
use storefront::domain::{ProductCatalogue, ProductDetailsPage, ProductId, ProductListPage};
use storefront::inbound::text::{render_details, render_listing};
use storefront::outbound::rest::RestRecordSource;

/// `storefront` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "storefront",
    about = "Browse the storefront catalogue from the terminal",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// List every product as a card.
    List,
    /// Show the details page of one product.
    Show {
        /// Product identifier.
        id: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = StorefrontSettings::load_from_iter([OsString::from("storefront")])
        .wrap_err("failed to load storefront settings")?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build storefront runtime")?;
    let output = runtime.block_on(run(args.command, &settings))?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}").wrap_err("failed to write output")?;
    Ok(())
}

async fn run(command: Command, settings: &StorefrontSettings) -> Result<String> {
    let source = RestRecordSource::new(
        settings.service_url()?,
        settings.api_key()?,
        settings.request_timeout(),
    )
    .wrap_err("failed to build HTTP client")?;
    let catalogue = ProductCatalogue::new(Arc::new(source), settings.products_table()?)
        .with_timeout(settings.request_timeout());

    let output = match command {
        Command::List => {
            let mut page = ProductListPage::new(catalogue);
            render_listing(&page.load().await)
        }
        Command::Show { id } => {
            let product_id = ProductId::new(id).wrap_err("invalid product id")?;
            let mut page = ProductDetailsPage::new(catalogue);
            render_details(&page.load(product_id).await)
        }
    };
    Ok(output)
}
