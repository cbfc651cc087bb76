use std::{path::PathBuf, str::FromStr, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{load_settings, load_settings_from, HttpShopBackend, ShopSession};
use shared::domain::ProductId;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod view;

/// `ID` or `ID:QTY` (quantity defaults to 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CartAction {
    product_id: ProductId,
    quantity: u32,
}

impl FromStr for CartAction {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let (id, qty) = match raw.split_once(':') {
            Some((id, qty)) => (id, Some(qty)),
            None => (raw, None),
        };
        let product_id = id
            .trim()
            .parse::<i64>()
            .with_context(|| format!("invalid product id in '{raw}'"))?;
        let quantity = match qty {
            Some(qty) => qty
                .trim()
                .parse::<u32>()
                .with_context(|| format!("invalid quantity in '{raw}'"))?,
            None => 1,
        };
        if quantity == 0 {
            bail!("quantity in '{raw}' must be at least 1");
        }
        Ok(Self {
            product_id: ProductId(product_id),
            quantity,
        })
    }
}

#[derive(Parser, Debug)]
#[command(about = "Browse the storefront catalog, build a cart and place an order")]
struct Args {
    /// Settings file; defaults to ./shop.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    /// Put units in the cart, e.g. `--add 3:2`. Repeatable.
    #[arg(long = "add", value_name = "ID[:QTY]")]
    add: Vec<CartAction>,
    /// Take units out of the cart after all additions. Repeatable.
    #[arg(long = "remove", value_name = "ID[:QTY]")]
    remove: Vec<CartAction>,
    #[arg(long)]
    submit: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => load_settings_from(path)?,
        None => load_settings()?,
    };
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
        settings.validate()?;
    }
    info!(server_url = %settings.server_url, order_url = %settings.order_url(), "using backend");

    let backend = HttpShopBackend::new(&settings)?;
    let session = ShopSession::new(Arc::new(backend));
    session.load_catalog().await?;

    println!("Products");
    println!("{}", view::render_products(&session.snapshot().await));

    for action in &args.add {
        if let Err(e) = session.add_to_cart(action.product_id, action.quantity).await {
            println!("{}", view::render_error(&e));
        }
    }
    for action in &args.remove {
        if let Err(e) = session
            .remove_from_cart(action.product_id, action.quantity)
            .await
        {
            println!("{}", view::render_error(&e));
        }
    }

    println!("Cart");
    println!("{}", view::render_cart(&session.order_totals().await));

    if args.submit {
        match session.submit_order().await {
            Ok(result) => println!("{}", view::render_result(&result)),
            Err(e) => match session.last_result().await {
                Some(result) => println!("{}", view::render_result(&result)),
                None => println!("{}", view::render_error(&e)),
            },
        }
    }

    Ok(())
}
