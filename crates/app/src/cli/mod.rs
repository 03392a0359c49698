use std::{path::PathBuf, sync::Arc};

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use storefront::{FeeSchedule, PaymentMethod, Pricing, pricing::TAX_RATE};
use storefront_app::{
    domain::{
        cart::CartStore,
        checkout::CheckoutService,
        orders::{HttpOrderMirror, OrderRecorder},
    },
    storage::{FileStore, KeyValueStore},
};

mod cart;
mod checkout;
mod orders;

#[derive(Debug, Parser)]
#[command(name = "storefront-app", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect and change the cart
    Cart(cart::CartCommand),

    /// Price the cart for a shipping and payment choice
    Quote(checkout::QuoteArgs),

    /// Pay for the cart and record the order
    Checkout(checkout::CheckoutArgs),

    /// Show recorded orders
    Orders(orders::OrdersCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Cart(command) => cart::run(&self.store, command),
            Commands::Quote(args) => checkout::quote(&self.store, &args),
            Commands::Checkout(args) => checkout::run(&self.store, args).await,
            Commands::Orders(command) => orders::run(&self.store, &command),
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct StoreArgs {
    /// JSON file holding the cart and order history
    #[arg(
        long,
        global = true,
        env = "STOREFRONT_STORE",
        default_value = "storefront.json"
    )]
    store: PathBuf,

    /// Endpoint that receives a copy of every recorded order
    #[arg(long, global = true, env = "STOREFRONT_ORDERS_URL")]
    orders_url: Option<String>,

    /// Surcharge on e-wallet payments, in percent
    #[arg(
        long,
        global = true,
        env = "STOREFRONT_EWALLET_FEE_PERCENT",
        default_value = "1.5"
    )]
    ewallet_fee_percent: Decimal,
}

impl StoreArgs {
    fn open(&self) -> Arc<dyn KeyValueStore> {
        Arc::new(FileStore::new(&self.store))
    }

    fn carts(&self) -> CartStore {
        CartStore::new(self.open())
    }

    fn recorder(&self, carts: CartStore) -> OrderRecorder {
        let recorder = OrderRecorder::new(self.open(), carts);

        match &self.orders_url {
            Some(url) => recorder.with_mirror(Arc::new(HttpOrderMirror::new(url.clone()))),
            None => recorder,
        }
    }

    fn pricing(&self) -> Result<Pricing, String> {
        let fees = FeeSchedule::default()
            .with_percent(PaymentMethod::EWallet, self.ewallet_fee_percent)
            .map_err(|error| error.to_string())?;

        Pricing::new(TAX_RATE, fees).map_err(|error| error.to_string())
    }

    fn checkout(&self) -> Result<CheckoutService, String> {
        let carts = self.carts();
        let recorder = self.recorder(carts.clone());

        Ok(CheckoutService::new(self.pricing()?, carts, recorder))
    }
}
