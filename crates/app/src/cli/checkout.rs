use std::pin::pin;

use clap::Args;
use storefront::{
    BuyerDetails, Order, PaymentMethod, ShippingKind, Totals, format_rupiah,
    shipping::REGULAR_SHIPPING_COST,
};
use storefront_app::domain::checkout::CheckoutService;
use tokio::signal;

use super::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct SelectionArgs {
    #[arg(long, default_value = "regular")]
    shipping: ShippingKind,

    /// Shipping cost in minor units; required unless shipping is regular
    #[arg(long)]
    shipping_cost: Option<u64>,

    #[arg(long, default_value = "bank-transfer")]
    payment: PaymentMethod,

    /// E-wallet provider; the first configured provider when omitted
    #[arg(long)]
    provider: Option<String>,
}

impl SelectionArgs {
    fn apply(&self, service: &mut CheckoutService) -> Result<Totals, String> {
        let cost = match (self.shipping, self.shipping_cost) {
            (_, Some(cost)) => cost,
            (ShippingKind::Regular, None) => REGULAR_SHIPPING_COST,
            (kind, None) => return Err(format!("--shipping-cost is required for {kind} shipping")),
        };

        service
            .select_shipping(self.shipping, cost)
            .map_err(|error| error.to_string())?;

        service
            .select_payment(self.payment)
            .map_err(|error| error.to_string())?;

        if let Some(provider) = &self.provider {
            service
                .select_provider(provider)
                .map_err(|error| error.to_string())?;
        }

        service.totals().map_err(|error| error.to_string())
    }
}

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    #[command(flatten)]
    selection: SelectionArgs,
}

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    #[arg(long)]
    first_name: String,

    #[arg(long)]
    last_name: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    phone: String,

    #[arg(long)]
    address: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    postal_code: String,
}

impl CheckoutArgs {
    fn buyer(&self) -> BuyerDetails {
        BuyerDetails {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            postal_code: self.postal_code.clone(),
        }
    }
}

pub(crate) fn quote(store: &StoreArgs, args: &QuoteArgs) -> Result<(), String> {
    let mut service = store.checkout()?;
    let totals = args.selection.apply(&mut service)?;

    print_totals(&service, &totals);

    Ok(())
}

/// Pay and record; Ctrl+C cancels while the e-wallet payment is awaiting confirmation.
pub(crate) async fn run(store: &StoreArgs, args: CheckoutArgs) -> Result<(), String> {
    let mut service = store.checkout()?;
    let totals = args.selection.apply(&mut service)?;

    print_totals(&service, &totals);

    let payments = service.payments();
    let mut phases = payments.subscribe();
    let buyer = args.buyer();

    let result = {
        let mut checkout = pin!(service.process_checkout(&buyer));

        loop {
            tokio::select! {
                result = &mut checkout => break result,
                Ok(()) = phases.changed() => {
                    let phase = phases.borrow_and_update().clone();

                    if let (Some(title), Some(message)) = (phase.title(), phase.message()) {
                        println!("{title}: {message}");
                    }
                }
                Ok(()) = signal::ctrl_c() => {
                    if !payments.cancel() {
                        println!("payment cannot be cancelled right now");
                    }
                }
            }
        }
    };

    service.recorder().flush().await;

    let order = result.map_err(|error| error.to_string())?;

    print_order(&order);

    Ok(())
}

fn print_totals(service: &CheckoutService, totals: &Totals) {
    let session = service.session();
    let shipping = session.shipping();

    println!("subtotal      {}", format_rupiah(totals.subtotal));
    println!("shipping      {} ({})", format_rupiah(shipping.cost), shipping.kind);
    println!("tax           {}", format_rupiah(totals.tax));

    if totals.payment_fee > 0 {
        println!("payment fee   {}", format_rupiah(totals.payment_fee));
    }

    match session.provider() {
        Some(provider) => println!("payment       {} ({provider})", session.payment()),
        None => println!("payment       {}", session.payment()),
    }

    println!("total         {}", format_rupiah(totals.grand_total));
}

fn print_order(order: &Order) {
    println!("order {} recorded", order.order_id);
    println!(
        "{} {} paid with {}, status {}",
        order.customer.first_name,
        order.customer.last_name,
        order.payment.provider,
        order.payment.status,
    );

    if let Some(transaction_id) = &order.payment.transaction_id {
        println!("transaction   {transaction_id}");
    }

    println!("total         {}", format_rupiah(order.total));
}
