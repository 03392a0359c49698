use clap::{Args, Subcommand};
use storefront::{Order, format_rupiah};

use super::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    /// Print orders as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// All orders, newest first
    List,

    /// The most recently recorded order
    Last,
}

pub(crate) fn run(store: &StoreArgs, command: &OrdersCommand) -> Result<(), String> {
    let recorder = store.recorder(store.carts());

    let orders = match command.command {
        OrdersSubcommand::List => recorder.orders(),
        OrdersSubcommand::Last => recorder.last_order().map(Vec::from_iter),
    }
    .map_err(|error| error.to_string())?;

    if command.json {
        let json = serde_json::to_string_pretty(&orders).map_err(|error| error.to_string())?;

        println!("{json}");
    } else if orders.is_empty() {
        println!("no orders yet");
    } else {
        orders.iter().for_each(print_summary);
    }

    Ok(())
}

fn print_summary(order: &Order) {
    println!(
        "{}  {}  {} {}  {} item(s)  {}  {}",
        order.order_id,
        order.created_at,
        order.customer.first_name,
        order.customer.last_name,
        order.items.len(),
        order.payment.status,
        format_rupiah(order.total),
    );
}
