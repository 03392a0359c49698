use std::num::NonZeroU32;

use clap::{Args, Subcommand};
use storefront::{Cart, LineItem, format_rupiah};
use uuid::Uuid;

use super::StoreArgs;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add a product, or add to its quantity when already in the cart
    Add(AddItemArgs),

    /// Print the cart
    Show,

    /// Replace the quantity of a line
    SetQty {
        /// Product id
        id: Uuid,

        /// New quantity
        qty: NonZeroU32,
    },

    /// Remove a line
    Remove {
        /// Product id
        id: Uuid,
    },

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct AddItemArgs {
    /// Product id; generated when omitted
    #[arg(long)]
    id: Option<Uuid>,

    /// Product name
    #[arg(long)]
    name: String,

    /// Unit price in minor units
    #[arg(long)]
    price: u64,

    #[arg(long, default_value = "1")]
    qty: NonZeroU32,

    /// Image file name
    #[arg(long, default_value = "")]
    image: String,
}

pub(crate) fn run(store: &StoreArgs, command: CartCommand) -> Result<(), String> {
    let carts = store.carts();

    let cart = match command.command {
        CartSubcommand::Add(args) => carts.add_item(LineItem::new(
            args.id.unwrap_or_else(Uuid::now_v7),
            args.name,
            args.price,
            args.qty,
            args.image,
        )),
        CartSubcommand::Show => carts.items(),
        CartSubcommand::SetQty { id, qty } => carts.set_quantity(id, qty),
        CartSubcommand::Remove { id } => carts
            .remove_item(id)
            .and_then(|removed| {
                println!("removed {}", removed.name);
                carts.items()
            }),
        CartSubcommand::Clear => carts.clear().and_then(|()| carts.items()),
    }
    .map_err(|error| error.to_string())?;

    print_cart(&cart);

    Ok(())
}

fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("cart is empty");
        return;
    }

    for item in cart.items() {
        let total = item.line_total().map_or_else(|| "-".to_string(), format_rupiah);

        println!(
            "{}  {}  {} x {} = {total}",
            item.id,
            item.name,
            item.qty,
            format_rupiah(item.price),
        );
    }

    println!("{} line(s), {} unit(s)", cart.len(), cart.unit_count());
}
