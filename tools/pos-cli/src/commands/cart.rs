//! Cart commands.

use anyhow::Result;
use pos_commerce::cart::{Cart, ProductRef};
use pos_commerce::{Currency, ProductId};

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::format_qty;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let app = ctx.open_app()?;
    let cart = app.cart();

    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => {}
        CartCommand::Add {
            id,
            name,
            price,
            qty,
        } => {
            let mut product = ProductRef::new(id.as_str());
            if let Some(name) = name {
                product = product.with_name(name);
            }
            if let Some(price) = price {
                product = product.with_price(price);
            }
            if cart.add_item(&product, qty)? {
                ctx.output.success(&format!("Added {} x {}", format_qty(qty), id));
            } else {
                ctx.output.warn("Nothing added: product id is empty");
            }
        }
        CartCommand::Set { id, qty } => {
            if !cart.set_quantity(&ProductId::new(id.as_str()), qty)? {
                ctx.output.warn(&format!("{} is not in the cart", id));
            }
        }
        CartCommand::Remove { id } => {
            if cart.remove_item(&ProductId::new(id.as_str()))? {
                ctx.output.success(&format!("Removed {}", id));
            } else {
                ctx.output.warn(&format!("{} is not in the cart", id));
            }
        }
        CartCommand::Clear => {
            if cart.read().is_empty() {
                ctx.output.info("Cart is already empty");
                return Ok(());
            }
            if !ctx.confirm("Remove every item from the cart?")? {
                ctx.output.warn("Cancelled");
                return Ok(());
            }
            cart.clear()?;
            ctx.output.success("Cart cleared");
            return Ok(());
        }
        CartCommand::Count => {
            let count = cart.count();
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({ "count": count }));
            } else {
                println!("{}", format_qty(count));
            }
            return Ok(());
        }
    }

    show(&cart.read(), app.currency(), ctx);
    Ok(())
}

/// Print the cart as a table, or as JSON.
pub fn show(cart: &Cart, currency: Currency, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "items": cart.items(),
            "count": cart.count(),
            "total": cart.total(),
        }));
        return;
    }

    ctx.output.header("Cart");
    if cart.is_empty() {
        ctx.output.info("Cart is empty");
        return;
    }

    let widths = [16, 24, 6, 12];
    ctx.output.table_row(&["ID", "NAME", "QTY", "SUBTOTAL"], &widths);
    for item in cart.items() {
        ctx.output.table_row(
            &[
                item.id.as_str(),
                item.display_name(),
                format_qty(item.qty).as_str(),
                currency.format(item.subtotal()).as_str(),
            ],
            &widths,
        );
    }
    ctx.output.info("");
    ctx.output.kv("items", &format_qty(cart.count()));
    ctx.output.kv("total", &currency.format(cart.total()));
}
