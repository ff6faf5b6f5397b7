//! Draft order commands.

use anyhow::{Context as _, Result};
use pos_commerce::DraftId;

use super::{DraftsArgs, DraftsCommand};
use crate::context::Context;
use crate::output::format_qty;

/// Run the drafts command.
pub async fn run(args: DraftsArgs, ctx: &Context) -> Result<()> {
    let app = ctx.open_app()?;
    let drafts = app.drafts();

    match args.command.unwrap_or(DraftsCommand::List) {
        DraftsCommand::List => {
            let list = drafts.list();
            if ctx.output.is_json() {
                ctx.output.json(&list);
                return Ok(());
            }

            ctx.output.header("Drafts");
            if list.is_empty() {
                ctx.output.info("No drafts saved");
                return Ok(());
            }
            let widths = [14, 6, 24];
            ctx.output.table_row(&["ID", "ITEMS", "SAVED"], &widths);
            for draft in &list {
                let saved = draft
                    .at
                    .as_ref()
                    .and_then(|t| t.to_datetime())
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                ctx.output.table_row(
                    &[
                        draft.short_id(),
                        format_qty(draft.item_count()).as_str(),
                        saved.as_str(),
                    ],
                    &widths,
                );
            }
        }
        DraftsCommand::Save => {
            let draft = drafts.save_from_cart()?;
            if ctx.output.is_json() {
                ctx.output.json(&draft);
            } else {
                ctx.output.success(&format!("Saved draft {}", draft.id));
            }
        }
        DraftsCommand::Load { id } => {
            let id = resolve(&app, &id)?;
            if !app.cart().read().is_empty()
                && !ctx.confirm("Loading a draft replaces the current cart. Continue?")?
            {
                ctx.output.warn("Cancelled");
                return Ok(());
            }
            let discarded = drafts.load_into_cart(&id)?;
            ctx.output.success(&format!("Loaded draft {}", id));
            if !discarded.is_empty() {
                ctx.output.info(&format!("Replaced {} cart item(s)", discarded.len()));
            }
            super::cart::show(&app.cart().read(), app.currency(), ctx);
        }
        DraftsCommand::Delete { id } => {
            let id = resolve(&app, &id)?;
            drafts.delete(&id)?;
            ctx.output.success(&format!("Deleted draft {}", id));
        }
    }

    Ok(())
}

/// Accept a full id or the short prefix shown by `drafts list`.
fn resolve(app: &pos_core::App, input: &str) -> Result<DraftId> {
    let list = app.drafts().list();
    if let Some(exact) = list.iter().find(|d| d.id.as_str() == input) {
        return Ok(exact.id.clone());
    }
    let mut matches = list.iter().filter(|d| d.id.as_str().starts_with(input));
    let first = matches
        .next()
        .with_context(|| format!("No draft matches {}", input))?;
    if matches.next().is_some() {
        anyhow::bail!("{} matches more than one draft", input);
    }
    Ok(first.id.clone())
}
