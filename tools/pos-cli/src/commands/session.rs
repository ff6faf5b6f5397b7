//! Session commands.

use anyhow::Result;
use pos_core::nav::dashboard_path;

use super::{SessionArgs, SessionCommand};
use crate::context::Context;

/// Run the session command.
pub async fn run(args: SessionArgs, ctx: &Context) -> Result<()> {
    let app = ctx.open_app()?;
    let session = app.session();

    match args.command.unwrap_or(SessionCommand::Show) {
        SessionCommand::Show => {
            let current = session.current();
            if ctx.output.is_json() {
                ctx.output.json(&current);
                return Ok(());
            }

            ctx.output.header("Session");
            let Some(s) = current else {
                ctx.output.info("Not signed in");
                return Ok(());
            };
            ctx.output.kv("name", &s.display_name());
            ctx.output.kv("username", &s.username);
            ctx.output.kv("email", &s.email);
            ctx.output.kv("role", &format!("{} ({})", s.role.label(), s.role));
            ctx.output.kv("company", s.company_text());
            ctx.output.kv("home", dashboard_path(Some(&s)));
        }
        SessionCommand::Clear => {
            if !session.is_signed_in() {
                ctx.output.info("Not signed in");
                return Ok(());
            }
            session.clear()?;
            ctx.output.success("Signed out");
        }
    }

    Ok(())
}
