//! Route dispatch command.

use anyhow::Result;
use pos_router::{HandlerStatus, Resolved};

use super::RouteArgs;
use crate::context::Context;
use crate::output::status_badge;

/// Run the route command.
pub async fn run(args: RouteArgs, ctx: &Context) -> Result<()> {
    let mut app = ctx.open_app()?;
    let (outcome, content) = app.visit(&args.fragment).await;
    let chrome = app.chrome();

    let (kind, pattern, path) = match &outcome.resolved {
        Resolved::Route { pattern, path } => ("route", pattern.as_str(), path.as_str()),
        Resolved::NotFound { path } => ("not_found", "", path.as_str()),
    };
    let status = match outcome.status {
        HandlerStatus::Rendered => "rendered",
        HandlerStatus::Completed => "completed",
        HandlerStatus::Failed => "failed",
        HandlerStatus::Superseded => "superseded",
    };

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "resolved": kind,
            "pattern": pattern,
            "path": path,
            "status": status,
            "content": content,
            "cartSidebar": chrome.cart_sidebar_open,
        }));
        return Ok(());
    }

    ctx.output.debug(&format!("{} {} -> {}", kind, pattern, path));
    ctx.output.kv("path", &chrome.path);
    ctx.output.kv("status", &status_badge(status));
    ctx.output.info("");
    ctx.output.raw(&content);
    Ok(())
}
