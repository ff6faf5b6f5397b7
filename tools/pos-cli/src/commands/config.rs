//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { name, force } => init_config(&name, force, ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    let app = &ctx.config.app;
    ctx.output.header("Current Configuration");

    ctx.output.info("[app]");
    ctx.output.kv("name", &app.name);
    ctx.output.kv("data_dir", &ctx.data_dir().display().to_string());
    ctx.output.kv("currency", app.currency.code());

    ctx.output.info("");
    ctx.output.info("[app.storage]");
    ctx.output.kv("session", &app.storage.session);
    ctx.output.kv("cart", &app.storage.cart);
    ctx.output.kv("drafts", &app.storage.drafts);
    ctx.output.kv("company_scope", &app.storage.company_scope);

    ctx.output.info("");
    ctx.output.info("[app.router]");
    ctx.output.kv("home_path", &app.router.home_path);
    ctx.output.kv("scroll_top", &app.router.scroll_top.to_string());
    ctx.output.kv("show_loading", &app.router.show_loading.to_string());
    if let Some(ref content) = app.router.loading_content {
        ctx.output.kv("loading_content", content);
    }

    ctx.output.info("");
    ctx.output.info("[app.orders]");
    ctx.output.kv("open_limit", &app.orders.open_limit.to_string());

    ctx.output.info("");
    ctx.output.info("[payroll]");
    ctx.output.kv("hourly_rate", &ctx.config.payroll.hourly_rate.to_string());

    Ok(())
}

async fn init_config(name: &str, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("pos.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config(name))?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}
