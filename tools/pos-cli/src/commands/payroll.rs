//! Payroll from an attendance export.

use anyhow::{Context as _, Result};
use pos_commerce::payroll::{daily_summary, AttendanceRecord, PayPeriod, Payroll};

use super::PayrollArgs;
use crate::context::Context;

/// Run the payroll command.
pub async fn run(args: PayrollArgs, ctx: &Context) -> Result<()> {
    let path = ctx.resolve_path(&args.file);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read attendance file: {}", path.display()))?;
    let mut records: Vec<AttendanceRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse attendance file: {}", path.display()))?;

    if let Some(user) = &args.user {
        records.retain(|r| r.uid.as_str() == user.as_str());
    }

    let period = PayPeriod::from_dates(args.from, args.to);
    let rate = args.rate.unwrap_or(ctx.config.payroll.hourly_rate);
    let payroll = Payroll::compute(&records, period, rate);
    let days: Vec<_> = daily_summary(&records)
        .into_iter()
        .filter(|d| {
            args.from.map_or(true, |from| d.day >= from) && args.to.map_or(true, |to| d.day <= to)
        })
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "payroll": payroll,
            "days": days,
        }));
        return Ok(());
    }

    let currency = ctx.config.app.currency;
    ctx.output.header("Attendance");
    if days.is_empty() {
        ctx.output.info("No attendance in range");
    } else {
        let widths = [12, 8, 8, 6];
        ctx.output.table_row(&["DAY", "IN", "OUT", "HOURS"], &widths);
        for day in &days {
            let time = |t: Option<chrono::DateTime<chrono::Utc>>| {
                t.map(|t| t.format("%H:%M").to_string()).unwrap_or_else(|| "-".to_string())
            };
            ctx.output.table_row(
                &[
                    day.day.to_string().as_str(),
                    time(day.clock_in).as_str(),
                    time(day.clock_out).as_str(),
                    format!("{:.2}", day.hours).as_str(),
                ],
                &widths,
            );
        }
    }

    ctx.output.header("Payroll");
    ctx.output.kv("hours", &format!("{:.2}", payroll.hours));
    ctx.output.kv("rate", &currency.format(payroll.rate));
    ctx.output.kv("gross", &currency.format(payroll.gross));
    Ok(())
}
