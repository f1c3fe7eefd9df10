use std::fmt::Write as _;

use coinlens_core::{summarize, DomainError, Window};
use serde_json::json;

use crate::chart::{self, ChartSeries};
use crate::cli::AnalyzeArgs;
use crate::commands::{AppContext, CommandOutput};
use crate::error::CliError;

const CHART_WIDTH: usize = 64;
const CHART_HEIGHT: usize = 12;

/// Single-asset analysis flow.
///
/// Unlike `compare`, a failed series fetch here is rendered inline instead of
/// aborting the command: the selection was valid, so the user gets the error
/// text where the chart would have been.
pub async fn run(args: &AnalyzeArgs, ctx: &AppContext) -> Result<CommandOutput, CliError> {
    let window: Window = args.window.parse().map_err(CliError::Domain)?;
    let catalog = ctx.catalog.get_or_fetch(&ctx.client).await?;
    let asset = catalog
        .resolve(&args.name)
        .cloned()
        .ok_or_else(|| DomainError::UnknownAsset {
            name: args.name.clone(),
        })?;

    match ctx.client.market_chart(&asset.id, window).await {
        Ok(series) => {
            let summary = summarize(&series)?;

            let mut text = String::new();
            writeln!(text, "Price Chart for {} ({})", asset.name, window)
                .expect("writing to String");
            text.push('\n');
            text.push_str(&chart::render(
                &[ChartSeries {
                    label: &asset.name,
                    series: &series,
                }],
                CHART_WIDTH,
                CHART_HEIGHT,
            ));
            text.push('\n');
            writeln!(
                text,
                "Maximum Price: ${} on {}",
                chart::format_price(summary.max_price),
                summary.max_at.date()
            )
            .expect("writing to String");
            writeln!(
                text,
                "Minimum Price: ${} on {}",
                chart::format_price(summary.min_price),
                summary.min_at.date()
            )
            .expect("writing to String");

            let json = json!({
                "asset": asset,
                "window": window,
                "points": series.len(),
                "summary": summary,
                "series": series,
            });

            Ok(CommandOutput { json, text })
        }
        Err(error) => {
            let text = format!("Error fetching data: {error}\n");
            let json = json!({
                "asset": asset,
                "window": window,
                "error": { "code": error.code(), "message": error.to_string() },
            });
            Ok(CommandOutput { json, text })
        }
    }
}
