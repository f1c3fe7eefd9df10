use std::fmt::Write as _;

use coinlens_core::{DomainError, Window};
use serde_json::json;

use crate::chart::{self, ChartSeries};
use crate::cli::CompareArgs;
use crate::commands::{AppContext, CommandOutput};
use crate::error::CliError;

const CHART_WIDTH: usize = 64;
const CHART_HEIGHT: usize = 14;

/// Two-asset comparison flow.
///
/// Series are fetched sequentially; any fetch failure (including an empty
/// series) propagates to the top-level error path.
pub async fn run(args: &CompareArgs, ctx: &AppContext) -> Result<CommandOutput, CliError> {
    let window: Window = args.window.parse().map_err(CliError::Domain)?;
    let catalog = ctx.catalog.get_or_fetch(&ctx.client).await?;

    let first = catalog
        .resolve(&args.first)
        .cloned()
        .ok_or_else(|| DomainError::UnknownAsset {
            name: args.first.clone(),
        })?;
    let second = catalog
        .resolve(&args.second)
        .cloned()
        .ok_or_else(|| DomainError::UnknownAsset {
            name: args.second.clone(),
        })?;

    let first_series = ctx.client.market_chart(&first.id, window).await?;
    let second_series = ctx.client.market_chart(&second.id, window).await?;

    let mut text = String::new();
    writeln!(text, "Price Comparison ({})", window).expect("writing to String");
    text.push('\n');
    text.push_str(&chart::render(
        &[
            ChartSeries {
                label: &first.name,
                series: &first_series,
            },
            ChartSeries {
                label: &second.name,
                series: &second_series,
            },
        ],
        CHART_WIDTH,
        CHART_HEIGHT,
    ));

    let json = json!({
        "window": window,
        "series": [
            { "asset": first, "points": first_series.len(), "series": first_series },
            { "asset": second, "points": second_series.len(), "series": second_series },
        ],
    });

    Ok(CommandOutput { json, text })
}
