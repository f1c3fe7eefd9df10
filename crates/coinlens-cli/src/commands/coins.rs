use std::fmt::Write as _;

use serde_json::json;

use crate::cli::CoinsArgs;
use crate::commands::{AppContext, CommandOutput};
use crate::error::CliError;

pub async fn run(args: &CoinsArgs, ctx: &AppContext) -> Result<CommandOutput, CliError> {
    let catalog = ctx.catalog.get_or_fetch(&ctx.client).await?;

    let query = args.query.as_deref().map(str::to_lowercase);
    let matches = catalog
        .assets()
        .iter()
        .filter(|asset| match &query {
            Some(q) => asset.name.to_lowercase().contains(q) || asset.id.contains(q),
            None => true,
        })
        .take(args.limit)
        .collect::<Vec<_>>();

    let mut text = String::new();
    for asset in &matches {
        writeln!(text, "{:<32} {}", asset.id, asset.name).expect("writing to String");
    }
    writeln!(
        text,
        "{} of {} assets shown",
        matches.len(),
        catalog.len()
    )
    .expect("writing to String");
    if !catalog.collisions().is_empty() {
        writeln!(
            text,
            "warning: {} duplicate case-folded names skipped",
            catalog.collisions().len()
        )
        .expect("writing to String");
    }

    let json = json!({
        "assets": matches,
        "total": catalog.len(),
        "collisions": catalog.collisions(),
    });

    Ok(CommandOutput { json, text })
}
