use crate::cli::OutputFormat;
use crate::commands::CommandOutput;
use crate::error::CliError;

pub fn render(output: &CommandOutput, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(&output.json)?
            } else {
                serde_json::to_string(&output.json)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => {
            print!("{}", output.text);
        }
    }

    Ok(())
}
