//! Catalog commands: one operation, one request, one printed result

use composectl_core::{Dispatcher, Operation, Outcome, summarize};
use tracing::debug;

use crate::cli::OutputFormat;
use crate::error::{ComposeCtlError, Result as CliResult};
use crate::output;

/// Run one catalog operation and print its result
pub async fn handle_operation(
    dispatcher: &Dispatcher,
    operation: &Operation,
    output_format: OutputFormat,
    query: Option<&str>,
) -> CliResult<()> {
    let outcome = dispatcher.dispatch(operation).await?;

    for line in render(operation, outcome, output_format, query)? {
        println!("{}", line);
    }
    Ok(())
}

/// Produce the printable lines for an outcome.
///
/// `auto` without a query gives the summary lines; every other combination
/// renders the response value itself.
pub fn render(
    operation: &Operation,
    outcome: Outcome,
    output_format: OutputFormat,
    query: Option<&str>,
) -> CliResult<Vec<String>> {
    if output_format == OutputFormat::Auto && query.is_none() {
        debug!("Summarizing {}", operation.command_name());
        return Ok(summarize(operation, &outcome)?);
    }

    let rendered = output::format_output(outcome.into_value(), output_format.into(), query)
        .map_err(|e| ComposeCtlError::OutputError {
            message: format!("{:#}", e),
        })?;
    Ok(vec![rendered])
}
