//! Structured output: JSON, YAML and tables, with optional JMESPath filtering

use anyhow::{Context, Result};
use comfy_table::Table;
use jpx_core::Runtime;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;

use crate::cli;
use crate::error::ComposeCtlError;

/// Global JMESPath runtime with extended functions
static JMESPATH_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Get or initialize the JMESPath runtime with extended functions
pub fn get_jmespath_runtime() -> &'static Runtime {
    JMESPATH_RUNTIME.get_or_init(|| Runtime::builder().with_all_extensions().build())
}

fn backtick_regex() -> Option<&'static Regex> {
    static BACKTICK_RE: OnceLock<Option<Regex>> = OnceLock::new();
    BACKTICK_RE
        .get_or_init(|| {
            // Backtick-delimited content, escaped backticks allowed inside
            Regex::new(r"`([^`\\]*(?:\\.[^`\\]*)*)`").ok()
        })
        .as_ref()
}

/// Quote elided backtick literals.
///
/// JMESPath allows `` `foo` `` as shorthand for `` `"foo"` ``; the runtime
/// only accepts JSON inside backticks. Contents that are already valid JSON
/// are left alone.
fn normalize_backtick_literals(query: &str) -> String {
    let Some(re) = backtick_regex() else {
        return query.to_string();
    };
    re.replace_all(query, |caps: &regex::Captures| {
        let content = &caps[1];
        let trimmed = content.trim();

        if serde_json::from_str::<Value>(trimmed).is_ok() {
            format!("`{}`", content)
        } else {
            let escaped = trimmed.replace('\\', "\\\\").replace('"', "\\\"");
            format!("`\"{}\"`", escaped)
        }
    })
    .into_owned()
}

/// Compile a JMESPath expression using the extended runtime
pub fn compile_jmespath(
    query: &str,
) -> Result<jpx_core::Expression<'static>, jpx_core::JmespathError> {
    let normalized = normalize_backtick_literals(query);
    get_jmespath_runtime().compile(&normalized)
}

/// Concrete rendering for structured output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Table,
}

impl From<cli::OutputFormat> for OutputFormat {
    /// `auto` falls back to JSON where structured output is needed
    fn from(format: cli::OutputFormat) -> Self {
        match format {
            cli::OutputFormat::Auto | cli::OutputFormat::Json => OutputFormat::Json,
            cli::OutputFormat::Yaml => OutputFormat::Yaml,
            cli::OutputFormat::Table => OutputFormat::Table,
        }
    }
}

/// Apply an optional JMESPath query to a value
pub fn apply_query(value: Value, query: Option<&str>) -> Result<Value> {
    let Some(query_str) = query else {
        return Ok(value);
    };
    let expr = compile_jmespath(query_str)
        .with_context(|| format!("Invalid JMESPath expression: {}", query_str))?;
    expr.search(&value).context("JMESPath query failed")
}

/// Render data in the given format
pub fn format_output<T: Serialize>(
    data: T,
    format: OutputFormat,
    query: Option<&str>,
) -> Result<String> {
    let json_value = apply_query(serde_json::to_value(data)?, query)?;

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&json_value)?,
        OutputFormat::Yaml => serde_yaml::to_string(&json_value)?
            .trim_end()
            .to_string(),
        OutputFormat::Table => render_table(&json_value),
    };
    Ok(rendered)
}

pub fn print_output<T: Serialize>(
    data: T,
    format: OutputFormat,
    query: Option<&str>,
) -> Result<()> {
    println!("{}", format_output(data, format, query)?);
    Ok(())
}

/// Print structured data for a command, mapping failures to the CLI error
pub fn print_value<T: Serialize>(
    data: T,
    format: cli::OutputFormat,
    query: Option<&str>,
) -> crate::error::Result<()> {
    print_output(data, format.into(), query).map_err(|e| ComposeCtlError::OutputError {
        message: format!("{:#}", e),
    })
}

fn render_table(value: &Value) -> String {
    match value {
        Value::Array(arr) if !arr.is_empty() => {
            let mut table = Table::new();

            if let Value::Object(first) = &arr[0] {
                let headers: Vec<String> = first.keys().cloned().collect();
                table.set_header(&headers);

                for item in arr {
                    if let Value::Object(obj) = item {
                        let row: Vec<String> = headers
                            .iter()
                            .map(|h| format_value(obj.get(h).unwrap_or(&Value::Null)))
                            .collect();
                        table.add_row(row);
                    }
                }
            } else {
                table.set_header(vec!["Value"]);
                for item in arr {
                    table.add_row(vec![format_value(item)]);
                }
            }

            table.to_string()
        }
        Value::Object(obj) => {
            let mut table = Table::new();
            table.set_header(vec!["Key", "Value"]);

            for (key, val) in obj {
                table.add_row(vec![key.clone(), format_value(val)]);
            }

            table.to_string()
        }
        _ => format_value(value),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
