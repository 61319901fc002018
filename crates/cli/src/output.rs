// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;
use codexi_wire::CommandResult;
use serde::Serialize;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Renders as JSON when `format` is `Json`, otherwise calls `text_fn`.
pub fn format_or_json<T: Serialize>(
    format: OutputFormat,
    data: &T,
    text_fn: impl FnOnce(),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Text => {
            text_fn();
        }
    }
    Ok(())
}

/// One model per line.
pub fn render_models(models: &[String]) -> String {
    let mut out = String::new();
    for model in models {
        out.push_str(model);
        out.push('\n');
    }
    out
}

/// Footer line after a command's streams.
pub fn result_footer(result: &CommandResult) -> String {
    let mut notes = Vec::new();
    if result.timed_out {
        notes.push("timed out");
    }
    if result.truncated {
        notes.push("output truncated");
    }
    let mut footer = format!("exit {} in {}", result.exit_code, result.cwd);
    if !notes.is_empty() {
        footer.push_str(&format!(" ({})", notes.join(", ")));
    }
    footer
}
