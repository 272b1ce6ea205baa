use std::io::Read;

use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::envelope::ApiEnvelope;

/// Print an envelope; a failed envelope becomes an error so the process exits non-zero.
pub fn output_envelope(output_format: &OutputFormat, envelope: &ApiEnvelope) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(envelope)?);
        }
        OutputFormat::Text => {
            if envelope.success {
                if envelope.message.is_empty() {
                    println!("✓ OK");
                } else {
                    println!("✓ {}", envelope.message);
                }
                if let Some(data) = envelope.data.as_ref() {
                    println!("{}", serde_json::to_string_pretty(data)?);
                }
            } else {
                for error in &envelope.errors {
                    eprintln!("  - {}", error);
                }
            }
        }
    }

    if envelope.success {
        Ok(())
    } else {
        Err(anyhow::anyhow!("{}", failure_message(envelope)))
    }
}

fn failure_message(envelope: &ApiEnvelope) -> &str {
    if !envelope.message.is_empty() {
        &envelope.message
    } else {
        envelope.first_error().unwrap_or("request failed")
    }
}

/// Output key/value details in the appropriate format
pub fn output_details(output_format: &OutputFormat, title: &str, details: Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ title: details }))?);
        }
        OutputFormat::Text => {
            println!("{}:", title);
            if let Some(map) = details.as_object() {
                for (key, value) in map {
                    match value {
                        Value::String(s) => println!("  {}: {}", key, s),
                        other => println!("  {}: {}", key, other),
                    }
                }
            }
        }
    }
    Ok(())
}

/// Parse a JSON body from the argument, or read it from stdin when absent
pub fn read_body(data: Option<String>) -> anyhow::Result<Value> {
    let raw = match data {
        Some(raw) => raw,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    if raw.trim().is_empty() {
        return Err(anyhow::anyhow!("Request body is empty; pass --data or pipe JSON on stdin"));
    }

    serde_json::from_str(&raw).map_err(|e| anyhow::anyhow!("Request body is not valid JSON: {}", e))
}
