use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use siyi::link::LinkEvent;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

/// Print `value` as JSON, or `rows` as a two-column table / `key: value` lines.
pub fn print_report<T: Serialize>(value: &T, rows: &[(&str, String)], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            for (key, val) in rows {
                table.add_row(vec![key.to_string(), val.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let width = rows.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
            for (key, val) in rows {
                println!("{key:<width$}  {val}");
            }
        }
    }
}

#[derive(Serialize)]
struct EventOutput<'a> {
    command: &'static str,
    command_id: u8,
    sequence: u16,
    response: &'a siyi::message::Response,
    timestamp: String,
}

pub fn print_event(event: &LinkEvent, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&EventOutput {
            command: event.command.name(),
            command_id: event.command.id(),
            sequence: event.sequence,
            response: &event.response,
            timestamp: now_unix_seconds(),
        }),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COMMAND", "SEQ", "RESPONSE"])
                .add_row(vec![
                    event.command.to_string(),
                    event.sequence.to_string(),
                    event.response.summary(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{} seq={} {}",
                event.command.name(),
                event.sequence,
                event.response.summary()
            );
        }
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
