use bytes::BytesMut;
use serde::Serialize;
use siyi::frame::{decode_frame, encode_frame_raw, Command};
use siyi::message::{DecoderRegistry, MessageError, Response};

use crate::cmd::{DecodeArgs, EncodeArgs};
use crate::exit::{frame_error, message_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_report, OutputFormat};

#[derive(Serialize)]
struct EncodeOutput {
    command: &'static str,
    command_id: u8,
    sequence: u16,
    payload: String,
    frame: String,
}

#[derive(Serialize)]
struct DecodeOutput {
    command: &'static str,
    command_id: u8,
    control: u8,
    sequence: u16,
    payload: String,
    response: Option<Response>,
}

pub fn encode(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let command_id = parse_command(&args.command)?;
    let payload = parse_hex(&args.payload, "payload")?;

    let mut frame = BytesMut::new();
    encode_frame_raw(command_id, args.sequence, &payload, &mut frame);

    let command = Command::from_u8(command_id);
    let out = EncodeOutput {
        command: command.name(),
        command_id,
        sequence: args.sequence,
        payload: hex::encode(&payload),
        frame: hex::encode(&frame),
    };
    let rows = [
        ("command", command.to_string()),
        ("sequence", out.sequence.to_string()),
        ("payload", out.payload.clone()),
        ("frame", out.frame.clone()),
    ];
    print_report(&out, &rows, format);
    Ok(SUCCESS)
}

pub fn decode(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let datagram = parse_hex(&args.frame, "frame")?;
    let frame = decode_frame(&datagram).map_err(|err| frame_error("invalid frame", err))?;

    let response = match DecoderRegistry::with_defaults().decode_frame(&frame) {
        Ok(response) => Some(response),
        Err(MessageError::NoDecoder(_)) => None,
        Err(err) => return Err(message_error("invalid payload", err)),
    };

    let out = DecodeOutput {
        command: frame.command.name(),
        command_id: frame.command_id,
        control: frame.control,
        sequence: frame.sequence,
        payload: hex::encode(&frame.payload),
        response,
    };
    let rows = [
        ("command", format!("{} (0x{:02x})", out.command, out.command_id)),
        ("control", format!("0x{:02x}", out.control)),
        ("sequence", out.sequence.to_string()),
        ("payload", out.payload.clone()),
        (
            "response",
            out.response
                .as_ref()
                .map_or_else(|| "no decoder".to_string(), Response::summary),
        ),
    ];
    print_report(&out, &rows, format);
    Ok(SUCCESS)
}

/// Accepts a snake_case command name, a decimal id, or a `0x` hex id.
fn parse_command(input: &str) -> CliResult<u8> {
    if let Some(command) = Command::from_name(input) {
        return Ok(command.id());
    }
    let parsed = match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|_| CliError::new(USAGE, format!("unknown command: {input}")))
}

fn parse_hex(input: &str, what: &str) -> CliResult<Vec<u8>> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&compact).map_err(|err| CliError::new(USAGE, format!("invalid {what} hex: {err}")))
}
