mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::{Command, ConnectArgs};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "siyi", version, about = "SIYI gimbal camera CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(flatten)]
    connect: ConnectArgs,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, &cli.connect, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_angles_subcommand() {
        let cli = Cli::try_parse_from(["siyi", "angles", "--yaw", "45", "--pitch", "-30.5"])
            .expect("angles args should parse");
        match cli.command {
            Command::Angles(args) => {
                assert_eq!(args.yaw, 45.0);
                assert_eq!(args.pitch, -30.5);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn connection_flags_are_global() {
        let cli = Cli::try_parse_from([
            "siyi",
            "center",
            "--camera",
            "10.0.0.7",
            "--port",
            "4000",
            "--local-port",
            "0",
        ])
        .expect("connection flags should parse after the subcommand");
        assert_eq!(cli.connect.camera.to_string(), "10.0.0.7");
        assert_eq!(cli.connect.port, 4000);
        assert_eq!(cli.connect.local_port, 0);
    }

    #[test]
    fn zoom_requires_direction() {
        let err = Cli::try_parse_from(["siyi", "zoom"]).expect_err("zoom needs a direction");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
        assert!(Cli::try_parse_from(["siyi", "zoom", "in"]).is_ok());
    }

    #[test]
    fn parses_mode_values() {
        let cli = Cli::try_parse_from(["siyi", "mode", "fpv"]).expect("mode should parse");
        assert!(matches!(cli.command, Command::Mode(_)));
        assert!(Cli::try_parse_from(["siyi", "mode", "sideways"]).is_err());
    }

    #[test]
    fn decode_takes_hex_argument() {
        let cli = Cli::try_parse_from(["siyi", "decode", "5566010000000000082f0c"])
            .expect("decode should parse");
        assert!(matches!(cli.command, Command::Decode(_)));
    }
}
