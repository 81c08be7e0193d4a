//! Transport bootstrap: parses the gRPC channel configuration out of the
//! worker process's argument vector.

use clap::Parser;

use crate::error::Error;

/// `--host`, `--port`, and `--functions-grpc-max-message-length` as handed
/// to every language-worker process by the host.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "functions-worker",
    disable_help_flag = false,
    ignore_errors = true
)]
struct RawArgs {
    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<String>,

    #[arg(long = "functions-grpc-max-message-length")]
    functions_grpc_max_message_length: Option<String>,
}

/// Fully parsed and validated transport configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// gRPC host to dial.
    pub host: String,
    /// gRPC port to dial.
    pub port: u16,
    /// Send/receive message size cap, in bytes.
    pub max_message_length: usize,
}

impl TransportConfig {
    /// Parses transport configuration from `std::env::args()`.
    pub fn from_env_args() -> Result<Self, Error> {
        Self::from_args(std::env::args())
    }

    /// Parses transport configuration from an arbitrary argument iterator
    /// (argv\[0\] included, matching `std::env::args()`'s contract).
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self, Error> {
        let raw = RawArgs::parse_from(args);

        let mut missing = Vec::new();
        if raw.host.is_none() {
            missing.push("host");
        }
        if raw.port.is_none() {
            missing.push("port");
        }
        if raw.functions_grpc_max_message_length.is_none() {
            missing.push("functions-grpc-max-message-length");
        }
        if !missing.is_empty() {
            let quoted: Vec<String> = missing.iter().map(|f| format!("'{f}'")).collect();
            return Err(Error::MissingArguments(quoted.join(", ")));
        }

        let host = raw.host.unwrap();
        let port = raw.port.unwrap().parse::<u16>().map_err(|e| Error::InvalidArgument {
            name: "port",
            reason: e.to_string(),
        })?;
        let max_message_length = raw
            .functions_grpc_max_message_length
            .unwrap()
            .parse::<usize>()
            .map_err(|e| Error::InvalidArgument {
                name: "functions-grpc-max-message-length",
                reason: e.to_string(),
            })?;

        Ok(Self {
            host,
            port,
            max_message_length,
        })
    }
}
