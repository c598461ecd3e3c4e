//! Commands accepted by the interactive mode

use crate::error::{AppError, Result};
use crate::models::ProbeRequest;
use crate::types::{HttpScheme, TcpService};
use std::path::PathBuf;
use std::str::FromStr;

/// Usage text printed by `help`
pub const SHELL_HELP: &str = "\
Comandos:
  http HOST            GET http://HOST
  https HOST           GET https://HOST
  ping HOST            un ping a HOST
  range START END      ping a cada IPv4 entre START y END (máximo 256)
  tcp SERVICE HOST     conexión TCP (ssh, ftp, sftp, telnet)
  log                  muestra el registro de resultados
  clear                limpia el registro
  export FILE          exporta el registro como CSV
  help                 muestra esta ayuda
  quit | exit          termina";

/// One parsed line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Probe(ProbeRequest),
    ShowLog,
    Clear,
    Export(PathBuf),
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(AppError::validation("Empty command"));
        };
        let args: Vec<&str> = words.collect();

        let command = match (verb.to_lowercase().as_str(), args.as_slice()) {
            ("http", [host]) => Self::Probe(ProbeRequest::http(*host, HttpScheme::Http)),
            ("https", [host]) => Self::Probe(ProbeRequest::http(*host, HttpScheme::Https)),
            ("ping", [host]) => Self::Probe(ProbeRequest::ping(*host)),
            ("range", [start, end]) => Self::Probe(ProbeRequest::ping_range(*start, *end)),
            ("tcp", [service, host]) => Self::Probe(ProbeRequest::tcp(*host, service.parse::<TcpService>()?)),
            ("log", []) => Self::ShowLog,
            ("clear", []) => Self::Clear,
            ("export", [path]) => Self::Export(PathBuf::from(path)),
            ("help", []) => Self::Help,
            ("quit" | "exit", []) => Self::Quit,
            (known @ ("http" | "https" | "ping" | "range" | "tcp" | "log" | "clear" | "export" | "help" | "quit" | "exit"), _) => {
                return Err(AppError::validation(format!("Wrong arguments for '{}'. Type 'help' for usage", known)));
            }
            (other, _) => {
                return Err(AppError::validation(format!("Unknown command '{}'. Type 'help' for usage", other)));
            }
        };

        Ok(command)
    }
}
