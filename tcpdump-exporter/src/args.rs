use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

const DEFAULT_METRICS_PORT: u16 = 8000;
const DEFAULT_SERVICES_FILE: &str = "/etc/services";

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Read the exporter options from this file instead of the flags
    #[clap(long)]
    pub config_file: Option<String>,

    /// Options common to live capture and replay
    #[clap(flatten)]
    pub config: ExporterConfig,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Count live traffic by running tcpdump
    Capture {
        /// The network interface to monitor
        #[clap(short, long, default_value = "eth0")]
        interface: String,

        /// Capture filter passed verbatim to tcpdump, e.g. "src net 192.168.1.0/24"
        #[clap(long, default_value = "")]
        filter: String,

        /// The tcpdump binary to run
        #[clap(long, default_value = "tcpdump")]
        tcpdump: String,
    },

    /// Count traffic from saved `tcpdump -v` output
    Replay {
        /// The path to the capture transcript, `-` for stdin
        path: String,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    /// The port the Prometheus metrics are served on
    #[clap(short, long, default_value_t = DEFAULT_METRICS_PORT)]
    pub port: u16,

    /// Keep full host names instead of reducing them to their apex domain
    /// (increases metric cardinality significantly)
    #[clap(short, long, action = clap::ArgAction::SetTrue)]
    pub fqdn: bool,

    /// The service database used to name ports
    #[clap(long, default_value = DEFAULT_SERVICES_FILE)]
    pub services_file: String,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        ExporterConfig {
            port: DEFAULT_METRICS_PORT,
            fqdn: false,
            services_file: DEFAULT_SERVICES_FILE.to_string(),
        }
    }
}

/// Layout of the file given with `--config-file`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    pub config: ExporterConfig,
}
