//! Command-line flags for `unifi-ap-exporter`.

use std::path::PathBuf;

use clap::Parser;

/// unifi-ap-exporter -- Prometheus metrics for UniFi access points
#[derive(Debug, Parser)]
#[command(
    name = "unifi-ap-exporter",
    version,
    about = "Export UniFi access point statistics to Prometheus",
    long_about = "Polls each configured UniFi access point over SSH on every scrape,\n\
        runs `mca-dump`, and serves the result on /metrics in the Prometheus\n\
        text format."
)]
pub struct Cli {
    /// Configuration file
    #[arg(
        long,
        env = "UAPX_CONFIG",
        default_value = uapx_config::DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    /// Emit logs as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose (debug) logging
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug (trace) logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Log filter implied by the flags. `--debug` wins over `--verbose`.
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "trace"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn debug_outranks_verbose() {
        let cli = Cli::parse_from(["unifi-ap-exporter", "--verbose", "--debug"]);
        assert_eq!(cli.log_level(), "trace");
        let cli = Cli::parse_from(["unifi-ap-exporter", "--verbose"]);
        assert_eq!(cli.log_level(), "debug");
    }
}
