//! Command-line argument parsing for the utena daemon

use clap::Parser;
use std::path::PathBuf;

/// utena - zellij session daemon
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Config file to load instead of the default location
    #[arg(long, short = 'c', env = "UTENA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen address (overrides server.listen_addr)
    ///
    /// Example: 127.0.0.1:3333
    #[arg(long, env = "UTENA_LISTEN")]
    pub listen: Option<String>,

    /// Log verbosely to stderr instead of the log file
    #[arg(long, default_value_t = false)]
    pub stderr: bool,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["utena-server"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.listen.is_none());
        assert!(!args.stderr);
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from([
            "utena-server",
            "--config",
            "/tmp/utena.toml",
            "--listen",
            "0.0.0.0:4000",
            "--stderr",
        ])
        .unwrap();

        assert_eq!(args.config, Some(PathBuf::from("/tmp/utena.toml")));
        assert_eq!(args.listen.as_deref(), Some("0.0.0.0:4000"));
        assert!(args.stderr);
    }
}
