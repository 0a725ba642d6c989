use std::path::PathBuf;

use clap::Parser;

use crate::application::data::{LogLevel, OutputFormat};

/// Builds the level-indexed tree of a directory and prints it
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// The directory to build the tree of
    #[clap(long, short, default_value = ".")]
    pub root: PathBuf,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    #[clap(long, short, default_value = "text", value_enum)]
    pub format: OutputFormat,

    /// Print only the nodes with this name, each followed by its ancestors
    #[clap(long)]
    pub find: Option<String>,

    /// Never colour the text output
    #[clap(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["filetree"]);

        assert_eq!(cli.root, PathBuf::from("."));
        assert_eq!(cli.log_level, LogLevel::Warn);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.find.is_none());
        assert!(!cli.no_color);
    }

    #[test]
    fn parses_all_options() {
        let cli = Cli::parse_from([
            "filetree",
            "--root",
            "/tmp",
            "--log-level",
            "debug",
            "--format",
            "json",
            "--find",
            "Cargo.toml",
            "--no-color",
        ]);

        assert_eq!(cli.root, PathBuf::from("/tmp"));
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.find.as_deref(), Some("Cargo.toml"));
        assert!(cli.no_color);
    }

    #[test]
    fn rejects_unknown_format() {
        let result = Cli::try_parse_from(["filetree", "--format", "xml"]);
        assert!(result.is_err());
    }
}
