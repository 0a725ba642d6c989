use std::path::PathBuf;

use supports_color::Stream;

use crate::application::data::OutputFormat;
use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub root: PathBuf,
    pub format: OutputFormat,
    pub find: Option<String>,
    pub color: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            root: cli.root,
            format: cli.format,
            find: cli.find,
            color: !cli.no_color && supports_color::on(Stream::Stdout).is_some(),
        }
    }
}
