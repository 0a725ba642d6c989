use clap::ValueEnum;

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per node, grouped by level
    #[default]
    Text,
    /// A JSON array of node records
    Json,
}
