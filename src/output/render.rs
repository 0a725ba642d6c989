use std::io::Write;

use colored::Colorize;
use serde::Serialize;
use snafu::{ResultExt, Snafu};

use crate::application::data::OutputFormat;
use crate::filesystem::EntryKind;
use crate::tree::{FileTree, NodeNavigationExt, NodeView};

/// A node found by name, with its ancestors from the parent up to the root
#[derive(Debug, Serialize)]
struct Match<'t> {
    node: NodeView<'t>,
    ancestors: Vec<NodeView<'t>>,
}

/// Writes every node of `tree`.
pub fn render_tree(
    tree: &FileTree,
    format: OutputFormat,
    color: bool,
    out: &mut impl Write,
) -> Result<(), RenderError> {
    match format {
        OutputFormat::Json => write_json(&tree.all(), out),
        OutputFormat::Text => {
            for level in 0..tree.level_count() {
                let Some(nodes) = tree.nodes_at_level(level) else {
                    continue;
                };
                writeln!(out, "Level {level} ({} nodes)", nodes.len()).context(WriteSnafu)?;
                for node in nodes {
                    writeln!(out, "  {}", node_line(&node, color)).context(WriteSnafu)?;
                }
            }
            Ok(())
        }
    }
}

/// Writes the nodes named `name`, each followed by its ancestor chain.
///
/// Returns the number of matches.
pub fn render_matches(
    tree: &FileTree,
    name: &str,
    format: OutputFormat,
    color: bool,
    out: &mut impl Write,
) -> Result<usize, RenderError> {
    let matches = tree
        .all()
        .into_iter()
        .filter(|node| node.name() == name)
        .map(|node| Match {
            node,
            ancestors: node.all_parents().unwrap_or_default(),
        })
        .collect::<Vec<_>>();

    match format {
        OutputFormat::Json => write_json(&matches, out)?,
        OutputFormat::Text => {
            for found in &matches {
                writeln!(out, "{}", node_line(&found.node, color)).context(WriteSnafu)?;
                for ancestor in &found.ancestors {
                    writeln!(out, "  <- {}", node_line(ancestor, color)).context(WriteSnafu)?;
                }
            }
        }
    }

    Ok(matches.len())
}

fn write_json(value: &impl Serialize, out: &mut impl Write) -> Result<(), RenderError> {
    serde_json::to_writer_pretty(&mut *out, value).context(JsonSnafu)?;
    writeln!(out).context(WriteSnafu)
}

fn node_line(node: &NodeView<'_>, color: bool) -> String {
    let name = match (node.kind(), color) {
        (EntryKind::Directory, true) => node.name().blue().bold().to_string(),
        _ => node.name().to_string(),
    };
    let denied = match (node.unauthorized_children(), color) {
        (true, true) => format!(" {}", "[access denied]".red()),
        (true, false) => " [access denied]".to_string(),
        (false, _) => String::new(),
    };

    format!(
        "[{}:{}] {} ({}) {}{}",
        node.level(),
        node.position(),
        name,
        node.kind(),
        node.path().display(),
        denied
    )
}

#[derive(Debug, Snafu)]
pub enum RenderError {
    #[snafu(display("Failed to write output"))]
    Write { source: std::io::Error },
    #[snafu(display("Failed to serialize output"))]
    Json { source: serde_json::Error },
}
