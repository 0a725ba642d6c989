use std::io::{self, Write};

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::application::RuntimeConfig;
use crate::ext::BestEffortPathExt;
use crate::output::{self, RenderError};
use crate::tree::{CancellationFlag, FileTree, TreeBuildError};

pub struct Application;

impl Application {
    /// Builds the tree for the configured root and prints it to stdout.
    ///
    /// Ctrl-C cancels the construction.
    pub fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        debug!("Runtime config: {:?}", app_config);

        let cancel = CancellationFlag::new();
        let handler_flag = cancel.clone();
        ctrlc::set_handler(move || {
            warn!("Interrupted, cancelling");
            handler_flag.cancel();
        })
        .context(InterruptHandlerSnafu)?;

        let stdout = io::stdout();
        Self::execute(&app_config, &cancel, &mut stdout.lock())
    }

    pub fn execute(
        app_config: &RuntimeConfig,
        cancel: &CancellationFlag,
        out: &mut impl Write,
    ) -> Result<(), ApplicationError> {
        let tree = FileTree::from_path_with_cancellation(&app_config.root, cancel).context(
            TreeSnafu {
                root: app_config.root.best_effort_path_display(),
            },
        )?;

        match &app_config.find {
            Some(name) => {
                let found = output::render_matches(
                    &tree,
                    name,
                    app_config.format,
                    app_config.color,
                    out,
                )
                .context(OutputSnafu)?;
                info!("Found {} nodes named '{}'", found, name);
            }
            None => {
                output::render_tree(&tree, app_config.format, app_config.color, out)
                    .context(OutputSnafu)?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Failed to install the Ctrl-C handler"))]
    InterruptHandlerError { source: ctrlc::Error },
    #[snafu(display("Critical failure while building the tree of {}", root))]
    TreeError { root: String, source: TreeBuildError },
    #[snafu(display("Critical failure while printing the tree"))]
    OutputError { source: RenderError },
}
