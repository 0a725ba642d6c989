//! Console rendering of trees and node lookups.

mod render;

pub use render::{RenderError, render_matches, render_tree};
