#![allow(clippy::enum_variant_names)]
//! Level-indexed, in-memory snapshots of directory trees.

pub mod application;
pub mod cli;
pub mod ext;
pub mod filesystem;
pub mod output;
pub mod tree;
