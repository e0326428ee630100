//! Command dispatch
//!
//! Every command opens its document through [`Viewer`] and then talks to it only
//! through the [`TreeDataSource`] queries, the same way a lazy tree widget would.

use std::io::Write;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::{Row, TreeDataSource, Viewer};
use crate::cli::args::{Cli, Commands};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::config::Settings;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// How far `tree` expands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    /// Levels below the start node; `None` is unlimited
    pub max_depth: Option<usize>,
    pub show_types: bool,
}

impl TreeOptions {
    pub fn from_settings(settings: &Settings, depth: Option<usize>) -> Self {
        let configured = if settings.expand {
            settings.max_depth
        } else {
            Some(1)
        };
        Self {
            max_depth: depth.or(configured),
            show_types: settings.show_types,
        }
    }

    fn descends(&self, level: usize) -> bool {
        self.max_depth.map_or(true, |max| level < max)
    }
}

pub fn execute_command(cli: &Cli, container: &ServiceContainer, out: &mut dyn Write) -> CliResult<()> {
    match &cli.command {
        Commands::Tree { file, path, depth } => {
            let options = TreeOptions::from_settings(&container.settings, *depth);
            _tree(container, file, path.as_deref().unwrap_or(""), options, out)
        }
        Commands::Ls { file, path } => _ls(container, file, path.as_deref().unwrap_or(""), out),
        Commands::Show { file, path } => _show(container, file, path, out),
        Commands::Leaves { file } => _leaves(container, file, out),
        Commands::Info { file } => _info(container, file, out),
        Commands::Config => _config(container, out),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, out);
            Ok(())
        }
    }
}

fn open(container: &ServiceContainer, file: &Path) -> CliResult<Viewer> {
    let mut viewer = Viewer::new();
    viewer.open(&container.documents, file)?;
    Ok(viewer)
}

fn emit(out: &mut dyn Write, line: &str) -> CliResult<()> {
    writeln!(out, "{line}").map_err(|e| InfraError::io("write output", e))?;
    Ok(())
}

/// Builds the display tree below `path` using only data-source queries.
pub fn render_tree(
    source: &dyn TreeDataSource,
    path: &str,
    options: TreeOptions,
) -> Tree<String> {
    render_level(source, path, options, 0)
}

fn render_level(
    source: &dyn TreeDataSource,
    path: &str,
    options: TreeOptions,
    level: usize,
) -> Tree<String> {
    let mut tree = Tree::new(output::row(&source.row(path), options.show_types));
    if source.is_branch(path) && options.descends(level) {
        for child in source.children_keys(path) {
            tree.push(render_level(source, &child, options, level + 1));
        }
    }
    tree
}

#[instrument(skip(container, out))]
fn _tree(
    container: &ServiceContainer,
    file: &Path,
    path: &str,
    options: TreeOptions,
    out: &mut dyn Write,
) -> CliResult<()> {
    let viewer = open(container, file)?;
    if viewer.row(path).is_placeholder() {
        output::warning(&format!("no node at path '{path}'"));
    }
    if let Some(title) = viewer.title() {
        emit(out, &output::field("file", &title))?;
    }
    let tree = render_tree(&viewer, path, options);
    emit(out, tree.to_string().trim_end())
}

#[instrument(skip(container, out))]
fn _ls(container: &ServiceContainer, file: &Path, path: &str, out: &mut dyn Write) -> CliResult<()> {
    let viewer = open(container, file)?;
    let children = viewer.children_keys(path);
    debug!("ls: {} children under '{}'", children.len(), path);
    for child in children {
        emit(out, &child)?;
    }
    Ok(())
}

#[instrument(skip(container, out))]
fn _show(container: &ServiceContainer, file: &Path, path: &str, out: &mut dyn Write) -> CliResult<()> {
    let viewer = open(container, file)?;
    let Row {
        key,
        value_type,
        value,
    } = viewer.row(path);
    emit(out, &output::field("key", &key))?;
    emit(out, &output::field("type", &value_type))?;
    emit(out, &output::field("value", &value))
}

#[instrument(skip(container, out))]
fn _leaves(container: &ServiceContainer, file: &Path, out: &mut dyn Write) -> CliResult<()> {
    let viewer = open(container, file)?;
    for leaf in viewer.current()?.tree().leaf_paths() {
        emit(out, &leaf)?;
    }
    Ok(())
}

#[instrument(skip(container, out))]
fn _info(container: &ServiceContainer, file: &Path, out: &mut dyn Write) -> CliResult<()> {
    let viewer = open(container, file)?;
    let document = viewer.current()?;
    if let Some(title) = viewer.title() {
        emit(out, &output::field("file", &title))?;
    }
    emit(out, &output::field("shape", &document.shape()))?;
    emit(out, &output::field("entries", &viewer.row("").value))?;
    // Root excluded from the node count and depth
    emit(out, &output::field("nodes", &(document.tree().len() - 1)))?;
    emit(out, &output::field("depth", &(document.tree().depth() - 1)))?;
    emit(out, &output::field("leaves", &document.tree().leaf_paths().len()))
}

#[instrument(skip(container, out))]
fn _config(container: &ServiceContainer, out: &mut dyn Write) -> CliResult<()> {
    let rendered = container.settings.to_toml()?;
    emit(out, rendered.trim_end())
}
