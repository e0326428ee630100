//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Property list viewer: browse XML and binary plists as a path-addressed tree
#[derive(Parser, Debug)]
#[command(name = "qlist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the document as a tree
    Tree {
        /// Property list file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Start at this node instead of the root
        #[arg(short, long)]
        path: Option<String>,
        /// Levels to descend below the starting node
        #[arg(long)]
        depth: Option<usize>,
    },

    /// List child paths of a node (root when omitted)
    Ls {
        /// Property list file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node path
        path: Option<String>,
    },

    /// Show key, type and value of one node
    Show {
        /// Property list file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node path ("" for the root)
        path: String,
    },

    /// List the paths of all leaves
    Leaves {
        /// Property list file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Summarize a document
    Info {
        /// Property list file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
