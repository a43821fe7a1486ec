//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::RenderStyle;

/// Binary tree editor with a movable cursor
#[derive(Parser, Debug)]
#[command(name = "cursortree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Render style, overrides the config
    #[arg(short, long, global = true, value_enum)]
    pub style: Option<StyleArg>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an edit script (stdin when omitted or '-')
    Run {
        #[arg(value_hint = ValueHint::FilePath)]
        script: Option<PathBuf>,
        /// Stop at the first rejected edit
        #[arg(long)]
        strict: bool,
    },

    /// Build and print the reference tree A(B(D), C)
    Demo,

    /// Print the effective settings as TOML
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleArg {
    Plain,
    Outline,
}

impl From<StyleArg> for RenderStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Plain => RenderStyle::Plain,
            StyleArg::Outline => RenderStyle::Outline,
        }
    }
}
