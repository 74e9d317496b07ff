//! Command-line argument definitions for the KMB CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the input document and output
//! directory, override the class naming taken from the configuration file,
//! and control logging verbosity.

use clap::Parser;

/// Command-line arguments for the Keras Model Builder
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input model document (TOML)
    #[arg(help = "Path to the input document")]
    pub input: String,

    /// Directory the generated module is written into
    #[arg(short, long, default_value = ".")]
    pub output: String,

    /// Model name; overrides the configuration file
    #[arg(short, long)]
    pub name: Option<String>,

    /// Author named in the header; overrides the configuration file
    #[arg(short, long)]
    pub author: Option<String>,

    /// Class docstring; overrides the configuration file
    #[arg(short = 'm', long)]
    pub comment: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Arguments for `input` with every option at its default.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: ".".to_string(),
            name: None,
            author: None,
            comment: None,
            config: None,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["kmb", "model.toml"]).unwrap();
        assert_eq!(args.input, "model.toml");
        assert_eq!(args.output, ".");
        assert!(args.name.is_none());
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "kmb", "model.toml", "-o", "out", "-n", "mnist", "-a", "ada", "-m", "A small net.",
        ])
        .unwrap();
        assert_eq!(args.output, "out");
        assert_eq!(args.name.as_deref(), Some("mnist"));
        assert_eq!(args.author.as_deref(), Some("ada"));
        assert_eq!(args.comment.as_deref(), Some("A small net."));
    }

    #[test]
    fn test_input_required() {
        assert!(Args::try_parse_from(["kmb"]).is_err());
    }
}
