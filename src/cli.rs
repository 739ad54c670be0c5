//! Command-line interface
//!
//! `mason build` compiles, fingerprints, and writes assets plus the
//! manifest; `mason clean` removes the output directory. Flags override
//! the corresponding `mason.toml` keys field by field.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{self, BuildConfig};
use crate::pipeline;
use crate::report::Reporter;

/// mason - static asset compiler with content fingerprinting
#[derive(Parser, Debug)]
#[command(name = "mason")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output (per-asset report lines)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile assets, fingerprint them, and write the manifest
    Build {
        /// Input directory containing asset sources (repeatable)
        #[arg(short = 'i', long = "input")]
        input: Vec<PathBuf>,

        /// Restrict output to this logical asset name (repeatable)
        #[arg(short = 'c', long = "compile")]
        compile: Vec<String>,

        /// Serve-path prefix for rewritten references (e.g. //cdn.example.com)
        #[arg(short = 's', long = "serve-path")]
        serve_path: Option<String>,

        /// Output directory for fingerprinted files and the manifest
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        /// Skip the minification pass
        #[arg(long)]
        no_minify: bool,

        /// Also write gzipped siblings of output files
        #[arg(long)]
        gzip: bool,

        /// Write outputs under their plain names, without fingerprints
        #[arg(long)]
        no_fingerprint: bool,

        /// Hex digits of the content digest kept in file names
        #[arg(long)]
        fingerprint_len: Option<usize>,

        /// Write and record transitively referenced assets too
        #[arg(long)]
        include_transitive: bool,
    },

    /// Remove the output directory
    Clean {
        /// Output directory to remove
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}

/// Parse arguments and run the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            compile,
            serve_path,
            output,
            no_minify,
            gzip,
            no_fingerprint,
            fingerprint_len,
            include_transitive,
        } => {
            let reporter = Reporter::new(cli.verbose);
            let cwd = std::env::current_dir().context("cannot determine working directory")?;
            let (mut config, warnings) =
                config::load_or_default(&cwd).context("failed to load mason.toml")?;
            reporter.config_warnings(&warnings);

            apply_build_flags(
                &mut config,
                input,
                compile,
                serve_path,
                output,
                no_minify,
                gzip,
                no_fingerprint,
                fingerprint_len,
                include_transitive,
            );

            if config.input_dirs.is_empty() {
                anyhow::bail!(
                    "no input directories; pass -i/--input or set input_dirs in mason.toml"
                );
            }

            let outcome = pipeline::build(&config).context("build failed")?;
            for name in outcome.manifest.names() {
                if let Some(rel) = outcome.manifest.get(name) {
                    reporter.asset(name, rel);
                }
            }
            reporter.finish(outcome.manifest.len());
            Ok(())
        }
        Commands::Clean { output } => {
            let dir = output.unwrap_or_else(|| PathBuf::from(config::DEFAULT_OUTPUT_DIR));
            if dir.exists() {
                std::fs::remove_dir_all(&dir)
                    .with_context(|| format!("failed to remove {}", dir.display()))?;
                eprintln!("removed {}", dir.display());
            }
            Ok(())
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn apply_build_flags(
    config: &mut BuildConfig,
    input: Vec<PathBuf>,
    compile: Vec<String>,
    serve_path: Option<String>,
    output: Option<PathBuf>,
    no_minify: bool,
    gzip: bool,
    no_fingerprint: bool,
    fingerprint_len: Option<usize>,
    include_transitive: bool,
) {
    if !input.is_empty() {
        config.input_dirs = input;
    }
    if !compile.is_empty() {
        config.compile_only = compile;
    }
    if let Some(prefix) = serve_path {
        config.serve_path = prefix;
    }
    if let Some(dir) = output {
        config.output_dir = dir;
    }
    if no_minify {
        config.minify = false;
    }
    if gzip {
        config.gzip = true;
    }
    if no_fingerprint {
        config.fingerprint = false;
    }
    if let Some(len) = fingerprint_len {
        config.fingerprint_len = len;
    }
    if include_transitive {
        config.include_transitive = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_build_with_repeatable_flags() {
        let cli = Cli::try_parse_from([
            "mason", "build", "-i", "assets/css", "-i", "assets/js", "-c", "blank.js",
        ])
        .unwrap();
        let Commands::Build { input, compile, .. } = cli.command else {
            panic!("expected Build command");
        };
        assert_eq!(
            input,
            vec![PathBuf::from("assets/css"), PathBuf::from("assets/js")]
        );
        assert_eq!(compile, vec!["blank.js".to_string()]);
    }

    #[test]
    fn parse_build_serve_path() {
        let cli =
            Cli::try_parse_from(["mason", "build", "-i", "css", "-s", "//cdn.example.com"])
                .unwrap();
        let Commands::Build { serve_path, .. } = cli.command else {
            panic!("expected Build command");
        };
        assert_eq!(serve_path, Some("//cdn.example.com".to_string()));
    }

    #[test]
    fn parse_build_toggles() {
        let cli = Cli::try_parse_from([
            "mason",
            "build",
            "-i",
            "css",
            "--no-minify",
            "--gzip",
            "--no-fingerprint",
            "--include-transitive",
            "--fingerprint-len",
            "16",
        ])
        .unwrap();
        let Commands::Build {
            no_minify,
            gzip,
            no_fingerprint,
            include_transitive,
            fingerprint_len,
            ..
        } = cli.command
        else {
            panic!("expected Build command");
        };
        assert!(no_minify);
        assert!(gzip);
        assert!(no_fingerprint);
        assert!(include_transitive);
        assert_eq!(fingerprint_len, Some(16));
    }

    #[test]
    fn parse_clean() {
        let cli = Cli::try_parse_from(["mason", "clean", "-o", "out"]).unwrap();
        let Commands::Clean { output } = cli.command else {
            panic!("expected Clean command");
        };
        assert_eq!(output, Some(PathBuf::from("out")));
    }

    #[test]
    fn flags_override_config() {
        let mut config = BuildConfig::default();
        apply_build_flags(
            &mut config,
            vec![PathBuf::from("css")],
            vec!["a.css".to_string()],
            Some("//cdn".to_string()),
            Some(PathBuf::from("out")),
            true,
            true,
            true,
            Some(16),
            true,
        );
        assert_eq!(config.input_dirs, vec![PathBuf::from("css")]);
        assert_eq!(config.compile_only, vec!["a.css".to_string()]);
        assert_eq!(config.serve_path, "//cdn");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(!config.minify);
        assert!(config.gzip);
        assert!(!config.fingerprint);
        assert_eq!(config.fingerprint_len, 16);
        assert!(config.include_transitive);
    }

    #[test]
    fn flags_absent_keep_config() {
        let mut config = BuildConfig {
            input_dirs: vec![PathBuf::from("from-config")],
            ..BuildConfig::default()
        };
        apply_build_flags(
            &mut config,
            Vec::new(),
            Vec::new(),
            None,
            None,
            false,
            false,
            false,
            None,
            false,
        );
        assert_eq!(config.input_dirs, vec![PathBuf::from("from-config")]);
        assert!(config.minify);
    }
}
