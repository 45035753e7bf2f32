//! Userscript to Browser Extension Converter CLI

use clap::Parser;
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use userscript2crx::packager::upload::default_downloads_dir;
use userscript2crx::{build_script, BuildOptions, TracingReporter};

#[derive(Parser)]
#[command(name = "userscript2crx")]
#[command(about = "Convert a Tampermonkey userscript into a Manifest V3 browser extension", long_about = None)]
#[command(version)]
#[command(after_help = "Examples:
  userscript2crx ./my-script              Build the script in ./my-script
  userscript2crx ./my-script --clean      Rebuild from an empty output directory
  userscript2crx ./my-script -v           Show debug logging
  userscript2crx ./my-script --package    Zip the extension and open upload pages")]
struct Cli {
    /// Directory containing the userscript and its store_assets/
    script_dir: PathBuf,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Empty the output directory before building
    #[arg(long)]
    clean: bool,

    /// Zip the extension and open the upload pages from store_assets/upload_config.json
    #[arg(long)]
    package: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = BuildOptions {
        clean: cli.clean,
        package: cli.package,
        downloads_dir: default_downloads_dir(),
    };

    match build_script(&cli.script_dir, &options, &TracingReporter) {
        Ok(outcome) => {
            println!("{}", "✅ Extension built successfully!".green().bold());
            println!("  - Name: {} v{}", outcome.manifest.name, outcome.manifest.version);
            println!("  - Output: {}", outcome.output_dir.display());
            if !outcome.lib_files.is_empty() {
                println!("  - Libraries: {}", outcome.lib_files.join(", "));
            }
            if let Some(archive) = &outcome.archive {
                println!("  - Package: {}", archive.display());
            }
        }
        Err(e) => {
            eprintln!("{}", "❌ Build failed!".red().bold());
            if cli.verbose {
                eprintln!("{}", format!("Error: {:?}", e).red());
            } else {
                eprintln!("{}", format!("Error: {:#}", e).red());
            }
            std::process::exit(1);
        }
    }
}
