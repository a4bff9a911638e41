use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::Parser;

use cmake_package::config;
use cmake_package::pipeline::{Phase, Pipeline, RecipePaths};
use cmake_package::ui;
use cmake_package::warning::RecipeWarning;

#[derive(clap::Parser)]
#[command(
    name = "cmake-package",
    about = "Build, stage and verify a CMake library package"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Library source tree root", default_value = ".")]
    source_dir: PathBuf,

    #[arg(short, long, help = "Build directory (default: <source>/build)")]
    build_dir: Option<PathBuf>,

    #[arg(short, long, help = "Package prefix (default: <source>/package)")]
    package_dir: Option<PathBuf>,

    #[arg(long, help = "Run a single phase: generate, build, package or test")]
    only: Option<String>,

    #[arg(long, help = "Skip the consumer verification phase")]
    skip_test: bool,

    #[arg(long, help = "Delete the build directory before running")]
    fresh: bool,

    #[arg(short, long, help = "Skip confirmation prompts")]
    force: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Show available recipe phases and exit")]
    list: bool,

    #[arg(short = 'V', long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("cmake-package {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.list {
        ui::display_available_phases();
        return Ok(());
    }

    // Load configuration
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    // Resolve the directory layout for this run
    let paths = RecipePaths {
        source_dir: args.source_dir.clone(),
        build_dir: args
            .build_dir
            .clone()
            .unwrap_or_else(|| args.source_dir.join("build")),
        package_dir: args
            .package_dir
            .clone()
            .unwrap_or_else(|| args.source_dir.join("package")),
    };

    // Parse the single-phase restriction before touching anything
    let only = match args.only.as_deref() {
        Some(name) => match Phase::from_str(name) {
            Ok(phase) => Some(phase),
            Err(e) => {
                ui::display_error(&e.to_string());
                std::process::exit(1);
            }
        },
        None => None,
    };

    let mut pipeline = Pipeline::new(&config, paths.clone());

    // Version resolution comes first; an unreadable version file aborts the
    // whole run before any tool is invoked
    let version = match pipeline.resolve_version() {
        Ok(version) => version,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    ui::display_package_header(&pipeline.descriptor().name, version);

    let (phases, warnings) = pipeline.plan(only, args.skip_test);
    for warning in &warnings {
        // A stale build directory is not worth a warning when --fresh is
        // about to delete it
        if args.fresh && matches!(warning, RecipeWarning::StaleBuildDir { .. }) {
            continue;
        }
        ui::display_warning(warning);
    }

    if args.dry_run {
        ui::display_status("Dry run - no tools invoked, no files written");
        ui::display_phase_plan(&phases);
        return Ok(());
    }

    if args.fresh && paths.build_dir.exists() {
        let prompt = format!(
            "Delete existing build directory '{}'?",
            paths.build_dir.display()
        );
        if args.force || ui::confirm_action(&prompt)? {
            ui::display_status(&format!(
                "Removing build directory: {}",
                paths.build_dir.display()
            ));
            if let Err(e) = std::fs::remove_dir_all(&paths.build_dir) {
                ui::display_error(&format!("Failed to remove build directory: {}", e));
                std::process::exit(1);
            }
        } else {
            println!("Operation cancelled by user.");
            return Ok(());
        }
    }

    for phase in &phases {
        ui::display_phase_start(*phase);
        match pipeline.run_phase(*phase) {
            Ok(phase_warnings) => {
                for warning in &phase_warnings {
                    ui::display_warning(warning);
                }
                ui::display_success(&format!("{} phase completed", phase.name()));
            }
            Err(e) => {
                ui::display_error(&e.to_string());
                std::process::exit(1);
            }
        }
    }

    if phases.contains(&Phase::Package) {
        println!(
            "\n{} Packaged {} {} into {}\n",
            console::style("✓").green(),
            pipeline.descriptor().name,
            version,
            paths.package_dir.display()
        );
    } else {
        println!(
            "\n{} Finished {} {}\n",
            console::style("✓").green(),
            pipeline.descriptor().name,
            version
        );
    }

    Ok(())
}
