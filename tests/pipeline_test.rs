// tests/pipeline_test.rs
//
// Drives the phase pipeline against stub executables that record their
// arguments, so the exact external-tool invocations can be asserted without a
// real CMake installation.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use cmake_package::config::Config;
use cmake_package::pipeline::{Phase, Pipeline, RecipePaths};
use cmake_package::toolchain::TOOLCHAIN_FILE;
use cmake_package::version::Version;
use cmake_package::warning::RecipeWarning;
use tempfile::TempDir;

struct Fixture {
    // Owns every path used by the test; dropped last
    _dir: TempDir,
    config: Config,
    paths: RecipePaths,
    log: PathBuf,
}

/// Write an executable stub that appends its own name and arguments to the
/// shared log, then exits with the given code.
fn write_stub(path: &Path, log: &Path, exit_code: i32) {
    let script = format!(
        "#!/bin/sh\necho \"$0 $*\" >> \"{}\"\nexit {}\n",
        log.display(),
        exit_code
    );
    fs::write(path, script).unwrap();
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
}

fn fixture_with_exit(exit_code: i32) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("libdemo");
    fs::create_dir_all(source.join("test_package")).unwrap();
    fs::write(
        source.join("CMakeLists.txt"),
        "set(LIB_VERSION_MAJOR 1)\nset(LIB_VERSION_MINOR 4)\nset(LIB_VERSION_PATCH 2)\n",
    )
    .unwrap();
    fs::write(source.join("README.md"), "# libdemo\n").unwrap();
    fs::write(source.join("LICENSE"), "MIT\n").unwrap();

    let log = dir.path().join("invocations.log");
    let cmake_stub = dir.path().join("cmake-stub");
    let ctest_stub = dir.path().join("ctest-stub");
    write_stub(&cmake_stub, &log, exit_code);
    write_stub(&ctest_stub, &log, exit_code);

    let mut config = Config::default();
    config.package.name = "libdemo".to_string();
    config.package.description = "Demo library".to_string();
    config.build.cmake_program = cmake_stub.display().to_string();
    config.build.ctest_program = ctest_stub.display().to_string();

    let paths = RecipePaths {
        source_dir: source.clone(),
        build_dir: source.join("build"),
        package_dir: source.join("package"),
    };

    Fixture {
        _dir: dir,
        config,
        paths,
        log,
    }
}

fn fixture() -> Fixture {
    fixture_with_exit(0)
}

fn read_log(fixture: &Fixture) -> Vec<String> {
    if !fixture.log.exists() {
        return Vec::new();
    }
    fs::read_to_string(&fixture.log)
        .unwrap()
        .lines()
        .map(|l| l.to_string())
        .collect()
}

#[test]
fn test_version_resolution() {
    let fixture = fixture();
    let mut pipeline = Pipeline::new(&fixture.config, fixture.paths.clone());
    let version = pipeline.resolve_version().unwrap();
    assert_eq!(version, Version::new(1, 4, 2));
    assert_eq!(pipeline.descriptor().version().unwrap(), version);
}

#[test]
fn test_version_resolution_missing_file_fails_before_any_tool_runs() {
    let fixture = fixture();
    fs::remove_file(fixture.paths.source_dir.join("CMakeLists.txt")).unwrap();

    let mut pipeline = Pipeline::new(&fixture.config, fixture.paths.clone());
    let err = pipeline.resolve_version().unwrap_err();
    assert!(err.to_string().contains("Missing file to read version from"));
    assert!(read_log(&fixture).is_empty());
}

#[test]
fn test_full_pipeline_invokes_tools_in_order() {
    let fixture = fixture();
    let mut pipeline = Pipeline::new(&fixture.config, fixture.paths.clone());
    pipeline.resolve_version().unwrap();

    let (phases, warnings) = pipeline.plan(None, false);
    assert_eq!(
        phases,
        vec![Phase::Generate, Phase::Build, Phase::Package, Phase::Test]
    );
    assert!(warnings.is_empty());

    for phase in &phases {
        pipeline.run_phase(*phase).unwrap();
    }

    let log = read_log(&fixture);
    assert_eq!(log.len(), 6);

    let source = fixture.paths.source_dir.display().to_string();
    let build = fixture.paths.build_dir.display().to_string();
    let package = fixture.paths.package_dir.display().to_string();
    let consumer = fixture
        .paths
        .source_dir
        .join("test_package")
        .display()
        .to_string();

    // Library configure carries the materialized toolchain
    assert!(log[0].contains(&format!("-S {} -B {}", source, build)));
    assert!(log[0].contains("-DCMAKE_TOOLCHAIN_FILE="));
    assert!(log[0].contains(TOOLCHAIN_FILE));

    assert!(log[1].contains(&format!("--build {}", build)));

    assert!(log[2].contains(&format!("--install {} --prefix {}", build, package)));

    // Consumer configure points at the staged package, not the toolchain
    assert!(log[3].contains(&format!("-S {}", consumer)));
    assert!(log[3].contains(&format!("-DCMAKE_PREFIX_PATH={}", package)));
    assert!(log[3].contains("-DCMAKE_BUILD_TYPE=Release"));
    assert!(!log[3].contains("-DCMAKE_TOOLCHAIN_FILE="));

    assert!(log[4].contains("--build"));
    assert!(log[4].contains("test_package"));

    assert!(log[5].contains("ctest-stub"));
    assert!(log[5].contains("--test-dir"));
    assert!(log[5].contains("--output-on-failure"));
}

#[test]
fn test_generate_materializes_toolchain() {
    let fixture = fixture();
    let mut pipeline = Pipeline::new(&fixture.config, fixture.paths.clone());
    pipeline.resolve_version().unwrap();
    pipeline.run_phase(Phase::Generate).unwrap();

    let toolchain = fs::read_to_string(fixture.paths.build_dir.join(TOOLCHAIN_FILE)).unwrap();
    assert!(toolchain.contains("set(LIB_BUILD_EXAMPLE OFF CACHE BOOL \"\" FORCE)"));
    assert!(toolchain.contains("set(CMAKE_BUILD_TYPE \"Release\" CACHE STRING \"\" FORCE)"));

    // Generate only writes files; no tool runs yet
    assert!(read_log(&fixture).is_empty());
}

#[test]
fn test_package_phase_stages_exports_and_manifest() {
    let fixture = fixture();
    let mut pipeline = Pipeline::new(&fixture.config, fixture.paths.clone());
    pipeline.resolve_version().unwrap();

    let warnings = pipeline.run_phase(Phase::Package).unwrap();
    assert!(warnings.is_empty());

    let package_dir = &fixture.paths.package_dir;
    assert!(package_dir.join("README.md").is_file());
    assert!(package_dir.join("LICENSE").is_file());

    let manifest = fs::read_to_string(package_dir.join("package.toml")).unwrap();
    assert!(manifest.contains("name = \"libdemo\""));
    assert!(manifest.contains("version = \"1.4.2\""));
    assert!(manifest.contains("license = \"MIT\""));
}

#[test]
fn test_package_phase_warns_on_missing_export() {
    let fixture = fixture();
    fs::remove_file(fixture.paths.source_dir.join("LICENSE")).unwrap();

    let mut pipeline = Pipeline::new(&fixture.config, fixture.paths.clone());
    pipeline.resolve_version().unwrap();

    let warnings = pipeline.run_phase(Phase::Package).unwrap();
    assert_eq!(
        warnings,
        vec![RecipeWarning::MissingExport {
            file: "LICENSE".to_string()
        }]
    );

    // The rest of the package is still staged
    assert!(fixture.paths.package_dir.join("README.md").is_file());
    assert!(fixture.paths.package_dir.join("package.toml").is_file());
}

#[test]
fn test_tool_failure_stops_the_phase_and_propagates_exit_code() {
    let fixture = fixture_with_exit(7);
    let mut pipeline = Pipeline::new(&fixture.config, fixture.paths.clone());
    pipeline.resolve_version().unwrap();

    pipeline.run_phase(Phase::Generate).unwrap();
    let err = pipeline.run_phase(Phase::Build).unwrap_err();
    assert!(err.to_string().contains("exit code 7"));

    // Configure failed, so the build invocation never happened
    let log = read_log(&fixture);
    assert_eq!(log.len(), 1);
    assert!(log[0].contains("-S "));
}

#[test]
fn test_parallel_jobs_are_forwarded() {
    let mut fixture = fixture();
    fixture.config.build.jobs = Some(3);

    let mut pipeline = Pipeline::new(&fixture.config, fixture.paths.clone());
    pipeline.resolve_version().unwrap();
    pipeline.run_phase(Phase::Generate).unwrap();
    pipeline.run_phase(Phase::Build).unwrap();

    let log = read_log(&fixture);
    assert!(log[1].contains("--parallel 3"));
}

#[test]
fn test_stale_build_dir_is_reported() {
    let fixture = fixture();
    fs::create_dir_all(&fixture.paths.build_dir).unwrap();

    let mut pipeline = Pipeline::new(&fixture.config, fixture.paths.clone());
    pipeline.resolve_version().unwrap();

    let (_, warnings) = pipeline.plan(None, false);
    assert!(warnings
        .iter()
        .any(|w| matches!(w, RecipeWarning::StaleBuildDir { .. })));
}

#[test]
fn test_missing_consumer_project_fails_the_test_phase() {
    let fixture = fixture();
    fs::remove_dir_all(fixture.paths.source_dir.join("test_package")).unwrap();

    let mut pipeline = Pipeline::new(&fixture.config, fixture.paths.clone());
    pipeline.resolve_version().unwrap();

    let err = pipeline.run_phase(Phase::Test).unwrap_err();
    assert!(err.to_string().contains("Consumer project"));
}
