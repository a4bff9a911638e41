use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{CmakePackageError, Result};

/// Drives the external CMake executable for one source/build directory pair.
///
/// Every method is a single synchronous invocation; a non-zero exit status is
/// reported with the captured output and nothing is retried or reinterpreted.
pub struct CmakeDriver {
    program: PathBuf,
    source_dir: PathBuf,
    build_dir: PathBuf,
}

impl CmakeDriver {
    pub fn new(
        program: impl Into<PathBuf>,
        source_dir: impl Into<PathBuf>,
        build_dir: impl Into<PathBuf>,
    ) -> Self {
        CmakeDriver {
            program: program.into(),
            source_dir: source_dir.into(),
            build_dir: build_dir.into(),
        }
    }

    /// Run the configure step.
    ///
    /// # Arguments
    /// * `toolchain_file` - Optional materialized toolchain passed as `-DCMAKE_TOOLCHAIN_FILE`
    /// * `generator` - Optional generator passed as `-G`
    /// * `defines` - Extra `-D<name>=<value>` cache definitions
    pub fn configure(
        &self,
        toolchain_file: Option<&Path>,
        generator: Option<&str>,
        defines: &[(String, String)],
    ) -> Result<()> {
        let mut args: Vec<String> = vec![
            "-S".to_string(),
            self.source_dir.display().to_string(),
            "-B".to_string(),
            self.build_dir.display().to_string(),
        ];

        if let Some(gen) = generator {
            args.push("-G".to_string());
            args.push(gen.to_string());
        }

        if let Some(file) = toolchain_file {
            args.push(format!("-DCMAKE_TOOLCHAIN_FILE={}", file.display()));
        }

        for (name, value) in defines {
            args.push(format!("-D{}={}", name, value));
        }

        self.run("configure", &args)
    }

    /// Run the build step against whatever configuration was materialized
    pub fn build(&self, jobs: Option<u32>) -> Result<()> {
        let mut args: Vec<String> = vec![
            "--build".to_string(),
            self.build_dir.display().to_string(),
        ];

        if let Some(jobs) = jobs {
            args.push("--parallel".to_string());
            args.push(jobs.to_string());
        }

        self.run("build", &args)
    }

    /// Run the install step, copying build outputs into the package prefix
    pub fn install(&self, prefix: &Path) -> Result<()> {
        let args: Vec<String> = vec![
            "--install".to_string(),
            self.build_dir.display().to_string(),
            "--prefix".to_string(),
            prefix.display().to_string(),
        ];

        self.run("install", &args)
    }

    /// Run the test runner from inside the build directory.
    ///
    /// `ctest_program` is a separate executable, so it is passed in rather than
    /// derived from the configure/build program.
    pub fn ctest(&self, ctest_program: &str) -> Result<()> {
        let runner = CmakeDriver {
            program: PathBuf::from(ctest_program),
            source_dir: self.source_dir.clone(),
            build_dir: self.build_dir.clone(),
        };
        let args = vec![
            "--test-dir".to_string(),
            self.build_dir.display().to_string(),
            "--output-on-failure".to_string(),
        ];
        runner.run("test", &args)
    }

    /// Execute the tool, mapping any failure to a single descriptive error.
    ///
    /// Non-zero exit status fails with exit code plus captured stdout/stderr;
    /// a spawn failure (program not found, not executable) fails with the
    /// underlying reason.
    fn run(&self, action: &str, args: &[String]) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);

        let output = cmd.output().map_err(|e| {
            CmakePackageError::tool(format!(
                "Failed to execute {} for {}: {}",
                self.program.display(),
                action,
                e
            ))
        })?;

        if !output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CmakePackageError::tool(format!(
                "{} {} failed with exit code {}\nStdout: {}\nStderr: {}",
                self.program.display(),
                action,
                output.status.code().unwrap_or(-1),
                stdout,
                stderr
            )));
        }

        Ok(())
    }
}
