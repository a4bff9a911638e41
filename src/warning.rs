use std::fmt;

/// Non-fatal advisories raised while staging a package.
/// These are reported to the user without stopping the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum RecipeWarning {
    /// The build directory already holds a previous configuration
    StaleBuildDir { path: String },
    /// An exported metadata file listed in the recipe is absent from the source tree
    MissingExport { file: String },
    /// The consumer verification phase was not run
    TestsSkipped { reason: String },
}

impl fmt::Display for RecipeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeWarning::StaleBuildDir { path } => {
                write!(
                    f,
                    "Build directory '{}' already exists and will be reused",
                    path
                )
            }
            RecipeWarning::MissingExport { file } => {
                write!(f, "Exported file '{}' not found in source tree", file)
            }
            RecipeWarning::TestsSkipped { reason } => {
                write!(f, "Consumer tests skipped: {}", reason)
            }
        }
    }
}
