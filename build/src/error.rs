use std::{env::VarError, fmt::Display, io};

/// Elaborates errors that may occur while generating a register surface.
#[derive(Debug)]
pub enum Error {
    /// The register model could not be constructed.
    Model(model::Error),
    /// `OUT_DIR` is not set, as happens outside of a build script.
    OutDir(VarError),
    Io(io::Error),
    /// The register model failed validation.
    Invalid {
        warnings: usize,
        errors: usize,
    },
    /// The generated source did not parse.
    Codegen(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Model(e) => write!(f, "register model construction failed: {e}"),
            Error::OutDir(e) => write!(f, "OUT_DIR is unavailable: {e}"),
            Error::Io(e) => write!(f, "failed to write register surface: {e}"),
            Error::Invalid { warnings, errors } => write!(
                f,
                "register generation failed with {errors} errors and {warnings} warnings. Refer to the model crate for details."
            ),
            Error::Codegen(e) => write!(
                f,
                "codegen failed. Refer to the model crate for details.\n{e}"
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Model(e) => Some(e),
            Error::OutDir(e) => Some(e),
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<model::Error> for Error {
    fn from(e: model::Error) -> Self {
        Self::Model(e)
    }
}

impl From<VarError> for Error {
    fn from(e: VarError) -> Self {
        Self::OutDir(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
