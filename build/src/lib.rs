mod error;

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use colored::control;
pub use error::Error;
pub use model;
use model::{
    Model,
    diagnostic::{self, Diagnostic},
};

/// The file within `OUT_DIR` the register surface is written to.
pub const OUTPUT: &str = "registers.rs";

/// Generate and emit the register surface of a model for use.
///
/// *Note: This function is intended to be called from a build script.*
pub fn render(model: &Model) {
    let result = env::var("OUT_DIR")
        .map_err(Error::from)
        .and_then(|out_dir| generate(model, Path::new(&out_dir)));

    match result {
        Ok(path) => log::debug!("register surface written to {}", path.display()),
        Err(e) => {
            for line in e.to_string().lines() {
                println!("cargo::error={line}");
            }
        }
    }
}

/// Validate a model and write its rendered register surface into `out_dir`,
/// returning the path of the written file.
///
/// Warnings are forwarded to cargo, errors abort generation.
pub fn generate(model: &Model, out_dir: &Path) -> Result<PathBuf, Error> {
    // cargo does not interpret escape codes
    control::set_override(false);

    let diagnostics = model.validate();
    let (warnings, errors) = diagnostic::tally(&diagnostics);

    log::debug!(
        "validated {} registers: {warnings} warnings, {errors} errors",
        model.register_count()
    );

    if errors != 0 {
        log::error!("{}", Diagnostic::report(&diagnostics));
        control::unset_override();

        Err(Error::Invalid { warnings, errors })?
    }

    for diagnostic in &diagnostics {
        println!(
            "cargo::warning={} (in {})",
            diagnostic.message(),
            diagnostic.context()
        );
    }

    control::unset_override();

    let output = model.render().map_err(Error::Codegen)?;
    let path = out_dir.join(OUTPUT);

    fs::write(&path, output)?;

    Ok(path)
}
