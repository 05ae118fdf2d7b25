pub mod diagnostic;
pub mod error;
pub mod field;
pub mod json;
pub mod model;
pub mod notation;
pub mod register;
pub mod variant;

use std::fs;

use colored::Colorize as _;
pub use diagnostic::Diagnostics;
pub use error::Error;
pub use field::Field;
pub use model::Model;
pub use register::Register;
pub use variant::Variant;

use crate::diagnostic::Diagnostic;

#[doc(hidden)]
pub trait Node {
    type Index;
}

/// Validate a register model is properly defined and codegen succeeds.
///
/// Returns whether the model is free of errors.
pub fn validate(model: &Model) -> bool {
    // model validation
    println!("Validating model...");
    let diagnostics = model.validate();

    if !diagnostics.is_empty() {
        println!("{}", Diagnostic::report(&diagnostics));
    }

    let (warning_count, error_count) = diagnostic::tally(&diagnostics);

    if error_count == 0 {
        print!("{}. ", "Finished".green().bold());
    }
    println!("emitted {warning_count} warnings and {error_count} errors");

    if error_count != 0 {
        return false;
    }

    // codegen validation
    println!("Validating codegen...");
    match model.render() {
        Ok(output) => {
            println!(
                "Registers: {} ({} addresses)\nFields: {}\nVariants: {}\nLines: {}\n{}",
                model.register_count(),
                model.address_count(),
                model.field_count(),
                model.variant_count(),
                output.lines().count(),
                "Finished".green().bold(),
            );

            true
        }
        Err(e) => {
            let path = std::env::temp_dir().join("erroneous-registers.rs");

            if let Err(io) = fs::write(&path, model.render_raw()) {
                log::error!("failed to write erroneous codegen: {io}");
            }

            println!(
                "{}: Codegen failed: {e}\n{}\nErroneous codegen written to {}",
                "error".red().bold(),
                "This is a bug in the register generator.".bold(),
                path.display(),
            );

            false
        }
    }
}
