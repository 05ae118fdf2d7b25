use model::model;
use regdef_build::Error;

fn main() -> Result<(), Error> {
    println!("cargo::rerun-if-changed=build.rs");

    regdef_build::render(&model()?);

    Ok(())
}
