use model::Error;
use tmc5041_model::model;

fn main() -> Result<(), Error> {
    env_logger::init();

    let model = model()?;

    if model::validate(&model) {
        for register in model.registers() {
            log::info!("\n{}", register.layout());
        }
    }

    Ok(())
}
