//! The register map of the TMC5041 dual stepper motor controller and driver.

mod driver;
mod general;
mod pwm;
mod ramp;

use model::{Model, error::Error};

use driver::driver;
use general::general;
use pwm::pwm;
use ramp::ramp;

pub fn model() -> Result<Model, Error> {
    let mut model = Model::new("TMC5041");

    general(&mut model)?;
    pwm(&mut model)?;
    ramp(&mut model)?;
    driver(&mut model)?;

    Ok(model)
}
