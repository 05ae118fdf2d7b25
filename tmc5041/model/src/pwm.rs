use model::{Field, Model, Register, Variant, error::Error};

/// Distance between the PWM registers of motor 1 and motor 2.
const STRIDE: u8 = 0x08;

pub fn pwm(model: &mut Model) -> Result<(), Error> {
    let mut pwmconf = model.add_register(
        Register::new("pwmconf", 0x10)
            .instances([0x10 + STRIDE])
            .width(22)
            .docs(["Voltage PWM mode chopper configuration."]),
    );

    pwmconf
        .add_fields("freewheel:21:20 pwm_autoscale:18 pwm_freq:17:16 pwm_grad:15:8 pwm_ampl:7:0")?;

    if let Some(mut pwm_freq) = pwmconf.field("pwm_freq") {
        pwm_freq
            .docs(["PWM frequency as a fraction of fCLK."])
            .add_variant(Variant::new("f2_1024", 0))
            .add_variant(Variant::new("f2_683", 1))
            .add_variant(Variant::new("f2_512", 2))
            .add_variant(Variant::new("f2_410", 3));
    }

    if let Some(mut freewheel) = pwmconf.field("freewheel") {
        freewheel
            .docs(["Stand still option when the motor current setting is zero."])
            .add_variant(Variant::new("normal", 0))
            .add_variant(Variant::new("freewheel", 1))
            .add_variant(Variant::new("ls_short", 2))
            .add_variant(Variant::new("hs_short", 3));
    }

    model
        .add_register(
            Register::new("pwm_status", 0x11)
                .instances([0x11 + STRIDE])
                .width(8)
                .docs(["Actual PWM scaler."]),
        )
        .add_field(Field::new("pwm_status", 0, 8));

    Ok(())
}
