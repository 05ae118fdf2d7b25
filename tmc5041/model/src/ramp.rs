use model::{Field, Model, Register, Variant, error::Error};

/// Distance between the ramp generator registers of motor 1 and motor 2.
const STRIDE: u8 = 0x20;

/// Add a ramp generator register holding a single value of `width` bits.
fn value(model: &mut Model, ident: &str, address: u8, width: u8, docs: &str) {
    model
        .add_register(
            Register::new(ident, address)
                .instances([address + STRIDE])
                .width(width)
                .docs([docs]),
        )
        .add_field(Field::new(ident, 0, width));
}

/// Add a ramp generator register holding a single signed 32 bit position.
fn position(model: &mut Model, ident: &str, address: u8, docs: &str) {
    model
        .add_register(
            Register::new(ident, address)
                .instances([address + STRIDE])
                .docs([docs]),
        )
        .add_field(Field::new(ident, 0, 32).signed());
}

pub fn ramp(model: &mut Model) -> Result<(), Error> {
    model
        .add_register(
            Register::new("rampmode", 0x20)
                .instances([0x20 + STRIDE])
                .width(2),
        )
        .add_field(Field::new("rampmode", 0, 2))
        .add_variant(
            Variant::new("positioning", 0)
                .docs(["Target position move using all A, D and V parameters."]),
        )
        .add_variant(
            Variant::new("velocity_positive", 1)
                .docs(["Velocity mode to positive VMAX using AMAX."]),
        )
        .add_variant(
            Variant::new("velocity_negative", 2)
                .docs(["Velocity mode to negative VMAX using AMAX."]),
        )
        .add_variant(Variant::new("hold", 3).docs(["Velocity remains unchanged."]));

    position(model, "xactual", 0x21, "Actual motor position.");

    model
        .add_register(
            Register::new("vactual", 0x22)
                .instances([0x22 + STRIDE])
                .width(24)
                .docs(["Actual motor velocity from the ramp generator."]),
        )
        .add_field(Field::new("vactual", 0, 24).signed());

    value(model, "vstart", 0x23, 18, "Motor start velocity.");
    value(
        model,
        "a1",
        0x24,
        16,
        "First acceleration between VSTART and V1.",
    );
    value(
        model,
        "v1",
        0x25,
        20,
        "First acceleration / deceleration phase threshold velocity.",
    );
    value(
        model,
        "amax",
        0x26,
        16,
        "Second acceleration between V1 and VMAX.",
    );
    value(model, "vmax", 0x27, 23, "Motion ramp target velocity.");
    value(model, "dmax", 0x28, 16, "Deceleration between VMAX and V1.");
    value(model, "d1", 0x2a, 16, "Deceleration between V1 and VSTOP.");
    value(model, "vstop", 0x2b, 18, "Motor stop velocity.");
    value(
        model,
        "tzerowait",
        0x2c,
        16,
        "Waiting time after ramping down to zero velocity.",
    );

    position(model, "xtarget", 0x2d, "Target position for ramp mode.");

    model
        .add_register(
            Register::new("ihold_irun", 0x30)
                .instances([0x30 + STRIDE])
                .width(20)
                .docs(["Driver current control."]),
        )
        .add_fields("iholddelay:19:16 reserved:15:13 irun:12:8 reserved:7:5 ihold:4:0")?;

    value(
        model,
        "vcoolthrs",
        0x31,
        23,
        "Lower velocity threshold for coolStep and stallGuard.",
    );
    value(
        model,
        "vhigh",
        0x32,
        23,
        "Velocity threshold for switching into a different chopper mode.",
    );

    model
        .add_register(
            Register::new("sw_mode", 0x34)
                .instances([0x34 + STRIDE])
                .width(12)
                .docs(["Reference switch and stallGuard event configuration."]),
        )
        .add_fields(
            "en_softstop:11 sg_stop:10 reserved:9 \
             latch_r_inactive:8 latch_r_active:7 latch_l_inactive:6 latch_l_active:5 \
             swap_lr:4 pol_stop_r:3 pol_stop_l:2 stop_r_enable:1 stop_l_enable:0",
        )?;

    model
        .add_register(
            Register::new("ramp_stat", 0x35)
                .instances([0x35 + STRIDE])
                .width(14)
                .docs(["Ramp and reference switch status."]),
        )
        .add_fields(
            "status_stop_l:0 status_stop_r:1 status_latch_l:2 status_latch_r:3 \
             event_stop_l:4 event_stop_r:5 event_stop_sg:6 event_pos_reached:7 \
             velocity_reached:8 position_reached:9 vzero:10 t_zerowait_active:11 \
             second_move:12 status_sg:13",
        )?;

    position(
        model,
        "xlatch",
        0x36,
        "Ramp generator latch position upon a programmable switch event.",
    );

    Ok(())
}
