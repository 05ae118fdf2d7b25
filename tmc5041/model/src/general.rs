use model::{Field, Model, Register, error::Error};

pub fn general(model: &mut Model) -> Result<(), Error> {
    model
        .add_register(
            Register::new("gconf", 0x00)
                .width(12)
                .docs(["Global configuration flags."]),
        )
        .add_fields(
            "reserved:11 lock_gconf:10 shaft2:9 shaft1:8 test_mode:7 reserved:6:4 poscmp_enable:3 reserved:2:0",
        )?;

    model
        .add_register(
            Register::new("gstat", 0x01)
                .width(4)
                .docs(["Global status flags, cleared by writing 1."]),
        )
        .add_fields("uv_cp:3 drv_err2:2 drv_err1:1 reset:0")?;

    model
        .add_register(
            Register::new("input", 0x04)
                .docs(["Reads the state of all input pins."]),
        )
        .add_field(
            Field::new("version", 24, 8)
                .docs(["Silicon version, 0x10 for the first release."]),
        );

    model
        .add_register(
            Register::new("x_compare", 0x05)
                .docs(["Position comparison register for motor 1 position strobe."]),
        )
        .add_field(Field::new("x_compare", 0, 32));

    Ok(())
}
