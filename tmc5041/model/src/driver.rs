use model::{Field, Model, Register, Variant, error::Error};

/// Distance between the driver registers of motor 1 and motor 2.
const STRIDE: u8 = 0x10;

fn microstep_table(model: &mut Model) -> Result<(), Error> {
    for i in 0..8u8 {
        let ident = format!("mslut{i}");
        let docs = format!(
            "Microstep table entries {} to {}, one bit per entry.",
            32 * i as u16,
            32 * i as u16 + 31
        );

        model
            .add_register(Register::new(&ident, 0x60 + i).docs([docs]))
            .add_field(Field::new(&ident, 0, 32));
    }

    model
        .add_register(
            Register::new("mslutsel", 0x68)
                .docs(["Microstep table segment widths and boundaries."]),
        )
        .add_fields("x3:31:24 x2:23:16 x1:15:8 w3:7:6 w2:5:4 w1:3:2 w0:1:0")?;

    model
        .add_register(
            Register::new("mslutstart", 0x69)
                .width(24)
                .docs(["Absolute current at microstep table entry 0."]),
        )
        .add_fields("start_sin90:23:16 reserved:15:8 start_sin:7:0")?;

    Ok(())
}

pub fn driver(model: &mut Model) -> Result<(), Error> {
    microstep_table(model)?;

    model
        .add_register(
            Register::new("mscnt", 0x6a)
                .instances([0x6a + STRIDE])
                .width(10)
                .docs(["Actual position in the microstep table."]),
        )
        .add_field(Field::new("mscnt", 0, 10));

    let mut mscuract = model.add_register(
        Register::new("mscuract", 0x6b)
            .instances([0x6b + STRIDE])
            .width(25)
            .docs(["Actual microstep current for both motor phases."]),
    );

    mscuract.add_field(Field::new("cur_a", 0, 9).signed());
    mscuract.add_field(Field::new("cur_b", 16, 9).signed());

    let mut chopconf = model.add_register(
        Register::new("chopconf", 0x6c)
            .instances([0x6c + STRIDE])
            .docs(["Chopper and driver configuration."]),
    );

    chopconf.add_fields(
        "toff:3:0 hstrt:6:4 hend:10:7 fd3:11 disfdcc:12 rndtf:13 chm:14 tbl:16:15 \
         vsense:17 vhighfs:18 vhighchm:19 sync:23:20",
    )?;

    if let Some(mut tbl) = chopconf.field("tbl") {
        tbl.docs(["Comparator blank time in clock cycles."])
            .add_variant(Variant::new("clk16", 0))
            .add_variant(Variant::new("clk24", 1))
            .add_variant(Variant::new("clk36", 2))
            .add_variant(Variant::new("clk54", 3));
    }

    let mut coolconf = model.add_register(
        Register::new("coolconf", 0x6d)
            .instances([0x6d + STRIDE])
            .width(25)
            .docs(["coolStep smart current control and stallGuard configuration."]),
    );

    coolconf.add_fields(
        "sfilt:24 reserved:23 sgt:22:16 seimin:15 sedn:14:13 reserved:12 semax:11:8 \
         reserved:7 seup:6:5 reserved:4 semin:3:0",
    )?;

    if let Some(mut sgt) = coolconf.field("sgt") {
        sgt.signed()
            .docs(["stallGuard threshold, lower values are more sensitive."]);
    }

    model
        .add_register(
            Register::new("drv_status", 0x6f)
                .instances([0x6f + STRIDE])
                .docs(["stallGuard result and driver error flags."]),
        )
        .add_fields(
            "stst:31 olb:30 ola:29 s2gb:28 s2ga:27 otpw:26 ot:25 stallguard:24 \
             reserved:23:21 cs_actual:20:16 fsactive:15 reserved:14:10 sg_result:9:0",
        )?;

    Ok(())
}
