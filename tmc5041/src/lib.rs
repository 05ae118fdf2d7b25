//! Register definitions for the TMC5041 dual stepper motor controller and driver.
//!
//! Every register is a plain value type with one public member per field:
//!
//! ```
//! use tmc5041::chopconf::Chopconf;
//!
//! let chopconf = Chopconf {
//!     toff: 5,
//!     hstrt: 4,
//!     hend: 1,
//!     tbl: 2,
//!     ..Default::default()
//! };
//!
//! assert_eq!(chopconf.raw(), 0x0001_00c5);
//! assert_eq!(Chopconf::from_raw(0x0001_00c5), chopconf);
//! ```
//!
//! Registers present once per motor are defined once, with the address of every
//! instance listed in `ADDRESSES`. Raw words read from any address can be decoded
//! with [`State::from_raw`].

#![no_std]

#[cfg(test)]
extern crate std;

pub use regdef::{Register, UnknownAddress};

include!(concat!(env!("OUT_DIR"), "/registers.rs"));

#[cfg(test)]
mod tests {
    use crate::*;

    mod datasheet {
        use super::*;

        #[test]
        fn gconf() {
            let gconf = gconf::Gconf {
                poscmp_enable: 1,
                ..Default::default()
            };

            assert_eq!(gconf::ADDRESS, 0x00);
            assert_eq!(gconf.raw(), 0x0000_0008);
            assert_eq!(gconf::Gconf::from_raw(0x0000_0008), gconf);
        }

        #[test]
        fn gconf_to_raw() {
            let gconf = gconf::Gconf {
                test_mode: 1,
                shaft2: 1,
                lock_gconf: 1,
                ..Default::default()
            };

            assert_eq!(gconf.raw(), (1 << 7) | (1 << 9) | (1 << 10));
        }

        #[test]
        fn gstat() {
            assert_eq!(gstat::ADDRESS, 0x01);
            assert_eq!(gstat::N_BITS, 4);

            let gstat = gstat::Gstat::from_raw((1 << 0) | (1 << 3));

            assert_eq!(gstat.reset, 1);
            assert_eq!(gstat.drv_err1, 0);
            assert_eq!(gstat.drv_err2, 0);
            assert_eq!(gstat.uv_cp, 1);
            assert_eq!(gstat.raw(), (1 << 0) | (1 << 3));

            let gstat = gstat::Gstat {
                drv_err1: 1,
                drv_err2: 1,
                ..Default::default()
            };

            assert_eq!(gstat.raw(), (1 << 1) | (1 << 2));
        }

        /// Getting started example values from the datasheet.
        #[test]
        fn getting_started() {
            let chopconf = chopconf::Chopconf {
                toff: 5,
                hstrt: 4,
                hend: 1,
                chm: 0,
                tbl: 2,
                ..Default::default()
            };
            let ihold_irun = ihold_irun::IholdIrun {
                ihold: 5,
                irun: 31,
                iholddelay: 1,
            };
            let pwmconf = pwmconf::Pwmconf {
                pwm_ampl: 200,
                pwm_grad: 1,
                pwm_freq: 0,
                pwm_autoscale: 1,
                ..Default::default()
            };

            assert_eq!(chopconf.raw(), 0x0001_00c5);
            assert_eq!(ihold_irun.raw(), 0x0001_1f05);
            assert_eq!(tzerowait::Tzerowait { tzerowait: 10000 }.raw(), 0x0000_2710);
            assert_eq!(pwmconf.raw(), 0x0004_01c8);
            assert_eq!(vhigh::Vhigh { vhigh: 400_000 }.raw(), 0x0006_1a80);
            assert_eq!(vcoolthrs::Vcoolthrs { vcoolthrs: 30000 }.raw(), 0x0000_7530);
            assert_eq!(amax::Amax { amax: 5000 }.raw(), 0x0000_1388);
            assert_eq!(vmax::Vmax { vmax: 20000 }.raw(), 0x0000_4e20);
            assert_eq!(
                rampmode::Rampmode {
                    rampmode: rampmode::rampmode::VELOCITY_POSITIVE
                }
                .raw(),
                0x0000_0001
            );

            assert_eq!(chopconf::Chopconf::from_raw(0x0001_00c5), chopconf);
            assert_eq!(ihold_irun::IholdIrun::from_raw(0x0001_1f05), ihold_irun);
            assert_eq!(pwmconf::Pwmconf::from_raw(0x0004_01c8), pwmconf);
            assert_eq!(rampmode::Rampmode::from_raw(0x0000_0001).rampmode, 1);
        }
    }

    mod codec {
        use super::*;

        /// Values wider than their field are truncated.
        #[test]
        fn truncation() {
            let ihold_irun = ihold_irun::IholdIrun {
                ihold: 0xff,
                irun: 0,
                iholddelay: 0,
            };

            assert_eq!(ihold_irun.raw(), 0x1f);

            let vmax = vmax::Vmax { vmax: u32::MAX };

            assert_eq!(vmax.raw(), (1 << 23) - 1);
        }

        /// Undeclared bits are dropped on decode and zero on encode.
        #[test]
        fn undeclared_bits() {
            assert_eq!(gstat::Gstat::from_raw(0xffff_fff0).raw(), 0);
            assert_eq!(gconf::Gconf::from_raw(u32::MAX).raw(), 0x788);
            assert_eq!(<gconf::Gconf as Register>::mask(), 0x788);
            assert_eq!(
                ihold_irun::IholdIrun::from_raw(u32::MAX).raw(),
                <ihold_irun::IholdIrun as Register>::mask()
            );
        }

        #[test]
        fn signed() {
            let coolconf = coolconf::Coolconf {
                sgt: -1,
                ..Default::default()
            };

            assert_eq!(coolconf.raw(), 0x007f_0000);
            assert_eq!(coolconf::Coolconf::from_raw(0x0040_0000).sgt, -64);
            assert_eq!(coolconf::Coolconf::from_raw(0x003f_0000).sgt, 63);

            assert_eq!(xactual::Xactual { xactual: -1 }.raw(), u32::MAX);
            assert_eq!(xactual::Xactual::from_raw(0x8000_0000).xactual, i32::MIN);

            assert_eq!(vactual::Vactual::from_raw(0x00ff_ffff).vactual, -1);
            assert_eq!(vactual::Vactual { vactual: -2 }.raw(), 0x00ff_fffe);

            let mscuract = mscuract::Mscuract::from_raw(0x01ff_0100);

            assert_eq!(mscuract.cur_a, -256);
            assert_eq!(mscuract.cur_b, -1);
        }

        #[test]
        fn round_trip() {
            let drv_status = drv_status::DrvStatus::from_raw(0x8100_01ff);

            assert_eq!(drv_status.stst, 1);
            assert_eq!(drv_status.stallguard, 1);
            assert_eq!(drv_status.sg_result, 0x1ff);
            assert_eq!(drv_status.raw(), 0x8100_01ff);

            let mslutsel = mslutsel::Mslutsel::from_raw(0xffff_8056);

            assert_eq!(mslutsel.w0, 2);
            assert_eq!(mslutsel.w1, 1);
            assert_eq!(mslutsel.w2, 1);
            assert_eq!(mslutsel.w3, 1);
            assert_eq!(mslutsel.x1, 0x80);
            assert_eq!(mslutsel.raw(), 0xffff_8056);

            let ramp_stat = ramp_stat::RampStat {
                vzero: 1,
                position_reached: 1,
                ..Default::default()
            };

            assert_eq!(ramp_stat::RampStat::from_raw(ramp_stat.raw()), ramp_stat);
        }
    }

    mod surface {
        use super::*;

        #[test]
        fn instances() {
            assert_eq!(chopconf::ADDRESS, 0x6c);
            assert_eq!(chopconf::ADDRESSES, &[0x6c, 0x7c]);
            assert_eq!(xtarget::ADDRESSES, &[0x2d, 0x4d]);
            assert_eq!(pwmconf::ADDRESSES, &[0x10, 0x18]);
            assert_eq!(mslut3::ADDRESSES, &[0x63]);
        }

        #[test]
        fn descriptors() {
            assert_eq!(chopconf::FIELDS.len(), 12);
            assert_eq!(<chopconf::Chopconf as Register>::NAME, "CHOPCONF");
            assert_eq!(<ihold_irun::IholdIrun as Register>::N_BITS, 20);

            let sgt = coolconf::FIELDS
                .iter()
                .find(|field| field.name == "sgt")
                .unwrap();

            assert!(sgt.signed);
            assert_eq!(sgt.domain(), 16..23);
        }

        #[test]
        fn variants() {
            assert_eq!(rampmode::rampmode::POSITIONING, 0);
            assert_eq!(rampmode::rampmode::HOLD, 3);
            assert_eq!(pwmconf::freewheel::HS_SHORT, 3);
        }

        /// The outbound pair carries the first instance address.
        #[test]
        fn write() {
            let amax = amax::Amax { amax: 5000 };

            assert_eq!(amax.write(), (0x26, 0x1388));
            assert_eq!(u32::from(amax), 0x1388);
            assert_eq!(amax::Amax::from(0x1388u32), amax);
        }
    }

    mod state {
        use std::string::ToString;

        use super::*;

        #[test]
        fn dispatch() {
            let state = State::from_raw(0x7c, 0x0001_00c5).unwrap();

            let State::Chopconf(chopconf) = state else {
                panic!("expected CHOPCONF, got {}", state.name());
            };

            assert_eq!(chopconf.toff, 5);
            assert_eq!(chopconf.tbl, 2);
            assert_eq!(state.raw(), 0x0001_00c5);
            assert_eq!(state.name(), "CHOPCONF");
            assert_eq!(state.n_bits(), 32);
        }

        #[test]
        fn unknown_address() {
            assert_eq!(State::from_raw(0x6e, 0), Err(UnknownAddress(0x6e)));
            assert_eq!(State::from_raw(0x02, 0), Err(UnknownAddress(0x02)));
            assert_eq!(
                UnknownAddress(0x6e).to_string(),
                "no register at address 0x6e"
            );
        }

        #[test]
        fn from_value() {
            let gstat = gstat::Gstat {
                reset: 1,
                ..Default::default()
            };

            assert_eq!(State::from(gstat), State::Gstat(gstat));
            assert_eq!(State::from(gstat).n_bits(), 4);
        }

        /// Raw words without undeclared bits survive decoding and encoding.
        #[test]
        fn round_trip() {
            for (address, raw) in [
                (0x00, 0x0000_0788),
                (0x01, 0x0000_000f),
                (0x10, 0x0034_ffff),
                (0x21, 0xdead_beef),
                (0x42, 0x0080_0000),
                (0x30, 0x000f_1f1f),
                (0x55, 0x0000_3fff),
                (0x68, 0xaaaa_5555),
                (0x7d, 0x017f_ef6f),
            ] {
                let state = State::from_raw(address, raw).unwrap();

                assert_eq!(state.raw(), raw, "{} at 0x{address:02x}", state.name());
            }
        }
    }
}
