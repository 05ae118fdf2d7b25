//! Register maps described as JSON documents.
//!
//! Every key names a register, defined by its address and bit notation either
//! as one string (`def`) or as a list of tokens (`defs`):
//!
//! ```json
//! {
//!     "// general configuration": "",
//!     "GCONF": {
//!         "address": "0x00",
//!         "n_bits": 12,
//!         "def": "reserved:11 lock_gconf:10 shaft2:9 shaft1:8 test_mode:7 reserved:6:4 poscmp_enable:3 reserved:2:0"
//!     },
//!     "COOLCONF": {
//!         "address": "0x6d",
//!         "instances": ["0x7d"],
//!         "defs": ["semin:3:0", "seup:6:5", "semax:11:8", "sedn:14:13", "seimin:15", "sgt:22:16", "sfilt:24"],
//!         "signed": ["sgt"]
//!     }
//! }
//! ```
//!
//! Keys starting with `//` are comments. Blank entries and unknown
//! properties are ignored.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{error::Error, model::Model, notation::is_ident, register::Register};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Address {
    Number(u8),
    Text(String),
}

impl Address {
    fn resolve(&self, register: &str) -> Result<u8, Error> {
        match self {
            Address::Number(address) => Ok(*address),
            Address::Text(text) => {
                let trimmed = text.trim();
                let parsed = match trimmed
                    .strip_prefix("0x")
                    .or_else(|| trimmed.strip_prefix("0X"))
                {
                    Some(hex) => u8::from_str_radix(hex, 16),
                    None => trimmed.parse(),
                };

                parsed.map_err(|_| Error::Address {
                    register: register.to_string(),
                    text: text.clone(),
                })
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct Definition {
    address: Address,
    def: Option<String>,
    defs: Option<Vec<String>>,
    #[serde(alias = "reg_n")]
    n_bits: Option<u8>,
    #[serde(default)]
    instances: Vec<Address>,
    #[serde(default)]
    signed: Vec<String>,
    #[serde(default)]
    docs: Vec<String>,
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

impl Model {
    /// Add every register defined in a JSON document, in document order.
    ///
    /// See [`json`](crate::json) for the format.
    pub fn add_json(&mut self, source: &str) -> Result<&mut Self, Error> {
        let definitions = serde_json::from_str::<Map<String, Value>>(source)?;
        let mut count = 0;

        for (name, value) in definitions {
            let name = name.trim();

            if name.is_empty() || name.starts_with("//") || is_blank(&value) {
                continue;
            }

            if !is_ident(name) || name == "_" {
                Err(Error::Ident(name.to_string()))?
            }

            let definition = serde_json::from_value::<Definition>(value)?;

            let notation = match (definition.defs, definition.def) {
                (Some(defs), _) => defs.join(" "),
                (None, Some(def)) => def,
                (None, None) => Err(Error::Undefined(name.to_string()))?,
            };

            let instances = definition
                .instances
                .iter()
                .map(|address| address.resolve(name))
                .collect::<Result<Vec<_>, _>>()?;

            let mut register = Register::new(name, definition.address.resolve(name)?)
                .instances(instances)
                .docs(definition.docs);

            if let Some(n_bits) = definition.n_bits {
                register = register.width(n_bits);
            }

            let mut entry = self.add_register(register);
            entry.add_fields(&notation)?;

            for field in &definition.signed {
                entry
                    .field(field)
                    .ok_or_else(|| Error::UnknownField {
                        register: name.to_string(),
                        field: field.clone(),
                    })?
                    .signed();
            }

            count += 1;
        }

        log::debug!("loaded {count} register definitions into {}", self.name());

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Model, error::Error};

    const GCONF: &str =
        "reserved:11 lock_gconf:10 shaft2:9 shaft1:8 test_mode:7 reserved:6:4 poscmp_enable:3 reserved:2:0";

    fn load(source: &str) -> Result<Model, Error> {
        let mut model = Model::new("test");
        model.add_json(source)?;

        Ok(model)
    }

    mod loading {
        use super::*;

        /// `def` and `defs` describe the same register.
        #[test]
        fn def_and_defs() {
            let single = load(&format!(
                r#"{{ "GCONF": {{ "address": "0x00", "n_bits": 12, "def": "{GCONF}" }} }}"#
            ))
            .unwrap();

            let tokens = GCONF
                .split_whitespace()
                .map(|token| format!("\"{token}\""))
                .collect::<Vec<_>>()
                .join(", ");
            let list = load(&format!(
                r#"{{ "GCONF": {{ "address": 0, "reg_n": 12, "defs": [{tokens}] }} }}"#
            ))
            .unwrap();

            let single = single.registers().next().unwrap().layout();
            let list = list.registers().next().unwrap().layout();

            assert_eq!(single, list);
            assert!(single.starts_with("Register(12-bit, gconf @ 0x00):"));
        }

        /// Comments and blank entries are skipped, order is kept.
        #[test]
        fn comments() {
            let model = load(
                r#"{
                    "// ramp generator": "",
                    "RAMPMODE": { "address": "0x20", "instances": ["0x40"], "n_bits": 2, "def": "rampmode:1:0" },
                    "//": { "address": "0x21", "def": "x:0" },
                    "": { "address": "0x22", "def": "x:0" },
                    "XACTUAL": { "address": "0x21", "def": "xactual:31:0", "signed": ["xactual"] },
                    "UNUSED": {},
                    "VACTUAL": { "address": "34", "def": "vactual:23:0", "comment": "ignored" }
                }"#,
            )
            .unwrap();

            let names = model
                .registers()
                .map(|register| register.module_name().to_string())
                .collect::<Vec<_>>();

            assert_eq!(names, ["rampmode", "xactual", "vactual"]);
            assert!(model.validate().is_empty());

            let rampmode = model.registers().next().unwrap();

            assert_eq!(rampmode.addresses().collect::<Vec<_>>(), [0x20, 0x40]);
            assert_eq!(rampmode.width, 2);

            let vactual = model.registers().nth(2).unwrap();

            assert_eq!(vactual.address, 0x22);
        }

        #[test]
        fn signed() {
            let model = load(
                r#"{ "COOLCONF": { "address": "0x6d", "defs": ["semin:3:0", "sgt:22:16"], "signed": ["SGT"] } }"#,
            )
            .unwrap();

            let register = model.registers().next().unwrap();
            let signed = register
                .fields()
                .filter(|field| field.signed)
                .map(|field| field.module_name().to_string())
                .collect::<Vec<_>>();

            assert_eq!(signed, ["sgt"]);
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn undefined() {
            assert!(matches!(
                load(r#"{ "GCONF": { "address": "0x00" } }"#),
                Err(Error::Undefined(..))
            ));
        }

        #[test]
        fn address() {
            assert!(matches!(
                load(r#"{ "GCONF": { "address": "0xzz", "def": "x:0" } }"#),
                Err(Error::Address { .. })
            ));
            assert!(matches!(
                load(r#"{ "GCONF": { "address": "0x00", "instances": ["0x100"], "def": "x:0" } }"#),
                Err(Error::Address { .. })
            ));
        }

        #[test]
        fn unknown_field() {
            assert!(matches!(
                load(r#"{ "COOLCONF": { "address": "0x6d", "def": "semin:3:0", "signed": ["sgt"] } }"#),
                Err(Error::UnknownField { .. })
            ));
        }

        #[test]
        fn document() {
            assert!(matches!(load("[1, 2]"), Err(Error::Json(..))));
            assert!(matches!(
                load(r#"{ "GCONF": { "def": "x:0" } }"#),
                Err(Error::Json(..))
            ));
        }

        #[test]
        fn names() {
            assert!(matches!(
                load(r#"{ "GCONF 1": { "address": 0, "def": "x:0" } }"#),
                Err(Error::Ident(..))
            ));
            assert!(matches!(
                load(r#"{ "GCONF": { "address": 0, "def": "x:@40" } }"#),
                Err(Error::OutOfRange(..))
            ));
        }
    }
}
