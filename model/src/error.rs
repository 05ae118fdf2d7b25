use std::{fmt::Display, num::ParseIntError};

/// Elaborates errors that may be emitted during model generation.
#[derive(Debug)]
pub enum Error {
    /// A bit notation token is not of the form `NAME:BIT`, `NAME:HI:LO`
    /// or `NAME:@N`.
    Malformed(String),
    /// A bit position or width in a bit notation token is not a number.
    Number {
        token: String,
        source: ParseIntError,
    },
    /// A field or register name is not a valid identifier.
    Ident(String),
    /// Bit positions in a bit notation string are neither increasing nor decreasing.
    Unordered(String),
    /// A field lies (partly) above bit 31.
    OutOfRange(String),
    /// A register definition document is not valid JSON of the expected shape.
    Json(serde_json::Error),
    /// A register address is neither a number nor a hexadecimal string.
    Address {
        register: String,
        text: String,
    },
    /// A register definition carries neither `def` nor `defs`.
    Undefined(String),
    /// A register definition refers to a field it does not declare.
    UnknownField {
        register: String,
        field: String,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Malformed(token) => write!(f, "malformed field \"{token}\""),
            Error::Number { token, source } => {
                write!(f, "invalid bit position in field \"{token}\": {source}")
            }
            Error::Ident(name) => write!(f, "\"{name}\" is not a valid identifier"),
            Error::Unordered(notation) => write!(
                f,
                "field positions in \"{notation}\" are neither increasing nor decreasing"
            ),
            Error::OutOfRange(token) => write!(f, "field \"{token}\" does not fit in 32 bits"),
            Error::Json(e) => write!(f, "invalid register definitions: {e}"),
            Error::Address { register, text } => {
                write!(f, "register \"{register}\" has invalid address \"{text}\"")
            }
            Error::Undefined(register) => {
                write!(f, "register \"{register}\" has neither \"def\" nor \"defs\"")
            }
            Error::UnknownField { register, field } => {
                write!(f, "register \"{register}\" has no field \"{field}\"")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Number { source, .. } => Some(source),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
