//! Datasheet-style bit notation for describing register fields.
//!
//! A register is written as whitespace separated fields, with bit positions
//! counted from 0 at the least significant bit:
//!
//! | token        | meaning                                        |
//! | ------------ | ---------------------------------------------- |
//! | `NAME:BIT`   | one bit at `BIT`                               |
//! | `NAME:HI:LO` | bits `LO` through `HI` (either order)          |
//! | `NAME:@N`    | `N` bits directly adjacent to the previous field |
//!
//! Fields may be listed from the most or the least significant end, as long as
//! the whole string is consistent. Fields whose name starts with `reserved`
//! (in any case) or `_` only take part in placement and produce no field.
//!
//! ```
//! use regdef_model::notation;
//!
//! let fields = notation::parse(
//!     "reserved:11 lock_gconf:10 shaft2:9 shaft1:8 test_mode:7 reserved:6:4 poscmp_enable:3 reserved:2:0",
//! )
//! .unwrap();
//!
//! assert_eq!(fields.len(), 5);
//! assert_eq!(fields[0].offset, 3);
//! ```

use crate::{error::Error, field::Field};

struct Token<'a> {
    text: &'a str,
    name: &'a str,
    offset: Option<u32>,
    width: u32,
}

impl<'a> Token<'a> {
    fn parse(text: &'a str) -> Result<Self, Error> {
        let number = |s: &str| {
            s.parse::<u32>().map_err(|source| Error::Number {
                token: text.to_string(),
                source,
            })
        };

        let atoms = text.split(':').collect::<Vec<_>>();

        let (name, offset, width) = match atoms.as_slice() {
            [name, width] if width.starts_with('@') => (*name, None, number(&width[1..])?),
            [name, bit] => (*name, Some(number(*bit)?), 1),
            [name, a, b] => {
                let (a, b) = (number(*a)?, number(*b)?);
                (*name, Some(a.min(b)), a.abs_diff(b).saturating_add(1))
            }
            _ => Err(Error::Malformed(text.to_string()))?,
        };

        if width == 0 {
            Err(Error::Malformed(text.to_string()))?
        }

        if !is_ident(name) {
            Err(Error::Ident(name.to_string()))?
        }

        Ok(Self {
            text,
            name,
            offset,
            width,
        })
    }

    fn is_reserved(&self) -> bool {
        self.name.starts_with('_') || self.name.to_lowercase().starts_with("reserved")
    }
}

pub(crate) fn is_ident(name: &str) -> bool {
    let mut chars = name.chars();

    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parse a bit notation string into the fields it declares, ordered from the
/// least significant bit.
pub fn parse(notation: &str) -> Result<Vec<Field>, Error> {
    let mut tokens = notation
        .split_whitespace()
        .map(Token::parse)
        .collect::<Result<Vec<_>, _>>()?;

    // the first two explicit positions decide the direction
    let mut explicit = tokens.iter().filter_map(|token| token.offset);
    let descending = match (explicit.next(), explicit.next()) {
        (Some(first), Some(second)) if first == second => {
            Err(Error::Unordered(notation.to_string()))?
        }
        (Some(first), Some(second)) => first > second,
        _ => false,
    };

    if descending {
        tokens.reverse();
    }

    let mut next = 0;
    let mut fields = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        let offset = token.offset.unwrap_or(next);

        if i != 0 && offset < next {
            Err(Error::Unordered(notation.to_string()))?
        }

        next = offset.saturating_add(token.width);

        if next > 32 {
            Err(Error::OutOfRange(token.text.to_string()))?
        }

        if !token.is_reserved() {
            fields.push(Field::new(token.name, offset as u8, token.width as u8));
        }
    }

    log::trace!("parsed {} fields from \"{notation}\"", fields.len());

    Ok(fields)
}
