//! Stock field converters.
//!
//! A [`FieldValue`] knows the element text of one Rust type: how to parse it
//! out of a tokenized element and how to write it back, quoted as needed for
//! the current [`QuoteLevel`]. NULL reaches `scan` as `None`; plain types reset
//! to their default on NULL, `Option<T>` becomes `None`.
//!
//! Formats follow the server's text output:
//!
//! | type                 | text                                  |
//! |----------------------|---------------------------------------|
//! | `bool`               | `t` / `f` (`true` / `false` accepted) |
//! | integers             | decimal                               |
//! | `f32`, `f64`         | decimal, `NaN`, `Infinity`, `-Infinity` |
//! | `String`             | verbatim                              |
//! | `Vec<u8>`            | `\x` followed by lowercase hex        |
//! | `NaiveDate`          | `2024-01-31`                          |
//! | `NaiveDateTime`      | `2024-01-31 12:30:00.25`              |
//! | `DateTime<Utc>`      | `2024-01-31 12:30:00.25+00:00`        |
//! | [`Json<T>`]          | serialized JSON                       |

use std::str;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::quote::{append_element, QuoteLevel};

type FieldResult<T> = std::result::Result<T, FieldError>;

/// Conversion between one Rust type and its composite element text.
pub trait FieldValue {
    /// Replaces `self` with the value of `elem`. `None` is SQL NULL.
    fn scan(&mut self, elem: Option<&[u8]>) -> FieldResult<()>;

    /// Appends the element text for `self`, or nothing for NULL.
    fn append(&self, out: &mut Vec<u8>, level: QuoteLevel) -> FieldResult<()>;
}

fn text(elem: &[u8]) -> FieldResult<&str> {
    Ok(str::from_utf8(elem)?)
}

impl<T: FieldValue + Default> FieldValue for Option<T> {
    fn scan(&mut self, elem: Option<&[u8]>) -> FieldResult<()> {
        match elem {
            None => *self = None,
            Some(elem) => {
                let mut value = T::default();
                value.scan(Some(elem))?;
                *self = Some(value);
            }
        }
        Ok(())
    }

    fn append(&self, out: &mut Vec<u8>, level: QuoteLevel) -> FieldResult<()> {
        match self {
            Some(value) => value.append(out, level),
            None => Ok(()),
        }
    }
}

impl FieldValue for bool {
    fn scan(&mut self, elem: Option<&[u8]>) -> FieldResult<()> {
        *self = match elem {
            None => false,
            Some(b"t" | b"true") => true,
            Some(b"f" | b"false") => false,
            Some(other) => return Err(FieldError::parse("bool", other)),
        };
        Ok(())
    }

    fn append(&self, out: &mut Vec<u8>, _level: QuoteLevel) -> FieldResult<()> {
        out.push(if *self { b't' } else { b'f' });
        Ok(())
    }
}

macro_rules! integer_field {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            fn scan(&mut self, elem: Option<&[u8]>) -> FieldResult<()> {
                *self = match elem {
                    None => 0,
                    Some(elem) => text(elem)?
                        .parse()
                        .map_err(|_| FieldError::parse(stringify!($ty), elem))?,
                };
                Ok(())
            }

            fn append(&self, out: &mut Vec<u8>, _level: QuoteLevel) -> FieldResult<()> {
                out.extend_from_slice(self.to_string().as_bytes());
                Ok(())
            }
        }
    )*};
}

integer_field!(i16, i32, i64, u32);

macro_rules! float_field {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            fn scan(&mut self, elem: Option<&[u8]>) -> FieldResult<()> {
                *self = match elem {
                    None => 0.0,
                    Some(b"NaN") => <$ty>::NAN,
                    Some(b"Infinity") => <$ty>::INFINITY,
                    Some(b"-Infinity") => <$ty>::NEG_INFINITY,
                    Some(elem) => text(elem)?
                        .parse()
                        .map_err(|_| FieldError::parse(stringify!($ty), elem))?,
                };
                Ok(())
            }

            fn append(&self, out: &mut Vec<u8>, _level: QuoteLevel) -> FieldResult<()> {
                let v = *self;
                if v.is_nan() {
                    out.extend_from_slice(b"NaN");
                } else if v.is_infinite() {
                    let word: &[u8] = if v > 0.0 { b"Infinity" } else { b"-Infinity" };
                    out.extend_from_slice(word);
                } else {
                    out.extend_from_slice(v.to_string().as_bytes());
                }
                Ok(())
            }
        }
    )*};
}

float_field!(f32, f64);

impl FieldValue for String {
    fn scan(&mut self, elem: Option<&[u8]>) -> FieldResult<()> {
        self.clear();
        if let Some(elem) = elem {
            self.push_str(text(elem)?);
        }
        Ok(())
    }

    fn append(&self, out: &mut Vec<u8>, level: QuoteLevel) -> FieldResult<()> {
        append_element(out, self.as_bytes(), level);
        Ok(())
    }
}

const HEX: &[u8; 16] = b"0123456789abcdef";

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// `bytea` in hex format.
impl FieldValue for Vec<u8> {
    fn scan(&mut self, elem: Option<&[u8]>) -> FieldResult<()> {
        self.clear();
        let Some(elem) = elem else {
            return Ok(());
        };
        let hex = elem
            .strip_prefix(b"\\x")
            .filter(|hex| hex.len() % 2 == 0)
            .ok_or_else(|| FieldError::parse("bytea", elem))?;
        for pair in hex.chunks_exact(2) {
            match (hex_digit(pair[0]), hex_digit(pair[1])) {
                (Some(hi), Some(lo)) => self.push((hi << 4) | lo),
                _ => return Err(FieldError::parse("bytea", elem)),
            }
        }
        Ok(())
    }

    fn append(&self, out: &mut Vec<u8>, level: QuoteLevel) -> FieldResult<()> {
        let mut text = Vec::with_capacity(2 + self.len() * 2);
        text.extend_from_slice(b"\\x");
        for &b in self {
            text.push(HEX[(b >> 4) as usize]);
            text.push(HEX[(b & 0x0f) as usize]);
        }
        append_element(out, &text, level);
        Ok(())
    }
}

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const TIMESTAMPTZ_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%#z"];

impl FieldValue for NaiveDate {
    fn scan(&mut self, elem: Option<&[u8]>) -> FieldResult<()> {
        *self = match elem {
            None => NaiveDate::default(),
            Some(elem) => NaiveDate::parse_from_str(text(elem)?, DATE_FORMAT)
                .map_err(|_| FieldError::parse("date", elem))?,
        };
        Ok(())
    }

    fn append(&self, out: &mut Vec<u8>, level: QuoteLevel) -> FieldResult<()> {
        append_element(out, self.format(DATE_FORMAT).to_string().as_bytes(), level);
        Ok(())
    }
}

impl FieldValue for NaiveDateTime {
    fn scan(&mut self, elem: Option<&[u8]>) -> FieldResult<()> {
        *self = match elem {
            None => NaiveDateTime::default(),
            Some(elem) => {
                let s = text(elem)?;
                NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
                    .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
                    .map_err(|_| FieldError::parse("timestamp", elem))?
            }
        };
        Ok(())
    }

    fn append(&self, out: &mut Vec<u8>, level: QuoteLevel) -> FieldResult<()> {
        append_element(
            out,
            self.format(TIMESTAMP_FORMAT).to_string().as_bytes(),
            level,
        );
        Ok(())
    }
}

impl FieldValue for DateTime<Utc> {
    fn scan(&mut self, elem: Option<&[u8]>) -> FieldResult<()> {
        *self = match elem {
            None => DateTime::<Utc>::default(),
            Some(elem) => {
                let s = text(elem)?;
                TIMESTAMPTZ_FORMATS
                    .iter()
                    .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
                    .or_else(|| DateTime::parse_from_rfc3339(s).ok())
                    .ok_or_else(|| FieldError::parse("timestamptz", elem))?
                    .with_timezone(&Utc)
            }
        };
        Ok(())
    }

    fn append(&self, out: &mut Vec<u8>, level: QuoteLevel) -> FieldResult<()> {
        append_element(
            out,
            self.format(TIMESTAMPTZ_FORMATS[0]).to_string().as_bytes(),
            level,
        );
        Ok(())
    }
}

/// A field stored as JSON text.
///
/// NULL scans to `T::default()`; wrap in `Option` to keep NULL distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Json<T>(pub T);

impl<T> FieldValue for Json<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    fn scan(&mut self, elem: Option<&[u8]>) -> FieldResult<()> {
        self.0 = match elem {
            None => T::default(),
            Some(elem) => serde_json::from_slice(elem)?,
        };
        Ok(())
    }

    fn append(&self, out: &mut Vec<u8>, level: QuoteLevel) -> FieldResult<()> {
        let text = serde_json::to_vec(&self.0)?;
        append_element(out, &text, level);
        Ok(())
    }
}
