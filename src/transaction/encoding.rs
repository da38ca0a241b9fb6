//! Canonical byte encoding of transaction records.
//!
//! Records go through `serde_json` with [`CanonicalFormatter`], which lays
//! the object out with `", "` between entries and `": "` after keys and
//! escapes every non-printable or non-ASCII character as `\uXXXX`. Floats
//! use the shortest round-trip form and switch to exponent notation below
//! `1e-4` and from `1e16` up. This is the exact byte layout other
//! implementations hash, so leaf digests interoperate.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::ser::Formatter;
use std::cell::Cell;
use std::io;

use super::model::{FieldValue, TransactionRecord};

/// Canonical bytes of a record. Equal records always produce equal bytes.
pub fn canonical_bytes(tx: &TransactionRecord) -> Vec<u8> {
    let literal = Cell::new(None);
    let mut out = Vec::with_capacity(16 + tx.len() * 24);
    let mut ser =
        serde_json::Serializer::with_formatter(&mut out, CanonicalFormatter { literal: &literal });
    CanonicalRecord {
        tx,
        literal: &literal,
    }
    .serialize(&mut ser)
    .expect("serialize canonical record");
    out
}

pub fn canonical_string(tx: &TransactionRecord) -> String {
    String::from_utf8_lossy(&canonical_bytes(tx)).into_owned()
}

/// JSON layout with spaced separators, ASCII-only strings and
/// shortest-repr floats.
///
/// `serde_json` routes non-finite floats to `write_null`; the value side
/// parks the literal to print in `literal` just before that happens.
struct CanonicalFormatter<'a> {
    literal: &'a Cell<Option<&'static str>>,
}

impl Formatter for CanonicalFormatter<'_> {
    fn write_null<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(self.literal.take().unwrap_or("null").as_bytes())
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(float_repr(value).as_bytes())
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        // Quotes, backslashes and C0 controls arrive via `write_char_escape`.
        for ch in fragment.chars() {
            if (' '..='~').contains(&ch) {
                writer.write_all(&[ch as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

struct CanonicalRecord<'a> {
    tx: &'a TransactionRecord,
    literal: &'a Cell<Option<&'static str>>,
}

impl Serialize for CanonicalRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tx.len()))?;
        for (key, value) in self.tx.iter() {
            map.serialize_entry(
                key,
                &CanonicalValue {
                    value,
                    literal: self.literal,
                },
            )?;
        }
        map.end()
    }
}

struct CanonicalValue<'a> {
    value: &'a FieldValue,
    literal: &'a Cell<Option<&'static str>>,
}

impl Serialize for CanonicalValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            FieldValue::Float(f) if !f.is_finite() => {
                let literal = if f.is_nan() {
                    "NaN"
                } else if *f > 0.0 {
                    "Infinity"
                } else {
                    "-Infinity"
                };
                self.literal.set(Some(literal));
                serializer.serialize_unit()
            }
            other => other.serialize(serializer),
        }
    }
}

fn float_repr(f: f64) -> String {
    let abs = f.abs();
    if abs != 0.0 && !(1e-4..1e16).contains(&abs) {
        // `{:e}` yields e.g. "1e20" or "-1.5e-7"; the exponent needs a sign
        // and at least two digits.
        let sci = format!("{f:e}");
        return match sci.split_once('e') {
            Some((mantissa, exp)) => {
                let exp: i32 = exp.parse().unwrap_or(0);
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.abs())
            }
            None => sci,
        };
    }

    let mut plain = format!("{f}");
    if !plain.contains('.') {
        plain.push_str(".0");
    }
    plain
}
