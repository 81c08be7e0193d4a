//! AMQP property encoder: converts a caller-supplied map of
//! `name -> value` into an AMQP-encoded map of typed scalars, compatible
//! with a .NET AMQP decoder on the host side.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lazy_regex::{TIMESPAN_RE, UUID_RE};
use serde_amqp::primitives::OrderedMap;
use serde_amqp::Value;

use crate::amqp_codec;
use crate::amqp_value::{AmqpScalar, PropertyValue};
use crate::error::Error;

mod lazy_regex {
    use regex::Regex;
    use std::sync::OnceLock;

    pub(crate) struct LazyRegex {
        pattern: &'static str,
        cell: OnceLock<Regex>,
    }

    impl LazyRegex {
        pub(crate) const fn new(pattern: &'static str) -> Self {
            Self {
                pattern,
                cell: OnceLock::new(),
            }
        }

        pub(crate) fn get(&self) -> &Regex {
            self.cell
                .get_or_init(|| Regex::new(self.pattern).expect("static regex is valid"))
        }
    }

    pub(crate) static UUID_RE: LazyRegex = LazyRegex::new(
        r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$",
    );

    pub(crate) static TIMESPAN_RE: LazyRegex =
        LazyRegex::new(r"^-?(\d+\.)?(\d{2}:)?(\d{2}:)?\d{2}(\.\d{1,7})?$");
}

/// Classifies an integer value to the narrowest AMQP integer type that
/// holds it (also reached from a whole-valued float's "is integer"
/// carve-out).
fn classify_integer(v: i64) -> AmqpScalar {
    if (0..=255).contains(&v) {
        AmqpScalar::Byte(v as u8)
    } else if (-128..=127).contains(&v) {
        AmqpScalar::SByte(v as i8)
    } else if (-32768..=32767).contains(&v) {
        AmqpScalar::Int16(v as i16)
    } else if (0..=65535).contains(&v) {
        AmqpScalar::UInt16(v as u16)
    } else if (i32::MIN as i64..=i32::MAX as i64).contains(&v) {
        AmqpScalar::Int32(v as i32)
    } else if (0..=u32::MAX as i64).contains(&v) {
        AmqpScalar::UInt32(v as u32)
    } else {
        AmqpScalar::Int64(v)
    }
}

fn classify_float(v: f64) -> AmqpScalar {
    if v.is_finite() && v.fract() == 0.0 && v.abs() <= i64::MAX as f64 {
        return classify_integer(v as i64);
    }
    if v.abs() <= f32::MAX as f64 {
        AmqpScalar::Single(v as f32)
    } else {
        AmqpScalar::Double(v)
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(DateTime::<Utc>::from_naive_utc_and_offset(
            date.and_hms_opt(0, 0, 0).unwrap(),
            Utc,
        ));
    }
    None
}

fn classify_string(s: &str) -> AmqpScalar {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return AmqpScalar::Char(c);
    }
    if UUID_RE.get().is_match(s) {
        if let Ok(uuid) = uuid::Uuid::parse_str(s) {
            return AmqpScalar::Guid(uuid);
        }
    }
    if let Ok(url) = url::Url::parse(s) {
        return AmqpScalar::Uri(url);
    }
    if TIMESPAN_RE.get().is_match(s) {
        return AmqpScalar::TimeSpan(s.to_string());
    }
    if let Some(dt) = parse_date(s) {
        return AmqpScalar::DateTime(dt);
    }
    AmqpScalar::String(s.to_string())
}

/// Pure type-detection function: the §4.6 twelve-step ladder, minus the
/// emitting step. Returns `Err(type_name)` (the JS-`typeof`-shaped name)
/// for the one case the ladder cannot classify (step 12).
pub fn detect(value: &PropertyValue) -> Result<AmqpScalar, &'static str> {
    Ok(match value {
        PropertyValue::Null => AmqpScalar::Null,
        PropertyValue::Bool(b) => AmqpScalar::Boolean(*b),
        PropertyValue::Int(v) => classify_integer(*v),
        PropertyValue::UInt(v) => AmqpScalar::UInt64(*v),
        PropertyValue::Float(v) => classify_float(*v),
        PropertyValue::String(s) => classify_string(s),
        PropertyValue::DateTime(dt) => AmqpScalar::DateTimeOffset(*dt),
        PropertyValue::Url(url) => AmqpScalar::Uri(url.clone()),
        PropertyValue::Bytes(bytes) => AmqpScalar::Stream(bytes.clone()),
        PropertyValue::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(detect(item)?);
            }
            AmqpScalar::Array(out)
        }
        PropertyValue::Decimal { unscaled, scale } => {
            AmqpScalar::Decimal128(encode_decimal128(*unscaled, *scale).map_err(|_| "object")?)
        }
    })
}

/// Encodes `unscaled * 10^-scale` as IEEE 754-2008 decimal128 using the
/// Binary Integer Decimal (BID) encoding AMQP requires. Only the common
/// case (coefficient fits in 113 bits without the extended/"infinite"
/// combination-field form) is supported; values requiring that form are
/// rejected rather than mis-encoded.
fn encode_decimal128(unscaled: i128, scale: u32) -> Result<[u8; 16], ()> {
    const BIAS: i32 = 6176;
    let negative = unscaled < 0;
    let coefficient = unscaled.unsigned_abs();
    // 10^34 - 1 is the largest coefficient representable in decimal128.
    if coefficient > 9_999_999_999_999_999_999_999_999_999_999_999u128 {
        return Err(());
    }
    let biased_exponent = BIAS - scale as i32;
    if !(0..=0x3FFF).contains(&biased_exponent) {
        return Err(());
    }

    // Bit layout (MSB to LSB of a 128-bit big-endian integer), covering the
    // "short" combination-field form (G0G1 != 11) that every coefficient
    // within the bound checked above fits in:
    //   [sign:1][G0G1:2][exponent continuation:12][coeff MSBs:3][trailing:110]
    let exponent = biased_exponent as u32;
    let high_exp_bits = (exponent >> 12) & 0x3;
    let low_exp_bits = exponent & 0xFFF;
    let coeff_msb = ((coefficient >> 110) & 0x7) as u32;
    let trailing = coefficient & ((1u128 << 110) - 1);

    let mut acc: u128 = if negative { 1 } else { 0 } << 127;
    acc |= (high_exp_bits as u128) << 125;
    acc |= (low_exp_bits as u128) << 113;
    acc |= (coeff_msb as u128) << 110;
    acc |= trailing;

    Ok(acc.to_be_bytes())
}

fn build_map(values: &HashMap<String, PropertyValue>) -> Result<OrderedMap<String, Value>, Error> {
    let mut map = OrderedMap::default();
    for (key, value) in values {
        let scalar = detect(value).map_err(|type_name| Error::UnsupportedType {
            key: key.clone(),
            type_name,
        })?;
        map.insert(key.clone(), Value::from(scalar));
    }
    Ok(map)
}

/// Encodes `values` as AMQP map bytes. Attributes the first unsupported
/// value to its key.
pub fn encode(values: &HashMap<String, PropertyValue>) -> Result<Vec<u8>, Error> {
    let map = build_map(values)?;
    amqp_codec::encode_map(&map)
}

/// Applies the same detection ladder as [`encode`] without emitting bytes,
/// so a caller can reject a map early with precise key attribution.
pub fn validate(values: &HashMap<String, PropertyValue>) -> Result<(), Error> {
    build_map(values).map(|_| ())
}

/// Convenience wrapper used by the settlement client: returns zero bytes
/// for an absent or empty map, otherwise encodes and wraps any failure with
/// the settlement operation's name.
pub fn encode_for_operation(
    values: Option<&HashMap<String, PropertyValue>>,
    op_name: &'static str,
) -> Result<Vec<u8>, Error> {
    match values {
        None => Ok(Vec::new()),
        Some(values) if values.is_empty() => Ok(Vec::new()),
        Some(values) => encode(values).map_err(|source| Error::EncodeFailed {
            op: op_name,
            source: Box::new(source),
        }),
    }
}
