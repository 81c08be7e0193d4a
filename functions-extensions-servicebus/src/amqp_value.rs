//! The AMQP-typed scalar data model and the caller-facing input
//! type the property encoder classifies.

use chrono::{DateTime, Utc};
use serde_amqp::primitives::{Dec128, Symbol, Timestamp};
use serde_amqp::Value;
use uuid::Uuid;

/// A value a caller supplies when building a properties-to-modify map for
/// `abandon`/`deadletter`/`defer`.
///
/// JS/.NET worker languages discover a value's AMQP type by inspecting its
/// runtime `typeof`; Rust already knows the shape at compile time, so this
/// enum enumerates exactly the closed set of shapes the type-detection
/// ladder distinguishes. [`crate::property_encoder::detect`] is the pure
/// function that walks the ladder.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Absent value; encodes to AMQP `null`.
    Null,
    /// Boolean value.
    Bool(bool),
    /// A signed integer in i64 range; range-classified to the smallest
    /// AMQP integer type that holds it (step 3).
    Int(i64),
    /// A value outside i64 range but representable as u64 (step 5,
    /// "wide-integer type").
    UInt(u64),
    /// A non-integer finite number; classified `single` or `double` by
    /// magnitude (step 4).
    Float(f64),
    /// A string value, further sniffed into `char`/`guid`/`uri`/`timespan`/
    /// `datetime`/`string` (step 6).
    String(String),
    /// An instant, encoded as an ISO-8601 `datetimeoffset` string (step 7).
    DateTime(DateTime<Utc>),
    /// A URL object (step 8).
    Url(url::Url),
    /// A byte buffer, encoded as AMQP `binary`/`stream` (step 9).
    Bytes(Vec<u8>),
    /// An array of values, recursively typed element-wise (step 10).
    Array(Vec<PropertyValue>),
    /// A decimal-like value: unscaled integer coefficient plus scale
    /// (step 11).
    Decimal {
        /// Unscaled coefficient.
        unscaled: i128,
        /// Number of digits after the decimal point.
        scale: u32,
    },
}

/// The closed set of AMQP-typed scalars a properties-to-modify map can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum AmqpScalar {
    /// AMQP `null`.
    Null,
    /// AMQP `boolean`.
    Boolean(bool),
    /// AMQP `ubyte`, the narrowest type for a value in `[0, 255]`.
    Byte(u8),
    /// AMQP `byte`, for a value in `[-128, 127]`.
    SByte(i8),
    /// AMQP `short`, for a value in `[-32768, 32767]`.
    Int16(i16),
    /// AMQP `ushort`, for a value in `[0, 65535]`.
    UInt16(u16),
    /// AMQP `int`, for a value in `[i32::MIN, i32::MAX]`.
    Int32(i32),
    /// AMQP `uint`, for a value in `[0, u32::MAX]`.
    UInt32(u32),
    /// AMQP `long`, for a value outside the 32-bit ranges above.
    Int64(i64),
    /// AMQP `ulong`, for a wide-integer value that fits unsigned but not
    /// signed 64-bit range.
    UInt64(u64),
    /// AMQP `float`, for a non-integer value within `f32` magnitude.
    Single(f32),
    /// AMQP `double`, for a non-integer value exceeding `f32` magnitude.
    Double(f64),
    /// AMQP `decimal128`, BID-encoded bytes.
    Decimal128([u8; 16]),
    /// AMQP `char`, for a single-character string.
    Char(char),
    /// AMQP `string`, the fallback when no narrower string subtype matches.
    String(String),
    /// AMQP `uuid`, for a string matching the UUID regex.
    Guid(Uuid),
    /// AMQP string carrying a URL-parseable value.
    Uri(url::Url),
    /// AMQP `timestamp`, for a date-parseable string.
    DateTime(DateTime<Utc>),
    /// AMQP string carrying an ISO-8601 `datetimeoffset` rendering of an
    /// instant value.
    DateTimeOffset(DateTime<Utc>),
    /// Stored verbatim; AMQP has no native signed-fractional duration type
    /// distinct from the source representation, so the validated literal is
    /// carried through unchanged.
    TimeSpan(String),
    /// AMQP `binary`, for a raw byte buffer.
    Stream(Vec<u8>),
    /// AMQP `array` (technically encoded as a `list` here), recursively
    /// typed element-wise.
    Array(Vec<AmqpScalar>),
}

impl From<AmqpScalar> for Value {
    fn from(scalar: AmqpScalar) -> Self {
        match scalar {
            AmqpScalar::Null => Value::Null,
            AmqpScalar::Boolean(b) => Value::Bool(b),
            AmqpScalar::Byte(v) => Value::UByte(v),
            AmqpScalar::SByte(v) => Value::Byte(v),
            AmqpScalar::Int16(v) => Value::Short(v),
            AmqpScalar::UInt16(v) => Value::UShort(v),
            AmqpScalar::Int32(v) => Value::Int(v),
            AmqpScalar::UInt32(v) => Value::UInt(v),
            AmqpScalar::Int64(v) => Value::Long(v),
            AmqpScalar::UInt64(v) => Value::ULong(v),
            AmqpScalar::Single(v) => Value::Float(v.into()),
            AmqpScalar::Double(v) => Value::Double(v.into()),
            AmqpScalar::Decimal128(bytes) => Value::Decimal128(Dec128::from(bytes)),
            AmqpScalar::Char(c) => Value::Char(c),
            AmqpScalar::String(s) => Value::String(s),
            AmqpScalar::Guid(uuid) => Value::Uuid(uuid.into_bytes().into()),
            AmqpScalar::Uri(url) => Value::String(url.to_string()),
            AmqpScalar::DateTime(dt) => {
                Value::Timestamp(Timestamp::from(dt.timestamp_millis()))
            }
            AmqpScalar::DateTimeOffset(dt) => Value::String(to_iso8601(&dt)),
            AmqpScalar::TimeSpan(s) => Value::String(s),
            AmqpScalar::Stream(bytes) => Value::Binary(bytes.into()),
            AmqpScalar::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
        }
    }
}

/// Formats an instant as the millisecond-precision ISO-8601 string the
/// `datetimeoffset` encoding uses (e.g. `2025-01-01T00:00:00.000Z`).
pub fn to_iso8601(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// An AMQP symbol, used for settlement map keys where the host expects a
/// symbol rather than a plain string.
pub fn symbol(name: &str) -> Symbol {
    Symbol::from(name)
}
