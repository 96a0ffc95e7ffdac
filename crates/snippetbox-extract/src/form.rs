//! The form decoder.
//!
//! [`FormDecoder`] turns an `application/x-www-form-urlencoded` body into a
//! typed destination. Its errors come in two kinds that callers must not
//! confuse:
//!
//! - [`UsageFault`]: the destination type cannot be populated from a form at
//!   all. This is a bug in the calling code and converts into
//!   [`AppError::Fault`], which is always answered with a 500.
//! - [`InputError`]: the submitted data is malformed or does not fit the
//!   destination. The caller turns it into client feedback.
//!
//! The destination is checked before any input is looked at, so a usage
//! fault is reported no matter what the client sent.

use serde::de::{self, DeserializeOwned, Deserializer, Expected, Visitor};
use snippetbox_core::AppError;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// The form decoder.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use snippetbox_extract::FormDecoder;
///
/// #[derive(Debug, Default, Deserialize)]
/// struct Search {
///     q: String,
///     #[serde(default)]
///     page: u32,
/// }
///
/// let search: Search = FormDecoder::new().decode(b"q=frog+pond&page=2").unwrap();
/// assert_eq!(search.q, "frog pond");
/// assert_eq!(search.page, 2);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormDecoder {
    strict: bool,
}

impl FormDecoder {
    /// Creates a decoder that ignores keys the destination does not declare.
    #[must_use]
    pub const fn new() -> Self {
        Self { strict: false }
    }

    /// Creates a decoder that rejects keys the destination does not declare.
    #[must_use]
    pub const fn strict() -> Self {
        Self { strict: true }
    }

    /// Returns `true` if unknown keys are rejected.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// Decodes a raw form body into a new `T`.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Usage`] if `T` is not a struct or map.
    /// [`DecodeError::Input`] if the body is malformed or a field does not
    /// convert.
    pub fn decode<T: DeserializeOwned>(&self, raw: &[u8]) -> Result<T, DecodeError> {
        let shape = probe::<T>()?;

        let text = parse_raw(raw)?;
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(text).map_err(|e| InputError::Malformed(e.to_string()))?;

        if self.strict {
            if let Shape::Struct(fields) = shape {
                if let Some((key, _)) = pairs.iter().find(|(k, _)| !fields.contains(&k.as_str())) {
                    return Err(InputError::UnknownField(key.clone()).into());
                }
            }
        }

        serde_urlencoded::from_str::<T>(text).map_err(|e| classify::<T>(shape, &pairs, &e).into())
    }

    /// Decodes a raw form body into `dst`.
    ///
    /// `dst` is only assigned when decoding succeeds; on error it keeps its
    /// previous value.
    pub fn decode_into<T: DeserializeOwned>(&self, raw: &[u8], dst: &mut T) -> Result<(), DecodeError> {
        *dst = self.decode(raw)?;
        Ok(())
    }
}

/// Error returned by [`FormDecoder`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The destination type cannot be decoded into.
    #[error(transparent)]
    Usage(#[from] UsageFault),

    /// The submitted data was rejected.
    #[error(transparent)]
    Input(#[from] InputError),
}

impl DecodeError {
    /// Returns `true` for a usage fault.
    #[must_use]
    pub const fn is_usage_fault(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Splits off the input error, the only kind fit for client feedback.
    pub fn into_input(self) -> Result<InputError, UsageFault> {
        match self {
            Self::Input(err) => Ok(err),
            Self::Usage(fault) => Err(fault),
        }
    }
}

/// A destination type that no form can populate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("form destination `{destination}` is not decodable: expected a struct or map, found {found}")]
pub struct UsageFault {
    destination: &'static str,
    found: String,
}

impl UsageFault {
    /// Returns the destination type name.
    #[must_use]
    pub const fn destination(&self) -> &'static str {
        self.destination
    }
}

/// Rejected form input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// The body is not a well-formed urlencoded form.
    #[error("malformed form body: {0}")]
    Malformed(String),

    /// A required field is absent.
    #[error("missing form field `{0}`")]
    MissingField(String),

    /// A key the destination does not declare (strict decoding only).
    #[error("unknown form field `{0}`")]
    UnknownField(String),

    /// A value did not convert to its field's type.
    #[error("invalid form field{}: {message}", field_suffix(.field.as_deref()))]
    InvalidField {
        /// The offending field, when it could be located.
        field: Option<String>,
        /// Conversion failure.
        message: String,
    },
}

impl InputError {
    /// Returns the field the error is about, if known.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Malformed(_) => None,
            Self::MissingField(f) | Self::UnknownField(f) => Some(f),
            Self::InvalidField { field, .. } => field.as_deref(),
        }
    }
}

fn field_suffix(field: Option<&str>) -> String {
    field.map(|f| format!(" `{f}`")).unwrap_or_default()
}

impl From<UsageFault> for AppError {
    fn from(fault: UsageFault) -> Self {
        AppError::fault(fault.to_string())
    }
}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        AppError::bad_request(err.to_string())
    }
}

impl From<DecodeError> for AppError {
    fn from(err: DecodeError) -> Self {
        match err.into_input() {
            Ok(input) => input.into(),
            Err(fault) => fault.into(),
        }
    }
}

/// Checks encoding and escapes before any pairs are split.
fn parse_raw(raw: &[u8]) -> Result<&str, InputError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| InputError::Malformed(format!("body is not UTF-8: {e}")))?;

    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let valid = bytes
                    .get(i + 1..i + 3)
                    .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
                if !valid {
                    return Err(InputError::Malformed(format!("invalid URL escape at byte {i}")));
                }
                i += 3;
            }
            b';' => {
                return Err(InputError::Malformed(format!(
                    "invalid semicolon separator at byte {i}"
                )));
            }
            _ => i += 1,
        }
    }
    Ok(text)
}

fn classify<T: DeserializeOwned>(
    shape: Shape,
    pairs: &[(String, String)],
    err: &serde_urlencoded::de::Error,
) -> InputError {
    let message = err.to_string();
    if let Some(field) = backticked(&message, "missing field `") {
        return InputError::MissingField(field);
    }
    if let Some(field) = backticked(&message, "unknown field `") {
        return InputError::UnknownField(field);
    }
    InputError::InvalidField {
        field: locate_invalid::<T>(shape, pairs),
        message,
    }
}

fn backticked(message: &str, prefix: &str) -> Option<String> {
    message
        .strip_prefix(prefix)?
        .split('`')
        .next()
        .map(str::to_string)
}

/// Most keys tried when locating a failed conversion.
const MAX_LOCATE_CANDIDATES: usize = 32;

/// Finds the key whose removal makes the conversion error go away.
///
/// Conversion errors from `serde_urlencoded` do not name the field, so
/// candidate keys are dropped in turn. Dropping the culprit either succeeds
/// or turns the error into "missing field" for that same key.
///
/// Only distinct keys are tried, only declared fields for a struct, and at
/// most [`MAX_LOCATE_CANDIDATES`] of them, so the cost stays linear in the
/// number of pairs.
fn locate_invalid<T: DeserializeOwned>(shape: Shape, pairs: &[(String, String)]) -> Option<String> {
    let mut seen = HashSet::new();
    pairs
        .iter()
        .map(|(key, _)| key.as_str())
        .filter(|key| match shape {
            Shape::Struct(fields) => fields.contains(key),
            Shape::Map => true,
        })
        .filter(|key| seen.insert(*key))
        .take(MAX_LOCATE_CANDIDATES)
        .find(|key| {
            let rest: Vec<(&str, &str)> = pairs
                .iter()
                .filter(|(k, _)| k.as_str() != *key)
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            let Ok(encoded) = serde_urlencoded::to_string(&rest) else {
                return false;
            };
            match serde_urlencoded::from_str::<T>(&encoded) {
                Ok(_) => true,
                Err(e) => backticked(&e.to_string(), "missing field `").as_deref() == Some(*key),
            }
        })
        .map(str::to_string)
}

/// What a destination asked the deserializer for.
#[derive(Debug, Clone, Copy)]
enum Shape {
    Struct(&'static [&'static str]),
    Map,
}

fn probe<T: DeserializeOwned>() -> Result<Shape, UsageFault> {
    let found = match T::deserialize(ShapeProbe) {
        Err(Probed::Struct(fields)) => return Ok(Shape::Struct(fields)),
        Err(Probed::Map) => return Ok(Shape::Map),
        Err(Probed::Other(found)) => found,
        Ok(_) => "a value that reads no input".to_string(),
    };
    Err(UsageFault {
        destination: std::any::type_name::<T>(),
        found,
    })
}

/// Outcome of probing; always returned as the "error" so nothing is built.
#[derive(Debug)]
enum Probed {
    Struct(&'static [&'static str]),
    Map,
    Other(String),
}

impl fmt::Display for Probed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Struct(_) => f.write_str("struct"),
            Self::Map => f.write_str("map"),
            Self::Other(found) => f.write_str(found),
        }
    }
}

impl std::error::Error for Probed {}

impl de::Error for Probed {
    fn custom<M: fmt::Display>(msg: M) -> Self {
        Self::Other(msg.to_string())
    }
}

/// A deserializer that records the shape its caller asks for.
struct ShapeProbe;

impl<'de> Deserializer<'de> for ShapeProbe {
    type Error = Probed;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Probed> {
        let expected: &dyn Expected = &visitor;
        Err(Probed::Other(expected.to_string()))
    }

    fn deserialize_map<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Probed> {
        Err(Probed::Map)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Probed> {
        Err(Probed::Struct(fields))
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct enum identifier ignored_any
    }
}
