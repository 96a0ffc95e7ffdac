//! # Snippetbox Extract
//!
//! Request extraction and form decoding for Snippetbox.
//!
//! | Item | Source | Description |
//! |------|--------|-------------|
//! | [`ExtractionContext`] | whole request | Method, URI, headers, collected body, path parameters |
//! | [`path_param`] / [`path_id`] | URL path | Typed path parameters |
//! | [`FormDecoder`] | request body | URL-encoded form into a typed struct |
//!
//! ## Form decoding
//!
//! ```rust
//! use serde::Deserialize;
//! use snippetbox_extract::{DecodeError, FormDecoder, InputError};
//!
//! #[derive(Debug, Default, Deserialize)]
//! struct IdForm {
//!     id: u32,
//! }
//!
//! let mut form = IdForm::default();
//! let err = FormDecoder::new().decode_into(b"id=abc", &mut form).unwrap_err();
//!
//! // A bad value is the client's problem...
//! assert!(matches!(err, DecodeError::Input(InputError::InvalidField { .. })));
//! assert_eq!(form.id, 0);
//!
//! // ...a destination that is not a struct is ours.
//! let err = FormDecoder::new().decode::<Vec<u32>>(b"id=1").unwrap_err();
//! assert!(err.is_usage_fault());
//! ```

#![doc(html_root_url = "https://docs.rs/snippetbox-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
pub mod form;
mod path;

pub use context::ExtractionContext;
pub use error::{ExtractionError, ExtractionSource};
pub use form::{DecodeError, FormDecoder, InputError, UsageFault};
pub use path::{path_id, path_param, Params};
