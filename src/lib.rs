//! # packcore
//!
//! Format-agnostic codec core for **MessagePack-family** binary formats: the decode-result model,
//! the nesting-depth guard, the scalar encode contract and a chunked field-name trie, plus a
//! complete MessagePack encoder and decoder built on them.
//!
//! ## Design principles
//!
//! - **One result per decode step.**
//!   [`Decoder::read_item`] yields a [`DecodeItemResult`]: a scalar, a collection header carrying
//!   a [`CollectionItemIterator`], an extension object, or the recoverable
//!   [`DecodeItemResult::InsufficientInput`] outcome.
//! - **Zero-copy decoding.**
//!   Strings, binaries and extension bodies borrow the input for its full lifetime `'a`.
//! - **Suspend, never corrupt.**
//!   A step that runs out of input consumes nothing, so [`StreamBuffer`] can retry it verbatim
//!   once the next chunk arrives.
//! - **Explicit recursion budget.**
//!   Nesting is charged against a [`CollectionContext`] instead of the native stack; traversal
//!   of hostile input is iterative and bounded by [`DecodeLimits::max_depth`].
//!
//! ## MessagePack mapping
//!
//! | wire                       | [`ElementType`]                              |
//! |----------------------------|----------------------------------------------|
//! | nil                        | `Null`                                       |
//! | true / false               | `True` / `False`                             |
//! | any integer header         | `Int32`, `Int64` or `UInt64` by value        |
//! | float32 / float64          | `Single` / `Double`                          |
//! | fixstr, str8/16/32         | `String`                                     |
//! | bin8/16/32                 | `Binary`                                     |
//! | fixarray, array16/32       | `Array`                                      |
//! | fixmap, map16/32           | `Map`                                        |
//! | fixext1..16, ext8/16/32    | `Extension`                                  |
//!
//! Numeric payloads are exposed as native-endian bytes held inline in the result, since the wire
//! form is big-endian or folded into the header byte.
//!
//! ## Feature flags
//!
//! - `std` *(default)*: implements `std::error::Error` for [`CodecError`] and provides the
//!   thread-safe `SharedArrayPool`.
//! - `alloc` *(default)*: enables the `Vec<u8>` sink, `StreamBuffer`, buffer pools, encoder
//!   options, UTF-16 helpers and `ScalarStringTrie`.
//! - `tracing` *(default)*: emits diagnostic events through `tracing` when a limit rejects
//!   input, a buffer ceiling is reached or cancellation is observed.
//! - `serde`: `Serialize`/`Deserialize` for plain configuration values.
//! - `simdutf8`: enables SIMD-accelerated UTF-8 validation where supported.
//! - `bytes`: implements [`Sink`] for `bytes::BytesMut`.
//!
//! ## Safety
//!
//! This crate forbids `unsafe` code.
//!
//! ## `no_std`
//!
//! The crate is `no_std` compatible.
//! - Slice decoding and encoding into a [`SliceSink`] work without `alloc`.
//! - Pools, options, streaming and the trie require `alloc`.
//!
//! ## Example
//!
//! ```
//! use packcore::{DecodeItemResult, DecodeLimits, Decoder, ElementType, FormatEncoder, MsgPackEncoder};
//!
//! let enc = MsgPackEncoder::new();
//! let mut out = Vec::new();
//! enc.write_map_header(&mut out, 1)?;
//! enc.write_str(&mut out, "id")?;
//! enc.write_u64(&mut out, 300)?;
//!
//! let mut dec = Decoder::new(&out, DecodeLimits::default())?;
//! let DecodeItemResult::Collection(map) = dec.read_item()? else {
//!     panic!("expected a map");
//! };
//! assert_eq!(map.element_type(), ElementType::Map);
//! let mut items = map.into_items();
//! let key = items.next_item(&mut dec)?.unwrap();
//! assert_eq!(key.raw_bytes(), Some(&b"id"[..]));
//! let value = items.next_item(&mut dec)?.unwrap();
//! assert_eq!(value.element_type(), ElementType::Int32);
//! assert_eq!(value.as_i64(), Some(300));
//! assert!(items.next_item(&mut dec)?.is_none());
//! assert_eq!(dec.context().current_depth(), 0);
//! # Ok::<(), packcore::CodecError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[macro_use]
mod trace;

#[cfg(feature = "alloc")]
mod alloc_util;
mod cancel;
mod code;
mod context;
mod decode;
mod element;
mod encode;
mod encoder;
mod error;
mod features;
mod iter;
mod limits;
mod result;
mod sink;
pub(crate) mod utf8;
mod wire;

#[cfg(feature = "alloc")]
mod options;
#[cfg(feature = "alloc")]
mod pool;
#[cfg(feature = "alloc")]
mod stream;
#[cfg(feature = "alloc")]
mod text;
#[cfg(feature = "alloc")]
mod trie;

pub use crate::cancel::{Cancellation, CancellationGate, NeverCancel};
pub use crate::context::CollectionContext;
pub use crate::decode::Decoder;
pub use crate::element::{CollectionType, ElementType};
pub use crate::encode::MsgPackEncoder;
pub use crate::encoder::{EncodeScalar, FormatEncoder};
pub use crate::error::{CodecError, ErrorCode, ErrorKind};
pub use crate::features::{FormatFeatures, FormatFeaturesBuilder};
pub use crate::iter::CollectionItemIterator;
pub use crate::limits::{
    DecodeLimits, DEFAULT_MAX_BLOB_LEN, DEFAULT_MAX_CONTAINER_LEN, DEFAULT_MAX_DEPTH,
};
pub use crate::result::{
    CollectionHeader, CollectionLength, DecodeItemResult, ExtensionType, RawBytes, ScalarItem,
};
pub use crate::sink::{Sink, SliceSink};

#[cfg(feature = "alloc")]
pub use crate::options::{
    FormatEncoderOptions, FormatEncoderOptionsBuilder, DEFAULT_CANCELLATION_SUPPORT_THRESHOLD,
    DEFAULT_MAX_BYTE_BUFFER_LENGTH, DEFAULT_MAX_CHAR_BUFFER_LENGTH,
    MIN_CANCELLATION_SUPPORT_THRESHOLD, MIN_MAX_BYTE_BUFFER_LENGTH, MIN_MAX_CHAR_BUFFER_LENGTH,
};
#[cfg(feature = "std")]
pub use crate::pool::SharedArrayPool;
#[cfg(feature = "alloc")]
pub use crate::pool::{encode_pooled, BufferPool, HeapPool, PooledSink, Rented};
#[cfg(feature = "alloc")]
pub use crate::stream::StreamBuffer;
#[cfg(feature = "alloc")]
pub use crate::text::{decode_str_utf16, encode_utf16_str};
#[cfg(feature = "alloc")]
pub use crate::trie::ScalarStringTrie;
