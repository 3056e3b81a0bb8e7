//! Hand-rolled DNS wire codec.
//!
//! Covers exactly what this server speaks: plain queries in, uncompressed
//! responses out, plus a skip-based scanner for answers relayed back from
//! upstreams (those may carry compression pointers, which are stepped over
//! without being decompressed).

pub mod decode;
pub mod encode;
pub mod scan;

pub use decode::{decode_query, peek_id};
pub use encode::{encode_query, encode_response, encode_servfail_header};
pub use scan::extract_a_records;

/// Longest presentation-form domain name this codec accepts.
pub const MAX_DOMAIN_LEN: usize = 253;

/// DNS header length; every message starts with these 12 bytes.
pub const HEADER_LEN: usize = 12;
