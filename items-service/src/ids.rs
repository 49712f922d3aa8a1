//! Identifier generation
//!
//! Two kinds of IDs live here:
//!
//! - **Item IDs**: short base-36 tokens assigned by the store on create.
//!   They are random and *not* checked for collisions against existing items,
//!   so they are only "unique enough" for an in-memory collection.
//! - **Request IDs**: TypeID strings (`req_<base32 uuidv7>`) attached to every
//!   HTTP request for log correlation, e.g. `req_01h455vb4pex5vsknk084sn02q`.

use http::{HeaderValue, Request};
use mti::prelude::*;
use rand::Rng;
use tower_http::request_id::{MakeRequestId, RequestId};

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Default length of generated item IDs
pub const ITEM_ID_LEN: usize = 7;

/// Prefix of request IDs
pub const REQUEST_ID_PREFIX: &str = "req";

/// Source of new item IDs
///
/// The store calls this once per created item. Implementations need not
/// guarantee uniqueness.
pub trait IdGenerator: Send + Sync {
    /// Produce a fresh ID
    fn generate(&self) -> String;
}

/// Random lowercase base-36 IDs of a fixed length
#[derive(Debug, Clone, Copy)]
pub struct Base36IdGenerator {
    len: usize,
}

impl Base36IdGenerator {
    /// Generator producing IDs of `len` characters
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl Default for Base36IdGenerator {
    fn default() -> Self {
        Self::new(ITEM_ID_LEN)
    }
}

impl IdGenerator for Base36IdGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..self.len)
            .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
            .collect()
    }
}

impl<F> IdGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn generate(&self) -> String {
        self()
    }
}

/// A `MakeRequestId` implementation that generates TypeID request IDs for tower-http.
///
/// Used with `SetRequestIdLayer` so every request gets a time-sortable ID
/// unless the client already supplied one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeTypedRequestId;

impl MakeTypedRequestId {
    /// Generate a new request ID string
    pub fn next_id() -> MagicTypeId {
        REQUEST_ID_PREFIX.create_type_id::<V7>()
    }
}

impl MakeRequestId for MakeTypedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Self::next_id();
        let header_value = HeaderValue::from_str(id.as_str()).ok()?;
        Some(RequestId::new(header_value))
    }
}
