//! # Link Registry
//!
//! Every resource payload returned by the broker carries a `links` object:
//! a set of named operations, each with an HTTP method, an href and a
//! parameter contract. The client never hard-codes what it may do with a
//! resource; it parses the links into a [`LinkMap`] and only issues requests
//! that resolve through it.
//!
//! ```text
//! payload.links ──parse──▶ LinkMap ──has(op)──▶ bool
//!                              │
//!                              └──resolve(op, params)──▶ RequestDescriptor ──▶ Transport
//! ```

pub mod link;
pub mod map;
pub mod ops;
pub mod request;

pub use link::{HttpMethod, LinkDescriptor, LinkParameter};
pub use map::LinkMap;
pub use request::{Params, RequestDescriptor};
