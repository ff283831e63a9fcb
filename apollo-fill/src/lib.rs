//! Deterministic GraphQL response fixtures.
//!
//! A [`Filler`] synthesizes response data whose shape exactly matches the selection set of an
//! operation. Leaf values come from a caller-supplied partial override, from a type-keyed
//! [`Resolvers`] registry, or are generated pseudo-randomly. Random values are seeded by the
//! position of the value in the response tree, so the same request always produces the same
//! response.
//!
//! ```ignore
//! let schema = Schema::parse_and_validate(SDL, "schema.graphql")?;
//! let filler = Filler::builder().schema(schema).build();
//! let data = filler
//!     .fill(QUERY, Some(json!({ "user": { "name": "Ada" } }).into()))
//!     .respond(&Request::builder().operation_name("User").build())?;
//! ```

#![warn(
    rustdoc::broken_intra_doc_links,
    unreachable_pub,
    unreachable_patterns,
    unused,
    unused_qualifications,
    dead_code,
    while_true,
    unconditional_panic,
    clippy::all
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]

mod configuration;
pub mod error;
mod fill;
pub mod json_ext;
mod random;
mod request;
mod resolvers;
mod seed;
mod source;
pub mod spec;

pub use crate::configuration::Configuration;
pub use crate::fill::Fill;
pub use crate::fill::Filler;
pub use crate::random::Random;
pub use crate::request::Request;
pub use crate::resolvers::Resolvers;
pub use crate::seed::KeyPath;
pub use crate::seed::KeyPathElement;
pub use crate::source::Details;
pub use crate::source::Generator;
pub use crate::source::ListSize;
pub use crate::source::ValueSource;
pub use crate::source::list;
