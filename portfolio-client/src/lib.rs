//! Client side of the portfolio like system.
//!
//! Visitors are anonymous: an [`IdentityProvider`] issues a stable `anon_*` token once per
//! storage context, [`LikesClient`] talks to the like endpoints with it, and [`LikeBoard`]
//! keeps the liked set and counters of a rendered list in sync with optimistic updates.

mod board;
mod client;
mod errors;
mod identity;
mod types;

pub use board::LikeBoard;
pub use client::{LikeApi, LikesClient};
pub use errors::ClientError;
pub use identity::{generate_identity, FileIdentityProvider, IdentityProvider, IdentityToken, MemoryIdentityProvider};
pub use types::{ContentId, ContentType};
