//! Stock [`ContentResolver`](super::ContentResolver) implementations.
//!
//! [`FileSystemResolver`] and [`MapResolver`] produce content; the others
//! decorate another resolver.

mod caching;
mod composite;
mod filesystem;
mod map;
mod prefix;

pub use caching::{CachingResolver, CachingResolverBuilder};
pub use composite::CompositeResolver;
pub use filesystem::FileSystemResolver;
pub use map::MapResolver;
pub use prefix::{PrefixResolver, PrefixResolverBuilder};
