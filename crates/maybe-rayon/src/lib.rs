//! Swaps between `rayon`'s parallel iterators and a sequential fallback
//! behind the `concurrent` feature, so the resolver's hot loops (critical
//! pair generation, reduction, chain lifting) are written once against
//! [`prelude`] and work single-threaded or multi-threaded without `cfg`
//! blocks at every call site.

#[cfg(not(feature = "concurrent"))]
mod sequential;
#[cfg(not(feature = "concurrent"))]
pub use sequential::*;

#[cfg(feature = "concurrent")]
mod parallel;
#[cfg(feature = "concurrent")]
pub use parallel::*;
