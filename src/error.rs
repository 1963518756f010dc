//! The four recoverable/reportable error kinds of the resolver. Invariant
//! violations are deliberately not a variant here: a bit-width overflow, a
//! non-divisible divide, or a non-disjoint `lead_product` is a programming
//! error inside a slice and panics, matching the teacher's and the original
//! engine's fail-fast treatment of "this should be impossible" states rather
//! than threading them through `Result`.

use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ResolverError {
    /// A relation referenced a generator that doesn't exist, or its stated
    /// degree is inconsistent with the generator it multiplies.
    Presentation { detail: String },
    /// Minting the next generator would overflow the `v`-field width or
    /// exceed what `X_MAX` supports at the requested `t_max`.
    CapacityExceeded { s: u32, t: i32, detail: String },
    /// The persistence sink failed; the last committed slice is intact.
    Persistence { source: Box<dyn Error + Send + Sync> },
    /// The cooperative cancel token was observed at a slice boundary.
    Cancelled { s: u32, t: i32 },
}

impl fmt::Display for ResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverError::Presentation { detail } => {
                write!(f, "invalid module presentation: {detail}")
            }
            ResolverError::CapacityExceeded { s, t, detail } => {
                write!(f, "capacity exceeded at (s={s}, t={t}): {detail}")
            }
            ResolverError::Persistence { source } => {
                write!(f, "persistence sink error: {source}")
            }
            ResolverError::Cancelled { s, t } => {
                write!(f, "cancelled at (s={s}, t={t})")
            }
        }
    }
}

impl Error for ResolverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ResolverError::Persistence { source } => Some(source.as_ref()),
            _ => None,
        }
    }
}
