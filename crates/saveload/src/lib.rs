//! Binary (de)serialization for resolution state.
//!
//! This is the substrate the persistence sink (spec §6) is built from: every
//! piece of state that must survive a resumed run (generators, differentials,
//! critical-pair buffers) implements `Save`/`Load` rather than going through
//! `serde`, so the on-disk format is exactly the little-endian byte layout
//! documented in spec §6, with no intermediate text representation.

mod default_impl;

use std::io::{self, Read, Write};

pub trait Save {
    fn save(&self, buffer: &mut impl Write) -> io::Result<()>
    where
        Self: Sized;
}

pub trait Load: Sized {
    /// Extra data needed to reconstruct `Self` that isn't itself part of the
    /// byte stream (e.g. a shared `Arc<Algebra>` that every module needs a
    /// handle to, but that is only constructed once per process).
    type AuxData;

    fn load(buffer: &mut impl Read, data: &Self::AuxData) -> io::Result<Self>;
}
