pub mod prelude {
    pub use rayon::prelude::{
        IntoParallelIterator as MaybeIntoParallelIterator,
        IntoParallelRefMutIterator as MaybeIntoParallelRefMutIterator, IndexedParallelIterator as MaybeIndexedParallelIterator,
        ParallelIterator as MaybeParallelIterator,
    };
}

pub use rayon::{in_place_scope, join, scope, Scope};
