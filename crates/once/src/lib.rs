//! Append-only vectors.
//!
//! A [`OnceVec`] may be read by many threads while a single writer appends to
//! its end. Once an entry is written it is never moved or removed; this is
//! exactly the growth pattern of `ResolutionLevel` state in this crate (new
//! (s, t) slices are appended, older ones are read-only forever after).
//!
//! [`OnceBiVec`] is the same thing indexed from an arbitrary starting index
//! (internal degree `t` is rarely zero-based).

use std::sync::RwLock;

/// An append-only vector. Pushing requires only `&self`; reading is also
/// `&self`. There is no way to remove or overwrite an entry once pushed.
pub struct OnceVec<T> {
    data: RwLock<Vec<T>>,
}

impl<T> OnceVec<T> {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(Vec::new()),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: RwLock::new(Vec::with_capacity(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.data.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn reserve(&self, additional: usize) {
        self.data.write().unwrap().reserve(additional);
    }

    /// Append `value`, returning its index.
    pub fn push(&self, value: T) -> usize {
        let mut data = self.data.write().unwrap();
        data.push(value);
        data.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<T>
    where
        T: Clone,
    {
        self.data.read().unwrap().get(index).cloned()
    }

    /// Run `f` on the entry at `index`, returning `None` if out of bounds.
    pub fn with<R>(&self, index: usize, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.data.read().unwrap().get(index).map(f)
    }

    /// Like [`OnceVec::get`] but panics on an out-of-bounds index. Entries
    /// are never removed once pushed, so a successful lookup stays valid
    /// forever; callers that already know `index < self.len()` use this to
    /// avoid threading an `Option` through.
    pub fn at(&self, index: usize) -> T
    where
        T: Clone,
    {
        self.get(index)
            .unwrap_or_else(|| panic!("OnceVec index {index} out of bounds"))
    }

    pub fn last(&self) -> Option<T>
    where
        T: Clone,
    {
        self.data.read().unwrap().last().cloned()
    }

    /// Snapshot the current contents. Intended for save/load and tests, not
    /// the hot path.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.data.read().unwrap().clone()
    }
}

impl<T> Default for OnceVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for OnceVec<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_inner().unwrap().into_iter()
    }
}

/// A [`OnceVec`] indexed starting from `min_degree` rather than `0`.
pub struct OnceBiVec<T> {
    data: OnceVec<T>,
    min_degree: i32,
}

impl<T> OnceBiVec<T> {
    pub fn new(min_degree: i32) -> Self {
        Self {
            data: OnceVec::new(),
            min_degree,
        }
    }

    pub fn min_degree(&self) -> i32 {
        self.min_degree
    }

    /// One past the largest degree that has been pushed; matches the
    /// convention `len() == min_degree + number_of_pushed_entries`.
    pub fn len(&self) -> i32 {
        self.min_degree + self.data.len() as i32
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn push(&self, value: T) -> i32 {
        self.min_degree + self.data.push(value) as i32
    }

    pub fn get(&self, degree: i32) -> Option<T>
    where
        T: Clone,
    {
        if degree < self.min_degree {
            return None;
        }
        self.data.get((degree - self.min_degree) as usize)
    }

    pub fn at(&self, degree: i32) -> T
    where
        T: Clone,
    {
        self.get(degree)
            .unwrap_or_else(|| panic!("OnceBiVec index {degree} out of bounds"))
    }

    pub fn with<R>(&self, degree: i32, f: impl FnOnce(&T) -> R) -> Option<R> {
        if degree < self.min_degree {
            return None;
        }
        self.data.with((degree - self.min_degree) as usize, f)
    }
}

#[cfg(feature = "save")]
mod save_impl {
    use super::{OnceBiVec, OnceVec};
    use saveload::{Load, Save};
    use std::io::{self, Read, Write};

    impl<T: Save + Clone> Save for OnceVec<T> {
        fn save(&self, buffer: &mut impl Write) -> io::Result<()> {
            self.to_vec().save(buffer)
        }
    }

    impl<T: Load> Load for OnceVec<T> {
        type AuxData = T::AuxData;

        fn load(buffer: &mut impl Read, data: &Self::AuxData) -> io::Result<Self> {
            let v: Vec<T> = Vec::load(buffer, data)?;
            let result = OnceVec::with_capacity(v.len());
            for x in v {
                result.push(x);
            }
            Ok(result)
        }
    }

    impl<T: Save + Clone> Save for OnceBiVec<T> {
        fn save(&self, buffer: &mut impl Write) -> io::Result<()> {
            self.min_degree.save(buffer)?;
            self.data.save(buffer)
        }
    }

    impl<T: Load> Load for OnceBiVec<T> {
        type AuxData = T::AuxData;

        fn load(buffer: &mut impl Read, data: &Self::AuxData) -> io::Result<Self> {
            let min_degree = i32::load(buffer, &())?;
            let inner = OnceVec::load(buffer, data)?;
            Ok(OnceBiVec {
                data: inner,
                min_degree,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_read() {
        let v: OnceVec<i32> = OnceVec::new();
        assert_eq!(v.push(10), 0);
        assert_eq!(v.push(20), 1);
        assert_eq!(v.at(0), 10);
        assert_eq!(v.at(1), 20);
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn bivec_offset() {
        let v: OnceBiVec<i32> = OnceBiVec::new(-2);
        v.push(1);
        v.push(2);
        assert_eq!(v.at(-2), 1);
        assert_eq!(v.at(-1), 2);
        assert_eq!(v.len(), 0);
    }
}
