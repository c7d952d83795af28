//! Fixed-capacity vector used for every persisted array (party, items,
//! statuses, initiative, enemies).
//!
//! Exceeding the capacity is an error, never a resize.

use std::ops::{Deref, Index, IndexMut};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedVec<T, const N: usize> {
    items: Vec<T>,
}

impl<T, const N: usize> BoundedVec<T, N> {
    pub const CAPACITY: usize = N;

    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(N),
        }
    }

    /// Build from a vector, failing if it holds more than `N` entries.
    pub fn try_from_vec(items: Vec<T>, what: &'static str) -> Result<Self, DomainError> {
        if items.len() > N {
            return Err(DomainError::capacity(what, N));
        }
        Ok(Self { items })
    }

    pub fn try_push(&mut self, value: T, what: &'static str) -> Result<(), DomainError> {
        if self.is_full() {
            return Err(DomainError::capacity(what, N));
        }
        self.items.push(value);
        Ok(())
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.items.len() >= N
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn retain(&mut self, f: impl FnMut(&T) -> bool) {
        self.items.retain(f);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn sort_by(&mut self, compare: impl FnMut(&T, &T) -> std::cmp::Ordering) {
        self.items.sort_by(compare);
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T, const N: usize> Default for BoundedVec<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Deref for BoundedVec<T, N> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T, const N: usize> Index<usize> for BoundedVec<T, N> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T, const N: usize> IndexMut<usize> for BoundedVec<T, N> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a BoundedVec<T, N> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Serialize, const N: usize> Serialize for BoundedVec<T, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>, const N: usize> Deserialize<'de> for BoundedVec<T, N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        if items.len() > N {
            return Err(serde::de::Error::custom(format!(
                "expected at most {} entries, got {}",
                N,
                items.len()
            )));
        }
        Ok(Self { items })
    }
}
