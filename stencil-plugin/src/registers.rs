//! Render registers
//!
//! A side channel carried through a render, keyed by type. Tags and hooks
//! use it to share state that is not visible to the template itself.

use std::any::{Any, TypeId};
use std::collections::{BTreeSet, HashMap};

/// Type-keyed store, one value per type
#[derive(Default)]
pub struct Registers {
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, returning the previous value of the same type
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) -> Option<T> {
        self.values
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    pub fn get_mut<T: Any + Send + Sync>(&mut self) -> Option<&mut T> {
        self.values
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut::<T>())
    }

    pub fn remove<T: Any + Send + Sync>(&mut self) -> Option<T> {
        self.values
            .remove(&TypeId::of::<T>())
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Debug for Registers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registers").field("len", &self.values.len()).finish()
    }
}

/// Prefixed tag names allowed to render normally
///
/// Lives in [`Registers`]. When the register is absent, no prefixed tag is
/// enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnabledTags {
    names: BTreeSet<String>,
}

impl EnabledTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn enable(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn disable(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> Extend<S> for EnabledTags {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.names.extend(iter.into_iter().map(Into::into));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Counter(u32);

    #[test]
    fn test_insert_and_get_by_type() {
        let mut regs = Registers::new();
        assert!(regs.insert(Counter(1)).is_none());
        assert_eq!(regs.insert(Counter(2)), Some(Counter(1)));
        assert_eq!(regs.get::<Counter>(), Some(&Counter(2)));
        assert!(regs.get::<EnabledTags>().is_none());
    }

    #[test]
    fn test_get_mut_and_remove() {
        let mut regs = Registers::new();
        regs.insert(Counter(0));
        if let Some(c) = regs.get_mut::<Counter>() {
            c.0 += 5;
        }
        assert_eq!(regs.remove::<Counter>(), Some(Counter(5)));
        assert!(!regs.contains::<Counter>());
        assert!(regs.is_empty());
    }

    #[test]
    fn test_enabled_tags() {
        let mut tags = EnabledTags::from_names(["mk_paragraph"]);
        assert!(tags.is_enabled("mk_paragraph"));
        assert!(!tags.is_enabled("mk_newline"));

        tags.enable("mk_newline");
        tags.extend(["other_tag"]);
        assert_eq!(tags.len(), 3);

        assert!(tags.disable("mk_paragraph"));
        assert!(!tags.disable("mk_paragraph"));
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["mk_newline", "other_tag"]);
    }
}
