//! # Primitive Registry
//!
//! Maps primitive kind names to their static [`PrimitiveKind`] descriptors.
//! The built-in catalog is a compile-time perfect hash map; a
//! [`PrimitiveRegistry`] starts from it (or from nothing) and may have more
//! kinds registered on top.

use std::collections::HashMap;

use phf::phf_map;

use super::error::RenderModeError;
use super::primitive::PrimitiveKind;
use super::primitives::{buried, depth, overlay};

/// Every primitive kind available to render modes out of the box.
pub static BUILTIN_PRIMITIVES: phf::Map<&'static str, &'static PrimitiveKind> = phf_map! {
    "buried" => &buried::BURIED,
    "depth" => &depth::DEPTH,
    "overlay" => &overlay::OVERLAY,
};

/// Name → kind lookup used while building render modes.
///
/// # Examples
///
/// ```
/// use voxel_rendermodes::rendermodes::PrimitiveRegistry;
///
/// let registry = PrimitiveRegistry::builtin();
/// assert!(registry.lookup("depth").is_ok());
/// assert!(registry.lookup("Depth").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PrimitiveRegistry {
    kinds: HashMap<&'static str, &'static PrimitiveKind>,
}

impl PrimitiveRegistry {
    /// A registry holding no kinds at all.
    pub fn empty() -> Self {
        Self {
            kinds: HashMap::new(),
        }
    }

    /// A registry holding the [`BUILTIN_PRIMITIVES`].
    pub fn builtin() -> Self {
        Self {
            kinds: BUILTIN_PRIMITIVES
                .entries()
                .map(|(name, kind)| (*name, *kind))
                .collect(),
        }
    }

    /// A registry holding exactly `kinds`.
    ///
    /// # Errors
    /// [`RenderModeError::DuplicateKind`] if two kinds share a name.
    pub fn with_kinds(
        kinds: impl IntoIterator<Item = &'static PrimitiveKind>,
    ) -> Result<Self, RenderModeError> {
        let mut registry = Self::empty();
        for kind in kinds {
            registry.register(kind)?;
        }
        Ok(registry)
    }

    /// Adds `kind` under its own name.
    ///
    /// # Errors
    /// [`RenderModeError::DuplicateKind`] if the name is already taken.
    pub fn register(&mut self, kind: &'static PrimitiveKind) -> Result<(), RenderModeError> {
        if self.kinds.contains_key(kind.name) {
            return Err(RenderModeError::DuplicateKind(kind.name));
        }
        self.kinds.insert(kind.name, kind);
        Ok(())
    }

    /// Finds the kind registered under exactly `name`.
    ///
    /// # Errors
    /// [`RenderModeError::NotFound`] if there is none.
    pub fn lookup(&self, name: &str) -> Result<&'static PrimitiveKind, RenderModeError> {
        self.kinds
            .get(name)
            .copied()
            .ok_or_else(|| RenderModeError::NotFound(name.to_owned()))
    }

    /// Registered kind names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.kinds.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered kinds.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns `true` if no kind is registered.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for PrimitiveRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
