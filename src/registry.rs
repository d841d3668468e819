use std::collections::HashMap;

use attrmap::AttributeId;

use crate::error::RegistryError;

/// Snapshot of an [AttributeRegistry]'s size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryMetrics {
    pub registered: usize,
    pub next_id: u32,
}

/// A bidirectional table between attribute names and [AttributeId]s.
///
/// Every registry starts out with the [built-in](AttributeId::BUILTIN) names, so that
/// [AttributeId::POSITION] and friends mean the same thing everywhere. Further names are assigned
/// ids sequentially on first registration and keep them until [reset](Self::reset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRegistry {
    ids: HashMap<String, AttributeId>,
    /// Indexed by id.
    names: Vec<String>,
}

impl Default for AttributeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeRegistry {
    /// Longest accepted name, in characters, before trimming.
    pub const MAX_NAME_LEN: usize = 32;

    pub fn new() -> Self {
        let mut res = Self {
            ids: HashMap::with_capacity(AttributeId::BUILTIN.len()),
            names: Vec::with_capacity(AttributeId::BUILTIN.len()),
        };
        res.register_builtins();
        res
    }

    fn register_builtins(&mut self) {
        for (i, name) in AttributeId::BUILTIN.iter().enumerate() {
            let id = AttributeId(i as u32);
            self.ids.insert((*name).to_owned(), id);
            self.names.push((*name).to_owned());
        }
    }

    fn validate(name: &str) -> Result<&str, RegistryError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        let len = name.chars().count();
        if len > Self::MAX_NAME_LEN {
            return Err(RegistryError::NameTooLong {
                len,
                max: Self::MAX_NAME_LEN,
            });
        }
        if name.contains('\0') {
            return Err(RegistryError::NulInName);
        }
        Ok(trimmed)
    }

    /// Get the id of `name`, registering it if it's new.
    ///
    /// Leading and trailing whitespace is ignored.
    pub fn register(&mut self, name: &str) -> Result<AttributeId, RegistryError> {
        let name = Self::validate(name)?;
        if let Some(&id) = self.ids.get(name) {
            return Ok(id);
        }
        let id = u32::try_from(self.names.len())
            .map(AttributeId)
            .map_err(|_| RegistryError::Exhausted)?;
        self.ids.insert(name.to_owned(), id);
        self.names.push(name.to_owned());
        tracing::debug!(attribute = name, %id, "registered attribute name");
        Ok(id)
    }

    /// The id of a registered name.
    pub fn id(&self, name: &str) -> Option<AttributeId> {
        self.ids.get(name.trim()).copied()
    }

    /// The name of a registered id.
    pub fn name(&self, id: AttributeId) -> Option<&str> {
        self.names.get(id.get() as usize).map(String::as_str)
    }

    #[inline]
    pub fn is_registered_id(&self, id: AttributeId) -> bool {
        (id.get() as usize) < self.names.len()
    }

    #[inline]
    pub fn is_registered_name(&self, name: &str) -> bool {
        self.id(name).is_some()
    }

    /// Registered names, in id order.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    pub fn ids(&self) -> impl ExactSizeIterator<Item = AttributeId> {
        (0..self.names.len() as u32).map(AttributeId)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false`; the built-in names can't be unregistered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn metrics(&self) -> RegistryMetrics {
        RegistryMetrics {
            registered: self.names.len(),
            next_id: self.names.len() as u32,
        }
    }

    /// Check that both directions of the table agree.
    pub fn validate_integrity(&self) -> bool {
        self.ids.len() == self.names.len()
            && self
                .names
                .iter()
                .enumerate()
                .all(|(i, name)| self.ids.get(name) == Some(&AttributeId(i as u32)))
    }

    /// Forget every name except the built-ins.
    pub fn reset(&mut self) {
        self.ids.clear();
        self.names.clear();
        self.register_builtins();
        tracing::debug!("reset attribute registry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_stable() {
        let reg = AttributeRegistry::new();
        assert_eq!(reg.id("Position"), Some(AttributeId::POSITION));
        assert_eq!(reg.id("Normal"), Some(AttributeId::NORMAL));
        assert_eq!(reg.id("UV3"), Some(AttributeId::UV3));
        assert_eq!(reg.id("BlendIndices"), Some(AttributeId::BLEND_INDICES));
        assert_eq!(reg.name(AttributeId::BONE_WEIGHTS), Some("BoneWeights"));
        assert_eq!(reg.len(), AttributeId::BUILTIN.len());
        assert!(reg.validate_integrity());
    }

    #[test]
    fn register_and_reset() {
        let mut reg = AttributeRegistry::new();
        let heat = reg.register("  Heat ").unwrap();
        assert_eq!(heat, AttributeId(14));
        assert_eq!(reg.register("Heat"), Ok(heat));
        assert_eq!(reg.register("Normal"), Ok(AttributeId::NORMAL));
        assert!(reg.is_registered_name(" Heat"));
        assert!(reg.is_registered_id(heat));
        assert_eq!(
            reg.metrics(),
            RegistryMetrics {
                registered: 15,
                next_id: 15
            }
        );

        reg.reset();
        assert!(!reg.is_registered_name("Heat"));
        assert!(!reg.is_registered_id(heat));
        assert_eq!(reg.id("Position"), Some(AttributeId::POSITION));
        assert_eq!(reg.register("Mass"), Ok(AttributeId(14)));
        assert!(reg.validate_integrity());
    }

    #[test]
    fn invalid_names() {
        let mut reg = AttributeRegistry::new();
        assert_eq!(reg.register(""), Err(RegistryError::EmptyName));
        assert_eq!(reg.register(" \t"), Err(RegistryError::EmptyName));
        assert_eq!(
            reg.register(&"x".repeat(33)),
            Err(RegistryError::NameTooLong { len: 33, max: 32 })
        );
        assert!(reg.register(&"x".repeat(32)).is_ok());
        assert_eq!(reg.register("a\0b"), Err(RegistryError::NulInName));
        assert_eq!(reg.len(), AttributeId::BUILTIN.len() + 1);
    }
}
