use std::collections::HashMap;

/// Name-keyed resource map with strict registration.
///
/// Used for the target registry and the pipeline-local shader table. Names
/// are the only coupling between passes: resolution happens at render time,
/// so a pass can be constructed before its dependencies are registered as
/// long as init order fills the registry first.
pub(crate) struct NamedRegistry<T> {
    entries: HashMap<String, T>,
}

impl<T> NamedRegistry<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers `value` under `name`. Returns false (and keeps the existing
    /// entry) when the name is already taken; overwrite is not permitted.
    pub fn insert(&mut self, name: impl Into<String>, value: T) -> bool {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return false;
        }
        self.entries.insert(name, value);
        true
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_after_insert_returns_registered_value() {
        let mut reg = NamedRegistry::new();
        assert!(reg.insert("back_buffer", 7u32));
        assert_eq!(reg.get("back_buffer"), Some(&7));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut reg = NamedRegistry::new();
        assert!(reg.insert("screen", 1u32));
        assert!(!reg.insert("screen", 2u32));
        // The original registration survives.
        assert_eq!(reg.get("screen"), Some(&1));
    }

    #[test]
    fn missing_name_resolves_to_none() {
        let reg: NamedRegistry<u32> = NamedRegistry::new();
        assert_eq!(reg.get("nope"), None);
        assert!(!reg.contains("nope"));
    }
}
