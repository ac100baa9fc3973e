use std::collections::BTreeMap;

/// 預設追蹤的串流服務 (Watchmode 的 BR 區域 source id)
const BUILTIN_SERVICES: &[(u32, &str)] = &[
    (203, "Netflix"),
    (457, "Max (HBO)"),
    (26, "Prime Video"),
    (372, "Disney+"),
    (371, "Apple TV+"),
    (368, "Apple TV (Aluguel/iTunes)"),
    (444, "Mubi"),
];

/// Provider id → display name lookup, fixed once the run starts.
///
/// There are no mutating methods: a registry is either the built-in table or
/// one built from config entries, and it is shared by reference afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRegistry {
    services: BTreeMap<u32, String>,
}

impl ServiceRegistry {
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_SERVICES
                .iter()
                .map(|(id, name)| (*id, name.to_string())),
        )
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (u32, String)>,
    {
        Self {
            services: entries.into_iter().collect(),
        }
    }

    pub fn name_of(&self, provider_id: u32) -> Option<&str> {
        self.services.get(&provider_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_lookup() {
        let registry = ServiceRegistry::builtin();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.name_of(203), Some("Netflix"));
        assert_eq!(registry.name_of(26), Some("Prime Video"));
        assert_eq!(registry.name_of(444), Some("Mubi"));
        assert_eq!(registry.name_of(372), Some("Disney+"));
        assert_eq!(registry.name_of(1), None);
    }

    #[test]
    fn test_custom_entries_replace_builtin_table() {
        let registry = ServiceRegistry::from_entries(vec![(8, "Globoplay".to_string())]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.name_of(8), Some("Globoplay"));
        assert_eq!(registry.name_of(203), None);
    }
}
