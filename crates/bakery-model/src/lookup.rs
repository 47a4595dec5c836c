use std::collections::HashMap;

/// Case-insensitive column name lookup that preserves the original spelling.
#[derive(Debug, Clone, Default)]
pub struct CaseInsensitiveLookup {
    map: HashMap<String, String>,
}

impl CaseInsensitiveLookup {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for name in names {
            let name = name.as_ref();
            let key = name.trim().to_ascii_lowercase();
            map.entry(key).or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map
            .get(&name.trim().to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the first alias present in the lookup, in alias order.
    pub fn resolve(&self, aliases: &[&str]) -> Option<&str> {
        aliases.iter().find_map(|alias| self.get(alias))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_first_matching_alias() {
        let lookup = CaseInsensitiveLookup::new(["Cookie_SKU", "product_name", " price "]);
        assert_eq!(
            lookup.resolve(&["cookie_sku", "product_sku", "sku"]),
            Some("Cookie_SKU")
        );
        assert_eq!(lookup.get("PRICE"), Some(" price "));
        assert!(!lookup.contains("category"));
        assert_eq!(lookup.resolve(&["category"]), None);
    }
}
