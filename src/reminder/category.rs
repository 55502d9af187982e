use tracing::info;

use super::store::{read_list, write_list, Storage, CATEGORIES_KEY};

pub const DEFAULT_CATEGORIES: [&str; 5] = ["Work", "Study", "Personal", "Health", "Other"];

pub fn same_category(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

pub struct CategoryCatalog<S: Storage> {
    storage: S,
    custom: Vec<String>,
}

impl<S: Storage> CategoryCatalog<S> {
    pub fn open(storage: S) -> Self {
        let custom: Vec<String> = read_list(&storage, CATEGORIES_KEY);
        let custom = custom.into_iter().filter(|c| !c.trim().is_empty()).collect();
        Self { storage, custom }
    }

    pub fn all(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let names = DEFAULT_CATEGORIES
            .iter()
            .map(|c| c.to_string())
            .chain(self.custom.iter().cloned());
        for name in names {
            if !out.iter().any(|c| same_category(c, &name)) {
                out.push(name);
            }
        }
        out
    }

    pub fn options(&self) -> Vec<String> {
        std::iter::once(String::new()).chain(self.all()).collect()
    }

    /// Add a category. Returns the stored spelling, or `None` for blank input.
    /// An existing name (any case) is returned as already catalogued.
    pub fn add(&mut self, name: &str) -> Option<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(existing) = self
            .all()
            .into_iter()
            .find(|c| same_category(c, trimmed))
        {
            return Some(existing);
        }
        self.custom.push(trimmed.to_string());
        write_list(&mut self.storage, CATEGORIES_KEY, &self.custom);
        info!(category = trimmed, "added category");
        Some(trimmed.to_string())
    }
}
