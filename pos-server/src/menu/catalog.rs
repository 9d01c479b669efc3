//! 菜单目录 (只读)

use rust_decimal::Decimal;
use shared::models::MenuItem;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::lifecycle::money::MAX_PRICE;

/// Menu shipped with the binary
const EMBEDDED_MENU: &str = include_str!("../../assets/menu.json");

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Failed to read menu file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse menu: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate menu item id: {0}")]
    DuplicateId(i64),

    #[error("Invalid menu item {id}: {reason}")]
    Invalid { id: i64, reason: String },
}

/// Static menu, loaded once per process
#[derive(Debug, Clone)]
pub struct MenuCatalog {
    items: Vec<MenuItem>,
    index: HashMap<i64, usize>,
}

impl MenuCatalog {
    /// Load the embedded menu, or the JSON file at `path` when given
    pub fn load(path: Option<&Path>) -> Result<Self, MenuError> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                let catalog = Self::from_json(&raw)?;
                tracing::info!(path = %path.display(), items = catalog.len(), "Menu loaded");
                Ok(catalog)
            }
            None => Self::embedded(),
        }
    }

    pub fn embedded() -> Result<Self, MenuError> {
        Self::from_json(EMBEDDED_MENU)
    }

    pub fn from_json(raw: &str) -> Result<Self, MenuError> {
        let items: Vec<MenuItem> = serde_json::from_str(raw)?;
        Self::from_items(items)
    }

    pub fn from_items(items: Vec<MenuItem>) -> Result<Self, MenuError> {
        let mut index = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            if item.name.trim().is_empty() {
                return Err(MenuError::Invalid {
                    id: item.id,
                    reason: "empty name".to_string(),
                });
            }
            if item.price < Decimal::ZERO {
                return Err(MenuError::Invalid {
                    id: item.id,
                    reason: "negative price".to_string(),
                });
            }
            if item.price > MAX_PRICE {
                return Err(MenuError::Invalid {
                    id: item.id,
                    reason: format!("price {} above {}", item.price, MAX_PRICE),
                });
            }
            if index.insert(item.id, pos).is_some() {
                return Err(MenuError::DuplicateId(item.id));
            }
        }
        Ok(Self { items, index })
    }

    pub fn get(&self, id: i64) -> Option<&MenuItem> {
        self.index.get(&id).map(|&pos| &self.items[pos])
    }

    pub fn all(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for item in &self.items {
            if !seen.contains(&item.category.as_str()) {
                seen.push(&item.category);
            }
        }
        seen
    }

    pub fn by_category(&self, category: &str) -> Vec<&MenuItem> {
        self.items
            .iter()
            .filter(|item| item.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Case-insensitive name search, optionally within one category
    ///
    /// A blank query matches every item.
    pub fn search(&self, query: Option<&str>, category: Option<&str>) -> Vec<&MenuItem> {
        let needle = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        self.items
            .iter()
            .filter(|item| category.is_none_or(|c| item.category.eq_ignore_ascii_case(c)))
            .filter(|item| {
                needle
                    .as_deref()
                    .is_none_or(|n| item.name.to_lowercase().contains(n))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_menu_loads() {
        let catalog = MenuCatalog::embedded().unwrap();
        assert!(!catalog.is_empty());

        let paneer = catalog.get(1).unwrap();
        assert_eq!(paneer.name, "Paneer Tikka");
        assert_eq!(paneer.price, Decimal::from(180));
        assert!(catalog.get(9999).is_none());
    }

    #[test]
    fn test_categories_first_seen_order() {
        let catalog = MenuCatalog::embedded().unwrap();
        let categories = catalog.categories();
        assert_eq!(categories.first(), Some(&"starters"));
        let mut deduped = categories.clone();
        deduped.dedup();
        assert_eq!(deduped.len(), categories.len());
    }

    #[test]
    fn test_search_by_name_and_category() {
        let catalog = MenuCatalog::embedded().unwrap();

        let naan: Vec<_> = catalog.search(Some("NAAN"), None);
        assert!(naan.len() >= 2);
        assert!(naan.iter().all(|i| i.name.to_lowercase().contains("naan")));

        let paneer_main = catalog.search(Some("paneer"), Some("main course"));
        assert_eq!(paneer_main.len(), 1);
        assert_eq!(paneer_main[0].name, "Paneer Butter Masala");

        assert_eq!(catalog.search(Some("  "), None).len(), catalog.len());
        assert!(catalog.search(Some("pizza"), None).is_empty());
    }

    #[test]
    fn test_by_category() {
        let catalog = MenuCatalog::embedded().unwrap();
        let desserts = catalog.by_category("desserts");
        assert!(!desserts.is_empty());
        assert!(desserts.iter().all(|i| i.category == "desserts"));
        assert!(catalog.by_category("unknown").is_empty());
    }

    #[test]
    fn test_rejects_price_above_order_cap() {
        let raw = r#"[
            {"id": 1, "name": "A", "price": 1000000, "category": "x"},
            {"id": 2, "name": "Gold Leaf Platter", "price": 1000000.01, "category": "x"}
        ]"#;
        assert!(matches!(
            MenuCatalog::from_json(raw),
            Err(MenuError::Invalid { id: 2, .. })
        ));

        // At the cap is still orderable
        let raw = r#"[{"id": 1, "name": "A", "price": 1000000, "category": "x"}]"#;
        let catalog = MenuCatalog::from_json(raw).unwrap();
        assert_eq!(catalog.get(1).unwrap().price, MAX_PRICE);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let raw = r#"[
            {"id": 1, "name": "A", "price": 1, "category": "x"},
            {"id": 1, "name": "B", "price": 2, "category": "x"}
        ]"#;
        assert!(matches!(
            MenuCatalog::from_json(raw),
            Err(MenuError::DuplicateId(1))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.json");
        std::fs::write(
            &path,
            r#"[{"id": 7, "name": "Filter Coffee", "price": 35.5, "category": "beverages"}]"#,
        )
        .unwrap();

        let catalog = MenuCatalog::load(Some(&path)).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(7).unwrap().price, Decimal::new(355, 1));
    }
}
