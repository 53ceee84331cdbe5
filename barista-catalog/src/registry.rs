use crate::beverage::{Beverage, BeverageCategory, BeverageKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One registered menu entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BeverageSpec {
    pub id: u32,
    pub kind: BeverageKind,
    pub name: String,
    pub base_price: Decimal,
    pub category: BeverageCategory,
    pub available: bool,
}

/// Immutable kind -> beverage registry, populated once at startup.
///
/// Keeps a per-category default so callers can ask for "a coffee" without
/// naming the drink.
pub struct BeverageRegistry {
    entries: HashMap<BeverageKind, BeverageSpec>,
    category_defaults: HashMap<BeverageCategory, BeverageKind>,
}

impl BeverageRegistry {
    /// Build the standard ten-drink café registry
    pub fn standard() -> Self {
        let seed: [(BeverageKind, &str, i64); 10] = [
            (BeverageKind::Espresso, "Espresso", 200),
            (BeverageKind::Coffee, "Coffee", 250),
            (BeverageKind::Cappuccino, "Cappuccino", 300),
            (BeverageKind::Latte, "Latte", 350),
            (BeverageKind::Tea, "Tea", 200),
            (BeverageKind::Beer, "Beer", 350),
            (BeverageKind::Wine, "Wine", 450),
            (BeverageKind::CocaCola, "CocaCola", 250),
            (BeverageKind::Juice, "Juice", 280),
            (BeverageKind::Water, "Water", 100),
        ];

        let entries = seed
            .iter()
            .enumerate()
            .map(|(i, (kind, name, cents))| {
                (
                    *kind,
                    BeverageSpec {
                        id: i as u32 + 1,
                        kind: *kind,
                        name: (*name).to_string(),
                        base_price: Decimal::new(*cents, 2),
                        category: kind.category(),
                        available: true,
                    },
                )
            })
            .collect();

        let mut category_defaults = HashMap::new();
        category_defaults.insert(BeverageCategory::Coffee, BeverageKind::Coffee);
        category_defaults.insert(BeverageCategory::Tea, BeverageKind::Tea);
        category_defaults.insert(BeverageCategory::Beer, BeverageKind::Beer);
        category_defaults.insert(BeverageCategory::Other, BeverageKind::Water);

        Self {
            entries,
            category_defaults,
        }
    }

    /// Build a registry from explicit entries; an empty set is a startup
    /// configuration error.
    pub fn with_entries(specs: Vec<BeverageSpec>) -> Result<Self, CatalogError> {
        if specs.is_empty() {
            return Err(CatalogError::EmptyRegistry);
        }

        let mut entries = HashMap::new();
        let mut category_defaults: HashMap<BeverageCategory, BeverageKind> = HashMap::new();
        for spec in specs {
            category_defaults.entry(spec.category).or_insert(spec.kind);
            entries.insert(spec.kind, spec);
        }

        Ok(Self {
            entries,
            category_defaults,
        })
    }

    /// Create the default beverage of a category
    pub fn create(&self, category: BeverageCategory) -> Result<Beverage, CatalogError> {
        let kind = self
            .category_defaults
            .get(&category)
            .ok_or_else(|| CatalogError::UnknownCategory(format!("{:?}", category)))?;
        self.create_kind(*kind)
    }

    /// Create a beverage value for a concrete drink
    pub fn create_kind(&self, kind: BeverageKind) -> Result<Beverage, CatalogError> {
        let spec = self
            .entries
            .get(&kind)
            .ok_or_else(|| CatalogError::UnknownBeverage(format!("{:?}", kind)))?;

        Ok(Beverage {
            name: spec.name.clone(),
            base_price: spec.base_price,
            category: spec.category,
        })
    }

    pub fn get(&self, kind: BeverageKind) -> Option<&BeverageSpec> {
        self.entries.get(&kind)
    }

    pub fn get_by_id(&self, id: u32) -> Option<&BeverageSpec> {
        self.entries.values().find(|spec| spec.id == id)
    }

    /// All entries ordered by menu id
    pub fn entries(&self) -> Vec<&BeverageSpec> {
        let mut specs: Vec<&BeverageSpec> = self.entries.values().collect();
        specs.sort_by_key(|spec| spec.id);
        specs
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for BeverageRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Unknown beverage category: {0}")]
    UnknownCategory(String),

    #[error("Unknown beverage: {0}")]
    UnknownBeverage(String),

    #[error("Beverage registry is empty")]
    EmptyRegistry,
}
