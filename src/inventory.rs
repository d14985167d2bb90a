use std::{
    collections::{BTreeMap, btree_map::Entry},
    sync::{Mutex, MutexGuard, PoisonError},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub type ItemId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub brand: Option<String>,
}

/// Partial update, only the fields that are set get written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub brand: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("item id must be greater than 0 and less than 3, got {0}")]
    InvalidItemId(ItemId),
    #[error("Item not found")]
    ItemNotFound,
    #[error("Item ID already exists")]
    ItemExists,
    #[error("Item ID does not exist")]
    ItemMissing,
}

#[derive(Default)]
pub struct Inventory {
    items: Mutex<BTreeMap<ItemId, Item>>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> MutexGuard<'_, BTreeMap<ItemId, Item>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lookups by id only accept ids in the 1..=2 window.
    pub fn get(&self, id: ItemId) -> Result<Item, InventoryError> {
        if !(1..3).contains(&id) {
            return Err(InventoryError::InvalidItemId(id));
        }

        self.items()
            .get(&id)
            .cloned()
            .ok_or(InventoryError::ItemNotFound)
    }

    pub fn find_by_name(&self, name: Option<&str>) -> Result<Item, InventoryError> {
        let Some(name) = name else {
            return Err(InventoryError::ItemNotFound);
        };

        self.items()
            .values()
            .find(|item| item.name == name)
            .cloned()
            .ok_or(InventoryError::ItemNotFound)
    }

    pub fn create(&self, id: ItemId, item: Item) -> Result<Item, InventoryError> {
        let mut items = self.items();
        match items.entry(id) {
            Entry::Occupied(_) => Err(InventoryError::ItemExists),
            Entry::Vacant(entry) => {
                info!("created item {} ({})", id, item.name);
                Ok(entry.insert(item).clone())
            }
        }
    }

    pub fn update(&self, id: ItemId, update: ItemUpdate) -> Result<Item, InventoryError> {
        let mut items = self.items();
        let Some(item) = items.get_mut(&id) else {
            return Err(InventoryError::ItemMissing);
        };

        if let Some(name) = update.name {
            item.name = name;
        }
        if let Some(price) = update.price {
            item.price = price;
        }
        if let Some(brand) = update.brand {
            item.brand = Some(brand);
        }

        info!("updated item {}", id);
        Ok(item.clone())
    }
}
