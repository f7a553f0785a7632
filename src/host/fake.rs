//! In-Memory Item Store
//!
//! Test double with the same observable contract as the live scene store:
//! updates apply to the stored items, not to any reference the caller
//! holds, so the refetch-after-mutate requirement is exercised for real.

use std::cell::{Cell, RefCell};

use super::ItemStore;
use crate::models::{layer, GridInfo, ImageContent, Item, ItemKind, Vector2};

pub struct FakeStore {
    items: RefCell<Vec<Item>>,
    dpi: Cell<f64>,
}

impl FakeStore {
    pub fn new(dpi: f64) -> Self {
        Self {
            items: RefCell::new(Vec::new()),
            dpi: Cell::new(dpi),
        }
    }

    pub fn insert(&self, item: Item) -> String {
        let id = item.id.clone();
        self.items.borrow_mut().push(item);
        id
    }

    pub fn get(&self, id: &str) -> Option<Item> {
        self.items.borrow().iter().find(|item| item.id == id).cloned()
    }

    pub fn all(&self) -> Vec<Item> {
        self.items.borrow().clone()
    }

    pub fn set_dpi(&self, dpi: f64) {
        self.dpi.set(dpi);
    }
}

impl ItemStore for FakeStore {
    async fn items(&self) -> Result<Vec<Item>, String> {
        Ok(self.items.borrow().clone())
    }

    async fn add_items(&self, items: Vec<Item>) -> Result<(), String> {
        self.items.borrow_mut().extend(items);
        Ok(())
    }

    async fn update_items<F>(&self, targets: &[Item], mutate: F) -> Result<(), String>
    where
        F: Fn(&mut Item) + 'static,
    {
        let mut items = self.items.borrow_mut();
        for item in items.iter_mut() {
            if targets.iter().any(|target| target.id == item.id) {
                mutate(item);
            }
        }
        Ok(())
    }

    async fn delete_items(&self, ids: &[String]) -> Result<(), String> {
        self.items.borrow_mut().retain(|item| !ids.contains(&item.id));
        Ok(())
    }

    async fn grid_dpi(&self) -> Result<f64, String> {
        Ok(self.dpi.get())
    }
}

/// A character token with a square image authored at the given DPI.
pub fn character_token(image_size: f64, image_dpi: f64, position: Vector2) -> Item {
    let mut token = Item::new(ItemKind::Image)
        .layer(layer::CHARACTER)
        .position(position);
    token.name = "Hero".to_string();
    token.image = Some(ImageContent {
        width: image_size,
        height: image_size,
        url: "https://example.invalid/hero.png".to_string(),
        mime: "image/png".to_string(),
    });
    token.grid = Some(GridInfo {
        dpi: image_dpi,
        offset: Vector2::new(image_size / 2.0, image_size / 2.0),
    });
    token
}
