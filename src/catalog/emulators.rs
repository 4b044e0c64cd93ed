//! Emulator catalog
//!
//! The catalog is a small JSON document published next to the skins bundle:
//!
//! ```json
//! { "vendors": [ { "name": "Google", "products": [
//!     { "id": "pixel_4a", "name": "Pixel 4a", "display": "5.81\"",
//!       "resolution": "1080x2340", "skin": "pixel_4a" } ] } ] }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ProvisionError, Result};
use crate::selector::Candidates;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmulatorCatalog {
    #[serde(default)]
    pub vendors: Vec<EmulatorVendor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmulatorVendor {
    pub name: String,
    #[serde(default)]
    pub products: Vec<EmulatorProduct>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmulatorProduct {
    pub id: String,
    pub name: String,
    pub display: String,
    /// `WIDTHxHEIGHT` in pixels
    pub resolution: String,
    pub skin: String,
}

impl EmulatorCatalog {
    /// Deserialize the catalog fetched from `url`
    pub fn from_json(url: &str, body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| ProvisionError::CatalogParseFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Vendors sorted by name, each with products sorted by id, for display
    pub fn sorted_vendors(&self) -> Vec<EmulatorVendor> {
        let mut vendors = self.vendors.clone();
        vendors.sort_by(|a, b| a.name.cmp(&b.name));
        for vendor in &mut vendors {
            vendor.products.sort_by(|a, b| a.id.cmp(&b.id));
        }
        vendors
    }

    /// Build the id-keyed product index, rejecting ids that appear twice
    pub fn index(&self) -> Result<ProductIndex> {
        let mut products = BTreeMap::new();
        for product in self.vendors.iter().flat_map(|v| v.products.iter()) {
            if products
                .insert(product.id.clone(), product.clone())
                .is_some()
            {
                return Err(ProvisionError::DuplicateProduct {
                    id: product.id.clone(),
                });
            }
        }
        Ok(ProductIndex { products })
    }
}

/// Products keyed by id; ids are unique by construction
#[derive(Debug, Clone, Default)]
pub struct ProductIndex {
    products: BTreeMap<String, EmulatorProduct>,
}

impl ProductIndex {
    pub fn get(&self, id: &str) -> Option<&EmulatorProduct> {
        self.products.get(id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Candidates for ProductIndex {
    fn contains_key(&self, key: &str) -> bool {
        self.products.contains_key(key)
    }
}
