use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Units;

/// A souvenir the machine can hand out.
/// `image` is an opaque resource reference (usually a relative path) that only
/// the presentation layer interprets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub image: String,
}

impl Item {
    pub fn new(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: image.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Catalog has no tiers")]
    Empty,

    #[error("Tier price must be positive")]
    ZeroPrice,

    #[error("Tier {0} has no items")]
    EmptyTier(Units),

    #[error("Tier {0} is defined more than once")]
    DuplicateTier(Units),

    #[error("Invalid catalog file: {0}")]
    Parse(String),
}

/// On-disk shape of a catalog, see `Catalog::from_json_reader`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub tiers: Vec<TierEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierEntry {
    pub price: Units,
    pub items: Vec<Item>,
}

/// Fixed mapping from tier price to the souvenirs sold at that price.
///
/// Every tier has a positive price and at least one item; both are checked on
/// construction and the catalog is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogFile", into = "CatalogFile")]
pub struct Catalog {
    tiers: BTreeMap<Units, Vec<Item>>,
}

impl Catalog {
    /// Build a catalog from `(price, items)` pairs.
    pub fn new<I>(tiers: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (Units, Vec<Item>)>,
    {
        let mut map = BTreeMap::new();
        for (price, items) in tiers {
            if price == 0 {
                return Err(CatalogError::ZeroPrice);
            }
            if items.is_empty() {
                return Err(CatalogError::EmptyTier(price));
            }
            if map.insert(price, items).is_some() {
                return Err(CatalogError::DuplicateTier(price));
            }
        }

        if map.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(Self { tiers: map })
    }

    /// Parse and validate a JSON catalog:
    /// `{"tiers": [{"price": 10, "items": [{"name": "Magnet", "image": "images/magnet.png"}]}]}`
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        serde_json::from_reader(reader).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    /// Items sold at `price`, if such a tier exists.
    pub fn items(&self, price: Units) -> Option<&[Item]> {
        self.tiers.get(&price).map(Vec::as_slice)
    }

    /// Tier prices in ascending order.
    pub fn tiers(&self) -> impl Iterator<Item = Units> + '_ {
        self.tiers.keys().copied()
    }

    /// `(price, items)` pairs in ascending price order.
    pub fn iter(&self) -> impl Iterator<Item = (Units, &[Item])> {
        self.tiers
            .iter()
            .map(|(price, items)| (*price, items.as_slice()))
    }

    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }
}

impl TryFrom<CatalogFile> for Catalog {
    type Error = CatalogError;

    fn try_from(file: CatalogFile) -> Result<Self, Self::Error> {
        Self::new(file.tiers.into_iter().map(|t| (t.price, t.items)))
    }
}

impl From<Catalog> for CatalogFile {
    fn from(catalog: Catalog) -> Self {
        Self {
            tiers: catalog
                .tiers
                .into_iter()
                .map(|(price, items)| TierEntry { price, items })
                .collect(),
        }
    }
}

impl Default for Catalog {
    /// The stock assortment: four tiers of three souvenirs each.
    fn default() -> Self {
        let tier = |names: [&str; 3]| {
            names
                .into_iter()
                .map(|name| {
                    let image = name.to_lowercase().replace('-', "");
                    Item::new(name, format!("images/{image}.png"))
                })
                .collect::<Vec<_>>()
        };

        let mut tiers = BTreeMap::new();
        tiers.insert(10, tier(["Magnet", "Postcard", "Badge"]));
        tiers.insert(20, tier(["Keychain", "Pen", "Notebook"]));
        tiers.insert(30, tier(["Mug", "T-shirt", "Cap"]));
        tiers.insert(40, tier(["Figurine", "Scarf", "Umbrella"]));

        Self { tiers }
    }
}
