//! Named sprites, one map per category.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use beam_engine::scene::Sprite;
use enum_map::{Enum, EnumMap};
use thiserror::Error;

/// Closed set of sprite classes; each has its own name-to-sprite map.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Enum)]
pub enum Category {
    RedBucket,
    GreenBucket,
    Wall,
    RedBrick,
    GreenBrick,
    BlackBrick,
    Laser,
    Mirror,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::RedBucket,
        Category::GreenBucket,
        Category::Wall,
        Category::RedBrick,
        Category::GreenBrick,
        Category::BlackBrick,
        Category::Laser,
        Category::Mirror,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::RedBucket => "red_bucket",
            Category::GreenBucket => "green_bucket",
            Category::Wall => "wall",
            Category::RedBrick => "red_brick",
            Category::GreenBrick => "green_brick",
            Category::BlackBrick => "black_brick",
            Category::Laser => "laser",
            Category::Mirror => "mirror",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown sprite category '{0}'")]
    UnknownCategory(String),

    #[error("no sprite '{name}' in category {category}")]
    NotFound { category: Category, name: String },
}

#[derive(Debug, Default)]
pub struct SpriteCatalog {
    maps: EnumMap<Category, BTreeMap<String, Sprite>>,
}

impl SpriteCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts under `sprite.name`, returning the sprite it replaced.
    pub fn insert(&mut self, category: Category, sprite: Sprite) -> Option<Sprite> {
        self.maps[category].insert(sprite.name.clone(), sprite)
    }

    pub fn lookup(&self, category: Category, name: &str) -> Result<&Sprite, CatalogError> {
        self.maps[category]
            .get(name)
            .ok_or_else(|| not_found(category, name))
    }

    pub fn lookup_mut(&mut self, category: Category, name: &str) -> Result<&mut Sprite, CatalogError> {
        self.maps[category]
            .get_mut(name)
            .ok_or_else(|| not_found(category, name))
    }

    /// Mutates one sprite in place.
    pub fn update<F>(&mut self, category: Category, name: &str, f: F) -> Result<(), CatalogError>
    where
        F: FnOnce(&mut Sprite),
    {
        f(self.lookup_mut(category, name)?);
        Ok(())
    }

    /// Number of sprites in `category`.
    pub fn len(&self, category: Category) -> usize {
        self.maps[category].len()
    }

    pub fn total(&self) -> usize {
        self.maps.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Sprites of `category` in name order.
    pub fn iter(&self, category: Category) -> impl Iterator<Item = &Sprite> {
        self.maps[category].values()
    }
}

fn not_found(category: Category, name: &str) -> CatalogError {
    CatalogError::NotFound {
        category,
        name: name.to_string(),
    }
}
