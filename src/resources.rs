//! Named asset registry
//!
//! Assets are kept as raw bytes; decoding is the host's business. Lookups for
//! names that were never loaded fail with [`ResourceError::NotFound`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{ResourceError, ResourceKind};

/// Raw asset bytes plus where they came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub name: String,
    pub bytes: Vec<u8>,
}

pub type Font = Asset;
pub type Texture = Asset;
pub type Sound = Asset;

#[derive(Debug, Default)]
pub struct Resources {
    fonts: HashMap<String, Font>,
    textures: HashMap<String, Texture>,
    sounds: HashMap<String, Sound>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, kind: ResourceKind) -> &HashMap<String, Asset> {
        match kind {
            ResourceKind::Font => &self.fonts,
            ResourceKind::Texture => &self.textures,
            ResourceKind::Sound => &self.sounds,
        }
    }

    fn table_mut(&mut self, kind: ResourceKind) -> &mut HashMap<String, Asset> {
        match kind {
            ResourceKind::Font => &mut self.fonts,
            ResourceKind::Texture => &mut self.textures,
            ResourceKind::Sound => &mut self.sounds,
        }
    }

    /// Read `path` and register it under `name`, replacing any previous asset
    pub fn load(&mut self, kind: ResourceKind, name: &str, path: &Path) -> Result<(), ResourceError> {
        let bytes = fs::read(path).map_err(|source| ResourceError::Load {
            kind,
            name: name.to_string(),
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded {kind} {name:?} from {} ({} bytes)", path.display(), bytes.len());
        self.insert(kind, name, bytes);
        Ok(())
    }

    /// Register in-memory bytes
    pub fn insert(&mut self, kind: ResourceKind, name: &str, bytes: Vec<u8>) {
        let asset = Asset {
            name: name.to_string(),
            bytes,
        };
        if self.table_mut(kind).insert(name.to_string(), asset).is_some() {
            log::debug!("Replaced {kind} {name:?}");
        }
    }

    pub fn get(&self, kind: ResourceKind, name: &str) -> Result<&Asset, ResourceError> {
        self.table(kind).get(name).ok_or_else(|| ResourceError::NotFound {
            kind,
            name: name.to_string(),
        })
    }

    pub fn load_font(&mut self, name: &str, path: &Path) -> Result<(), ResourceError> {
        self.load(ResourceKind::Font, name, path)
    }

    pub fn load_texture(&mut self, name: &str, path: &Path) -> Result<(), ResourceError> {
        self.load(ResourceKind::Texture, name, path)
    }

    pub fn load_sound(&mut self, name: &str, path: &Path) -> Result<(), ResourceError> {
        self.load(ResourceKind::Sound, name, path)
    }

    pub fn font(&self, name: &str) -> Result<&Font, ResourceError> {
        self.get(ResourceKind::Font, name)
    }

    pub fn texture(&self, name: &str) -> Result<&Texture, ResourceError> {
        self.get(ResourceKind::Texture, name)
    }

    pub fn sound(&self, name: &str) -> Result<&Sound, ResourceError> {
        self.get(ResourceKind::Sound, name)
    }

    pub fn len(&self) -> usize {
        self.fonts.len() + self.textures.len() + self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every asset
    pub fn clear(&mut self) {
        let count = self.len();
        self.fonts.clear();
        self.textures.clear();
        self.sounds.clear();
        log::debug!("Cleared {count} resources");
    }
}
