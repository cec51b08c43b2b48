//! Story assets and the references that resolve to them.
//!
//! A compiled story usually travels inside an asset envelope written by the
//! host's content pipeline:
//!
//! ```json
//! { "ID": "intro", "TypeName": "DialogueRunner.StoryAsset", "Data": { "Story": "{\"inkVersion\":21, ...}" } }
//! ```
use std::{collections::HashMap, rc::Rc};

use as_any::AsAny;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Any asset loaded by the host. Implementors are downcast through
/// [`AsAny`] to find out whether they hold a story.
pub trait Asset: AsAny {
    /// The asset type name, as written in the envelope's `TypeName`.
    fn asset_type(&self) -> &str;
}

/// Compiled story JSON wrapped as an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryAsset {
    #[serde(rename = "Story")]
    story: String,
}

impl StoryAsset {
    pub const TYPE_NAME: &'static str = "DialogueRunner.StoryAsset";

    pub fn new(json_story: impl Into<String>) -> Self {
        Self {
            story: json_story.into(),
        }
    }

    /// The compiled story JSON.
    pub fn story(&self) -> &str {
        &self.story
    }
}

impl Asset for StoryAsset {
    fn asset_type(&self) -> &str {
        Self::TYPE_NAME
    }
}

/// An asset of a type this crate doesn't know, kept as raw JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAsset {
    type_name: String,
    data: Value,
}

impl RawAsset {
    pub fn new(type_name: impl Into<String>, data: Value) -> Self {
        Self {
            type_name: type_name.into(),
            data,
        }
    }

    pub fn data(&self) -> &Value {
        &self.data
    }
}

impl Asset for RawAsset {
    fn asset_type(&self) -> &str {
        &self.type_name
    }
}

/// A handle to an asset by id. The instance is missing when the id could not
/// be resolved.
#[derive(Clone)]
pub struct AssetReference {
    id: String,
    instance: Option<Rc<dyn Asset>>,
}

impl AssetReference {
    pub fn new(id: impl Into<String>, instance: Rc<dyn Asset>) -> Self {
        Self {
            id: id.into(),
            instance: Some(instance),
        }
    }

    pub fn unresolved(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            instance: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn instance(&self) -> Option<&dyn Asset> {
        self.instance.as_deref()
    }
}

#[derive(Deserialize)]
struct AssetEnvelope {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "TypeName")]
    type_name: String,
    #[serde(rename = "Data")]
    data: Value,
}

/// Loaded assets by id.
#[derive(Default)]
pub struct AssetLibrary {
    assets: HashMap<String, Rc<dyn Asset>>,
}

impl AssetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `asset` under `id`, replacing any asset with the same id.
    pub fn insert(&mut self, id: impl Into<String>, asset: impl Asset + 'static) -> AssetReference {
        let id = id.into();
        let asset: Rc<dyn Asset> = Rc::new(asset);
        self.assets.insert(id.clone(), asset.clone());

        AssetReference::new(id, asset)
    }

    /// Parses an asset envelope and adds it to the library.
    pub fn load_json(&mut self, json: &str) -> Result<AssetReference, serde_json::Error> {
        let json = json.strip_prefix('\u{feff}').unwrap_or(json);
        let envelope: AssetEnvelope = serde_json::from_str(json)?;

        if envelope.type_name == StoryAsset::TYPE_NAME {
            let story: StoryAsset = serde_json::from_value(envelope.data)?;
            Ok(self.insert(envelope.id, story))
        } else {
            let raw = RawAsset::new(envelope.type_name, envelope.data);
            Ok(self.insert(envelope.id, raw))
        }
    }

    /// A reference to the asset with `id`, unresolved if there is none.
    pub fn resolve(&self, id: &str) -> AssetReference {
        match self.assets.get(id) {
            Some(asset) => AssetReference::new(id, asset.clone()),
            None => AssetReference::unresolved(id),
        }
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
