//! Turns story sources into engine-ready stories.
use thiserror::Error;
use tracing::debug;

use crate::{
    asset::{AssetReference, StoryAsset},
    ink_story::InkStory,
    runner_error::EngineError,
};

/// Failure to build a story from a [`StorySource`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// The asset reference doesn't point to a loaded asset.
    #[error("asset `{0}` could not be resolved")]
    Unresolved(String),
    /// The engine rejected the compiled story JSON.
    #[error("invalid story: {0}")]
    Parse(#[from] EngineError),
    /// The asset envelope is not valid JSON or misses the story.
    #[error("invalid story asset: {0}")]
    Asset(#[from] serde_json::Error),
}

/// Where a story comes from.
#[derive(Clone, Copy)]
pub enum StorySource<'a> {
    /// Compiled story JSON.
    Json(&'a str),
    /// A wrapped story asset.
    Asset(&'a StoryAsset),
    /// A reference that has to be resolved to an asset first.
    Reference(&'a AssetReference),
}

impl<'a> From<&'a str> for StorySource<'a> {
    fn from(json: &'a str) -> Self {
        StorySource::Json(json)
    }
}

impl<'a> From<&'a String> for StorySource<'a> {
    fn from(json: &'a String) -> Self {
        StorySource::Json(json)
    }
}

impl<'a> From<&'a StoryAsset> for StorySource<'a> {
    fn from(asset: &'a StoryAsset) -> Self {
        StorySource::Asset(asset)
    }
}

impl<'a> From<&'a AssetReference> for StorySource<'a> {
    fn from(reference: &'a AssetReference) -> Self {
        StorySource::Reference(reference)
    }
}

/// Builds [`InkStory`] instances. Creating a story never starts it.
#[derive(Debug, Clone, Default)]
pub struct StoryFactory {
    allow_external_function_fallbacks: bool,
}

impl StoryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether created stories may run the ink fallback of an unbound
    /// `EXTERNAL` function.
    pub fn with_external_function_fallbacks(mut self, allow: bool) -> Self {
        self.allow_external_function_fallbacks = allow;
        self
    }

    /// Creates a story from `source`.
    ///
    /// Returns `Ok(None)` when a reference resolves to an asset that doesn't
    /// hold a story.
    pub fn create_story<'a>(
        &self,
        source: impl Into<StorySource<'a>>,
    ) -> Result<Option<InkStory>, LoadError> {
        let json = match source.into() {
            StorySource::Json(json) => json,
            StorySource::Asset(asset) => asset.story(),
            StorySource::Reference(reference) => {
                let asset = reference
                    .instance()
                    .ok_or_else(|| LoadError::Unresolved(reference.id().to_owned()))?;

                match asset.as_any().downcast_ref::<StoryAsset>() {
                    Some(story_asset) => story_asset.story(),
                    None => {
                        debug!(
                            asset = reference.id(),
                            asset_type = asset.asset_type(),
                            "asset does not contain a story"
                        );
                        return Ok(None);
                    }
                }
            }
        };

        let mut story = InkStory::from_json(json)?;
        story.set_allow_external_function_fallbacks(self.allow_external_function_fallbacks);

        Ok(Some(story))
    }
}
