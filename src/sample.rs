//! Quiz samples and their ids.
//!
//! [`SampleRecord`] mirrors one entry of a `*.exolist.json` list as written
//! on disk; [`Sample`] is the checked, immutable form the rest of the game
//! works with.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a sample, unique within a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleId(u32);

impl SampleId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying integer.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for SampleId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One trivia entry: a clip of a piece and who wrote it.
///
/// Samples are built once when the catalog loads and never change afterwards,
/// so all fields are private behind getters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    id: SampleId,
    composer: String,
    title: String,
    /// Where the audio clip lives. Opaque to this crate.
    audio_reference: String,
    /// Name of the composer portrait. Opaque to this crate.
    art_reference: String,
}

impl Sample {
    #[must_use]
    pub fn new(
        id: SampleId,
        composer: impl Into<String>,
        title: impl Into<String>,
        audio_reference: impl Into<String>,
        art_reference: impl Into<String>,
    ) -> Self {
        Self {
            id,
            composer: composer.into(),
            title: title.into(),
            audio_reference: audio_reference.into(),
            art_reference: art_reference.into(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> SampleId {
        self.id
    }

    #[must_use]
    pub fn composer(&self) -> &str {
        &self.composer
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn audio_reference(&self) -> &str {
        &self.audio_reference
    }

    #[must_use]
    pub fn art_reference(&self) -> &str {
        &self.art_reference
    }
}

/// A sample record exactly as the asset file spells it.
///
/// Every field is optional so that a broken record can be reported (or
/// skipped) instead of failing the whole parse.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SampleRecord {
    pub name: Option<String>,
    pub id: Option<u32>,
    pub composer: Option<String>,
    pub uri: Option<String>,
    #[serde(rename = "albumArtID")]
    pub album_art_id: Option<String>,
}

impl SampleRecord {
    /// Converts into a [`Sample`], naming the first missing field on failure.
    pub fn into_sample(self) -> Result<Sample, &'static str> {
        let id = self.id.ok_or("id")?;
        let composer = self.composer.ok_or("composer")?;
        let title = self.name.ok_or("name")?;
        let uri = self.uri.ok_or("uri")?;
        let art = self.album_art_id.ok_or("albumArtID")?;

        Ok(Sample::new(SampleId(id), composer, title, uri, art))
    }
}
