//! # Sample Catalog Module
//!
//! Loads the fixed set of quiz samples from an asset collaborator and serves
//! read-only lookups for the rest of the game.
//!
//! ## Sources
//!
//! - [`JsonFile`] - a single JSON file on disk
//! - [`AssetDir`] - a directory scanned for a `*.exolist.json` file
//! - [`InlineJson`] - JSON already in memory, e.g. the [`BUILTIN_CATALOG`]
//!
//! All sources produce the same format: a JSON array of objects with the
//! fields `name`, `id`, `composer`, `uri` and `albumArtID`.
//!
//! ## Load policy
//!
//! Broken records (missing fields, wrong types, duplicate ids) are skipped
//! with a warning under [`LoadPolicy::Lenient`] and abort the load under
//! [`LoadPolicy::Strict`].

use crate::error::{QuizError, Result};
use crate::sample::{Sample, SampleId, SampleRecord};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Catalog that ships with the binary.
pub const BUILTIN_CATALOG: &str = include_str!("../assets/samples.exolist.json");

/// Suffix that marks a sample list inside an asset directory.
pub const SAMPLE_LIST_SUFFIX: &str = ".exolist.json";

/// How to treat malformed or duplicate records while loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LoadPolicy {
    /// Skip bad records and keep loading.
    #[default]
    Lenient,
    /// Fail on the first bad record.
    Strict,
}

/// External collaborator that hands over the raw sample list.
pub trait SampleSource {
    /// Human readable description for log and error messages.
    fn describe(&self) -> String;

    /// Returns the raw JSON text of the sample list.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::Load`] if the source cannot be read.
    fn read_json(&self) -> Result<String>;
}

/// A sample list stored in one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFile(pub PathBuf);

impl SampleSource for JsonFile {
    fn describe(&self) -> String {
        self.0.display().to_string()
    }

    fn read_json(&self) -> Result<String> {
        fs::read_to_string(&self.0)
            .map_err(|e| QuizError::Load(format!("cannot read {}: {e}", self.0.display())))
    }
}

/// A directory of assets containing a `*.exolist.json` sample list.
#[derive(Debug, Clone)]
pub struct AssetDir(pub PathBuf);

impl AssetDir {
    /// Finds the sample list in this directory.
    ///
    /// Entries are visited in name order and the last match wins, so a
    /// directory with several lists resolves the same way on every platform.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::Load`] if the directory can't be listed or holds
    /// no sample list.
    pub fn find_sample_list(&self) -> Result<PathBuf> {
        let entries = fs::read_dir(&self.0)
            .map_err(|e| QuizError::Load(format!("cannot list {}: {e}", self.0.display())))?;

        let mut names: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.ends_with(SAMPLE_LIST_SUFFIX))
            })
            .collect();
        names.sort();

        names.pop().ok_or_else(|| {
            QuizError::Load(format!(
                "no *{SAMPLE_LIST_SUFFIX} file in {}",
                self.0.display()
            ))
        })
    }
}

impl SampleSource for AssetDir {
    fn describe(&self) -> String {
        format!("asset directory {}", self.0.display())
    }

    fn read_json(&self) -> Result<String> {
        let list = self.find_sample_list()?;
        debug!("Using sample list {}", list.display());
        JsonFile(list).read_json()
    }
}

/// JSON text that is already in memory.
#[derive(Debug, Clone)]
pub struct InlineJson<'a>(pub &'a str);

impl SampleSource for InlineJson<'_> {
    fn describe(&self) -> String {
        "inline sample list".to_string()
    }

    fn read_json(&self) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// Picks the source for an optional user supplied path: directories are
/// scanned as asset directories, anything else is read as a JSON file, and
/// no path means the built-in catalog.
#[must_use]
pub fn source_for(path: Option<&Path>) -> Box<dyn SampleSource> {
    match path {
        Some(p) if p.is_dir() => Box::new(AssetDir(p.to_path_buf())),
        Some(p) => Box::new(JsonFile(p.to_path_buf())),
        None => Box::new(InlineJson(BUILTIN_CATALOG)),
    }
}

/// The loaded, read-only set of samples, in source order.
/// A record left out of a leniently loaded catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Index of the record in the source list.
    pub position: usize,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    samples: Vec<Sample>,
    index: HashMap<SampleId, usize>,
}

impl Catalog {
    /// Loads every sample from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::Load`] if the source is unreadable, is not a JSON
    /// array, or (under [`LoadPolicy::Strict`]) holds a bad record.
    pub fn load_all(source: &dyn SampleSource, policy: LoadPolicy) -> Result<Self> {
        let (catalog, _skipped) = Self::load_with_skipped(source, policy)?;
        Ok(catalog)
    }

    /// Like [`Catalog::load_all`], also returning the records that were
    /// skipped under [`LoadPolicy::Lenient`].
    ///
    /// # Errors
    ///
    /// Same as [`Catalog::load_all`].
    pub fn load_with_skipped(
        source: &dyn SampleSource,
        policy: LoadPolicy,
    ) -> Result<(Self, Vec<SkippedRecord>)> {
        let text = source.read_json()?;
        let entries: Vec<serde_json::Value> = serde_json::from_str(&text).map_err(|e| {
            QuizError::Load(format!("{} is not a JSON sample list: {e}", source.describe()))
        })?;

        let mut catalog = Self::with_capacity(entries.len());
        let mut skipped = Vec::new();
        for (position, entry) in entries.into_iter().enumerate() {
            let parsed = serde_json::from_value::<SampleRecord>(entry)
                .map_err(|e| e.to_string())
                .and_then(|record| {
                    record
                        .into_sample()
                        .map_err(|field| format!("missing field `{field}`"))
                });

            let reason = match parsed {
                Ok(sample) => {
                    let id = sample.id();
                    if catalog.try_push(sample) {
                        continue;
                    }
                    format!("duplicate id {id}")
                }
                Err(reason) => reason,
            };
            reject(policy, position, &reason)?;
            skipped.push(SkippedRecord { position, reason });
        }

        info!("Loaded {} samples from {}", catalog.len(), source.describe());
        Ok((catalog, skipped))
    }

    /// Builds a catalog from samples already in memory. Later samples that
    /// repeat an id are dropped.
    #[must_use]
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        let mut catalog = Self::with_capacity(samples.len());
        for sample in samples {
            let id = sample.id();
            if !catalog.try_push(sample) {
                warn!("Dropping sample with duplicate id {id}");
            }
        }
        catalog
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Adds `sample` unless its id is taken. Returns whether it was added.
    fn try_push(&mut self, sample: Sample) -> bool {
        if self.index.contains_key(&sample.id()) {
            return false;
        }
        self.index.insert(sample.id(), self.samples.len());
        self.samples.push(sample);
        true
    }

    /// Finds a sample by id.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::NotFound`] for ids outside the catalog.
    pub fn lookup(&self, id: SampleId) -> Result<&Sample> {
        self.index
            .get(&id)
            .map(|&i| &self.samples[i])
            .ok_or(QuizError::NotFound(id))
    }

    /// Portrait reference of the composer behind a sample.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::NotFound`] for ids outside the catalog.
    pub fn composer_art(&self, id: SampleId) -> Result<&str> {
        self.lookup(id).map(Sample::art_reference)
    }

    /// All ids, in catalog order.
    #[must_use]
    pub fn ids(&self) -> Vec<SampleId> {
        self.samples.iter().map(Sample::id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Best score a full game over this catalog can reach: one point per
    /// round, and a game has one round fewer than there are samples.
    #[must_use]
    pub fn max_score(&self) -> u32 {
        u32::try_from(self.samples.len().saturating_sub(1)).unwrap_or(u32::MAX)
    }
}

fn reject(policy: LoadPolicy, position: usize, reason: &str) -> Result<()> {
    match policy {
        LoadPolicy::Lenient => {
            warn!("Skipping sample record #{position}: {reason}");
            Ok(())
        }
        LoadPolicy::Strict => Err(QuizError::Load(format!(
            "sample record #{position} rejected: {reason}"
        ))),
    }
}
