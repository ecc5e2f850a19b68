use serde::{Deserialize, Serialize};
use std::fmt;

use crate::*;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// One stored (label, feature vector) pair from the training set.
pub struct ReferenceEntry {
    pub label: Label,
    pub feature: Feature,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Default)]
/// Append-only reference collection. Can be:
/// 1. Built during training ingestion with [`Classifier::add_reference`].
/// 2. Saved to a file & loaded from a file (requires bincode feature, enabled by default).
/// 3. Used to assign the label of the most similar reference to a query feature.
pub struct Classifier {
    references: Vec<ReferenceEntry>,
}

/// Classifier API
impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one reference. No deduplication, no capacity limit.
    pub fn add_reference(&mut self, label: Label, feature: Feature) {
        self.references.push(ReferenceEntry { label, feature });
    }

    /// Label of the reference with the greatest cosine similarity to `feature`.
    ///
    /// References are scanned in insertion order and only a strictly greater similarity
    /// replaces the current best, so the first of several equally similar references wins.
    /// The scan starts from similarity `-1` and [`SENTINEL_LABEL`], which is also the
    /// result for an empty reference set.
    pub fn classify(&self, feature: &[f32]) -> Label {
        let mut best: (f32, Label) = (-1., SENTINEL_LABEL);
        for r in self.references.iter() {
            let s = feature.cosine(&r.feature);
            if s > best.0 {
                best = (s, r.label);
            }
        }
        best.1
    }

    pub fn references(&self) -> &[ReferenceEntry] {
        &self.references
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Load a reference index from a file
    #[cfg(feature = "bincode")]
    pub fn load<P: AsRef<std::path::Path>>(file: P) -> SignResult<Self> {
        let mut file = std::fs::File::open(file)?;
        let mut buffer: Vec<u8> = Vec::new();
        std::io::Read::read_to_end(&mut file, &mut buffer)?;
        Ok(bincode::deserialize(&buffer)?)
    }

    /// Save reference index to a file
    #[cfg(feature = "bincode")]
    pub fn save<P: AsRef<std::path::Path>>(&self, file: P) -> SignResult<()> {
        let serialized = bincode::serialize(&self)?;
        let mut file = std::fs::File::create(file)?;
        std::io::Write::write_all(&mut file, &serialized)?;
        Ok(())
    }
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut labels: Vec<Label> = self.references.iter().map(|r| r.label).collect();
        labels.sort_unstable();
        labels.dedup();
        f.debug_struct("Classifier")
            .field("References", &self.references.len())
            .field("Distinct Labels", &labels)
            .field(
                "Feature Length",
                &self.references.first().map(|r| r.feature.len()),
            )
            .finish()
    }
}
