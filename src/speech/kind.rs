//! Customization kind definitions.
//!
//! Watson keeps custom language models and custom acoustic models in separate
//! collections. Each kind has its own listing endpoint and its own set of
//! child resources (corpora, words and grammars for language models; audio for
//! acoustic models).

/// Represents a kind of custom model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomizationKind {
    Language,
    Acoustic,
}

impl CustomizationKind {
    pub fn id(&self) -> &'static str {
        match self {
            CustomizationKind::Language => "language",
            CustomizationKind::Acoustic => "acoustic",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CustomizationKind::Language => "custom language model",
            CustomizationKind::Acoustic => "custom acoustic model",
        }
    }

    /// Returns the collection path under the service URL
    pub fn collection_path(&self) -> &'static str {
        match self {
            CustomizationKind::Language => "/v1/customizations",
            CustomizationKind::Acoustic => "/v1/acoustic_customizations",
        }
    }
}

impl std::fmt::Display for CustomizationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}
