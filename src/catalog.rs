//! Bird card records and bird-type filters
//!
//! The catalog content is supplied by the host; this module only describes
//! its shape and how it is filtered and looked up.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::deck::CardId;

/// Broad grouping used by the filter chips and for picking distractors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BirdType {
    Raptor,
    Waterbird,
    Flycatcher,
    Sparrow,
    Hummingbird,
    Woodpecker,
    Songbird,
    Other,
}

impl BirdType {
    pub const ALL: [BirdType; 8] = [
        BirdType::Raptor,
        BirdType::Waterbird,
        BirdType::Flycatcher,
        BirdType::Sparrow,
        BirdType::Hummingbird,
        BirdType::Woodpecker,
        BirdType::Songbird,
        BirdType::Other,
    ];

    /// Plural display label
    pub fn label(&self) -> &'static str {
        match self {
            BirdType::Raptor => "Raptors",
            BirdType::Waterbird => "Waterbirds",
            BirdType::Flycatcher => "Flycatchers",
            BirdType::Sparrow => "Sparrows",
            BirdType::Hummingbird => "Hummingbirds",
            BirdType::Woodpecker => "Woodpeckers",
            BirdType::Songbird => "Songbirds",
            BirdType::Other => "Other",
        }
    }
}

/// Where the media came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaSource {
    pub audio: String,
    pub image: String,
    pub audio_source_url: String,
    pub image_source_url: String,
}

/// One bird in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirdCard {
    /// eBird species code; also the media file stem
    pub id: CardId,
    pub common_name: String,
    #[serde(default)]
    pub scientific_name: String,
    pub bird_type: BirdType,
    #[serde(default)]
    pub field_notes: Option<String>,
    /// Set when there is no song recording
    #[serde(default)]
    pub audio_note: Option<String>,
    #[serde(default)]
    pub audio_attribution: String,
    #[serde(default)]
    pub image_attribution: String,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub license_url: String,
    #[serde(default)]
    pub source: MediaSource,
}

impl BirdCard {
    pub fn new(id: &str, common_name: &str, bird_type: BirdType) -> Self {
        Self {
            id: id.to_string(),
            common_name: common_name.to_string(),
            scientific_name: String::new(),
            bird_type,
            field_notes: None,
            audio_note: None,
            audio_attribution: String::new(),
            image_attribution: String::new(),
            license: String::new(),
            license_url: String::new(),
            source: MediaSource::default(),
        }
    }

    pub fn image_path(&self) -> String {
        format!("/images/{}.jpg", self.id)
    }

    pub fn has_audio(&self) -> bool {
        self.audio_note.is_none()
    }
}

/// Set of selected bird types (all selected by default)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeFilter {
    selected: BTreeSet<BirdType>,
}

impl Default for TypeFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl TypeFilter {
    pub fn all() -> Self {
        Self {
            selected: BirdType::ALL.into_iter().collect(),
        }
    }

    pub fn only(types: &[BirdType]) -> Self {
        Self {
            selected: types.iter().copied().collect(),
        }
    }

    pub fn is_all(&self) -> bool {
        self.selected.len() == BirdType::ALL.len()
    }

    pub fn contains(&self, bird_type: BirdType) -> bool {
        self.selected.contains(&bird_type)
    }

    /// Flip one type on or off
    pub fn toggle(&mut self, bird_type: BirdType) {
        if !self.selected.remove(&bird_type) {
            self.selected.insert(bird_type);
        }
    }

    pub fn select_all(&mut self) {
        *self = Self::all();
    }

    pub fn selected(&self) -> impl Iterator<Item = BirdType> + '_ {
        self.selected.iter().copied()
    }

    /// Cards of the selected types, catalog order preserved
    pub fn apply<'a>(&self, cards: &'a [BirdCard]) -> Vec<&'a BirdCard> {
        cards.iter().filter(|c| self.contains(c.bird_type)).collect()
    }

    /// Ids of the cards of the selected types
    pub fn card_ids(&self, cards: &[BirdCard]) -> Vec<CardId> {
        self.apply(cards).into_iter().map(|c| c.id.clone()).collect()
    }
}

/// Look up a card, falling back to the first card when the id is unknown
/// (e.g. filtered out). `None` only for an empty catalog.
pub fn resolve_card<'a>(cards: &'a [BirdCard], id: &str) -> Option<&'a BirdCard> {
    cards.iter().find(|c| c.id == id).or_else(|| {
        log::debug!("Unknown card {}, falling back to first", id);
        cards.first()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards() -> Vec<BirdCard> {
        vec![
            BirdCard::new("coohaw", "Cooper's Hawk", BirdType::Raptor),
            BirdCard::new("mallar", "Mallard", BirdType::Waterbird),
            BirdCard::new("annhum", "Anna's Hummingbird", BirdType::Hummingbird),
            BirdCard::new("rethaw", "Red-tailed Hawk", BirdType::Raptor),
        ]
    }

    #[test]
    fn test_filter_default_all() {
        let filter = TypeFilter::default();
        assert!(filter.is_all());
        assert_eq!(filter.apply(&cards()).len(), 4);
    }

    #[test]
    fn test_toggle_and_apply() {
        let mut filter = TypeFilter::only(&[BirdType::Raptor]);
        assert_eq!(filter.card_ids(&cards()), vec!["coohaw", "rethaw"]);
        filter.toggle(BirdType::Waterbird);
        assert_eq!(filter.card_ids(&cards()), vec!["coohaw", "mallar", "rethaw"]);
        filter.toggle(BirdType::Raptor);
        assert_eq!(filter.card_ids(&cards()), vec!["mallar"]);
        filter.select_all();
        assert!(filter.is_all());
    }

    #[test]
    fn test_resolve_falls_back() {
        let cards = cards();
        assert_eq!(resolve_card(&cards, "mallar").unwrap().common_name, "Mallard");
        assert_eq!(resolve_card(&cards, "nope").unwrap().id, "coohaw");
        assert!(resolve_card(&[], "nope").is_none());
    }

    #[test]
    fn test_deserialize_catalog_record() {
        let json = r#"{
            "id": "phaino",
            "commonName": "Phainopepla",
            "scientificName": "Phainopepla nitens",
            "speciesCode": "phaino",
            "birdType": "songbird",
            "imageUrl": "/images/placeholder.jpg",
            "license": "CC0",
            "source": { "audio": "xeno-canto", "image": "user", "audioSourceUrl": "https://xeno-canto.org/448278" }
        }"#;
        let card: BirdCard = serde_json::from_str(json).unwrap();
        assert_eq!(card.bird_type, BirdType::Songbird);
        assert_eq!(card.source.audio, "xeno-canto");
        assert!(card.has_audio());
        assert_eq!(card.image_path(), "/images/phaino.jpg");
    }

    #[test]
    fn test_labels() {
        for t in BirdType::ALL {
            assert!(!t.label().is_empty());
        }
        assert_eq!(BirdType::Woodpecker.label(), "Woodpeckers");
    }
}
