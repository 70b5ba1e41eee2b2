/// Result interpretation
///
/// Turns a provider reply into what the results panel shows: the ranked
/// predictions as delivered, the top label, and the species metadata for it.
/// Interpretation is total; odd labels degrade to the `non_mint` entry.
use tracing::warn;

use crate::state::data::{ClassificationResponse, PredictionEntry};
use crate::state::species::{self, SpeciesMetadataEntry, NON_MINT_LABEL};

/// Display-ready form of a completed classification
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayResult {
    /// Provider order, unmodified
    pub ranked_predictions: Vec<PredictionEntry>,
    /// Label of the first prediction, or `non_mint` when there is none
    pub top_label: String,
    pub metadata: &'static SpeciesMetadataEntry,
    pub is_mint: bool,
}

impl DisplayResult {
    /// Short verdict for the mint status line
    pub fn verdict(&self) -> &'static str {
        if self.is_mint {
            "This is a mint leaf"
        } else {
            "This is not a mint leaf"
        }
    }
}

/// Derive the display result for a reply
pub fn interpret(response: &ClassificationResponse) -> DisplayResult {
    let top_label = response
        .predictions
        .first()
        .map(|p| p.class_label.clone())
        .unwrap_or_else(|| NON_MINT_LABEL.to_string());

    let metadata = species::lookup(&top_label).unwrap_or_else(|| {
        warn!("No species metadata for label '{}', using fallback", top_label);
        species::fallback()
    });

    DisplayResult {
        ranked_predictions: response.predictions.clone(),
        top_label,
        metadata,
        is_mint: response.is_mint,
    }
}

/// Human-readable form of a class label
///
/// `non_mint` becomes "Not a Mint Leaf"; other labels have their
/// underscores replaced with spaces.
pub fn display_label(label: &str) -> String {
    if label == NON_MINT_LABEL {
        species::fallback().name.to_string()
    } else {
        label.replace('_', " ")
    }
}

/// Whether predictions are ordered by non-increasing probability
pub fn predictions_descending(predictions: &[PredictionEntry]) -> bool {
    predictions
        .windows(2)
        .all(|pair| pair[0].probability >= pair[1].probability)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn response(predictions: Vec<PredictionEntry>, is_mint: bool) -> ClassificationResponse {
        ClassificationResponse {
            predictions,
            is_mint,
            model_used: None,
        }
    }

    #[test]
    fn test_peppermint_reply() {
        let predictions = vec![
            PredictionEntry::new("peppermint", 92.0),
            PredictionEntry::new("spearmint", 8.0),
        ];
        let result = interpret(&response(predictions.clone(), true));

        assert_eq!(result.top_label, "peppermint");
        assert!(result.metadata.name.contains("Peppermint"));
        assert_eq!(result.ranked_predictions, predictions);
        assert_eq!(result.verdict(), "This is a mint leaf");
    }

    #[test]
    fn test_empty_predictions_fall_back() {
        for is_mint in [true, false] {
            let result = interpret(&response(Vec::new(), is_mint));
            assert_eq!(result.top_label, NON_MINT_LABEL);
            assert_eq!(result.metadata.name, "Not a Mint Leaf");
            assert!(result.ranked_predictions.is_empty());
        }
    }

    #[test]
    fn test_unknown_label_falls_back() {
        let result = interpret(&response(vec![PredictionEntry::new("basil", 70.0)], false));
        assert_eq!(result.top_label, "basil");
        assert_eq!(result.metadata, species::fallback());
        assert_eq!(result.verdict(), "This is not a mint leaf");
    }

    #[test]
    fn test_order_is_passed_through() {
        // Unordered input stays unordered; the first entry still wins
        let predictions = vec![
            PredictionEntry::new("spearmint", 10.0),
            PredictionEntry::new("apple_mint", 85.0),
        ];
        let result = interpret(&response(predictions.clone(), true));
        assert_eq!(result.top_label, "spearmint");
        assert_eq!(result.ranked_predictions, predictions);
    }

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("non_mint"), "Not a Mint Leaf");
        assert_eq!(display_label("apple_mint"), "apple mint");
        assert_eq!(display_label("some_new_mint"), "some new mint");
        assert_eq!(display_label("peppermint"), "peppermint");
        assert_eq!(display_label(""), "");
    }

    #[test]
    fn test_predictions_descending() {
        assert!(predictions_descending(&[]));
        assert!(predictions_descending(&[PredictionEntry::new("a", 1.0)]));
        assert!(predictions_descending(&[
            PredictionEntry::new("a", 50.0),
            PredictionEntry::new("b", 50.0),
            PredictionEntry::new("c", 0.0),
        ]));
        assert!(!predictions_descending(&[
            PredictionEntry::new("a", 10.0),
            PredictionEntry::new("b", 20.0),
        ]));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn property_interpret_is_total(
            entries in prop::collection::vec(("[a-z_]{0,16}", 0.0f64..=100.0), 0..6),
            is_mint in any::<bool>(),
        ) {
            let predictions: Vec<PredictionEntry> = entries
                .into_iter()
                .map(|(label, probability)| PredictionEntry::new(label, probability))
                .collect();
            let result = interpret(&response(predictions.clone(), is_mint));

            prop_assert_eq!(&result.ranked_predictions, &predictions);
            prop_assert_eq!(result.is_mint, is_mint);
            match predictions.first() {
                Some(first) => {
                    prop_assert_eq!(&result.top_label, &first.class_label);
                }
                None => {
                    prop_assert_eq!(result.top_label.as_str(), NON_MINT_LABEL);
                }
            }
            let expected = species::lookup(&result.top_label).unwrap_or(species::fallback());
            prop_assert_eq!(result.metadata, expected);
        }
    }
}
