use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What to do with a label the encoder has never seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownLabelPolicy {
    /// Encode the first vocabulary entry instead. Keeps the request alive at
    /// the cost of predicting for a different category.
    #[default]
    Fallback,
    Reject,
}

impl UnknownLabelPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fallback" => Some(Self::Fallback),
            "reject" | "strict" => Some(Self::Reject),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EncoderFile {
    classes: Vec<String>,
}

/// Ordered label vocabulary; a label's code is its position.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "EncoderFile")]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

impl From<EncoderFile> for LabelEncoder {
    fn from(file: EncoderFile) -> Self {
        Self::new(file.classes)
    }
}

impl LabelEncoder {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(classes.len());
        for (code, label) in classes.iter().enumerate() {
            index.entry(label.clone()).or_insert(code);
        }
        Self { classes, index }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Exact lookup, `None` for out-of-vocabulary labels.
    pub fn transform(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn inverse(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    /// Encodes `label` under `policy`.
    ///
    /// With [`UnknownLabelPolicy::Fallback`] an unseen label is encoded as the
    /// first vocabulary entry, and an encoder that cannot even do that yields 0.
    pub fn encode(
        &self,
        label: &str,
        policy: UnknownLabelPolicy,
    ) -> Result<EncodedLabel, UnknownLabel> {
        if let Some(code) = self.transform(label) {
            return Ok(EncodedLabel {
                code,
                fallback: false,
            });
        }

        match policy {
            UnknownLabelPolicy::Reject => Err(UnknownLabel {
                label: label.to_string(),
            }),
            UnknownLabelPolicy::Fallback => {
                let code = self
                    .classes
                    .first()
                    .and_then(|first| self.transform(first))
                    .unwrap_or(0);
                Ok(EncodedLabel {
                    code,
                    fallback: true,
                })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedLabel {
    pub code: usize,
    pub fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{label}' is not in the encoder vocabulary")]
pub struct UnknownLabel {
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cities() -> LabelEncoder {
        LabelEncoder::new(["Bangalore", "Chennai", "Delhi", "Kolkata", "Mumbai"])
    }

    #[test]
    fn known_labels_encode_to_their_position() {
        let encoder = cities();
        let encoded = encoder
            .encode("Delhi", UnknownLabelPolicy::Fallback)
            .expect("known label");
        assert_eq!(encoded, EncodedLabel { code: 2, fallback: false });
        assert_eq!(encoder.inverse(2), Some("Delhi"));
    }

    #[test]
    fn unseen_label_matches_first_label_encoding() {
        let encoder = cities();
        let unseen = encoder
            .encode("Atlantis", UnknownLabelPolicy::Fallback)
            .expect("fallback applies");
        let first = encoder
            .encode("Bangalore", UnknownLabelPolicy::Fallback)
            .expect("first label");
        assert_eq!(unseen.code, first.code);
        assert!(unseen.fallback);
        assert!(!first.fallback);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let encoder = cities();
        let encoded = encoder
            .encode("delhi", UnknownLabelPolicy::Fallback)
            .expect("fallback applies");
        assert!(encoded.fallback);
    }

    #[test]
    fn empty_vocabulary_falls_back_to_zero() {
        let encoder = LabelEncoder::new(Vec::<String>::new());
        let encoded = encoder
            .encode("Delhi", UnknownLabelPolicy::Fallback)
            .expect("never fails under fallback");
        assert_eq!(encoded.code, 0);
        assert!(encoded.fallback);
    }

    #[test]
    fn reject_policy_surfaces_unknown_labels() {
        let error = cities()
            .encode("Atlantis", UnknownLabelPolicy::Reject)
            .expect_err("rejected");
        assert_eq!(error.label, "Atlantis");
    }

    #[test]
    fn duplicate_classes_keep_first_code() {
        let encoder = LabelEncoder::new(["Goa", "Pune", "Goa"]);
        assert_eq!(encoder.transform("Goa"), Some(0));
        assert_eq!(encoder.len(), 3);
    }

    #[test]
    fn deserializes_from_classes_file() {
        let encoder: LabelEncoder =
            serde_json::from_str(r#"{ "classes": ["Chinese", "Italian"] }"#).expect("parses");
        assert_eq!(encoder.transform("Italian"), Some(1));
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!(
            UnknownLabelPolicy::parse(" REJECT "),
            Some(UnknownLabelPolicy::Reject)
        );
        assert_eq!(
            UnknownLabelPolicy::parse("fallback"),
            Some(UnknownLabelPolicy::Fallback)
        );
        assert_eq!(UnknownLabelPolicy::parse("maybe"), None);
    }
}
