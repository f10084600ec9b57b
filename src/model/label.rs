//! The closed six-symbol label set the CRF assigns to each content line.

use serde::{Deserialize, Serialize};

/// A content line's role in the email.
///
/// Transitions between labels carry semantic constraints enforced by the
/// CRF post-processing passes (see [`crate::crf::postprocess`]): `Closing`
/// never appears after `Signature`, and never on a delimiter line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Opening formula ("お世話になっております。", etc.).
    Greeting,
    /// The author's own message content.
    Body,
    /// Closing formula ("よろしくお願いいたします。", etc.).
    Closing,
    /// Name, title, company, contact block.
    Signature,
    /// Quoted material from a prior message in the thread.
    Quote,
    /// Neutral filler: blank-adjacent noise, forwarded headers, separators.
    Other,
}

impl Label {
    /// All six variants, in a stable order used for marginal maps and
    /// CRF label-set enumeration.
    pub const ALL: [Label; 6] = [
        Label::Greeting,
        Label::Body,
        Label::Closing,
        Label::Signature,
        Label::Quote,
        Label::Other,
    ];

    /// The string tag this label is trained/decoded under in the CRF model
    /// and in training JSONL records.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Greeting => "GREETING",
            Label::Body => "BODY",
            Label::Closing => "CLOSING",
            Label::Signature => "SIGNATURE",
            Label::Quote => "QUOTE",
            Label::Other => "OTHER",
        }
    }

    /// Parses a label from its training/decode tag. Returns `None` for
    /// anything outside the six-symbol set.
    pub fn from_str(s: &str) -> Option<Label> {
        match s {
            "GREETING" => Some(Label::Greeting),
            "BODY" => Some(Label::Body),
            "CLOSING" => Some(Label::Closing),
            "SIGNATURE" => Some(Label::Signature),
            "QUOTE" => Some(Label::Quote),
            "OTHER" => Some(Label::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for label in Label::ALL {
            assert_eq!(Label::from_str(label.as_str()), Some(label));
        }
    }

    #[test]
    fn rejects_unknown_tag() {
        assert_eq!(Label::from_str("PREAMBLE"), None);
    }
}
