use serde::Serialize;

/// Treatment-susceptibility advisory derived from prediction confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdvisoryTier {
    High,
    Moderate,
    Low,
}

impl AdvisoryTier {
    pub const HIGH_THRESHOLD: f32 = 0.85;
    pub const MODERATE_THRESHOLD: f32 = 0.60;

    /// Lower bounds are inclusive. Out-of-range confidences are not clamped.
    pub fn from_confidence(confidence: f32) -> AdvisoryTier {
        if confidence >= Self::HIGH_THRESHOLD {
            AdvisoryTier::High
        } else if confidence >= Self::MODERATE_THRESHOLD {
            AdvisoryTier::Moderate
        } else {
            AdvisoryTier::Low
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            AdvisoryTier::High => "High confidence for targeted treatment planning",
            AdvisoryTier::Moderate => "Moderate confidence - consider confirmatory tests",
            AdvisoryTier::Low => "Low confidence - specialist review recommended",
        }
    }
}

pub fn advise(confidence: f32) -> AdvisoryTier {
    AdvisoryTier::from_confidence(confidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        let cases = [
            (0.0, AdvisoryTier::Low),
            (0.599999, AdvisoryTier::Low),
            (0.6, AdvisoryTier::Moderate),
            (0.849999, AdvisoryTier::Moderate),
            (0.85, AdvisoryTier::High),
            (1.0, AdvisoryTier::High),
        ];
        for (c, tier) in cases {
            assert_eq!(advise(c), tier, "confidence {c}");
        }
    }

    #[test]
    fn texts_are_distinct() {
        assert_ne!(AdvisoryTier::High.text(), AdvisoryTier::Moderate.text());
        assert_ne!(AdvisoryTier::Moderate.text(), AdvisoryTier::Low.text());
        assert!(AdvisoryTier::Low.text().contains("specialist review"));
    }
}
