// Significance classification for p-values
//
// One fixed threshold ladder shared by every table, so "**" means the
// same thing in the Wilcoxon table and the warmup ablation table.

use std::fmt;

/// Significance tier of a two-sided p-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignificanceTier {
    /// p < 0.001
    HighlySignificant,
    /// p < 0.01
    VerySignificant,
    /// p < 0.05
    Significant,
    /// p >= 0.05
    NotSignificant,
}

impl SignificanceTier {
    pub fn from_p_value(p: f64) -> Self {
        if p < 0.001 {
            Self::HighlySignificant
        } else if p < 0.01 {
            Self::VerySignificant
        } else if p < 0.05 {
            Self::Significant
        } else {
            Self::NotSignificant
        }
    }

    /// Star label used in the report tables.
    pub fn label(self) -> &'static str {
        match self {
            Self::HighlySignificant => "***",
            Self::VerySignificant => "**",
            Self::Significant => "*",
            Self::NotSignificant => "n.s.",
        }
    }
}

impl fmt::Display for SignificanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ladder() {
        assert_eq!(
            SignificanceTier::from_p_value(0.0005),
            SignificanceTier::HighlySignificant
        );
        assert_eq!(
            SignificanceTier::from_p_value(0.005),
            SignificanceTier::VerySignificant
        );
        assert_eq!(
            SignificanceTier::from_p_value(0.03),
            SignificanceTier::Significant
        );
        assert_eq!(
            SignificanceTier::from_p_value(0.2),
            SignificanceTier::NotSignificant
        );
    }

    #[test]
    fn test_tier_boundaries_are_exclusive() {
        assert_eq!(
            SignificanceTier::from_p_value(0.001),
            SignificanceTier::VerySignificant
        );
        assert_eq!(
            SignificanceTier::from_p_value(0.01),
            SignificanceTier::Significant
        );
        assert_eq!(
            SignificanceTier::from_p_value(0.05),
            SignificanceTier::NotSignificant
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(SignificanceTier::HighlySignificant.label(), "***");
        assert_eq!(SignificanceTier::VerySignificant.label(), "**");
        assert_eq!(SignificanceTier::Significant.label(), "*");
        assert_eq!(SignificanceTier::NotSignificant.label(), "n.s.");
        assert_eq!(format!("{}", SignificanceTier::Significant), "*");
    }
}
