//! Quality tier selection

use std::fmt;

/// Quality tier names understood by the embed widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualityTier {
    /// Above 4K
    Highres,
    /// 2160p
    Hd2160,
    /// 1440p
    Hd1440,
    /// 1080p
    Hd1080,
    /// 720p
    Hd720,
    /// 480p
    Large,
    /// 360p
    Medium,
    /// 240p
    Small,
}

impl QualityTier {
    /// All tiers, highest resolution first
    pub const PREFERENCE: [QualityTier; 8] = [
        QualityTier::Highres,
        QualityTier::Hd2160,
        QualityTier::Hd1440,
        QualityTier::Hd1080,
        QualityTier::Hd720,
        QualityTier::Large,
        QualityTier::Medium,
        QualityTier::Small,
    ];

    /// Name the widget uses for this tier
    pub fn as_str(self) -> &'static str {
        match self {
            QualityTier::Highres => "highres",
            QualityTier::Hd2160 => "hd2160",
            QualityTier::Hd1440 => "hd1440",
            QualityTier::Hd1080 => "hd1080",
            QualityTier::Hd720 => "hd720",
            QualityTier::Large => "large",
            QualityTier::Medium => "medium",
            QualityTier::Small => "small",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the quality to apply from the tiers a video offers
///
/// Returns the highest preferred tier present. When none of the preferred
/// tiers is offered, the first offered tier is used as-is. Returns `None`
/// only when nothing is offered.
pub fn select_quality(offered: &[String]) -> Option<String> {
    QualityTier::PREFERENCE
        .iter()
        .map(|tier| tier.as_str())
        .find(|name| offered.iter().any(|o| o.as_str() == *name))
        .map(str::to_string)
        .or_else(|| offered.first().cloned())
}
