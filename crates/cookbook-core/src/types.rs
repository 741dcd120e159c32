//! Common types used across Cookbook.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Icon shown next to an instruction step.
///
/// The set is closed; any tag the app does not know about resolves to
/// [`IconTag::Default`] rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IconTag {
    /// Generic step icon.
    #[default]
    Default,
    /// Preparing ingredients.
    Prep,
    /// Cutting or chopping.
    Chop,
    /// Mixing or whisking.
    Mix,
    /// Cooking on the stove.
    Stove,
    /// Baking or roasting.
    Oven,
    /// Chilling or resting in the fridge.
    Fridge,
    /// Waiting on a timer.
    Timer,
    /// Plating and serving.
    Serve,
}

impl IconTag {
    /// Every tag, in display order.
    pub const ALL: [IconTag; 9] = [
        IconTag::Default,
        IconTag::Prep,
        IconTag::Chop,
        IconTag::Mix,
        IconTag::Stove,
        IconTag::Oven,
        IconTag::Fridge,
        IconTag::Timer,
        IconTag::Serve,
    ];

    /// Resolve a stored tag. Matching ignores case and surrounding whitespace.
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|icon| icon.as_str().eq_ignore_ascii_case(tag))
            .unwrap_or_default()
    }

    /// Resolve an optional tag, treating absence as the default icon.
    pub fn resolve(tag: Option<&str>) -> Self {
        tag.map(Self::parse).unwrap_or_default()
    }

    /// The canonical tag string.
    pub fn as_str(&self) -> &'static str {
        match self {
            IconTag::Default => "default",
            IconTag::Prep => "prep",
            IconTag::Chop => "chop",
            IconTag::Mix => "mix",
            IconTag::Stove => "stove",
            IconTag::Oven => "oven",
            IconTag::Fridge => "fridge",
            IconTag::Timer => "timer",
            IconTag::Serve => "serve",
        }
    }

    /// Returns true for the fallback icon.
    pub fn is_default(&self) -> bool {
        matches!(self, IconTag::Default)
    }
}

impl fmt::Display for IconTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for IconTag {
    fn from(tag: String) -> Self {
        IconTag::parse(&tag)
    }
}

impl From<IconTag> for String {
    fn from(icon: IconTag) -> Self {
        icon.as_str().to_string()
    }
}
