//! Room aesthetics ("vibe vectors") and the coarse tags derived from them.
//!
//! Vibe vectors are produced by the external content service and consumed
//! here read-only. The layout only ever looks at `warmth` and `entropy`,
//! reduced to a two-bit [`Variant`]; everything else is passed through for
//! renderers. Room assets are picked by [`VariantKey`].

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// A `#RGB` or `#RRGGBB` color string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HexColor(pub String);

impl HexColor {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn is_valid(&self) -> bool {
        match self.0.strip_prefix('#') {
            Some(digits) => {
                matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
            }
            None => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Styling metadata attached to a claimed room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VibeVector {
    pub palette: [HexColor; 5],
    /// 0 = cool/blue, 1 = warm/orange.
    pub warmth: f32,
    pub saturation: f32,
    pub contrast: f32,
    /// 0 = stable, 1 = cursed/chaotic.
    pub entropy: f32,
    /// Light flicker intensity and probability.
    pub flicker: f32,
    pub fog: f32,
    pub grain: f32,
    pub bloom: f32,
    /// Short slug, e.g. `"neon-calm"`.
    pub mood_tag: String,
}

impl VibeVector {
    /// The muted slate look used for hallways when no room offers a vibe.
    pub fn fallback() -> Self {
        Self {
            palette: [
                HexColor::new("#1e293b"),
                HexColor::new("#334155"),
                HexColor::new("#475569"),
                HexColor::new("#64748b"),
                HexColor::new("#0f172a"),
            ],
            warmth: 0.2,
            saturation: 0.1,
            contrast: 0.5,
            entropy: 0.1,
            flicker: 0.1,
            fog: 0.2,
            grain: 0.1,
            bloom: 0.2,
            mood_tag: "default-liminal".to_string(),
        }
    }

    /// Named scalar channels in declaration order.
    pub fn channels(&self) -> [(&'static str, f32); 8] {
        [
            ("warmth", self.warmth),
            ("saturation", self.saturation),
            ("contrast", self.contrast),
            ("entropy", self.entropy),
            ("flicker", self.flicker),
            ("fog", self.fog),
            ("grain", self.grain),
            ("bloom", self.bloom),
        ]
    }

    /// Bucket key `"w-s-e-f"` (each channel quantized to 0..=4), used to
    /// share generated content between rooms that look alike.
    pub fn composition_key(&self) -> String {
        let q = |v: f32| (v * 4.0).round() as i32;
        format!(
            "{}-{}-{}-{}",
            q(self.warmth),
            q(self.saturation),
            q(self.entropy),
            q(self.flicker)
        )
    }
}

/// Problem found in a vibe vector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VibeError {
    #[error("channel {channel} = {value} is outside [0, 1]")]
    ChannelOutOfRange { channel: &'static str, value: f32 },
    #[error("palette entry {index} ({color:?}) is not a hex color")]
    BadPaletteColor { index: usize, color: String },
    #[error("mood tag is empty")]
    EmptyMoodTag,
}

/// Validate a vibe vector, returning every problem found.
pub fn validate_vibe(vibe: &VibeVector) -> Vec<VibeError> {
    let mut errors = Vec::new();

    for (channel, value) in vibe.channels() {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            errors.push(VibeError::ChannelOutOfRange { channel, value });
        }
    }
    for (index, color) in vibe.palette.iter().enumerate() {
        if !color.is_valid() {
            errors.push(VibeError::BadPaletteColor {
                index,
                color: color.0.clone(),
            });
        }
    }
    if vibe.mood_tag.trim().is_empty() {
        errors.push(VibeError::EmptyMoodTag);
    }

    errors
}

/// Wear category of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Pristine,
    Modern,
    Dusty,
    Abandoned,
    Fallout,
}

impl Condition {
    /// Entropy bands of width 0.2, lowest band pristine.
    pub fn from_entropy(entropy: f32) -> Condition {
        if entropy < 0.2 {
            Condition::Pristine
        } else if entropy < 0.4 {
            Condition::Modern
        } else if entropy < 0.6 {
            Condition::Dusty
        } else if entropy < 0.8 {
            Condition::Abandoned
        } else {
            Condition::Fallout
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Condition::Pristine => "pristine",
            Condition::Modern => "modern",
            Condition::Dusty => "dusty",
            Condition::Abandoned => "abandoned",
            Condition::Fallout => "fallout",
        }
    }

    /// Inverse of [`Condition::as_str`].
    pub fn from_name(name: &str) -> Option<Condition> {
        match name {
            "pristine" => Some(Condition::Pristine),
            "modern" => Some(Condition::Modern),
            "dusty" => Some(Condition::Dusty),
            "abandoned" => Some(Condition::Abandoned),
            "fallout" => Some(Condition::Fallout),
            _ => None,
        }
    }
}

/// Warmth band used to pick room assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    Cool,
    Neutral,
    Warm,
}

impl Temperature {
    /// Below 0.33 is cool, above 0.66 warm, anything between neutral.
    pub fn from_warmth(warmth: f32) -> Temperature {
        if warmth < 0.33 {
            Temperature::Cool
        } else if warmth > 0.66 {
            Temperature::Warm
        } else {
            Temperature::Neutral
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Temperature::Cool => "cool",
            Temperature::Neutral => "neutral",
            Temperature::Warm => "warm",
        }
    }
}

/// Asset variant of a claimed room, `"<temperature>-<condition>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantKey {
    pub temperature: Temperature,
    pub condition: Condition,
}

impl VariantKey {
    /// Rooms without a condition use the modern asset set.
    pub fn new(vibe: &VibeVector, condition: Option<Condition>) -> Self {
        Self {
            temperature: Temperature::from_warmth(vibe.warmth),
            condition: condition.unwrap_or(Condition::Modern),
        }
    }

    /// Same as [`VariantKey::new`] for a condition name; unknown names are modern.
    pub fn from_condition_name(vibe: &VibeVector, condition: &str) -> Self {
        Self::new(vibe, Condition::from_name(condition))
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.temperature.as_str(), self.condition.as_str())
    }
}

impl Serialize for VariantKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Cosmetic styling tag on a tile: temperature × texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    #[default]
    Neutral,
    WarmClean,
    WarmDecay,
    CoolClean,
    CoolDecay,
}

impl Variant {
    /// Reduce an influencing vibe to its variant. No influence is neutral.
    pub fn from_vibe(vibe: Option<&VibeVector>) -> Variant {
        let Some(v) = vibe else {
            return Variant::Neutral;
        };
        match (v.warmth >= 0.5, v.entropy >= 0.5) {
            (true, false) => Variant::WarmClean,
            (true, true) => Variant::WarmDecay,
            (false, false) => Variant::CoolClean,
            (false, true) => Variant::CoolDecay,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Neutral => "neutral",
            Variant::WarmClean => "warm-clean",
            Variant::WarmDecay => "warm-decay",
            Variant::CoolClean => "cool-clean",
            Variant::CoolDecay => "cool-decay",
        }
    }
}
