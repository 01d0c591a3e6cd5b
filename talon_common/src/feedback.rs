//! Feedback device value types: indicator colours, LED animations, rumble.

use serde::{Deserialize, Serialize};

/// 8-bit RGB colour. Serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const OFF: Self = Self(0, 0, 0);
    pub const RED: Self = Self(255, 0, 0);
    pub const GREEN: Self = Self(0, 255, 0);
    pub const BLUE: Self = Self(0, 0, 255);
    pub const YELLOW: Self = Self(255, 200, 0);
    pub const ORANGE: Self = Self(255, 80, 0);
    pub const PURPLE: Self = Self(160, 0, 255);
}

/// Animation pattern run by the LED controller in an animation slot.
///
/// Only one animation may occupy a slot at a time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedAnimation {
    Strobe { color: Rgb, speed: f64 },
    Larson { color: Rgb, speed: f64 },
    SingleFade { color: Rgb, speed: f64 },
    ColorFlow { color: Rgb, speed: f64 },
    Twinkle { color: Rgb, speed: f64 },
    Rainbow { brightness: f64, speed: f64 },
}

/// Which rumble motor of the operator controller to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RumbleSide {
    Left,
    Right,
    Both,
}
