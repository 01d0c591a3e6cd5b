//! Indicator lights proxy.

use talon_common::consts::LED_ANIMATION_SLOTS;
use talon_common::feedback::{LedAnimation, Rgb};

use crate::subsystem::sim::SimHandle;

/// Addressable LED strip with a fixed number of animation slots.
pub trait Leds {
    /// Fill the whole strip with one colour.
    fn set_color(&mut self, color: Rgb);
    /// Colour `len` LEDs starting at `start`.
    fn set_segment(&mut self, color: Rgb, start: u16, len: u16);
    /// Run `animation` in `slot`, replacing whatever occupied it.
    fn set_animation(&mut self, animation: LedAnimation, slot: usize);
    /// Stop every running animation.
    fn clear_animation(&mut self);
}

#[derive(Debug, Clone)]
pub struct LedsModel {
    pub pixels: Vec<Rgb>,
    pub animations: [Option<LedAnimation>; LED_ANIMATION_SLOTS],
}

impl Default for LedsModel {
    fn default() -> Self {
        Self {
            pixels: vec![Rgb::OFF; 8],
            animations: [None; LED_ANIMATION_SLOTS],
        }
    }
}

impl LedsModel {
    pub fn any_animation(&self) -> bool {
        self.animations.iter().any(Option::is_some)
    }
}

pub type SimLeds = SimHandle<LedsModel>;

impl Leds for SimHandle<LedsModel> {
    fn set_color(&mut self, color: Rgb) {
        self.model_mut().pixels.fill(color);
    }

    fn set_segment(&mut self, color: Rgb, start: u16, len: u16) {
        let mut m = self.model_mut();
        let end = (usize::from(start) + usize::from(len)).min(m.pixels.len());
        let start = usize::from(start).min(end);
        m.pixels[start..end].fill(color);
    }

    fn set_animation(&mut self, animation: LedAnimation, slot: usize) {
        if let Some(entry) = self.model_mut().animations.get_mut(slot) {
            *entry = Some(animation);
        }
    }

    fn clear_animation(&mut self) {
        self.model_mut().animations = [None; LED_ANIMATION_SLOTS];
    }
}
