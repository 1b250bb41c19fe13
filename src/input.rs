//! Keyboard handling.
//!
//! Keys are polled once per frame and turned into changes of [`Controls`].

use sdl2::keyboard::Scancode;

use crate::{
    config::{KeyBindingNames, Variant},
    error::AppError,
};

/// Resolved key bindings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyBindings {
    pub quit: Scancode,
    pub mix_up: Scancode,
    pub mix_down: Scancode,
}

impl KeyBindings {
    /// Resolves scancode names such as `"Escape"` or `"Up"`.
    pub fn from_names(names: &KeyBindingNames) -> Result<Self, AppError> {
        let resolve = |name: &str| {
            Scancode::from_name(name)
                .ok_or_else(|| AppError::Config(format!("unknown key '{name}'")))
        };
        Ok(Self {
            quit: resolve(&names.quit)?,
            mix_up: resolve(&names.mix_up)?,
            mix_down: resolve(&names.mix_down)?,
        })
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: Scancode::Escape,
            mix_up: Scancode::Up,
            mix_down: Scancode::Down,
        }
    }
}

/// State changed by input and read by the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Controls {
    running: bool,
    mix_value: f32,
}

impl Controls {
    /// Weight of the second texture when blending.
    pub const MIX_MAX: f32 = 1.0;
    pub const MIX_MIN: f32 = 0.0;
    pub const MIX_DEFAULT: f32 = 0.2;

    pub fn new() -> Self {
        Self {
            running: true,
            mix_value: Self::MIX_DEFAULT,
        }
    }

    /// Applies the keys currently held down. The mix keys only act on the textured quad and
    /// snap the weight to its extremes.
    pub fn process(
        &mut self,
        bindings: &KeyBindings,
        variant: Variant,
        is_down: impl Fn(Scancode) -> bool,
    ) {
        if is_down(bindings.quit) {
            self.running = false;
        }

        if variant == Variant::TexturedQuad {
            if is_down(bindings.mix_up) {
                self.mix_value = Self::MIX_MAX;
            }
            if is_down(bindings.mix_down) {
                self.mix_value = Self::MIX_MIN;
            }
        }
    }

    /// Requests the frame loop to stop.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn mix_value(&self) -> f32 {
        self.mix_value
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}
