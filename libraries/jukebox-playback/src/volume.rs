//! Room volume setting
//!
//! Volume is a percentage chosen by users (0-100%) and handed to the sink as a
//! linear scalar (0.0-1.0). The sink applies it; no DSP happens here.
//!
//! A change only affects the next track start. The track already playing keeps
//! the scalar it was started with.

/// Volume level with a pending-until-next-track contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volume {
    /// Volume level (0-100)
    level: u8,
}

impl Volume {
    /// Create new volume setting
    ///
    /// # Arguments
    /// * `level` - Initial volume (0-100, clamped)
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(100),
        }
    }

    /// Set volume level (0-100, clamped)
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(100);
    }

    /// Get current volume level (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Linear multiplier handed to the sink
    pub fn scalar(&self) -> f32 {
        f32::from(self.level) / 100.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(50)
    }
}
