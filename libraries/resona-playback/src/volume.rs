//! Volume level and mute state
//!
//! Level is a linear 0.0-1.0 factor handed straight to the media output;
//! the output applies its own perceptual curve.

use serde::{Deserialize, Serialize};

/// Volume level with mute flag
///
/// Muting preserves the level so unmuting restores it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f64,

    /// Mute state as last reported by the output
    muted: bool,
}

impl Volume {
    /// Create new volume state
    ///
    /// # Arguments
    /// * `level` - Initial volume, clamped to 0.0-1.0
    pub fn new(level: f64) -> Self {
        Self {
            level: clamp_level(level),
            muted: false,
        }
    }

    /// Set volume level, returning the clamped value that was stored
    pub fn set_level(&mut self, level: f64) -> f64 {
        self.level = clamp_level(level);
        self.level
    }

    /// Get current volume level (0.0-1.0)
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Record the output's mute state
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level as a whole percentage for display
    pub fn percent(&self) -> u8 {
        (self.level * 100.0).round() as u8
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}

fn clamp_level(level: f64) -> f64 {
    if level.is_nan() {
        return 0.0;
    }
    level.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_volume() {
        let vol = Volume::new(0.8);
        assert_eq!(vol.level(), 0.8);
        assert!(!vol.is_muted());
    }

    #[test]
    fn set_volume_level_clamps() {
        let mut vol = Volume::new(0.5);

        assert_eq!(vol.set_level(1.5), 1.0);
        assert_eq!(vol.level(), 1.0);

        assert_eq!(vol.set_level(-0.2), 0.0);
        assert_eq!(vol.level(), 0.0);
    }

    #[test]
    fn mute_preserves_level() {
        let mut vol = Volume::new(0.8);

        vol.set_muted(true);
        assert!(vol.is_muted());
        assert_eq!(vol.level(), 0.8);

        vol.set_muted(false);
        assert!(!vol.is_muted());
        assert_eq!(vol.level(), 0.8);
    }

    #[test]
    fn percent_rounds() {
        assert_eq!(Volume::new(0.456).percent(), 46);
        assert_eq!(Volume::new(1.0).percent(), 100);
        assert_eq!(Volume::new(0.0).percent(), 0);
    }

    #[test]
    fn nan_clamps_to_silence() {
        assert_eq!(Volume::new(f64::NAN).level(), 0.0);
    }
}
