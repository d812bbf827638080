//! Named sound catalogue
//!
//! The fixed set of sound effects the game can ask for, and the cache that
//! holds their rendered buffers.

use super::tone::{synthesize, ToneBuffer};
use crate::types::audio_config::{ToneSpec, Waveform};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Every sound effect callers may request by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum SoundName {
    Click,
    Success,
    LevelComplete,
    ColorSelect,
    CoinEarned,
    CorrectMatch,
    Celebration,
    Magical,
    Sparkle,
}

impl SoundName {
    pub const ALL: [SoundName; 9] = [
        SoundName::Click,
        SoundName::Success,
        SoundName::LevelComplete,
        SoundName::ColorSelect,
        SoundName::CoinEarned,
        SoundName::CorrectMatch,
        SoundName::Celebration,
        SoundName::Magical,
        SoundName::Sparkle,
    ];

    /// The catalogue key, as callers spell it
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundName::Click => "click",
            SoundName::Success => "success",
            SoundName::LevelComplete => "levelComplete",
            SoundName::ColorSelect => "colorSelect",
            SoundName::CoinEarned => "coinEarned",
            SoundName::CorrectMatch => "correctMatch",
            SoundName::Celebration => "celebration",
            SoundName::Magical => "magical",
            SoundName::Sparkle => "sparkle",
        }
    }

    pub fn tone_spec(&self) -> ToneSpec {
        use Waveform::{Sine, Triangle};
        match self {
            SoundName::Click => ToneSpec::preset(800.0, 0.15, Triangle),
            SoundName::Success => ToneSpec::preset(523.0, 0.4, Sine),
            SoundName::LevelComplete => ToneSpec::preset(659.0, 0.6, Sine),
            SoundName::ColorSelect => ToneSpec::preset(880.0, 0.3, Triangle),
            SoundName::CoinEarned => ToneSpec::preset(1047.0, 0.25, Sine),
            SoundName::CorrectMatch => ToneSpec::preset(698.0, 0.3, Sine),
            SoundName::Celebration => ToneSpec::preset(880.0, 0.5, Sine),
            SoundName::Magical => ToneSpec::preset(1047.0, 0.3, Sine),
            SoundName::Sparkle => ToneSpec::preset(1319.0, 0.2, Triangle),
        }
    }
}

impl fmt::Display for SoundName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no catalogue entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSound(pub String);

impl fmt::Display for UnknownSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sound '{}'", self.0)
    }
}

impl std::error::Error for UnknownSound {}

impl FromStr for SoundName {
    type Err = UnknownSound;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoundName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownSound(s.to_string()))
    }
}

/// Rendered buffers for the whole catalogue, built once
#[derive(Debug, Clone, Default)]
pub struct SoundCache {
    buffers: HashMap<SoundName, ToneBuffer>,
}

impl SoundCache {
    /// Render every catalogue entry at `sample_rate`
    pub fn build(sample_rate: u32) -> Self {
        let buffers = SoundName::ALL
            .into_iter()
            .map(|name| (name, synthesize(&name.tone_spec(), sample_rate)))
            .collect();
        Self { buffers }
    }

    /// A cache with nothing in it, for engines with no output
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, name: SoundName) -> Option<&ToneBuffer> {
        self.buffers.get(&name)
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_strings() {
        for name in SoundName::ALL {
            assert_eq!(name.as_str().parse::<SoundName>(), Ok(name));
        }
        assert_eq!(
            "fanfare".parse::<SoundName>(),
            Err(UnknownSound("fanfare".to_string()))
        );
        // Keys are case-sensitive
        assert!("Click".parse::<SoundName>().is_err());
    }

    #[test]
    fn test_catalogue_table() {
        let sparkle = SoundName::Sparkle.tone_spec();
        assert_eq!(sparkle.frequency, 1319.0);
        assert_eq!(sparkle.duration, 0.2);
        assert_eq!(sparkle.waveform, Waveform::Triangle);

        let level_complete = SoundName::LevelComplete.tone_spec();
        assert_eq!(level_complete.frequency, 659.0);
        assert_eq!(level_complete.duration, 0.6);
        assert_eq!(level_complete.waveform, Waveform::Sine);
    }

    #[test]
    fn test_cache_holds_every_sound() {
        let cache = SoundCache::build(22050);
        assert_eq!(cache.len(), SoundName::ALL.len());
        for name in SoundName::ALL {
            let buffer = cache.get(name).unwrap();
            assert_eq!(buffer.len(), name.tone_spec().sample_count(22050));
        }
    }

    #[test]
    fn test_cached_buffers_match_fresh_synthesis() {
        let cache = SoundCache::build(44100);
        let fresh = synthesize(&SoundName::CoinEarned.tone_spec(), 44100);
        assert_eq!(cache.get(SoundName::CoinEarned), Some(&fresh));
    }

    #[test]
    fn test_empty_cache() {
        assert!(SoundCache::empty().get(SoundName::Click).is_none());
    }
}
