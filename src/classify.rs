//! Frequency-based sound source heuristics.
//!
//! Both classifiers are pure functions of the dominant frequency. There is no
//! hysteresis, so labels follow the readout frame by frame.

use crate::i18n::Translations;

/// Likely source of the current sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoundSource {
    Human,
    Bird,
    Dog,
    Cat,
    #[default]
    Unknown,
}

/// Inclusive frequency ranges, checked in order (first match wins)
const SOURCE_RANGES_HZ: [(SoundSource, u32, u32); 4] = [
    (SoundSource::Human, 85, 255),
    (SoundSource::Bird, 1000, 8000),
    (SoundSource::Dog, 40, 60),
    (SoundSource::Cat, 60, 80),
];

impl SoundSource {
    /// Classify a dominant frequency (Hz)
    pub fn classify(frequency_hz: u32) -> Self {
        SOURCE_RANGES_HZ
            .iter()
            .find(|(_, min, max)| (*min..=*max).contains(&frequency_hz))
            .map(|(source, _, _)| *source)
            .unwrap_or(SoundSource::Unknown)
    }

    pub fn label(self, t: &Translations) -> &'static str {
        match self {
            SoundSource::Human => t.analysis.human,
            SoundSource::Bird => t.analysis.bird,
            SoundSource::Dog => t.analysis.dog,
            SoundSource::Cat => t.analysis.cat,
            SoundSource::Unknown => t.analysis.unknown,
        }
    }
}

/// Coarse position of a frequency relative to human hearing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundType {
    /// Below 20 Hz
    Infrasound,
    Audible,
    /// Above 20 kHz
    Ultrasound,
}

impl SoundType {
    pub fn from_frequency(frequency_hz: u32) -> Self {
        if frequency_hz < 20 {
            SoundType::Infrasound
        } else if frequency_hz > 20_000 {
            SoundType::Ultrasound
        } else {
            SoundType::Audible
        }
    }

    pub fn label(self, t: &Translations) -> &'static str {
        match self {
            SoundType::Infrasound => t.sound_type.infrasound,
            SoundType::Audible => t.sound_type.audible,
            SoundType::Ultrasound => t.sound_type.ultrasound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;

    #[test]
    fn test_reference_frequencies() {
        assert_eq!(SoundSource::classify(150), SoundSource::Human);
        assert_eq!(SoundSource::classify(3000), SoundSource::Bird);
        assert_eq!(SoundSource::classify(50), SoundSource::Dog);
        assert_eq!(SoundSource::classify(70), SoundSource::Cat);
        assert_eq!(SoundSource::classify(10000), SoundSource::Unknown);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert_eq!(SoundSource::classify(85), SoundSource::Human);
        assert_eq!(SoundSource::classify(255), SoundSource::Human);
        assert_eq!(SoundSource::classify(1000), SoundSource::Bird);
        assert_eq!(SoundSource::classify(8000), SoundSource::Bird);
        assert_eq!(SoundSource::classify(40), SoundSource::Dog);
        assert_eq!(SoundSource::classify(80), SoundSource::Cat);
    }

    #[test]
    fn test_shared_edge_goes_to_first_match() {
        // 60 Hz sits in both the dog and cat ranges; dog is checked first
        assert_eq!(SoundSource::classify(60), SoundSource::Dog);
        assert_eq!(SoundSource::classify(61), SoundSource::Cat);
    }

    #[test]
    fn test_gaps_are_unknown() {
        for hz in [0, 39, 81, 84, 256, 999, 8001] {
            assert_eq!(SoundSource::classify(hz), SoundSource::Unknown, "{} Hz", hz);
        }
    }

    #[test]
    fn test_sound_type_boundaries() {
        assert_eq!(SoundType::from_frequency(0), SoundType::Infrasound);
        assert_eq!(SoundType::from_frequency(19), SoundType::Infrasound);
        assert_eq!(SoundType::from_frequency(20), SoundType::Audible);
        assert_eq!(SoundType::from_frequency(20_000), SoundType::Audible);
        assert_eq!(SoundType::from_frequency(20_001), SoundType::Ultrasound);
    }

    #[test]
    fn test_labels_follow_language() {
        let en = Language::En.translations();
        let ru = Language::Ru.translations();
        assert_eq!(SoundSource::Bird.label(en), "Bird");
        assert_eq!(SoundSource::Bird.label(ru), "Птица");
        assert_eq!(SoundType::Audible.label(en), "Audible Sound");
    }
}
