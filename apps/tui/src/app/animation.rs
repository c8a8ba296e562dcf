use crate::scorecard::SeriesKey;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Outline reveal duration per series.
pub const REVEAL: Duration = Duration::from_millis(800);
/// Fill fade-in duration, started once the outline is complete.
pub const FILL_FADE: Duration = Duration::from_millis(500);
/// Final fill opacity once settled.
pub const FILL_OPACITY: f64 = 0.3;

/// Per-series intro animation. Each polygon traces its outline, then
/// fades its fill in, then settles; the states only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesAnimation {
    Reveal { started: Instant },
    FillFade { started: Instant },
    Settled,
}

impl SeriesAnimation {
    fn advance(self, now: Instant) -> Self {
        match self {
            Self::Reveal { started } if now.duration_since(started) >= REVEAL => {
                Self::FillFade { started: now }
            }
            Self::FillFade { started } if now.duration_since(started) >= FILL_FADE => Self::Settled,
            other => other,
        }
    }

    /// Fraction of the outline perimeter drawn so far, 0..=1.
    pub fn reveal_progress(self, now: Instant) -> f64 {
        match self {
            Self::Reveal { started } => {
                (now.duration_since(started).as_secs_f64() / REVEAL.as_secs_f64()).clamp(0.0, 1.0)
            }
            Self::FillFade { .. } | Self::Settled => 1.0,
        }
    }

    /// Current fill opacity, 0..=FILL_OPACITY.
    pub fn fill_opacity(self, now: Instant) -> f64 {
        match self {
            Self::Reveal { .. } => 0.0,
            Self::FillFade { started } => {
                let fraction = (now.duration_since(started).as_secs_f64()
                    / FILL_FADE.as_secs_f64())
                .clamp(0.0, 1.0);
                fraction * FILL_OPACITY
            }
            Self::Settled => FILL_OPACITY,
        }
    }

    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Settled)
    }
}

/// Tracks one animation per visible series, keyed by identity. A series
/// that stays selected across a view refresh keeps its state; newcomers
/// start a fresh reveal; departed series are forgotten.
#[derive(Debug, Default)]
pub struct AnimationSet {
    states: HashMap<SeriesKey, SeriesAnimation>,
}

impl AnimationSet {
    pub fn sync(&mut self, visible: impl Iterator<Item = SeriesKey>, now: Instant) {
        let mut next = HashMap::new();
        for key in visible {
            let state = self
                .states
                .remove(&key)
                .unwrap_or(SeriesAnimation::Reveal { started: now });
            next.insert(key, state);
        }
        self.states = next;
    }

    pub fn tick(&mut self, now: Instant) {
        for state in self.states.values_mut() {
            *state = state.advance(now);
        }
    }

    /// Jumps every series to its settled appearance. Used when a series
    /// gets highlighted so dimming never fights the intro.
    pub fn settle_all(&mut self) {
        for state in self.states.values_mut() {
            *state = SeriesAnimation::Settled;
        }
    }

    pub fn get(&self, key: SeriesKey) -> SeriesAnimation {
        self.states.get(&key).copied().unwrap_or(SeriesAnimation::Settled)
    }

    pub fn all_settled(&self) -> bool {
        self.states.values().all(|state| state.is_settled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Country, Series, YearSlot};

    fn key(country: Country, slot: YearSlot) -> SeriesKey {
        SeriesKey::new(Series::Country(country), slot)
    }

    #[test]
    fn reveal_then_fill_then_settled() {
        let start = Instant::now();
        let mut set = AnimationSet::default();
        let india = key(Country::India, YearSlot::First);
        set.sync(std::iter::once(india), start);

        assert!((set.get(india).reveal_progress(start + REVEAL / 2) - 0.5).abs() < 1e-9);
        assert!(set.get(india).fill_opacity(start) < 1e-9);

        set.tick(start + REVEAL);
        let SeriesAnimation::FillFade { started } = set.get(india) else {
            panic!("expected fill fade");
        };
        assert!((set.get(india).reveal_progress(started)) >= 1.0);
        let mid = started + FILL_FADE / 2;
        assert!((set.get(india).fill_opacity(mid) - FILL_OPACITY / 2.0).abs() < 0.01);

        set.tick(started + FILL_FADE);
        assert!(set.get(india).is_settled());
        assert!((set.get(india).fill_opacity(started + FILL_FADE) - FILL_OPACITY).abs() < 1e-9);
        assert!(set.all_settled());
    }

    #[test]
    fn sync_keeps_survivors_and_restarts_newcomers() {
        let start = Instant::now();
        let mut set = AnimationSet::default();
        let india = key(Country::India, YearSlot::First);
        let nepal = key(Country::Nepal, YearSlot::First);

        set.sync(std::iter::once(india), start);
        set.tick(start + REVEAL);
        set.tick(start + REVEAL + FILL_FADE);
        assert!(set.get(india).is_settled());

        let later = start + REVEAL + FILL_FADE;
        set.sync([india, nepal].into_iter(), later);
        assert!(set.get(india).is_settled());
        assert!(matches!(set.get(nepal), SeriesAnimation::Reveal { .. }));

        // Dropping India forgets it; re-adding restarts the reveal.
        set.sync(std::iter::once(nepal), later);
        set.sync([india, nepal].into_iter(), later);
        assert!(matches!(set.get(india), SeriesAnimation::Reveal { .. }));
    }

    #[test]
    fn settle_all_short_circuits_the_intro() {
        let start = Instant::now();
        let mut set = AnimationSet::default();
        let india = key(Country::India, YearSlot::First);
        set.sync(std::iter::once(india), start);
        set.settle_all();
        assert!(set.get(india).is_settled());
        assert!((set.get(india).fill_opacity(start) - FILL_OPACITY).abs() < 1e-9);
    }
}
