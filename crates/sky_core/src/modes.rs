/// Freeze mode controls what the sample stops updating.
/// Cycled by Space: Live -> FrozenAnimation -> FrozenLook -> Live.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FreezeMode {
    /// Everything updates.
    #[default]
    Live,
    /// Animation time stops advancing.
    FrozenAnimation,
    /// Animation and mouse look/movement are both frozen.
    FrozenLook,
}

impl FreezeMode {
    /// All modes in cycle order.
    pub const ALL: &'static [FreezeMode] = &[
        FreezeMode::Live,
        FreezeMode::FrozenAnimation,
        FreezeMode::FrozenLook,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Live => "Live",
            Self::FrozenAnimation => "Frozen (animation)",
            Self::FrozenLook => "Frozen (animation + look)",
        }
    }

    /// Numeric value used by the legacy 0..2 encoding.
    pub fn index(self) -> u8 {
        match self {
            Self::Live => 0,
            Self::FrozenAnimation => 1,
            Self::FrozenLook => 2,
        }
    }

    /// Cycle to the next mode (wraps around).
    pub fn next(self) -> Self {
        match self {
            Self::Live => Self::FrozenAnimation,
            Self::FrozenAnimation => Self::FrozenLook,
            Self::FrozenLook => Self::Live,
        }
    }
}

impl std::fmt::Display for FreezeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Highest stat overlay level; one past it wraps to 0.
pub const MAX_STAT_LEVEL: u8 = 2;

/// How much of the frame statistics overlay is drawn. 0 hides it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatLevel(u8);

impl StatLevel {
    pub const HIDDEN: StatLevel = StatLevel(0);
    pub const MAX: StatLevel = StatLevel(MAX_STAT_LEVEL);

    /// Values above `MAX_STAT_LEVEL` are clamped.
    pub fn new(level: u8) -> Self {
        Self(level.min(MAX_STAT_LEVEL))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_visible(self) -> bool {
        self.0 > 0
    }

    pub fn next(self) -> Self {
        if self.0 >= MAX_STAT_LEVEL {
            Self(0)
        } else {
            Self(self.0 + 1)
        }
    }
}

impl std::fmt::Display for StatLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, MAX_STAT_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_freeze_mode_is_live() {
        assert_eq!(FreezeMode::default(), FreezeMode::Live);
        assert_eq!(FreezeMode::default().index(), 0);
    }

    #[test]
    fn freeze_mode_next_cycles_through_all() {
        assert_eq!(FreezeMode::Live.next(), FreezeMode::FrozenAnimation);
        assert_eq!(FreezeMode::FrozenAnimation.next(), FreezeMode::FrozenLook);
        assert_eq!(FreezeMode::FrozenLook.next(), FreezeMode::Live);
    }

    #[test]
    fn freeze_mode_returns_after_three_steps() {
        for &mode in FreezeMode::ALL {
            assert_eq!(mode.next().next().next(), mode);
        }
    }

    #[test]
    fn freeze_mode_indices_follow_cycle_order() {
        for (i, &mode) in FreezeMode::ALL.iter().enumerate() {
            assert_eq!(mode.index() as usize, i);
        }
    }

    #[test]
    fn display_matches_label() {
        for &mode in FreezeMode::ALL {
            assert_eq!(format!("{}", mode), mode.label());
        }
    }

    #[test]
    fn stat_level_wraps_after_max_plus_one_steps() {
        let mut level = StatLevel::default();
        for _ in 0..=MAX_STAT_LEVEL {
            level = level.next();
        }
        assert_eq!(level, StatLevel::HIDDEN);
    }

    #[test]
    fn stat_level_at_max_wraps_to_zero() {
        assert_eq!(StatLevel::MAX.next(), StatLevel::HIDDEN);
        assert_eq!(StatLevel::MAX.next().next(), StatLevel::new(1));
    }

    #[test]
    fn stat_level_new_clamps_to_max() {
        assert_eq!(StatLevel::new(200), StatLevel::MAX);
        assert!(!StatLevel::new(0).is_visible());
        assert!(StatLevel::new(1).is_visible());
    }
}
