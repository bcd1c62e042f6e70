use std::{cmp::Ordering, fmt};

/// Flow regime of a Mach number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Regime {
    /// `M < 1`.
    Subsonic,
    /// `M = 1`, the area-ratio peak.
    Sonic,
    /// `M > 1`.
    Supersonic,
}

impl Regime {
    /// Classifies a Mach number.
    ///
    /// NaN is reported as supersonic, matching a failed `M < 1` test.
    #[must_use]
    pub fn of(mach: f64) -> Self {
        match mach.partial_cmp(&1.0) {
            Some(Ordering::Less) => Regime::Subsonic,
            Some(Ordering::Equal) => Regime::Sonic,
            Some(Ordering::Greater) | None => Regime::Supersonic,
        }
    }

    /// Lowercase label used in reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Regime::Subsonic => "subsonic",
            Regime::Sonic => "sonic",
            Regime::Supersonic => "supersonic",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_around_one() {
        assert_eq!(Regime::of(0.36), Regime::Subsonic);
        assert_eq!(Regime::of(1.0), Regime::Sonic);
        assert_eq!(Regime::of(1.95), Regime::Supersonic);
        assert_eq!(Regime::Subsonic.to_string(), "subsonic");
    }
}
