//! Phase-space coordinate channels carried by every macro-particle.

use std::fmt;

/// One of the six index-aligned coordinate arrays of a particle population.
///
/// The discriminant doubles as a dense index (`0..Channel::COUNT`) so that
/// per-channel tables can be plain fixed-size arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    /// Horizontal position.
    X = 0,
    /// Horizontal angle.
    Xp = 1,
    /// Vertical position.
    Y = 2,
    /// Vertical angle.
    Yp = 3,
    /// Longitudinal coordinate, the slicing axis.
    Dz = 4,
    /// Relative momentum offset.
    Dp = 5,
}

impl Channel {
    /// Number of channels.
    pub const COUNT: usize = 6;

    /// All channels in index order.
    pub const ALL: [Channel; Channel::COUNT] = [
        Channel::X,
        Channel::Xp,
        Channel::Y,
        Channel::Yp,
        Channel::Dz,
        Channel::Dp,
    ];

    /// Dense index of this channel in `0..Channel::COUNT`.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short lowercase name, matching the conventional array names.
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Xp => "xp",
            Self::Y => "y",
            Self::Yp => "yp",
            Self::Dz => "dz",
            Self::Dp => "dp",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense_and_ordered() {
        for (i, ch) in Channel::ALL.iter().enumerate() {
            assert_eq!(ch.index(), i);
        }
    }

    #[test]
    fn display_uses_short_name() {
        assert_eq!(Channel::Dz.to_string(), "dz");
        assert_eq!(Channel::Xp.to_string(), "xp");
    }
}
