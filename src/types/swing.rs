// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Louver swing types.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;
use crate::types::FunctionId;

/// One of the three independent swing functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Swing {
    /// Vertical louver swing (359).
    Vertical,
    /// Horizontal louver swing (360).
    Horizontal,
    /// Combined 3D swing (361).
    ThreeD,
}

impl Swing {
    /// All swing functions in id order.
    pub const ALL: [Self; 3] = [Self::Vertical, Self::Horizontal, Self::ThreeD];

    /// Returns the function id of this swing.
    #[must_use]
    pub const fn function_id(&self) -> FunctionId {
        match self {
            Self::Vertical => FunctionId::VERTICAL_SWING,
            Self::Horizontal => FunctionId::HORIZONTAL_SWING,
            Self::ThreeD => FunctionId::SWING_3D,
        }
    }

    /// Returns the name of the swing.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
            Self::ThreeD => "3d",
        }
    }
}

impl fmt::Display for Swing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combined swing selector exposed by climate entities.
///
/// `Both` is satisfied either by 3D swing or by vertical and horizontal
/// swing running together.
///
/// # Examples
///
/// ```
/// use daichi_hvac::types::SwingMode;
///
/// assert_eq!("both".parse::<SwingMode>().unwrap(), SwingMode::Both);
/// assert_eq!(SwingMode::Vertical.as_str(), "vertical");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwingMode {
    /// No swing active.
    #[default]
    Off,
    /// Vertical swing only.
    Vertical,
    /// Horizontal swing only.
    Horizontal,
    /// Swing in both directions.
    Both,
}

impl SwingMode {
    /// Returns the entity-facing name of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for SwingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwingMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "vertical" => Ok(Self::Vertical),
            "horizontal" => Ok(Self::Horizontal),
            "both" | "3d" => Ok(Self::Both),
            _ => Err(ValueError::UnknownVariant {
                kind: "swing mode",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_ids_are_swing_functions() {
        let ids: Vec<u32> = Swing::ALL.iter().map(|s| s.function_id().value()).collect();
        assert_eq!(ids, vec![359, 360, 361]);
    }

    #[test]
    fn parse_swing_mode() {
        assert_eq!("OFF".parse::<SwingMode>().unwrap(), SwingMode::Off);
        assert_eq!("3d".parse::<SwingMode>().unwrap(), SwingMode::Both);
        assert!("diagonal".parse::<SwingMode>().is_err());
    }
}
