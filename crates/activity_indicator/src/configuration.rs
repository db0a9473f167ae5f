//! Static shape descriptor attached to the indicator.

use serde::Serialize;
use std::ops::Range;

/// Nominal blade count published by [`CONFIGURATION`].
pub const NOMINAL_BLADE_COUNT: usize = 8;

/// Process-wide descriptor, fixed at compile time.
pub const CONFIGURATION: IndicatorConfiguration = IndicatorConfiguration::new(NOMINAL_BLADE_COUNT);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Nominal blade count plus an index sequence for templated blade rendering.
///
/// The published count (8) does not drive rendering: every render emits
/// [`RENDERED_BAR_COUNT`](crate::RENDERED_BAR_COUNT) bars. The descriptor is kept for hosts that
/// read it.
pub struct IndicatorConfiguration {
    number_of_blades: usize,
}

impl IndicatorConfiguration {
    const fn new(number_of_blades: usize) -> Self {
        Self { number_of_blades }
    }

    /// Nominal blade count.
    pub const fn number_of_blades(&self) -> usize {
        self.number_of_blades
    }

    /// One index per nominal blade.
    pub fn iterate(&self) -> Range<usize> {
        0..self.number_of_blades
    }

    pub(crate) fn snapshot(&self) -> ConfigurationSnapshot {
        ConfigurationSnapshot {
            number_of_blades: self.number_of_blades,
            iterate: self.iterate().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfigurationSnapshot {
    number_of_blades: usize,
    iterate: Vec<usize>,
}
