use serde::{Deserialize, Serialize};

/// Errors from invalid layout parameters.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LayoutError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("city_size must be at least 1")]
    EmptyCity,
    #[error("{name}: min {min} exceeds max {max}")]
    InvertedRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{name} must be within [0, 1], got {value}")]
    FractionOutOfRange { name: &'static str, value: f32 },
    #[error(
        "lot too small: {lot:.2} available per building, min_building_size is {min_building_size:.2}"
    )]
    LotTooSmall { lot: f32, min_building_size: f32 },
}

/// City generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityConfig {
    /// Side length of a block interior.
    pub block_size: f32,
    /// Width of every street.
    pub street_width: f32,
    /// Grid side length in blocks.
    pub city_size: u32,
    /// Clearance between buildings and the street edge.
    pub building_padding: f32,
    pub min_building_size: f32,
    pub min_building_height: f32,
    pub max_building_height: f32,
    pub min_buildings_per_block: u32,
    pub max_buildings_per_block: u32,
    /// Probability that a street-edge lamp site gets a lamp.
    pub street_light_fraction: f32,
    /// Probability that a block gets a reflective prop.
    pub prop_fraction: f32,
    pub light_height: f32,
    pub light_range: f32,
    /// Fixed seed for reproducible layouts. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            block_size: 40.0,
            street_width: 12.0,
            city_size: 8,
            building_padding: 3.0,
            min_building_size: 8.0,
            min_building_height: 10.0,
            max_building_height: 60.0,
            min_buildings_per_block: 1,
            max_buildings_per_block: 2,
            street_light_fraction: 0.35,
            prop_fraction: 0.2,
            light_height: 6.0,
            light_range: 25.0,
            seed: None,
        }
    }
}

impl CityConfig {
    /// Distance between neighbouring street centerlines.
    pub fn pitch(&self) -> f32 {
        self.block_size + self.street_width
    }

    /// Side length of the square the whole city tiles into.
    pub fn chunk_size(&self) -> f32 {
        self.city_size as f32 * self.pitch()
    }

    /// Usable building width inside a block once padding is removed.
    pub fn buildable_width(&self) -> f32 {
        self.block_size - 2.0 * self.building_padding
    }

    /// Width of one building lot when a block is split into `count` lots.
    pub fn lot_width(&self, count: u32) -> f32 {
        let count = count.max(1) as f32;
        (self.buildable_width() - (count - 1.0) * self.building_padding) / count
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        for (name, value) in [
            ("block_size", self.block_size),
            ("street_width", self.street_width),
            ("min_building_size", self.min_building_size),
            ("min_building_height", self.min_building_height),
            ("light_height", self.light_height),
            ("light_range", self.light_range),
        ] {
            if !(value > 0.0) {
                return Err(LayoutError::NonPositive { name, value });
            }
        }
        if self.building_padding < 0.0 {
            return Err(LayoutError::NonPositive {
                name: "building_padding",
                value: self.building_padding,
            });
        }
        if self.city_size == 0 {
            return Err(LayoutError::EmptyCity);
        }
        if self.min_building_height > self.max_building_height {
            return Err(LayoutError::InvertedRange {
                name: "building_height",
                min: self.min_building_height,
                max: self.max_building_height,
            });
        }
        if self.min_buildings_per_block == 0
            || self.min_buildings_per_block > self.max_buildings_per_block
        {
            return Err(LayoutError::InvertedRange {
                name: "buildings_per_block",
                min: self.min_buildings_per_block as f32,
                max: self.max_buildings_per_block as f32,
            });
        }
        for (name, value) in [
            ("street_light_fraction", self.street_light_fraction),
            ("prop_fraction", self.prop_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(LayoutError::FractionOutOfRange { name, value });
            }
        }
        let lot = self.lot_width(self.max_buildings_per_block);
        if lot < self.min_building_size {
            return Err(LayoutError::LotTooSmall {
                lot,
                min_building_size: self.min_building_size,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = CityConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.pitch(), 52.0);
        assert_eq!(c.chunk_size(), 416.0);
    }

    #[test]
    fn padding_too_large_is_rejected() {
        let c = CityConfig {
            building_padding: 15.0,
            ..CityConfig::default()
        };
        assert!(matches!(c.validate(), Err(LayoutError::LotTooSmall { .. })));
    }

    #[test]
    fn fractions_are_checked() {
        let c = CityConfig {
            prop_fraction: 1.5,
            ..CityConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(LayoutError::FractionOutOfRange {
                name: "prop_fraction",
                value: 1.5
            })
        );
    }

    #[test]
    fn zero_city_is_rejected() {
        let c = CityConfig {
            city_size: 0,
            ..CityConfig::default()
        };
        assert_eq!(c.validate(), Err(LayoutError::EmptyCity));
    }

    #[test]
    fn inverted_heights_are_rejected() {
        let c = CityConfig {
            min_building_height: 80.0,
            ..CityConfig::default()
        };
        assert!(matches!(c.validate(), Err(LayoutError::InvertedRange { .. })));
    }

    #[test]
    fn lot_width_accounts_for_gaps() {
        let c = CityConfig::default();
        assert_eq!(c.lot_width(1), 34.0);
        assert_eq!(c.lot_width(2), 15.5);
    }
}
