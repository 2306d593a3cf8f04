//! Organism: a placement rule, not a live instance.
//!
//! Each sub-biome owns an ordered list of organisms describing what can be
//! scattered there, how often, and under which terrain gates.

/// A placement rule for one kind of scatterable object.
#[derive(Clone, Debug)]
pub struct Organism {
    /// Kind name; also the key into the per-kind reuse pool.
    pub name: String,
    /// Relative likelihood among this sub-biome's organisms. Weights are
    /// normalized at pick time and need not sum to 1.
    pub weight: f64,
    /// Probability in `[0, 1]` of rejecting an otherwise-eligible candidate.
    pub scarcity: f64,
    /// Optional `[low, high]` gate on normalized elevation.
    pub elevation_range: Option<(f64, f64)>,
    /// Optional `[low, high]` gate on normalized moisture.
    pub moisture_range: Option<(f64, f64)>,
    /// Uniform scale is drawn from this `[min, max]` range per placement.
    pub scale_range: (f64, f64),
    /// Half-extent of the padded bounding box in world units, used for
    /// commit-time collision tests and Poisson spacing.
    pub footprint: f64,
    /// `true` if this organism sits on the water surface instead of land.
    pub floats: bool,
}

impl Organism {
    /// Returns `true` if the terrain gates admit a candidate at the given
    /// normalized elevation and moisture.
    pub fn admits(&self, elevation: f64, moisture: f64) -> bool {
        let elevation_ok = self
            .elevation_range
            .is_none_or(|(lo, hi)| elevation >= lo && elevation <= hi);
        let moisture_ok = self
            .moisture_range
            .is_none_or(|(lo, hi)| moisture >= lo && moisture <= hi);
        elevation_ok && moisture_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gated() -> Organism {
        Organism {
            name: "pine".into(),
            weight: 1.0,
            scarcity: 0.0,
            elevation_range: Some((0.4, 0.8)),
            moisture_range: Some((0.3, 1.0)),
            scale_range: (0.8, 1.2),
            footprint: 5.0,
            floats: false,
        }
    }

    #[test]
    fn test_admits_inside_both_ranges() {
        assert!(gated().admits(0.5, 0.6));
    }

    #[test]
    fn test_rejects_outside_elevation_range() {
        assert!(!gated().admits(0.2, 0.6));
        assert!(!gated().admits(0.9, 0.6));
    }

    #[test]
    fn test_rejects_outside_moisture_range() {
        assert!(!gated().admits(0.5, 0.1));
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        assert!(gated().admits(0.4, 0.3));
        assert!(gated().admits(0.8, 1.0));
    }

    #[test]
    fn test_ungated_organism_admits_everything() {
        let org = Organism {
            elevation_range: None,
            moisture_range: None,
            ..gated()
        };
        assert!(org.admits(0.0, 0.0));
        assert!(org.admits(1.0, 1.0));
    }
}
