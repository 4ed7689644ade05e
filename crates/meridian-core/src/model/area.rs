//! Areas of use

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees; `west > east` crosses the antimeridian
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaOfUse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl AreaOfUse {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            name: None,
            west,
            south,
            east,
            north,
        }
    }

    pub fn named(name: impl Into<String>, west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(west, south, east, north)
        }
    }

    pub fn world() -> Self {
        Self::named("World", -180.0, -90.0, 180.0, 90.0)
    }

    fn longitude_ranges(&self) -> Vec<(f64, f64)> {
        if self.west <= self.east {
            vec![(self.west, self.east)]
        } else {
            vec![(self.west, 180.0), (-180.0, self.east)]
        }
    }

    /// Whether two areas share any point, edges included
    pub fn intersects(&self, other: &AreaOfUse) -> bool {
        if self.south > other.north || other.south > self.north {
            return false;
        }
        let theirs = other.longitude_ranges();
        self.longitude_ranges().iter().any(|(w1, e1)| {
            theirs
                .iter()
                .any(|(w2, e2)| w1 <= e2 && w2 <= e1)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_boxes() {
        let europe = AreaOfUse::new(-10.0, 35.0, 30.0, 70.0);
        let germany = AreaOfUse::new(5.0, 47.0, 15.0, 55.0);
        let australia = AreaOfUse::new(112.0, -44.0, 154.0, -10.0);
        assert!(europe.intersects(&germany));
        assert!(germany.intersects(&europe));
        assert!(!europe.intersects(&australia));
    }

    #[test]
    fn test_antimeridian_crossing() {
        let fiji = AreaOfUse::new(176.0, -21.0, -178.0, -12.0);
        let east_of_line = AreaOfUse::new(-179.5, -20.0, -179.0, -15.0);
        let far_away = AreaOfUse::new(-60.0, -20.0, -50.0, -15.0);
        assert!(fiji.intersects(&east_of_line));
        assert!(east_of_line.intersects(&fiji));
        assert!(!fiji.intersects(&far_away));
    }

    #[test]
    fn test_touching_edges_intersect() {
        let a = AreaOfUse::new(0.0, 0.0, 10.0, 10.0);
        let b = AreaOfUse::new(10.0, 10.0, 20.0, 20.0);
        assert!(a.intersects(&b));
        assert!(AreaOfUse::world().intersects(&a));
    }
}
