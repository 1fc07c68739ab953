use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Coordinate { lat, lon }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wgs(lat: {:.5}, lon: {:.5})", self.lat, self.lon)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLngBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl LatLngBounds {
    pub fn from(p1: &Coordinate, p2: &Coordinate) -> Self {
        LatLngBounds {
            south: p1.lat.min(p2.lat),
            west: p1.lon.min(p2.lon),
            north: p1.lat.max(p2.lat),
            east: p1.lon.max(p2.lon),
        }
    }
    pub fn south_west(&self) -> Coordinate {
        Coordinate::new(self.south, self.west)
    }
    pub fn north_east(&self) -> Coordinate {
        Coordinate::new(self.north, self.east)
    }
}

impl fmt::Display for LatLngBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bounds(sw: {}, ne: {})",
            self.south_west(),
            self.north_east()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_orders_corners() {
        let b = LatLngBounds::from(&Coordinate::new(10.0, 5.0), &Coordinate::new(-2.0, 7.5));
        assert_eq!(b.south, -2.0);
        assert_eq!(b.north, 10.0);
        assert_eq!(b.west, 5.0);
        assert_eq!(b.east, 7.5);
        assert_eq!(b.south_west(), Coordinate::new(-2.0, 5.0));
        assert_eq!(b.north_east(), Coordinate::new(10.0, 7.5));
    }
}
