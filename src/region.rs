//! Bounding region construction around the geocoded endpoints

use geo::{Coord, Point, Rect};

/// Buffer applied around the endpoints, in degrees. Large enough that
/// the network fetch normally includes a routable edge near each
/// endpoint; a smaller buffer risks an empty or disconnected extract.
pub const DEFAULT_BUFFER_DEGREES: f64 = 0.001;

/// Rectangular bounds of the union of the two buffered points.
/// Purely geometric, always succeeds.
pub fn bounding_region(origin: Point<f64>, destination: Point<f64>, buffer: f64) -> Rect<f64> {
    let min = Coord {
        x: origin.x().min(destination.x()) - buffer,
        y: origin.y().min(destination.y()) - buffer,
    };
    let max = Coord {
        x: origin.x().max(destination.x()) + buffer,
        y: origin.y().max(destination.y()) + buffer,
    };
    Rect::new(min, max)
}

#[cfg(test)]
mod tests {
    use geo::Contains;

    use super::*;

    #[test]
    fn region_contains_both_endpoints_with_margin() {
        let origin = Point::new(-122.084, 37.422);
        let destination = Point::new(-122.148, 37.485);
        let region = bounding_region(origin, destination, DEFAULT_BUFFER_DEGREES);

        assert!(region.contains(&origin));
        assert!(region.contains(&destination));
        assert!(region.width() > (origin.x() - destination.x()).abs());
        assert!(region.height() > (origin.y() - destination.y()).abs());
    }

    #[test]
    fn endpoint_order_does_not_matter() {
        let a = Point::new(-122.084, 37.422);
        let b = Point::new(-122.148, 37.485);
        assert_eq!(
            bounding_region(a, b, 0.001),
            bounding_region(b, a, 0.001)
        );
    }

    #[test]
    fn zero_buffer_degenerates_to_the_raw_bounds() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.01, 0.02);
        let region = bounding_region(a, b, 0.0);
        assert!((region.width() - 0.01).abs() < 1e-12);
        assert!((region.height() - 0.02).abs() < 1e-12);
    }
}
