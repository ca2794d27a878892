//! Particle path around the circuit drawing
//!
//! A clockwise loop along the four wires of the 64x32 layout:
//!
//! ```text
//! top     y=4,  x=6..=60   indices   0..=54
//! right   x=61, y=5..=26   indices  55..=76
//! bottom  y=27, x=60..=6   indices  77..=131
//! left    x=2,  y=26..=5   indices 132..=153
//! ```

/// Number of steps around the loop
pub const PATH_LEN: u16 = 154;

/// First path index inside the load (resistor) zone
pub const LOAD_ZONE_START: u16 = 41;

/// Last path index inside the load zone
pub const LOAD_ZONE_END: u16 = 51;

/// Steps on the top wire
pub const TOP_WIRE_LEN: u16 = 55;

const RIGHT_END: u16 = TOP_WIRE_LEN + 22;
const BOTTOM_END: u16 = RIGHT_END + 55;

/// Matrix coordinate of a path index (wraps)
pub const fn point(index: u16) -> (u16, u16) {
    let i = index % PATH_LEN;
    if i < TOP_WIRE_LEN {
        (6 + i, 4)
    } else if i < RIGHT_END {
        (61, 5 + (i - TOP_WIRE_LEN))
    } else if i < BOTTOM_END {
        (60 - (i - RIGHT_END), 27)
    } else {
        (2, 26 - (i - BOTTOM_END))
    }
}

/// Check if a path index lies in the load zone
pub const fn in_load_zone(index: u16) -> bool {
    index >= LOAD_ZONE_START && index <= LOAD_ZONE_END
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_endpoints() {
        assert_eq!(point(0), (6, 4));
        assert_eq!(point(54), (60, 4));
        assert_eq!(point(55), (61, 5));
        assert_eq!(point(76), (61, 26));
        assert_eq!(point(77), (60, 27));
        assert_eq!(point(131), (6, 27));
        assert_eq!(point(132), (2, 26));
        assert_eq!(point(153), (2, 5));
    }

    #[test]
    fn test_wraps() {
        assert_eq!(point(PATH_LEN), point(0));
        assert_eq!(point(PATH_LEN + 3), point(3));
    }

    #[test]
    fn test_load_zone_covers_resistor_body() {
        assert_eq!(point(LOAD_ZONE_START), (47, 4));
        assert_eq!(point(LOAD_ZONE_END), (57, 4));
        assert!(!in_load_zone(40));
        assert!(in_load_zone(41));
        assert!(in_load_zone(51));
        assert!(!in_load_zone(52));
    }

    #[test]
    fn test_every_point_on_matrix() {
        for i in 0..PATH_LEN {
            let (x, y) = point(i);
            assert!(x < 64 && y < 32, "index {} -> ({}, {})", i, x, y);
        }
    }
}
