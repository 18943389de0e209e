/// A named sub-rectangle of the source frame, in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Human-readable position label ("left-half", "center", ...)
    pub label: &'static str,
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// The fixed partition used when rescanning for additional codes: four
/// overlapping halves plus a center crop.
///
/// The set is a deliberate enumeration, not a sliding window; rescan cost is
/// bounded by its length. Degenerate rectangles from tiny frames are dropped.
pub fn partition(width: u32, height: u32) -> Vec<Region> {
    let half_w = width / 2;
    let half_h = height / 2;

    let candidates = [
        Region {
            label: "left-half",
            x: 0,
            y: 0,
            width: half_w,
            height,
        },
        Region {
            label: "right-half",
            x: width - half_w,
            y: 0,
            width: half_w,
            height,
        },
        Region {
            label: "top-half",
            x: 0,
            y: 0,
            width,
            height: half_h,
        },
        Region {
            label: "bottom-half",
            x: 0,
            y: height - half_h,
            width,
            height: half_h,
        },
        Region {
            label: "center",
            x: width / 4,
            y: height / 4,
            width: half_w,
            height: half_h,
        },
    ];

    candidates
        .into_iter()
        .filter(|r| r.width > 0 && r.height > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_five_regions() {
        let regions = partition(100, 80);
        assert_eq!(regions.len(), 5);

        let left = regions.iter().find(|r| r.label == "left-half").unwrap();
        assert_eq!((left.x, left.y, left.width, left.height), (0, 0, 50, 80));

        let right = regions.iter().find(|r| r.label == "right-half").unwrap();
        assert_eq!((right.x, right.width), (50, 50));

        let center = regions.iter().find(|r| r.label == "center").unwrap();
        assert_eq!((center.x, center.y, center.width, center.height), (25, 20, 50, 40));
    }

    #[test]
    fn test_partition_odd_dimensions_cover_edges() {
        let regions = partition(101, 81);
        let right = regions.iter().find(|r| r.label == "right-half").unwrap();
        assert_eq!(right.x + right.width, 101);
        let bottom = regions.iter().find(|r| r.label == "bottom-half").unwrap();
        assert_eq!(bottom.y + bottom.height, 81);
    }

    #[test]
    fn test_partition_degenerate_frame() {
        // A 1x1 frame has no non-empty halves
        assert!(partition(1, 1).is_empty());
    }
}
