//! Screen regions and drag selections.

use std::fmt;
use std::str::FromStr;

use super::screen::CaptureError;

/// A rectangular area of the screen in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Create a new region.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a region from the two corners of a drag, in either order.
    pub fn from_corners(start: (u32, u32), end: (u32, u32)) -> Self {
        Self {
            x: start.0.min(end.0),
            y: start.1.min(end.1),
            width: start.0.abs_diff(end.0),
            height: start.1.abs_diff(end.1),
        }
    }

    /// Whether the region covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Clip the region to an image of the given size.
    ///
    /// Returns `None` when nothing of the region lies inside the image.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Region> {
        if self.x >= width || self.y >= height {
            return None;
        }

        let clamped = Region {
            x: self.x,
            y: self.y,
            width: self.width.min(width - self.x),
            height: self.height.min(height - self.y),
        };

        (!clamped.is_empty()).then_some(clamped)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Parses `X,Y,W,H`.
impl FromStr for Region {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<u32> = s
            .split(',')
            .map(|part| part.trim().parse::<u32>())
            .collect::<Result<_, _>>()
            .map_err(|_| CaptureError::InvalidRegion(s.to_string()))?;

        match parts.as_slice() {
            [x, y, width, height] => Ok(Region::new(*x, *y, *width, *height)),
            _ => Err(CaptureError::InvalidRegion(s.to_string())),
        }
    }
}

/// A drag selection in normalized coordinates (0.0 to 1.0 on both axes).
///
/// The GUI draws the frozen screenshot scaled to the window, so the selection
/// is kept resolution independent and only turned into pixels against the
/// real image size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Selection {
    pub start: (f32, f32),
    pub end: (f32, f32),
}

impl Selection {
    /// Create a selection, clamping both corners into the unit square.
    pub fn new(start: (f32, f32), end: (f32, f32)) -> Self {
        let clamp = |(x, y): (f32, f32)| (x.clamp(0.0, 1.0), y.clamp(0.0, 1.0));
        Self {
            start: clamp(start),
            end: clamp(end),
        }
    }

    /// Convert to a pixel region of an image with the given dimensions.
    pub fn to_region(&self, width: u32, height: u32) -> Region {
        let to_px = |(x, y): (f32, f32)| {
            (
                (x * width as f32).round() as u32,
                (y * height as f32).round() as u32,
            )
        };
        Region::from_corners(to_px(self.start), to_px(self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_is_order_independent() {
        let a = Region::from_corners((10, 20), (110, 70));
        let b = Region::from_corners((110, 70), (10, 20));
        let c = Region::from_corners((110, 20), (10, 70));
        assert_eq!(a, Region::new(10, 20, 100, 50));
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_click_without_drag_is_empty() {
        let region = Region::from_corners((42, 42), (42, 42));
        assert!(region.is_empty());
    }

    #[test]
    fn test_clamp_to_bounds() {
        let region = Region::new(900, 500, 400, 400);
        assert_eq!(region.clamp_to(1000, 800), Some(Region::new(900, 500, 100, 300)));
        assert_eq!(region.clamp_to(900, 800), None);
        assert_eq!(Region::new(0, 0, 0, 10).clamp_to(100, 100), None);
    }

    #[test]
    fn test_parse_region() {
        let region: Region = "10, 20,300,400".parse().unwrap();
        assert_eq!(region, Region::new(10, 20, 300, 400));
        assert!("10,20,300".parse::<Region>().is_err());
        assert!("a,b,c,d".parse::<Region>().is_err());
        assert!("-1,0,10,10".parse::<Region>().is_err());
    }

    #[test]
    fn test_selection_to_region() {
        let selection = Selection::new((0.75, 0.5), (0.25, 0.1));
        assert_eq!(selection.to_region(1920, 1080), Region::new(480, 108, 960, 432));
    }

    #[test]
    fn test_selection_clamps_outside_window() {
        let selection = Selection::new((-0.2, 0.5), (1.4, 2.0));
        assert_eq!(selection.start, (0.0, 0.5));
        assert_eq!(selection.end, (1.0, 1.0));
        assert_eq!(selection.to_region(200, 100), Region::new(0, 50, 200, 50));
    }
}
