// Screen <-> image coordinates. The picture is drawn with its top-left corner at
// `origin` (screen pixels) and scaled by `zoom`.

use crate::error::{Error, Result};
use crate::types::Point;

/// `image = (pointer - origin) / zoom`.
/// No clamping happens here; the zoom controls already keep the factor in range.
pub fn to_image_space(pointer: Point, origin: Point, zoom: f32) -> Result<Point> {
    check_zoom(zoom)?;
    Ok(Point::new((pointer.x - origin.x) / zoom, (pointer.y - origin.y) / zoom))
}

/// Inverse of [`to_image_space`].
pub fn to_screen_space(image: Point, origin: Point, zoom: f32) -> Result<Point> {
    check_zoom(zoom)?;
    Ok(Point::new(image.x * zoom + origin.x, image.y * zoom + origin.y))
}

/// Where the top-left of a `width`x`height` picture lands when centred in a
/// viewport of `view_w`x`view_h`. Negative once the zoomed picture outgrows the view.
pub fn centered_origin(width: usize, height: usize, view_w: usize, view_h: usize, zoom: f32) -> Point {
    let x = (view_w as f32 - width as f32 * zoom) / 2.0;
    let y = (view_h as f32 - height as f32 * zoom) / 2.0;
    Point::new(x.floor(), y.floor())
}

#[inline]
fn check_zoom(zoom: f32) -> Result<()> {
    // NaN fails this as well
    if zoom > 0.0 { Ok(()) } else { Err(Error::InvalidZoom(zoom)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_back_to_the_same_image_point_at_every_zoom() {
        let origin = Point::new(37.0, -12.0);
        for z in [0.5, 1.0, 1.5, 2.0, 3.0] {
            let pointer = Point::new(origin.x + z * 5.0, origin.y + z * 5.0);
            let p = to_image_space(pointer, origin, z).unwrap();
            assert!((p.x - 5.0).abs() < 1e-5, "zoom {z}: x = {}", p.x);
            assert!((p.y - 5.0).abs() < 1e-5, "zoom {z}: y = {}", p.y);
        }
    }

    #[test]
    fn rejects_non_positive_zoom() {
        let p = Point::new(1.0, 1.0);
        assert!(matches!(to_image_space(p, Point::default(), 0.0), Err(Error::InvalidZoom(_))));
        assert!(matches!(to_image_space(p, Point::default(), -1.0), Err(Error::InvalidZoom(_))));
        assert!(to_image_space(p, Point::default(), f32::NAN).is_err());
    }

    #[test]
    fn screen_space_is_the_inverse() {
        let origin = Point::new(100.0, 50.0);
        let img = Point::new(12.5, 40.0);
        let screen = to_screen_space(img, origin, 2.0).unwrap();
        assert_eq!(screen, Point::new(125.0, 130.0));
        assert_eq!(to_image_space(screen, origin, 2.0).unwrap(), img);
    }

    #[test]
    fn centering_goes_negative_when_zoomed_past_the_view() {
        assert_eq!(centered_origin(100, 50, 300, 150, 1.0), Point::new(100.0, 50.0));
        assert_eq!(centered_origin(100, 100, 200, 200, 3.0), Point::new(-50.0, -50.0));
    }
}
