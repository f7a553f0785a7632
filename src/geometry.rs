//! Overlay Geometry
//!
//! Converts a token's image size, authored grid DPI, scale, and position
//! into the pixel-space anchor that overlay stacking composes on.

use crate::models::Item;

/// Top-left corner and effective pixel width of a token on the live scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

/// Resolve a token's overlay anchor against the scene's grid resolution.
///
/// The token image is normalized from its authored grid DPI to the scene
/// DPI and scaled by the token's scale. The registration point is assumed
/// centered; tokens with off-center grid offsets are not supported.
/// Returns `None` for items without image/grid metrics.
// TODO: honor grid offsets other than the centered default.
pub fn token_anchor(token: &Item, scene_dpi: f64) -> Option<Anchor> {
    let image = token.image.as_ref()?;
    let grid = token.grid.as_ref()?;
    if grid.dpi <= 0.0 {
        return None;
    }

    let width = (image.width / grid.dpi) * scene_dpi * token.scale.x;
    let height = (image.height / grid.dpi) * scene_dpi * token.scale.y;
    Some(Anchor {
        x: token.position.x - width / 2.0,
        y: token.position.y - height / 2.0,
        width,
    })
}

/// Pixel width of a bar fill.
///
/// A maximum below 1 yields an empty bar rather than a division fault, and
/// the result is clamped into `[0, width]` so out-of-range values never
/// overflow the frame.
pub fn bar_width(value: f64, max_value: f64, width: f64) -> f64 {
    if max_value < 1.0 {
        return 0.0;
    }
    (value / max_value).clamp(0.0, 1.0) * width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GridInfo, ImageContent, ItemKind, Vector2};

    fn token(image_size: f64, image_dpi: f64, position: Vector2, scale: Vector2) -> Item {
        let mut token = Item::new(ItemKind::Image)
            .position(position)
            .scale(scale);
        token.image = Some(ImageContent {
            width: image_size,
            height: image_size,
            ..Default::default()
        });
        token.grid = Some(GridInfo {
            dpi: image_dpi,
            offset: Vector2::default(),
        });
        token
    }

    #[test]
    fn anchor_centers_on_the_token() {
        let token = token(300.0, 150.0, Vector2::new(400.0, 600.0), Vector2::new(1.0, 1.0));
        let anchor = token_anchor(&token, 150.0).unwrap();
        assert_eq!(anchor.width, 300.0);
        assert_eq!(anchor.x, 250.0);
        assert_eq!(anchor.y, 450.0);
    }

    #[test]
    fn anchor_normalizes_authored_dpi_to_scene_dpi() {
        // Image authored at 300 DPI on a 150 DPI scene renders half-size.
        let token = token(300.0, 300.0, Vector2::new(0.0, 0.0), Vector2::new(1.0, 1.0));
        let anchor = token_anchor(&token, 150.0).unwrap();
        assert_eq!(anchor.width, 150.0);
        assert_eq!(anchor.x, -75.0);
    }

    #[test]
    fn anchor_applies_non_uniform_scale() {
        let token = token(300.0, 150.0, Vector2::new(0.0, 0.0), Vector2::new(2.0, 0.5));
        let anchor = token_anchor(&token, 150.0).unwrap();
        assert_eq!(anchor.width, 600.0);
        assert_eq!(anchor.x, -300.0);
        assert_eq!(anchor.y, -75.0);
    }

    #[test]
    fn items_without_image_metrics_have_no_anchor() {
        let text = Item::new(ItemKind::Text);
        assert_eq!(token_anchor(&text, 150.0), None);
    }

    #[test]
    fn bar_width_is_proportional() {
        assert_eq!(bar_width(5.0, 10.0, 100.0), 50.0);
    }

    #[test]
    fn bar_width_without_maximum_is_zero() {
        assert_eq!(bar_width(5.0, 0.0, 100.0), 0.0);
    }

    #[test]
    fn bar_width_clamps_out_of_range_values() {
        assert_eq!(bar_width(15.0, 10.0, 100.0), 100.0);
        assert_eq!(bar_width(-3.0, 10.0, 100.0), 0.0);
    }
}
