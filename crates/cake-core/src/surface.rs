//! Cake silhouette geometry and pointer → cake-space mapping.
//!
//! The cake lives in a fixed 300×300 logical space with y growing downward.
//! Its top edge is a parabola; a click counts as "place a candle" only inside
//! a ±20-unit band around that edge, and the candle is snapped onto the curve.

/// Side length of the logical coordinate space, both axes.
pub const SPACE: f64 = 300.0;

pub const CAKE_LEFT: f64 = 70.0;
pub const CAKE_RIGHT: f64 = 230.0;
pub const CAKE_CENTER_X: f64 = 150.0;
pub const CAKE_PEAK_Y: f64 = 130.0;
pub const CURVATURE: f64 = 1.0 / 320.0;

/// Vertical tolerance around the top edge within which clicks are accepted.
pub const CLICKABLE_BAND: f64 = 20.0;

/// Where the bottom of the cake body sits.
pub const CAKE_BOTTOM_Y: f64 = 250.0;

/// Height of a candle body above its base point on the silhouette.
pub const CANDLE_HEIGHT: f64 = 30.0;

/// The apex of the silhouette — where the first candle stands.
pub const APEX: (f64, f64) = (CAKE_CENTER_X, CAKE_PEAK_Y);

/// Height of the top edge at `x`. Only meaningful for x in (CAKE_LEFT, CAKE_RIGHT).
pub fn top_y(x: f64) -> f64 {
    CURVATURE * (x - CAKE_CENTER_X).powi(2) + CAKE_PEAK_Y
}

/// Scale a pointer position inside a `w`×`h` surface into logical cake space.
/// Returns `None` for a degenerate surface.
pub fn map_to_space(px: f64, py: f64, w: f64, h: f64) -> Option<(f64, f64)> {
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    Some((px / w * SPACE, py / h * SPACE))
}

/// Decide whether a logical-space click lands on the candle-able band.
/// Accepted clicks yield the candle base, snapped onto the silhouette curve.
pub fn candle_spot(x: f64, y: f64) -> Option<(f64, f64)> {
    if x <= CAKE_LEFT || x >= CAKE_RIGHT {
        return None;
    }
    let top = top_y(x);
    if y <= top - CLICKABLE_BAND || y >= top + CLICKABLE_BAND {
        return None;
    }
    Some((x, top))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apex_click_is_accepted_and_snapped() {
        assert_eq!(top_y(150.0), 130.0);
        assert_eq!(candle_spot(150.0, 130.0), Some((150.0, 130.0)));
    }

    #[test]
    fn click_below_the_band_is_rejected() {
        // top_y(150) = 130; 160 is past the +20 band
        assert_eq!(candle_spot(150.0, 160.0), None);
    }

    #[test]
    fn click_outside_the_horizontal_range_is_rejected() {
        assert_eq!(candle_spot(60.0, 130.0), None);
        assert_eq!(candle_spot(70.0, 130.0), None);
        assert_eq!(candle_spot(230.0, top_y(229.0)), None);
    }

    #[test]
    fn off_center_click_snaps_onto_the_curve() {
        // top_y(190) = 1600/320 + 130 = 135
        let spot = candle_spot(190.0, 140.0).unwrap();
        assert_eq!(spot, (190.0, 135.0));
    }

    #[test]
    fn surface_mapping_scales_into_logical_space() {
        assert_eq!(map_to_space(0.0, 0.0, 80.0, 40.0), Some((0.0, 0.0)));
        assert_eq!(map_to_space(40.0, 20.0, 80.0, 40.0), Some((150.0, 150.0)));
        assert_eq!(map_to_space(80.0, 40.0, 80.0, 40.0), Some((300.0, 300.0)));
        assert_eq!(map_to_space(1.0, 1.0, 0.0, 40.0), None);
    }
}
