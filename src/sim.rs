use crate::frame::{Color, Frame};

pub const BACKGROUND: Color = Color::new(0.1, 0.1, 0.1);

const IMPACT: Color = Color::new(1.0, 0.0, 0.0);

/// Horizontally bouncing square. One `step` per tick; the box hides
/// whenever the window is too narrow to contain it and reappears, with
/// position and velocity intact, as soon as it fits again.
pub struct BounceSim {
    half_extent: f32,
    velocity: f32,
    pos: (f32, f32),
    color: Color,
    visible: bool,
}

impl BounceSim {
    /// The box starts flush against the left bound, vertically centered in
    /// a window of `height`. The y coordinate is fixed for the whole run.
    pub fn new(height: u32) -> Self {
        let half_extent = 35.0;
        Self {
            half_extent,
            velocity: 15.0,
            pos: (half_extent, height as f32 / 2.0),
            color: Color::new(0.0, 1.0, 0.0),
            visible: true,
        }
    }

    pub fn step(&mut self, width: u32) {
        let width = width as f32;
        if width < 2.0 * self.half_extent {
            self.visible = false;
            return;
        }
        self.visible = true;

        self.pos.0 += self.velocity;

        let min = self.half_extent;
        let max = width - self.half_extent;
        if self.pos.0 >= max || self.pos.0 <= min {
            if self.pos.0 >= max {
                self.pos.0 = max;
            }
            if self.pos.0 <= min {
                self.pos.0 = min;
            }
            self.velocity = -self.velocity;
            self.color = IMPACT;
        } else {
            // Fraction of the span covered since the last bounce,
            // direction-aware.
            let travel = width - 2.0 * self.half_extent;
            let fraction = if self.velocity > 0.0 {
                (self.pos.0 - min) / travel
            } else {
                (max - self.pos.0) / travel
            };

            // Only red and blue interpolate; green keeps its startup value.
            self.color.r = 1.0 - fraction;
            self.color.b = fraction;
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        frame.clear(BACKGROUND);

        if !self.visible {
            return;
        }

        frame.fill_rect(self.pos.0, self.pos.1, self.half_extent, self.color);
    }

    #[inline]
    pub fn pos(&self) -> (f32, f32) {
        self.pos
    }
    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }
    #[inline]
    pub fn visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim_at(x: f32, velocity: f32) -> BounceSim {
        BounceSim {
            half_extent: 35.0,
            velocity,
            pos: (x, 100.0),
            color: Color::new(0.0, 1.0, 0.0),
            visible: true,
        }
    }

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-4, "{a} != {b}");
    }

    #[test]
    fn position_stays_in_bounds() {
        let mut sim = BounceSim::new(200);
        for _ in 0..1000 {
            sim.step(400);
            assert!(sim.visible());
            assert!(sim.pos().0 >= 35.0 && sim.pos().0 <= 365.0);
        }
    }

    #[test]
    fn first_tick_interpolates() {
        let mut sim = BounceSim::new(200);
        sim.step(400);

        assert_eq!(sim.pos().0, 50.0);
        assert!(sim.visible());
        assert_eq!(sim.velocity(), 15.0);

        let fraction = (50.0 - 35.0) / (400.0 - 70.0);
        let color = sim.color();
        assert_close(color.r, 1.0 - fraction);
        assert_close(color.g, 1.0);
        assert_close(color.b, fraction);
    }

    #[test]
    fn bounce_clamps_and_reflects() {
        let mut sim = sim_at(370.0, 15.0);
        sim.step(400);

        assert_eq!(sim.pos().0, 365.0);
        assert_eq!(sim.velocity(), -15.0);
        assert_eq!(sim.color(), Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn bounce_at_left_bound() {
        let mut sim = sim_at(40.0, -15.0);
        sim.step(400);

        assert_eq!(sim.pos().0, 35.0);
        assert_eq!(sim.velocity(), 15.0);
        assert_eq!(sim.color(), Color::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn red_plus_blue_is_one_between_bounces() {
        let mut sim = BounceSim::new(200);
        for _ in 0..1000 {
            let before = sim.velocity();
            sim.step(400);
            let bounced = sim.velocity() != before;
            if bounced {
                assert_eq!(sim.color(), Color::new(1.0, 0.0, 0.0));
            } else {
                assert_close(sim.color().r + sim.color().b, 1.0);
            }
        }
    }

    #[test]
    fn green_channel_never_changes_between_bounces() {
        // Green is written once at init; interpolation leaves it alone.
        let mut sim = sim_at(100.0, 15.0);
        for _ in 0..5 {
            sim.step(1000);
            assert_close(sim.color().g, 1.0);
        }
    }

    #[test]
    fn narrow_window_hides_box() {
        let mut sim = sim_at(370.0, 15.0);
        sim.step(60);

        assert!(!sim.visible());
        // Hiding freezes the motion entirely.
        assert_eq!(sim.pos().0, 370.0);
        assert_eq!(sim.velocity(), 15.0);
    }

    #[test]
    fn box_reappears_with_state_intact() {
        let mut sim = sim_at(100.0, -15.0);
        sim.step(60);
        assert!(!sim.visible());

        sim.step(400);
        assert!(sim.visible());
        assert_eq!(sim.pos().0, 85.0);
        assert_eq!(sim.velocity(), -15.0);
    }

    #[test]
    fn width_exactly_twice_half_extent_is_visible() {
        let mut sim = sim_at(35.0, 15.0);
        sim.step(70);
        assert!(sim.visible());
        // The only legal position is the single shared bound.
        assert_eq!(sim.pos().0, 35.0);
    }

    #[test]
    fn hidden_box_renders_cleared_frame() {
        let mut sim = sim_at(30.0, 15.0);
        sim.step(60);
        assert!(!sim.visible());

        let mut frame = Frame::new(60, 200);
        sim.draw(&mut frame);

        let rgb = BACKGROUND.to_rgb8();
        for pixel in frame.pixels().chunks_exact(3) {
            assert_eq!(pixel, rgb);
        }
    }

    #[test]
    fn visible_box_renders_colored_square() {
        let mut sim = BounceSim::new(200);
        sim.step(400);

        let mut frame = Frame::new(400, 200);
        sim.draw(&mut frame);

        let rgb = sim.color().to_rgb8();
        let background = BACKGROUND.to_rgb8();
        let mut box_pixels = 0;
        for pixel in frame.pixels().chunks_exact(3) {
            if pixel == rgb {
                box_pixels += 1;
            } else {
                assert_eq!(pixel, background);
            }
        }
        assert_eq!(box_pixels, 70 * 70);
    }
}
