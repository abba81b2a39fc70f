use crate::message::{Command, Direction};

/// Drawable area the quad must stay inside, in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceBounds {
    pub width: f32,
    pub height: f32,
    pub quad_size: f32,
}

impl SurfaceBounds {
    #[inline]
    pub const fn new(width: f32, height: f32, quad_size: f32) -> Self {
        Self { width, height, quad_size }
    }

    /// Largest valid `x`. Zero when the surface is narrower than the quad.
    #[inline]
    pub fn max_x(&self) -> f32 {
        (self.width - self.quad_size).max(0.0)
    }

    /// Largest valid `y`. Zero when the surface is shorter than the quad.
    #[inline]
    pub fn max_y(&self) -> f32 {
        (self.height - self.quad_size).max(0.0)
    }
}

/// Position of the quad's top-left corner.
///
/// Owned and mutated by the render thread only.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ViewState {
    pub x: f32,
    pub y: f32,
}

impl ViewState {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Applies `cmd` with saturating clamps.
    ///
    /// Returns `false` and leaves the state untouched for an invalid command.
    pub fn apply(&mut self, cmd: &Command, bounds: SurfaceBounds) -> bool {
        if !cmd.is_valid() {
            return false;
        }

        let d = cmd.magnitude;
        match cmd.direction {
            Direction::Left => self.x = (self.x - d).clamp(0.0, bounds.max_x()),
            Direction::Right => self.x = (self.x + d).clamp(0.0, bounds.max_x()),
            Direction::Up => self.y = (self.y - d).clamp(0.0, bounds.max_y()),
            Direction::Down => self.y = (self.y + d).clamp(0.0, bounds.max_y()),
        }
        true
    }

    /// Pulls the position back inside `bounds`, e.g. after the surface shrank.
    pub fn clamp_to(&mut self, bounds: SurfaceBounds) {
        self.x = self.x.clamp(0.0, bounds.max_x());
        self.y = self.y.clamp(0.0, bounds.max_y());
    }
}
