use std::fmt;

/// Direction of a quad move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Log line reported back to the host once a move in this direction was applied.
    pub const fn log_text(self) -> &'static str {
        match self {
            Direction::Left => "Moved left",
            Direction::Right => "Moved right",
            Direction::Up => "Moved up",
            Direction::Down => "Moved down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        };
        f.write_str(name)
    }
}

/// Inbound message: move the quad by `magnitude` logical pixels.
///
/// Commands have no identity. Posting the same command twice moves the quad twice.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Command {
    pub direction: Direction,
    pub magnitude: f32,
}

impl Command {
    #[inline]
    pub const fn new(direction: Direction, magnitude: f32) -> Self {
        Self { direction, magnitude }
    }

    #[inline]
    pub const fn move_left(magnitude: f32) -> Self {
        Self::new(Direction::Left, magnitude)
    }

    #[inline]
    pub const fn move_right(magnitude: f32) -> Self {
        Self::new(Direction::Right, magnitude)
    }

    #[inline]
    pub const fn move_up(magnitude: f32) -> Self {
        Self::new(Direction::Up, magnitude)
    }

    #[inline]
    pub const fn move_down(magnitude: f32) -> Self {
        Self::new(Direction::Down, magnitude)
    }

    /// A command is applicable only with a finite magnitude.
    ///
    /// Invalid commands are discarded by the render thread and produce no notification.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.magnitude.is_finite()
    }
}
