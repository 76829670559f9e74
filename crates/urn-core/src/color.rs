use core::fmt;

/// Label of a color class. Classes are numbered in the order their counts were supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Color(u32);

impl Color {
    pub const RED: Color = Color(0);
    pub const GREEN: Color = Color(1);
    pub const BLUE: Color = Color(2);

    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index > u32::MAX as usize {
            None
        } else {
            Some(Self(index as u32))
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Color::RED => f.write_str("red"),
            Color::GREEN => f.write_str("green"),
            Color::BLUE => f.write_str("blue"),
            Color(other) => write!(f, "color{other}"),
        }
    }
}
