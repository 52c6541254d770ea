use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 129, g: 199, b: 132 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 213, b: 79 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const MACHINE: Color = Color::TrueColor { r: 100, g: 181, b: 246 };
pub const IP_ADDR: Color = Color::TrueColor { r: 77, g: 208, b: 225 };

pub const RUNNING: Color = Color::Green;
pub const STOPPED: Color = Color::Red;
pub const PENDING: Color = Color::Yellow;
pub const PAUSED: Color = Color::Magenta;
