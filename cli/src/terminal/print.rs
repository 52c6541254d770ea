use colored::*;
use svcmap_common::log::PRINT_TARGET;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;

#[macro_export]
macro_rules! mprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, "{msg}");
}

/// A full-width rule of `fill` with `title` centered in it.
fn rule(fill: &str, title: Option<ColoredString>) -> String {
    let Some(title) = title else {
        return fill.repeat(TOTAL_WIDTH).color(colors::SEPARATOR).to_string();
    };

    let free = TOTAL_WIDTH.saturating_sub(console::measure_text_width(&title.to_string()));
    let left = fill.repeat(free / 2).color(colors::SEPARATOR);
    let right = fill.repeat(free - free / 2).color(colors::SEPARATOR);
    format!("{left}{title}{right}")
}

pub fn banner(q_level: u8) {
    if q_level > 0 {
        return;
    }
    let title = format!("⟦ SVCMAP v{} ⟧", env!("CARGO_PKG_VERSION"));
    print(&rule("═", Some(title.bright_green().bold())));
}

pub fn header(msg: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }
    let title = format!("⟦ {} ⟧", msg.to_uppercase());
    print(&rule("─", Some(title.bright_green())));
}

pub fn fat_separator() {
    print(&rule("═", None));
}

pub fn end_of_program() {
    fat_separator();
}

pub fn centerln(msg: &str) {
    let pad = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{pad}{msg}"));
}

/// Display width of the widest key.
fn key_column<V>(pairs: &[(String, V)]) -> usize {
    pairs
        .iter()
        .map(|(key, _)| UnicodeWidthStr::width(key.as_str()))
        .max()
        .unwrap_or(0)
}

/// `key`, dot leader up to `width`, colon.
fn leader(key: &str, width: usize, key_color: Color) -> String {
    let dots = ".".repeat(width + 1 - UnicodeWidthStr::width(key).min(width));
    format!(
        "{}{}{}",
        key.color(key_color),
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR)
    )
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    print(&format!("{} {}", ">".color(colors::SEPARATOR), msg.as_ref()));
}

/// Status lines whose colons line up on the widest key.
pub fn aligned_lines(pairs: &[(String, ColoredString)]) {
    let width = key_column(pairs);
    for (key, value) in pairs {
        print_status(format!("{} {value}", leader(key, width, colors::PRIMARY)));
    }
}

pub fn tree_head(idx: usize, name: &str) {
    print(&format!(
        "{}{}{} {}",
        "[".color(colors::SEPARATOR),
        idx.to_string().color(colors::ACCENT),
        "]".color(colors::SEPARATOR),
        name.color(colors::MACHINE)
    ));
}

/// Prints `(key, value)` pairs as the branches of a one-level tree.
pub fn as_tree_one_level(pairs: Vec<(String, ColoredString)>) {
    let width = key_column(&pairs);
    let last = pairs.len().saturating_sub(1);
    for (i, (key, value)) in pairs.iter().enumerate() {
        let branch = if i == last { "└─" } else { "├─" };
        print(&format!(
            " {} {} {value}",
            branch.color(colors::SEPARATOR),
            leader(key, width, colors::TEXT_DEFAULT)
        ));
    }
}

const NO_RESULTS: &str = r#"
          _   _  ___    ____  _____ ______     _____ ____ _____ ____
         | \ | |/ _ \  / ___|| ____|  _ \ \   / /_ _/ ___| ____/ ___|
         |  \| | | | | \___ \|  _| | |_) \ \ / / | | |   |  _| \___ \
         | |\  | |_| |  ___) | |___|  _ < \ V /  | | |___| |___ ___) |
         |_| \_|\___/  |____/|_____|_| \_\ \_/  |___\____|_____|____/
"#;

pub fn no_results() {
    print(&NO_RESULTS.red().bold().to_string());
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
