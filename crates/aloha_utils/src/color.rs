use colored::*;

// #4B3978
const PURPLE: Color = Color::TrueColor {
    r: 75,
    g: 57,
    b: 120,
};

// #04cd9b
const GREEN: Color = Color::TrueColor {
    r: 4,
    g: 205,
    b: 155,
};

const RED: Color = Color::TrueColor { r: 255, g: 0, b: 0 };

pub struct LogColors {}

impl LogColors {
    fn paint(text: &str, color: Color) -> String {
        text.color(color).to_string()
    }

    /// Table headers and titles
    pub fn purple(text: &str) -> String {
        Self::paint(text, PURPLE)
    }

    pub fn green(text: &str) -> String {
        Self::paint(text, GREEN)
    }

    pub fn alert(text: &str) -> String {
        Self::paint(text, RED)
    }

    /// Footers and hints
    pub fn dim(text: &str) -> String {
        text.dimmed().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_keep_text() {
        colored::control::set_override(false);
        assert_eq!(LogColors::purple("users"), "users");
        assert_eq!(LogColors::green("ok"), "ok");
        assert_eq!(LogColors::alert("failed"), "failed");
        assert_eq!(LogColors::dim("page 1 of 2"), "page 1 of 2");
    }
}
