//! Colored formatter implementation with terminal color support

use super::formatter::OutputFormatter;
use crate::{
    error::Result,
    session::{LogLine, LogTag},
};
use colored::*;

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub ok: Color,
    pub fail: Color,
    pub summary: Color,
    pub warning: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            ok: Color::Green,
            fail: Color::Red,
            summary: Color::Cyan,
            warning: Color::Yellow,
            muted: Color::BrightBlack,
        }
    }
}

/// Colored formatter: ok lines green, fail lines bold red
pub struct ColoredFormatter {
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    pub fn new() -> Self {
        Self::with_color_scheme(ColorScheme::default())
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(color_scheme: ColorScheme) -> Self {
        Self { color_scheme }
    }
}

impl Default for ColoredFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_line(&self, line: &LogLine) -> Result<String> {
        let styled = match line.tag {
            Some(LogTag::Ok) => line.text.color(self.color_scheme.ok),
            Some(LogTag::Fail) => line.text.color(self.color_scheme.fail).bold(),
            None => line.text.normal(),
        };
        Ok(styled.to_string())
    }

    fn format_summary(&self, summary: &str) -> Result<String> {
        Ok(format!(
            "{} {}",
            "»".color(self.color_scheme.muted),
            summary.color(self.color_scheme.summary).bold()
        ))
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("❌ {}", error.color(self.color_scheme.fail)))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("⚠️  {}", warning.color(self.color_scheme.warning)))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("✅ {}", message.color(self.color_scheme.ok)))
    }
}
