//! Drawing tool selection

use serde::{Deserialize, Serialize};
use std::fmt;

/// The active tool decides which accumulator receives pointer samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Freehand stroke in the pencil style
    #[default]
    Pencil,
    /// Freehand stroke painted in the background color
    Eraser,
    /// Freehand closed path that selects a region for recognition
    Lasso,
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Pencil => "pencil",
            Tool::Eraser => "eraser",
            Tool::Lasso => "lasso",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tool_is_pencil() {
        assert_eq!(Tool::default(), Tool::Pencil);
    }

    #[test]
    fn test_tool_serde_names() {
        assert_eq!(serde_json::to_string(&Tool::Lasso).unwrap(), "\"lasso\"");
        let tool: Tool = serde_json::from_str("\"eraser\"").unwrap();
        assert_eq!(tool, Tool::Eraser);
    }

    #[test]
    fn test_display_matches_serde_name() {
        assert_eq!(Tool::Eraser.to_string(), "eraser");
        assert_eq!(Tool::Lasso.name(), "lasso");
    }
}
