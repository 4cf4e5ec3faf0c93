//! Comment styles and their prompt templates.
//!
//! The style set is closed. Any name outside it resolves to
//! [`Style::Professional`] instead of failing, so callers can pass user input
//! straight through.

use serde::{Deserialize, Deserializer, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Placeholder used when no subject name is given.
pub const DEFAULT_SUBJECT: &str = "学生";

/// Tone preset for a generated comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Instructor critique of brushwork, structure and layout
    #[default]
    Professional,
    /// Encouraging tone aimed at parents
    Warm,
    /// Playful language a six-year-old understands
    Childlike,
}

impl Style {
    pub const ALL: [Style; 3] = [Style::Professional, Style::Warm, Style::Childlike];

    /// Resolve a style name. Matching ignores case and surrounding whitespace.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "professional" => Style::Professional,
            "warm" => Style::Warm,
            "childlike" => Style::Childlike,
            _ => Style::Professional,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Professional => "professional",
            Style::Warm => "warm",
            Style::Childlike => "childlike",
        }
    }

    /// Build the prompt text for this style, addressed to `subject`.
    pub fn prompt(&self, subject: &str) -> String {
        match self {
            Style::Professional => format!(
                "你是一位书法教师，请从笔法、结构、章法角度对{subject}的书法作品进行专业点评。\
                 分析包括：(1)笔画质量与笔法特点，(2)字体结构的合理性，(3)整体布局，(4)可改进方向。\
                 评语应专业、具体、建设性。"
            ),
            Style::Warm => format!(
                "请用温暖鼓励的语气，像关心孩子的长辈一样，肯定{subject}的努力和进步。\
                 评语应该：(1)先表扬具体的优点（笔画、笔势、布局等），(2)指出可以改进的地方，\
                 (3)以温暖的鼓励结尾。语言亲切、具体、易于家长理解。"
            ),
            Style::Childlike => format!(
                "请用6岁孩子能听懂的可爱语言，向{subject}夸奖他/她的书法作品。\
                 可以带上✨🌟😊等表情符号。评语应该生动活泼、充满想象力，\
                 强调'你很棒'的主题，激发孩子的学习热情。"
            ),
        }
    }
}

impl FromStr for Style {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Style::from_name(s))
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Style {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Style::from_name(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_styles_resolve() {
        assert_eq!(Style::from_name("professional"), Style::Professional);
        assert_eq!(Style::from_name("warm"), Style::Warm);
        assert_eq!(Style::from_name("childlike"), Style::Childlike);
    }

    #[test]
    fn test_style_matching_ignores_case_and_whitespace() {
        assert_eq!(Style::from_name("  Warm "), Style::Warm);
        assert_eq!(Style::from_name("CHILDLIKE"), Style::Childlike);
    }

    #[test]
    fn test_unknown_style_falls_back_to_professional() {
        for name in ["", "strict", "humorous", "专业"] {
            let style = Style::from_name(name);
            assert_eq!(style, Style::Professional, "style {name:?}");
            assert_eq!(style.prompt("小明"), Style::Professional.prompt("小明"));
        }
    }

    #[test]
    fn test_all_styles_roundtrip_by_name() {
        for style in Style::ALL {
            assert_eq!(Style::from_name(style.as_str()), style);
            assert_eq!(style.to_string().parse::<Style>().unwrap(), style);
        }
    }

    #[test]
    fn test_prompt_interpolates_subject() {
        for style in Style::ALL {
            assert!(style.prompt("王小二").contains("王小二"), "{style}");
        }
    }

    #[test]
    fn test_prompts_differ_per_style() {
        let professional = Style::Professional.prompt(DEFAULT_SUBJECT);
        assert!(professional.contains("书法教师"));
        assert!(Style::Warm.prompt(DEFAULT_SUBJECT).contains("温暖鼓励"));
        assert!(Style::Childlike.prompt(DEFAULT_SUBJECT).contains("6岁孩子"));
    }

    #[test]
    fn test_deserialize_falls_back() {
        let style: Style = serde_json::from_str("\"sarcastic\"").unwrap();
        assert_eq!(style, Style::Professional);
        let style: Style = serde_json::from_str("\"warm\"").unwrap();
        assert_eq!(style, Style::Warm);
        assert_eq!(serde_json::to_string(&Style::Childlike).unwrap(), "\"childlike\"");
    }
}
