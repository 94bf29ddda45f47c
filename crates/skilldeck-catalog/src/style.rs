//! Display style (icon and accent colour) per category.
//!
//! Looked up by exact category slug. Anything not listed gets
//! [`DEFAULT_STYLE`].

/// Accent colour for a category badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Blue,
    Cyan,
    Green,
    Magenta,
    Red,
    Yellow,
    White,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    pub icon: &'static str,
    pub accent: Accent,
}

/// Fallback for categories without an entry
pub const DEFAULT_STYLE: CategoryStyle = CategoryStyle {
    icon: "📦",
    accent: Accent::White,
};

const STYLES: &[(&str, CategoryStyle)] = &[
    ("development", CategoryStyle { icon: "💻", accent: Accent::Cyan }),
    ("devops", CategoryStyle { icon: "🚀", accent: Accent::Blue }),
    ("docs", CategoryStyle { icon: "📄", accent: Accent::Yellow }),
    ("documents", CategoryStyle { icon: "📄", accent: Accent::Yellow }),
    ("data", CategoryStyle { icon: "📊", accent: Accent::Green }),
    ("design", CategoryStyle { icon: "🎨", accent: Accent::Magenta }),
    ("testing", CategoryStyle { icon: "🧪", accent: Accent::Green }),
    ("security", CategoryStyle { icon: "🛡️", accent: Accent::Red }),
    ("productivity", CategoryStyle { icon: "⚡", accent: Accent::Yellow }),
    ("ai-ml", CategoryStyle { icon: "🧠", accent: Accent::Magenta }),
    ("communication", CategoryStyle { icon: "💬", accent: Accent::Blue }),
];

pub fn style_for(slug: &str) -> CategoryStyle {
    STYLES
        .iter()
        .find(|(key, _)| *key == slug)
        .map_or(DEFAULT_STYLE, |(_, style)| *style)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_fallback() {
        assert_eq!(style_for("devops").accent, Accent::Blue);
        assert_eq!(style_for("unknown-category"), DEFAULT_STYLE);
        // exact match only
        assert_eq!(style_for("devops-tools"), DEFAULT_STYLE);
    }

    #[test]
    fn test_table_has_unique_keys() {
        let mut keys: Vec<_> = STYLES.iter().map(|(k, _)| *k).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), STYLES.len());
    }
}
