use serde::{Deserialize, Serialize};

/// Skill ID type
pub type SkillId = i64;

/// A catalog entry describing an installable agent skill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub author: String,
    pub github_url: String,
    pub install_command: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub popular: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Skill {
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}

/// A category facet derived from the skills carrying its name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub slug: String,
    pub count: usize,
}

/// The static catalog document as served to clients
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub total_count: Option<usize>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_optional_fields() {
        let json = r#"{
            "skills": [{
                "id": 7,
                "name": "pdf-helper",
                "slug": "pdf-helper",
                "description": "Work with PDFs",
                "category": "Docs",
                "author": "acme",
                "github_url": "https://github.com/acme/pdf-helper",
                "install_command": "npx skills add acme/pdf-helper"
            }]
        }"#;

        let doc: CatalogDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.skills.len(), 1);
        assert!(doc.categories.is_empty());
        assert!(doc.total_count.is_none());

        let skill = &doc.skills[0];
        assert!(!skill.featured);
        assert!(skill.tags().is_empty());
    }
}
