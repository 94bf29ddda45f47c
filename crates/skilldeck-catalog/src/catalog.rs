//! In-memory skill catalog and category facets

use std::collections::{HashMap, HashSet};

use skilldeck_types::{CatalogDocument, Category, Skill, SkillId};
use tracing::{error, info};

use crate::error::{CatalogError, Result};
use crate::loader::{validate_document, CatalogSource};

/// The full skill list plus its derived category facets.
///
/// Skills are immutable once loaded; the catalog is only ever replaced
/// wholesale.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    skills: Vec<Skill>,
    categories: Vec<Category>,
    last_updated: Option<String>,
}

/// Headline numbers for the landing view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    pub skills: usize,
    pub categories: usize,
    pub authors: usize,
}

impl Catalog {
    /// Create a catalog from a list of skills, deriving categories
    pub fn new(skills: Vec<Skill>) -> Self {
        let categories = derive_categories(&skills);
        Self {
            skills,
            categories,
            last_updated: None,
        }
    }

    /// An empty catalog (the inert state after a failed load)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from a parsed document.
    ///
    /// Category counts are always recomputed from the skills. A slug supplied
    /// by the document for the same category name is kept.
    pub fn from_document(document: CatalogDocument) -> Result<Self> {
        validate_document(&document)?;

        let known_slugs: HashMap<&str, &str> = document
            .categories
            .iter()
            .map(|c| (c.name.as_str(), c.slug.as_str()))
            .collect();

        let mut categories = derive_categories(&document.skills);
        for category in &mut categories {
            if let Some(slug) = known_slugs.get(category.name.as_str()) {
                category.slug = (*slug).to_string();
            }
        }

        Ok(Self {
            categories,
            last_updated: document.last_updated,
            skills: document.skills,
        })
    }

    /// Fetch the catalog document once and build the catalog
    pub async fn load(source: &CatalogSource) -> Result<Self> {
        let document = source.fetch().await?;
        let catalog = Self::from_document(document)?;
        info!(
            "Catalog ready: {} skills in {} categories",
            catalog.len(),
            catalog.categories.len()
        );
        Ok(catalog)
    }

    /// Load the catalog, falling back to an empty one on failure.
    ///
    /// The error is handed back so the caller can surface it; there is no
    /// retry.
    pub async fn load_or_empty(source: &CatalogSource) -> (Self, Option<CatalogError>) {
        match Self::load(source).await {
            Ok(catalog) => (catalog, None),
            Err(e) => {
                error!("Failed to load catalog: {}", e);
                (Self::empty(), Some(e))
            }
        }
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    /// Category facets in first-seen order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn skill_by_slug(&self, slug: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.slug == slug)
    }

    pub fn skill_by_id(&self, id: SkillId) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == id)
    }

    pub fn featured(&self) -> Vec<&Skill> {
        self.skills.iter().filter(|s| s.featured).collect()
    }

    pub fn popular(&self) -> Vec<&Skill> {
        self.skills.iter().filter(|s| s.popular).collect()
    }

    /// Skills whose id is in `ids`, in catalog order
    pub fn bookmarked(&self, ids: &HashSet<SkillId>) -> Vec<&Skill> {
        self.skills.iter().filter(|s| ids.contains(&s.id)).collect()
    }

    pub fn stats(&self) -> CatalogStats {
        let authors: HashSet<&str> = self.skills.iter().map(|s| s.author.as_str()).collect();
        CatalogStats {
            skills: self.skills.len(),
            categories: self.categories.len(),
            authors: authors.len(),
        }
    }
}

/// Count skills per distinct category label, in first-seen order
pub fn derive_categories(skills: &[Skill]) -> Vec<Category> {
    let mut categories: Vec<Category> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for skill in skills {
        match index.get(skill.category.as_str()) {
            Some(&i) => categories[i].count += 1,
            None => {
                index.insert(skill.category.as_str(), categories.len());
                categories.push(Category {
                    name: skill.category.clone(),
                    slug: slugify(&skill.category),
                    count: 1,
                });
            }
        }
    }

    categories
}

/// Order categories by descending count; ties keep their first-seen position
pub fn sorted_for_display(categories: &[Category]) -> Vec<Category> {
    let mut sorted = categories.to_vec();
    // sort_by is stable
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    sorted
}

/// Lowercase a display name into a URL-safe slug ("AI & ML" -> "ai-ml")
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(id: SkillId, name: &str, category: &str, author: &str) -> Skill {
        Skill {
            id,
            name: name.to_string(),
            slug: name.to_string(),
            description: format!("{name} description"),
            category: category.to_string(),
            author: author.to_string(),
            github_url: format!("https://github.com/{author}/{name}"),
            install_command: format!("npx skills add {author}/{name}"),
            featured: id % 2 == 1,
            popular: id == 2,
            tags: None,
        }
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::empty();
        assert!(catalog.is_empty());
        assert!(catalog.categories().is_empty());
        assert_eq!(
            catalog.stats(),
            CatalogStats {
                skills: 0,
                categories: 0,
                authors: 0
            }
        );
    }

    #[test]
    fn test_derive_categories_counts_sum_to_len() {
        let skills = vec![
            skill(1, "pdf-helper", "Docs", "acme"),
            skill(2, "git-sync", "DevOps", "octo"),
            skill(3, "git-lint", "DevOps", "octo"),
            skill(4, "slides", "Docs", "acme"),
            skill(5, "figma-bridge", "Design", "paint"),
        ];
        let categories = derive_categories(&skills);

        let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Docs", "DevOps", "Design"]);
        assert_eq!(categories.iter().map(|c| c.count).sum::<usize>(), skills.len());
    }

    #[test]
    fn test_sorted_for_display_ties_keep_first_seen() {
        let skills = vec![
            skill(1, "a", "Design", "x"),
            skill(2, "b", "Docs", "x"),
            skill(3, "c", "DevOps", "x"),
            skill(4, "d", "DevOps", "x"),
        ];
        let sorted = sorted_for_display(&derive_categories(&skills));
        let names: Vec<_> = sorted.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["DevOps", "Design", "Docs"]);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("DevOps"), "devops");
        assert_eq!(slugify("AI & ML"), "ai-ml");
        assert_eq!(slugify("  Data / Analytics  "), "data-analytics");
    }

    #[test]
    fn test_from_document_keeps_known_slugs_and_recounts() {
        let document = CatalogDocument {
            skills: vec![
                skill(1, "pdf-helper", "Docs", "acme"),
                skill(2, "git-sync", "DevOps", "octo"),
            ],
            categories: vec![Category {
                name: "Docs".into(),
                slug: "documents".into(),
                count: 99,
            }],
            total_count: Some(2),
            last_updated: Some("2026-02-01".into()),
        };

        let catalog = Catalog::from_document(document).unwrap();
        assert_eq!(catalog.categories()[0].slug, "documents");
        assert_eq!(catalog.categories()[0].count, 1);
        assert_eq!(catalog.categories()[1].slug, "devops");
        assert_eq!(catalog.last_updated(), Some("2026-02-01"));
    }

    #[test]
    fn test_lookups() {
        let catalog = Catalog::new(vec![
            skill(1, "pdf-helper", "Docs", "acme"),
            skill(2, "git-sync", "DevOps", "octo"),
            skill(3, "git-lint", "DevOps", "octo"),
        ]);

        assert_eq!(catalog.skill_by_slug("git-sync").map(|s| s.id), Some(2));
        assert!(catalog.skill_by_slug("missing").is_none());
        assert_eq!(catalog.skill_by_id(3).map(|s| s.slug.as_str()), Some("git-lint"));

        let featured: Vec<_> = catalog.featured().iter().map(|s| s.id).collect();
        assert_eq!(featured, vec![1, 3]);
        let popular: Vec<_> = catalog.popular().iter().map(|s| s.id).collect();
        assert_eq!(popular, vec![2]);

        let ids: HashSet<SkillId> = [3, 1].into_iter().collect();
        let saved: Vec<_> = catalog.bookmarked(&ids).iter().map(|s| s.id).collect();
        assert_eq!(saved, vec![1, 3]);

        assert_eq!(catalog.stats().authors, 2);
    }

    #[tokio::test]
    async fn test_load_or_empty_on_failure() {
        let source = CatalogSource::detect("/nonexistent/skills.json");
        let (catalog, err) = Catalog::load_or_empty(&source).await;
        assert!(catalog.is_empty());
        assert!(err.is_some());
    }
}
