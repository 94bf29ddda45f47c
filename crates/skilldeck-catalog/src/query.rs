//! Search, category filtering and pagination over the catalog

use skilldeck_types::Skill;

use crate::catalog::Catalog;

/// Keep skills matching the free-text query and the category selection.
///
/// - a non-empty `query` matches case-insensitively as a substring of the
///   name, description, author or category
/// - a non-empty `categories` keeps skills whose category is any of them
///
/// Both filters compose with AND. Source order is preserved.
pub fn filter<'a>(skills: &'a [Skill], query: &str, categories: &[String]) -> Vec<&'a Skill> {
    let needle = query.to_lowercase();

    skills
        .iter()
        .filter(|skill| needle.is_empty() || matches_query(skill, &needle))
        .filter(|skill| categories.is_empty() || categories.contains(&skill.category))
        .collect()
}

fn matches_query(skill: &Skill, needle: &str) -> bool {
    [
        &skill.name,
        &skill.description,
        &skill.author,
        &skill.category,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Slice out page `page` (1-based). Page 0 reads as page 1; pages past the
/// end are empty.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> &[T] {
    let start = page.max(1).saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Number of pages needed for `count` items
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// One rendered page of a query
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    pub items: Vec<&'a Skill>,
    pub total_matches: usize,
    pub total_pages: usize,
    pub page: usize,
}

/// Browse state: search text, selected categories and current page.
///
/// Every change to the search text or the category selection resets the
/// page to 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    query: String,
    categories: Vec<String>,
    page: usize,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogQuery {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            categories: Vec::new(),
            page: 1,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn has_filters(&self) -> bool {
        !self.query.is_empty() || !self.categories.is_empty()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    /// Add the category to the selection, or remove it if already selected
    pub fn toggle_category(&mut self, name: &str) {
        if let Some(pos) = self.categories.iter().position(|c| c == name) {
            self.categories.remove(pos);
        } else {
            self.categories.push(name.to_string());
        }
        self.page = 1;
    }

    pub fn set_categories(&mut self, categories: Vec<String>) {
        self.categories = categories;
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.query.clear();
        self.categories.clear();
        self.page = 1;
    }

    /// Move to `page`, clamped to `[1, total_pages]`
    pub fn set_page(&mut self, page: usize, total_pages: usize) {
        self.page = page.clamp(1, total_pages.max(1));
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.set_page(self.page.saturating_add(1), total_pages);
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Run the query against the catalog and slice out the current page
    pub fn view<'a>(&self, catalog: &'a Catalog, page_size: usize) -> PageView<'a> {
        let matches = filter(catalog.skills(), &self.query, &self.categories);
        let total_pages = total_pages(matches.len(), page_size);
        let page = self.page.clamp(1, total_pages.max(1));

        PageView {
            items: paginate(&matches, page_size, page).to_vec(),
            total_matches: matches.len(),
            total_pages,
            page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(id: i64, name: &str, category: &str) -> Skill {
        Skill {
            id,
            name: name.to_string(),
            slug: name.to_string(),
            description: String::new(),
            category: category.to_string(),
            author: "acme".to_string(),
            github_url: String::new(),
            install_command: String::new(),
            featured: false,
            popular: false,
            tags: None,
        }
    }

    fn sample() -> Vec<Skill> {
        vec![
            skill(1, "pdf-helper", "Docs"),
            skill(2, "git-sync", "DevOps"),
            skill(3, "git-lint", "DevOps"),
        ]
    }

    fn ids(skills: &[&Skill]) -> Vec<i64> {
        skills.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_filter_by_query() {
        let skills = sample();
        assert_eq!(ids(&filter(&skills, "git", &[])), vec![2, 3]);
        assert_eq!(ids(&filter(&skills, "GIT", &[])), vec![2, 3]);
        assert_eq!(ids(&filter(&skills, "ync", &[])), vec![2]);
        assert!(filter(&skills, "nothing-matches", &[]).is_empty());
    }

    #[test]
    fn test_filter_matches_every_field() {
        let mut skills = sample();
        skills[0].description = "Merge and split PDF files".into();
        skills[1].author = "Octocat".into();

        assert_eq!(ids(&filter(&skills, "split", &[])), vec![1]);
        assert_eq!(ids(&filter(&skills, "octo", &[])), vec![2]);
        assert_eq!(ids(&filter(&skills, "devops", &[])), vec![2, 3]);
    }

    #[test]
    fn test_filter_by_categories() {
        let skills = sample();
        let devops = vec!["DevOps".to_string()];
        assert_eq!(ids(&filter(&skills, "", &devops)), vec![2, 3]);

        let both = vec!["Docs".to_string(), "DevOps".to_string()];
        assert_eq!(ids(&filter(&skills, "", &both)), vec![1, 2, 3]);

        assert_eq!(ids(&filter(&skills, "", &[])), vec![1, 2, 3]);
    }

    #[test]
    fn test_filter_and_composition() {
        let skills = sample();
        let docs = vec!["Docs".to_string()];
        assert!(filter(&skills, "git", &docs).is_empty());
        assert_eq!(ids(&filter(&skills, "lint", &["DevOps".to_string()])), vec![3]);
    }

    #[test]
    fn test_paginate() {
        let skills = sample();
        let matches = filter(&skills, "", &["DevOps".to_string()]);
        assert_eq!(ids(paginate(&matches, 1, 2)), vec![3]);
        assert_eq!(ids(paginate(&matches, 1, 1)), vec![2]);
        assert_eq!(ids(paginate(&matches, 1, 0)), vec![2]);
        assert!(paginate(&matches, 1, 3).is_empty());
        assert!(paginate(&matches, 0, 1).is_empty());

        let numbers: Vec<u32> = (1..=40).collect();
        assert_eq!(paginate(&numbers, 18, 3), &[37, 38, 39, 40]);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 18), 0);
        assert_eq!(total_pages(18, 18), 1);
        assert_eq!(total_pages(19, 18), 2);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_filter_changes_reset_page() {
        let mut query = CatalogQuery::new();
        query.set_page(3, 5);
        assert_eq!(query.page(), 3);

        query.set_query("git");
        assert_eq!(query.page(), 1);

        query.set_page(2, 5);
        query.toggle_category("DevOps");
        assert_eq!(query.page(), 1);

        query.set_page(2, 5);
        query.set_categories(vec!["Docs".into()]);
        assert_eq!(query.page(), 1);

        query.set_page(4, 5);
        query.clear_filters();
        assert_eq!(query.page(), 1);
        assert!(!query.has_filters());
    }

    #[test]
    fn test_page_navigation_is_clamped() {
        let mut query = CatalogQuery::new();
        query.set_page(10, 3);
        assert_eq!(query.page(), 3);
        query.next_page(3);
        assert_eq!(query.page(), 3);
        query.prev_page();
        query.prev_page();
        query.prev_page();
        assert_eq!(query.page(), 1);
        query.set_page(4, 0);
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_toggle_category() {
        let mut query = CatalogQuery::new();
        query.toggle_category("DevOps");
        query.toggle_category("Docs");
        assert_eq!(query.categories(), &["DevOps".to_string(), "Docs".to_string()]);
        query.toggle_category("DevOps");
        assert_eq!(query.categories(), &["Docs".to_string()]);
    }

    #[test]
    fn test_view() {
        let catalog = Catalog::new(sample());
        let mut query = CatalogQuery::new();
        query.toggle_category("DevOps");
        query.set_page(2, 2);

        let view = query.view(&catalog, 1);
        assert_eq!(view.total_matches, 2);
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.page, 2);
        assert_eq!(ids(&view.items), vec![3]);

        let empty_catalog = Catalog::empty();
        let empty = CatalogQuery::new().view(&empty_catalog, 18);
        assert_eq!(empty.total_pages, 0);
        assert_eq!(empty.total_matches, 0);
        assert!(empty.items.is_empty());
    }
}
