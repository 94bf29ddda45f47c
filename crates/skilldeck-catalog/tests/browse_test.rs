//! End-to-end browse flow over a catalog loaded from disk

use std::io::Write;

use skilldeck_catalog::{filter, paginate, sorted_for_display, Catalog, CatalogQuery, CatalogSource};

const DOCUMENT: &str = r#"{
    "skills": [
        {"id": 1, "name": "pdf-helper", "slug": "pdf-helper", "description": "Merge and split PDFs",
         "category": "Docs", "author": "acme", "github_url": "https://github.com/acme/pdf-helper",
         "install_command": "npx skills add acme/pdf-helper", "featured": true, "popular": true},
        {"id": 2, "name": "git-sync", "slug": "git-sync", "description": "Keep branches in sync",
         "category": "DevOps", "author": "octo", "github_url": "https://github.com/octo/git-sync",
         "install_command": "npx skills add octo/git-sync", "featured": false, "popular": true},
        {"id": 3, "name": "git-lint", "slug": "git-lint", "description": "Lint commit messages",
         "category": "DevOps", "author": "octo", "github_url": "https://github.com/octo/git-lint",
         "install_command": "npx skills add octo/git-lint", "featured": false, "popular": false,
         "tags": ["git", "lint"]}
    ],
    "categories": [
        {"name": "Docs", "slug": "docs", "count": 1},
        {"name": "DevOps", "slug": "devops", "count": 2}
    ],
    "total_count": 3,
    "last_updated": "2026-03-01T00:00:00Z"
}"#;

async fn load() -> Catalog {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DOCUMENT.as_bytes()).unwrap();
    Catalog::load(&CatalogSource::File(file.path().to_path_buf()))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_scenario_filter_and_paginate() {
    let catalog = load().await;

    let by_query: Vec<_> = filter(catalog.skills(), "git", &[]).iter().map(|s| s.id).collect();
    assert_eq!(by_query, vec![2, 3]);

    let devops = filter(catalog.skills(), "", &["DevOps".to_string()]);
    let by_category: Vec<_> = devops.iter().map(|s| s.id).collect();
    assert_eq!(by_category, vec![2, 3]);

    let page: Vec<_> = paginate(&devops, 1, 2).iter().map(|s| s.id).collect();
    assert_eq!(page, vec![3]);
}

#[tokio::test]
async fn test_underscore_slug_loads() {
    let document = DOCUMENT.replace(r#""slug": "git-lint""#, r#""slug": "skill_creator""#);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(document.as_bytes()).unwrap();

    let source = CatalogSource::File(file.path().to_path_buf());
    let (catalog, err) = Catalog::load_or_empty(&source).await;
    assert!(err.is_none());
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.skill_by_slug("skill_creator").map(|s| s.id), Some(3));
}

#[tokio::test]
async fn test_duplicate_slug_rejected_on_load() {
    let document = DOCUMENT.replace(r#""slug": "git-lint""#, r#""slug": "git-sync""#);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(document.as_bytes()).unwrap();

    let source = CatalogSource::File(file.path().to_path_buf());
    assert!(source.fetch().await.is_ok());
    assert!(Catalog::load(&source).await.is_err());
}

#[tokio::test]
async fn test_categories_for_display() {
    let catalog = load().await;
    let sorted = sorted_for_display(catalog.categories());
    assert_eq!(sorted[0].name, "DevOps");
    assert_eq!(sorted[0].count, 2);
    assert_eq!(sorted[1].name, "Docs");
}

#[tokio::test]
async fn test_query_state_never_serves_stale_page() {
    let catalog = load().await;
    let mut query = CatalogQuery::new();

    let first = query.view(&catalog, 1);
    assert_eq!(first.total_pages, 3);
    query.set_page(3, first.total_pages);
    assert_eq!(query.view(&catalog, 1).items[0].id, 3);

    query.set_query("pdf");
    let view = query.view(&catalog, 1);
    assert_eq!(view.page, 1);
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].id, 1);
}
