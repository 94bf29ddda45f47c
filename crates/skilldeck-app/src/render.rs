//! Terminal presentation of catalog views and chat transcripts

use console::{style, Style};
use skilldeck_catalog::{
    slugify, sorted_for_display, style_for, Accent, Catalog, CatalogStats, CategoryStyle, PageView,
};
use skilldeck_provider::{Line, Span};
use skilldeck_types::{ChatMessage, Role, Skill, User};

const DESCRIPTION_WIDTH: usize = 72;

pub const SPLASH: &str = r#"
  ____  _    _ _ _ ____            _
 / ___|| | _(_) | |  _ \  ___  ___| | __
 \___ \| |/ / | | | | | |/ _ \/ __| |/ /
  ___) |   <| | | | |_| |  __/ (__|   <
 |____/|_|\_\_|_|_|____/ \___|\___|_|\_\
"#;

fn accent(accent: Accent) -> Style {
    let base = Style::new();
    match accent {
        Accent::Blue => base.blue(),
        Accent::Cyan => base.cyan(),
        Accent::Green => base.green(),
        Accent::Magenta => base.magenta(),
        Accent::Red => base.red(),
        Accent::Yellow => base.yellow(),
        Accent::White => base.white(),
    }
}

/// Style of a category by display name, using the catalog's slug when known
fn category_style(catalog: &Catalog, name: &str) -> CategoryStyle {
    let slug = catalog
        .categories()
        .iter()
        .find(|c| c.name == name)
        .map_or_else(|| slugify(name), |c| c.slug.clone());
    style_for(&slug)
}

fn badge(catalog: &Catalog, category: &str) -> String {
    let style = category_style(catalog, category);
    format!("{} {}", style.icon, accent(style.accent).apply_to(category))
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

pub fn splash(catalog: &Catalog) -> String {
    let stats = catalog.stats();
    format!(
        "{}\n  {}\n  {}\n",
        style(SPLASH.trim_end()).cyan().bold(),
        style("Browse, bookmark and test-drive agent skills.").bold(),
        style(format!(
            "{} skills · {} categories · {} authors · type 'help' for commands",
            stats.skills, stats.categories, stats.authors
        ))
        .dim()
    )
}

pub fn stats(stats: &CatalogStats, last_updated: Option<&str>) -> String {
    let mut out = format!(
        "{} skills\n{} categories\n{} authors",
        style(stats.skills).bold(),
        style(stats.categories).bold(),
        style(stats.authors).bold()
    );
    if let Some(updated) = last_updated {
        out.push_str(&format!("\nupdated {}", style(updated).dim()));
    }
    out
}

/// One-line entry: marker, name, slug, category badge and a short description
pub fn skill_row(catalog: &Catalog, skill: &Skill, bookmarked: bool) -> String {
    let marker = if bookmarked { "★" } else { " " };
    format!(
        "{} {} {}  {}\n    {}",
        style(marker).yellow(),
        style(&skill.name).bold(),
        style(format!("({})", skill.slug)).dim(),
        badge(catalog, &skill.category),
        truncate(&skill.description, DESCRIPTION_WIDTH)
    )
}

pub fn skill_list(
    catalog: &Catalog,
    skills: &[&Skill],
    is_bookmarked: impl Fn(&Skill) -> bool,
) -> String {
    if skills.is_empty() {
        return style("No skills found.").dim().to_string();
    }
    skills
        .iter()
        .map(|skill| skill_row(catalog, skill, is_bookmarked(skill)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn page(
    catalog: &Catalog,
    view: &PageView<'_>,
    filters: &str,
    is_bookmarked: impl Fn(&Skill) -> bool,
) -> String {
    let mut out = skill_list(catalog, &view.items, is_bookmarked);
    let mut footer = format!("{} results", view.total_matches);
    if view.total_pages > 1 {
        footer.push_str(&format!(" · page {}/{}", view.page, view.total_pages));
    }
    if !filters.is_empty() {
        footer.push_str(&format!(" · {}", filters));
    }
    out.push_str(&format!("\n\n{}", style(footer).dim()));
    out
}

pub fn skill_detail(catalog: &Catalog, skill: &Skill, bookmarked: bool) -> String {
    let mut out = format!(
        "{}{}\n{}  by {}\n\n{}\n",
        style(&skill.name).bold().underlined(),
        if bookmarked { " ★" } else { "" },
        badge(catalog, &skill.category),
        style(&skill.author).cyan(),
        skill.description
    );

    if !skill.tags().is_empty() {
        out.push_str(&format!("\ntags: {}\n", skill.tags().join(", ")));
    }
    if !skill.github_url.is_empty() {
        out.push_str(&format!("source: {}\n", style(&skill.github_url).underlined()));
    }
    if !skill.install_command.is_empty() {
        out.push_str(&format!("install: {}\n", style(&skill.install_command).green()));
    }
    out.push_str(&format!(
        "\n{}",
        style(format!("drive {} to try it", skill.slug)).dim()
    ));
    out
}

/// Categories in display order, with counts and selection marks
pub fn categories(catalog: &Catalog, selected: &[String]) -> String {
    let mut lines = vec![format!(
        "{} All Skills ({})",
        if selected.is_empty() { "●" } else { "○" },
        catalog.len()
    )];
    for category in sorted_for_display(catalog.categories()) {
        let mark = if selected.contains(&category.name) { "●" } else { "○" };
        lines.push(format!(
            "{} {} ({})",
            mark,
            badge(catalog, &category.name),
            category.count
        ));
    }
    lines.join("\n")
}

pub fn whoami(user: Option<&User>) -> String {
    match user {
        Some(user) => format!("Signed in as {}", style(user.display_name()).bold()),
        None => "Not signed in.".to_string(),
    }
}

fn span(span: &Span) -> String {
    match span {
        Span::Text(text) => text.clone(),
        Span::Strong(text) => style(text).bold().to_string(),
        Span::Code(text) => style(text).yellow().to_string(),
        Span::Emphasis(text) => style(text).italic().to_string(),
    }
}

fn spans(items: &[Span]) -> String {
    items.iter().map(span).collect()
}

/// Formatted assistant reply
pub fn reply(lines: &[Line]) -> String {
    lines
        .iter()
        .map(|line| match line {
            Line::Blank => String::new(),
            Line::Paragraph(items) => spans(items),
            Line::ListItem(items) => format!("  • {}", spans(items)),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn message(skill: &Skill, message: &ChatMessage) -> String {
    match message.role {
        Role::User => format!("{} {}", style("$").green().bold(), message.content),
        Role::Assistant => {
            let prefix = style(format!("{}>", skill.slug)).cyan();
            format!("{}\n{}", prefix, reply(&skilldeck_provider::render(&message.content)))
        }
        Role::System => String::new(),
    }
}
