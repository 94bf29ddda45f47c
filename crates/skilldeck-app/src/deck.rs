//! Interactive state: browse query, auth, bookmarks and open test drives

use std::sync::Arc;

use console::style;
use skilldeck_catalog::{Catalog, CatalogQuery};
use skilldeck_persistence::{AuthContext, BackendError, BookmarkCache};
use skilldeck_provider::{CompletionBackend, TestDriveSession};
use skilldeck_types::User;
use tracing::{debug, warn};

use crate::commands::{Command, CLOSE_SESSION, HELP};
use crate::render;

/// What the prompt loop should do after a line
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Print(String),
    Quit,
}

pub struct Deck {
    catalog: Catalog,
    page_size: usize,
    query: CatalogQuery,
    completion: Arc<dyn CompletionBackend>,
    auth: AuthContext,
    bookmarks: BookmarkCache,
    /// The open test drive, if any. Leaving it drops the transcript.
    session: Option<TestDriveSession>,
    splash_shown: bool,
}

impl Deck {
    pub fn new(
        catalog: Catalog,
        page_size: usize,
        completion: Arc<dyn CompletionBackend>,
        auth: AuthContext,
        bookmarks: BookmarkCache,
    ) -> Self {
        Self {
            catalog,
            page_size,
            query: CatalogQuery::new(),
            completion,
            auth,
            bookmarks,
            session: None,
            splash_shown: false,
        }
    }

    /// Restore any existing session and load its bookmarks
    pub async fn start(&mut self) {
        if let Err(e) = self.auth.init().await {
            warn!("Could not restore session: {}", e);
        }
        self.refresh_bookmarks().await;
    }

    pub fn shutdown(&mut self) {
        self.leave_drive();
        self.auth.teardown();
    }

    /// The intro banner, only the first time it is asked for
    pub fn splash(&mut self) -> Option<String> {
        if self.splash_shown {
            return None;
        }
        self.splash_shown = true;
        Some(render::splash(&self.catalog))
    }

    pub fn prompt(&self) -> String {
        match &self.session {
            Some(session) => format!("{}$ ", session.skill().slug),
            None => "skilldeck> ".to_string(),
        }
    }

    pub fn is_driving(&self) -> bool {
        self.session.is_some()
    }

    /// Close the open session and discard its transcript
    fn leave_drive(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.close();
            debug!("Left test drive for {}", session.skill().slug);
        }
    }

    fn current_user(&self) -> Option<User> {
        self.auth.user().ok().flatten().cloned()
    }

    async fn refresh_bookmarks(&mut self) {
        let user = self.current_user();
        self.bookmarks.refresh(user.as_ref()).await;
    }

    pub async fn handle_line(&mut self, line: &str) -> Outcome {
        if self.session.is_some() {
            self.drive_input(line).await
        } else {
            self.handle(Command::parse(line)).await
        }
    }

    async fn drive_input(&mut self, line: &str) -> Outcome {
        if line.trim() == CLOSE_SESSION {
            self.leave_drive();
            return Outcome::Print(style("Session closed.").dim().to_string());
        }

        let Some(session) = self.session.as_mut() else {
            return Outcome::Print(String::new());
        };

        match session.exchange(self.completion.as_ref(), line).await {
            Some(reply) => {
                let reply = reply.clone();
                Outcome::Print(render::message(session.skill(), &reply))
            }
            None => Outcome::Print(String::new()),
        }
    }

    pub async fn handle(&mut self, command: Command) -> Outcome {
        let text = match command {
            Command::Quit => return Outcome::Quit,
            Command::Empty => String::new(),
            Command::Invalid(hint) => style(hint).yellow().to_string(),
            Command::Help => HELP.to_string(),
            Command::List => self.list(),
            Command::Search(text) => {
                self.query.set_query(text);
                self.list()
            }
            Command::Category(name) => self.toggle_category(&name),
            Command::Categories => render::categories(&self.catalog, self.query.categories()),
            Command::Clear => {
                self.query.clear_filters();
                self.list()
            }
            Command::Page(page) => {
                let total = self.query.view(&self.catalog, self.page_size).total_pages;
                self.query.set_page(page, total);
                self.list()
            }
            Command::Next => {
                let total = self.query.view(&self.catalog, self.page_size).total_pages;
                self.query.next_page(total);
                self.list()
            }
            Command::Prev => {
                self.query.prev_page();
                self.list()
            }
            Command::Show(slug) => match self.catalog.skill_by_slug(&slug) {
                Some(skill) => {
                    render::skill_detail(&self.catalog, skill, self.bookmarks.contains(skill.id))
                }
                None => not_found(&slug),
            },
            Command::Featured => {
                let skills = self.catalog.featured();
                render::skill_list(&self.catalog, &skills, |s| self.bookmarks.contains(s.id))
            }
            Command::Popular => {
                let skills = self.catalog.popular();
                render::skill_list(&self.catalog, &skills, |s| self.bookmarks.contains(s.id))
            }
            Command::Stats => render::stats(&self.catalog.stats(), self.catalog.last_updated()),
            Command::Login { email, password } => self.login(&email, &password).await,
            Command::Register { email, password } => self.register(&email, &password).await,
            Command::Logout => self.logout().await,
            Command::WhoAmI => match self.auth.user() {
                Ok(user) => render::whoami(user),
                Err(e) => failure(&e),
            },
            Command::Save(slug) => self.toggle_bookmark(&slug).await,
            Command::Bookmarks => self.list_bookmarks(),
            Command::Drive(slug) => self.open_drive(&slug),
        };
        Outcome::Print(text)
    }

    fn list(&self) -> String {
        let view = self.query.view(&self.catalog, self.page_size);
        render::page(&self.catalog, &view, &self.filter_summary(), |s| {
            self.bookmarks.contains(s.id)
        })
    }

    fn filter_summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.query.query().is_empty() {
            parts.push(format!("search \"{}\"", self.query.query()));
        }
        if !self.query.categories().is_empty() {
            parts.push(format!("in {}", self.query.categories().join(", ")));
        }
        parts.join(" ")
    }

    fn toggle_category(&mut self, name: &str) -> String {
        let known = self
            .catalog
            .categories()
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name) || c.slug == name)
            .map(|c| c.name.clone());

        match known {
            Some(name) => {
                self.query.toggle_category(&name);
                self.list()
            }
            None => style(format!("No category named '{}'. Try 'cats'.", name))
                .yellow()
                .to_string(),
        }
    }

    async fn login(&mut self, email: &str, password: &str) -> String {
        let outcome = self.auth.sign_in(email, password).await.map(|u| render::whoami(Some(u)));
        self.after_auth_change(outcome).await
    }

    async fn register(&mut self, email: &str, password: &str) -> String {
        let outcome = match self.auth.sign_up(email, password).await {
            Ok(user) => match self.auth.user() {
                Ok(Some(_)) => Ok(format!("Account created. {}", render::whoami(Some(&user)))),
                _ => Ok("Account created. Check your email to confirm it, then log in.".to_string()),
            },
            Err(e) => Err(e),
        };
        self.after_auth_change(outcome).await
    }

    async fn logout(&mut self) -> String {
        let outcome = self.auth.sign_out().await.map(|()| "Signed out.".to_string());
        self.after_auth_change(outcome).await
    }

    async fn after_auth_change(&mut self, outcome: Result<String, BackendError>) -> String {
        match outcome {
            Ok(text) => {
                self.refresh_bookmarks().await;
                text
            }
            Err(e) => failure(&e),
        }
    }

    async fn toggle_bookmark(&mut self, slug: &str) -> String {
        let Some(skill) = self.catalog.skill_by_slug(slug) else {
            return not_found(slug);
        };
        if !self.bookmarks.is_signed_in() {
            return style("Log in to bookmark skills.").yellow().to_string();
        }

        let (id, name) = (skill.id, skill.name.clone());
        let was_saved = self.bookmarks.contains(id);
        if !self.bookmarks.toggle(id).await {
            return style("Could not update bookmarks, please try again.").red().to_string();
        }
        if was_saved {
            format!("Removed {} from bookmarks.", name)
        } else {
            format!("★ Saved {}.", name)
        }
    }

    fn list_bookmarks(&self) -> String {
        if !self.bookmarks.is_signed_in() {
            return style("Log in to see your bookmarks.").yellow().to_string();
        }
        let skills = self.catalog.bookmarked(self.bookmarks.ids());
        render::skill_list(&self.catalog, &skills, |_| true)
    }

    fn open_drive(&mut self, slug: &str) -> String {
        let Some(skill) = self.catalog.skill_by_slug(slug).cloned() else {
            return not_found(slug);
        };

        // every drive starts from a fresh transcript
        self.leave_drive();
        debug!("Driving {}", skill.slug);
        let header = format!(
            "Test drive: {} (simulated; {} to leave)",
            skill.name, CLOSE_SESSION
        );
        let session = self.session.insert(TestDriveSession::new(skill));
        session.open();

        let mut out = vec![style(header).dim().to_string()];
        out.extend(
            session
                .visible_messages()
                .map(|m| render::message(session.skill(), m)),
        );
        out.join("\n")
    }
}

fn not_found(slug: &str) -> String {
    style(format!("No skill with slug '{}'.", slug)).yellow().to_string()
}

fn failure(error: &BackendError) -> String {
    style(format!("❌ {}", error)).red().to_string()
}
