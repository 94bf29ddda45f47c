//! Command-line grammar of the interactive prompt

/// One line of user input, parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    List,
    /// Set the search text; empty clears it
    Search(String),
    /// Toggle a category in the selection
    Category(String),
    Categories,
    Clear,
    Page(usize),
    Next,
    Prev,
    Show(String),
    Featured,
    Popular,
    Stats,
    Login { email: String, password: String },
    Register { email: String, password: String },
    Logout,
    WhoAmI,
    Save(String),
    Bookmarks,
    Drive(String),
    Quit,
    Empty,
    /// Input that did not parse, with a hint for the user
    Invalid(String),
}

/// Leaves a test-drive session and returns to the browse prompt
pub const CLOSE_SESSION: &str = "/close";

pub const HELP: &str = "\
Browse
  list                     show the current page
  search [text]            filter by text (no text clears it)
  cat <name>               toggle a category filter
  cats                     list categories
  clear                    drop all filters
  page <n> | next | prev   move between pages
  show <slug>              skill details
  featured | popular       curated lists
  stats                    catalog numbers

Account
  login <email> <password>
  register <email> <password>
  logout | whoami
  save <slug>              bookmark or un-bookmark a skill
  bookmarks                list saved skills

Test drive
  drive <slug>             open a simulated session (/close to leave)

  quit";

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "" => Command::Empty,
            "help" | "?" => Command::Help,
            "list" | "ls" => Command::List,
            "search" | "find" => Command::Search(rest.to_string()),
            "cat" | "category" => required(rest, "cat <name>", Command::Category),
            "cats" | "categories" => Command::Categories,
            "clear" => Command::Clear,
            "page" => match rest.parse::<usize>() {
                Ok(n) if n > 0 => Command::Page(n),
                _ => Command::Invalid("usage: page <n> (n ≥ 1)".to_string()),
            },
            "next" | "n" => Command::Next,
            "prev" | "p" => Command::Prev,
            "show" | "info" => required(rest, "show <slug>", Command::Show),
            "featured" => Command::Featured,
            "popular" => Command::Popular,
            "stats" => Command::Stats,
            "login" => credentials(rest, "login <email> <password>")
                .map_or_else(Command::Invalid, |(email, password)| Command::Login {
                    email,
                    password,
                }),
            "register" | "signup" => credentials(rest, "register <email> <password>")
                .map_or_else(Command::Invalid, |(email, password)| Command::Register {
                    email,
                    password,
                }),
            "logout" => Command::Logout,
            "whoami" => Command::WhoAmI,
            "save" | "bookmark" => required(rest, "save <slug>", Command::Save),
            "bookmarks" | "saved" => Command::Bookmarks,
            "drive" | "try" => required(rest, "drive <slug>", Command::Drive),
            "quit" | "exit" | "q" => Command::Quit,
            other => Command::Invalid(format!("unknown command '{}', try 'help'", other)),
        }
    }
}

fn required(rest: &str, usage: &str, make: fn(String) -> Command) -> Command {
    if rest.is_empty() {
        Command::Invalid(format!("usage: {}", usage))
    } else {
        make(rest.to_string())
    }
}

fn credentials(rest: &str, usage: &str) -> Result<(String, String), String> {
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(email), Some(password), None) => Ok((email.to_string(), password.to_string())),
        _ => Err(format!("usage: {}", usage)),
    }
}
