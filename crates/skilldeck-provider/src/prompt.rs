//! Canned prompt text for test-drive sessions

use skilldeck_types::Skill;

/// Shown in place of a reply when no API key is configured
pub const MISSING_KEY_MESSAGE: &str = "⚠️ API Key missing. Live test drives are disabled until a \
completion API key is configured (set SKILLDECK_API_KEY).";

/// Shown in place of a reply when the completion request fails
pub const CONNECTION_ERROR_MESSAGE: &str =
    "❌ Connection error: the simulator could not be reached. Please try again.";

/// Build the hidden system prompt that makes the model role-play `skill`
/// as a command-line tool. Pure function of the skill metadata.
pub fn system_prompt(skill: &Skill) -> String {
    format!(
        r#"### MISSION
You are a command-line simulator. Role-play a CLI tool called "{name}".

### KNOWN DATA
- **Tool Name:** {name}
- **Description:** {description}
- **Category:** {category}
- **Author:** {author}

### INSTRUCTIONS
The user is test driving this tool from a skills directory. You do not have its
real code, so improvise a convincing session.

1. **Infer functionality:** derive plausible commands from the name and description.
   - A tool named "pdf-helper" would offer commands such as "merge", "split" and "extract".
   - Assume every command works.

2. **Interaction style:**
   - Answer exactly like a terminal would.
   - Status emojis such as ✅, ❌, 📦 and 🚀 are welcome.
   - Never mention being an AI. Stay in character.

3. **Handling input:**
   - On "help" or "start", print a menu of available commands.
   - On any command, print realistic output for a successful run.

### EXAMPLE START
"🚀 {name} v1.0 initialized. Ready for command. Type 'help' to see available options.""#,
        name = skill.name,
        description = skill.description,
        category = skill.category,
        author = skill.author,
    )
}

/// First visible assistant message of a session
pub fn greeting(skill: &Skill) -> String {
    format!(
        "🚀 {} environment loaded.\nType 'help' to view available commands.",
        skill.name
    )
}
