//! SkillDeck Types - Core types for the SkillDeck directory
//!
//! This module defines the data model shared by the catalog, persistence
//! and provider crates.

mod message;
mod skill;
mod user;

pub use message::{ChatMessage, Role};
pub use skill::{CatalogDocument, Category, Skill, SkillId};
pub use user::{User, UserId};
