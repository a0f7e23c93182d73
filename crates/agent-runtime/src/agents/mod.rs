//! Concrete agent implementations
//!
//! - MemberAgent: one LLM-backed role with instructions and server tools
//! - Team: runs members one after another, handing each the previous findings

pub mod member;
pub mod team;

pub use member::{MemberAgent, MemberConfig};
pub use team::{Team, TeamBuilder};
