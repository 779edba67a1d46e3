//! Transient content types handed to the generative provider.
//!
//! A `Content` block is a role-tagged list of parts, derived fresh from a
//! session's turns on every request and never persisted. The role is the
//! enum tag itself: merging is defined only for User/User adjacency, so
//! "never merge model blocks" is structural rather than a runtime check.

/// One part of a content block: either text or an inlined binary payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    InlineData { mime_type: String, data: Vec<u8> },
}

/// A role-tagged, ordered list of parts sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    User(Vec<Part>),
    Model(Vec<Part>),
}

impl Content {
    /// The provider wire role for this block.
    pub fn role(&self) -> &'static str {
        match self {
            Content::User(_) => "user",
            Content::Model(_) => "model",
        }
    }

    /// Borrow the ordered parts of this block.
    pub fn parts(&self) -> &[Part] {
        match self {
            Content::User(parts) | Content::Model(parts) => parts,
        }
    }

    /// Absorb `other` into this block if both are user blocks, appending its
    /// parts in order. Returns `other` unchanged when the roles do not both
    /// read "user"; model blocks are never merged.
    pub fn absorb_user(&mut self, other: Content) -> Option<Content> {
        match (self, other) {
            (Content::User(parts), Content::User(more)) => {
                parts.extend(more);
                None
            }
            (_, other) => Some(other),
        }
    }
}
