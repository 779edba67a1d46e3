//! Turn assembly: stored turns + new submission -> provider content blocks.
//!
//! Projects the persisted history into text-only blocks (historical
//! attachments survive as metadata and are never re-inlined), appends one
//! block for the current submission with its binary attachments inlined,
//! and normalizes the result so no two adjacent blocks share the user role.

use helios_types::chat::{Attachment, Turn, TurnRole};
use helios_types::provider::{Content, Part};

/// A file submitted with the current message. The payload is inlined into
/// the provider request once and then discarded; only [`Attachment`]
/// metadata is persisted with the turn.
#[derive(Debug, Clone)]
pub struct UploadedAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl UploadedAttachment {
    /// The durable metadata record for this upload.
    pub fn metadata(&self) -> Attachment {
        Attachment {
            file_name: self.file_name.clone(),
            mime_type: self.mime_type.clone(),
        }
    }
}

/// Build the ordered content-block sequence for one provider call.
///
/// The returned sequence preserves chronological order, contains no two
/// adjacent user blocks, and ends in exactly one user block carrying the
/// current submission (merged into the projected history where adjacent).
/// An empty prompt contributes no text part; callers reject submissions
/// with neither prompt nor attachments before assembly.
pub fn assemble_contents(
    history: &[Turn],
    prompt: &str,
    attachments: &[UploadedAttachment],
) -> Vec<Content> {
    let mut blocks: Vec<Content> = history.iter().map(project_turn).collect();

    let mut parts = Vec::with_capacity(1 + attachments.len());
    if !prompt.is_empty() {
        parts.push(Part::Text(prompt.to_string()));
    }
    for upload in attachments {
        parts.push(Part::InlineData {
            mime_type: upload.mime_type.clone(),
            data: upload.data.clone(),
        });
    }
    blocks.push(Content::User(parts));

    normalize(blocks)
}

/// Project one stored turn into a single-text-part block.
fn project_turn(turn: &Turn) -> Content {
    let parts = vec![Part::Text(turn.content.clone())];
    match turn.role {
        TurnRole::User => Content::User(parts),
        TurnRole::Model => Content::Model(parts),
    }
}

/// Merge adjacent user blocks left to right.
///
/// Legitimate history alternates roles, but the appended submission block
/// can sit next to a trailing user turn; some providers reject that shape,
/// so the invariant is enforced over the whole sequence.
fn normalize(blocks: Vec<Content>) -> Vec<Content> {
    let mut out: Vec<Content> = Vec::with_capacity(blocks.len());
    for block in blocks {
        match out.last_mut() {
            Some(prev) => {
                if let Some(rejected) = prev.absorb_user(block) {
                    out.push(rejected);
                }
            }
            None => out.push(block),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use helios_types::chat::Turn;

    fn upload(name: &str, mime: &str, data: &[u8]) -> UploadedAttachment {
        UploadedAttachment {
            file_name: name.to_string(),
            mime_type: mime.to_string(),
            data: data.to_vec(),
        }
    }

    fn text_of(part: &Part) -> &str {
        match part {
            Part::Text(t) => t,
            other => panic!("expected text part, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_history_single_prompt() {
        let blocks = assemble_contents(&[], "Hello", &[]);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0], Content::User(vec![Part::Text("Hello".into())]));
    }

    #[test]
    fn test_history_ending_in_model_is_not_merged() {
        let history = vec![
            Turn::user("Hello".into(), vec![]),
            Turn::model("Hi there!".into()),
        ];
        let blocks = assemble_contents(&history, "more", &[upload("a.png", "image/png", b"\x89PNG")]);

        // Grows by exactly one block relative to the projected history.
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].role(), "user");
        assert_eq!(blocks[1].role(), "model");
        let Content::User(parts) = &blocks[2] else {
            panic!("trailing block must be user");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(text_of(&parts[0]), "more");
        assert_eq!(
            parts[1],
            Part::InlineData {
                mime_type: "image/png".into(),
                data: b"\x89PNG".to_vec(),
            }
        );
    }

    #[test]
    fn test_trailing_user_turn_merges_with_submission() {
        let history = vec![
            Turn::user("first question".into(), vec![]),
            Turn::model("first answer".into()),
            Turn::user("follow-up".into(), vec![]),
        ];
        let blocks = assemble_contents(&history, "and also this", &[]);

        assert_eq!(blocks.len(), 3);
        let Content::User(parts) = &blocks[2] else {
            panic!("trailing block must be user");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(text_of(&parts[0]), "follow-up");
        assert_eq!(text_of(&parts[1]), "and also this");
    }

    #[test]
    fn test_no_adjacent_user_blocks_for_any_history() {
        // Pathological history with consecutive user turns still
        // normalizes to strictly alternating-or-model-separated blocks.
        let history = vec![
            Turn::user("a".into(), vec![]),
            Turn::user("b".into(), vec![]),
            Turn::model("c".into()),
            Turn::user("d".into(), vec![]),
            Turn::user("e".into(), vec![]),
        ];
        let blocks = assemble_contents(&history, "f", &[]);

        for pair in blocks.windows(2) {
            assert!(
                !(pair[0].role() == "user" && pair[1].role() == "user"),
                "adjacent user blocks survived normalization"
            );
        }
        assert_eq!(blocks.len(), 3);
        let Content::User(parts) = &blocks[2] else {
            panic!("trailing block must be user");
        };
        let texts: Vec<&str> = parts.iter().map(text_of).collect();
        assert_eq!(texts, vec!["d", "e", "f"]);
    }

    #[test]
    fn test_empty_prompt_with_attachment_has_only_inline_part() {
        let blocks = assemble_contents(&[], "", &[upload("a.png", "image/png", b"data")]);
        assert_eq!(blocks.len(), 1);
        let Content::User(parts) = &blocks[0] else {
            panic!("block must be user");
        };
        assert_eq!(parts.len(), 1);
        assert!(matches!(&parts[0], Part::InlineData { .. }));
    }

    #[test]
    fn test_historical_attachments_are_not_reinlined() {
        let history = vec![
            Turn::user(
                "look at this".into(),
                vec![Attachment {
                    file_name: "old.png".into(),
                    mime_type: "image/png".into(),
                }],
            ),
            Turn::model("nice image".into()),
        ];
        let blocks = assemble_contents(&history, "thanks", &[]);

        // The projected history turn carries only its text part.
        assert_eq!(blocks[0].parts(), &[Part::Text("look at this".into())]);
    }

    #[test]
    fn test_attachments_keep_submission_order() {
        let uploads = vec![
            upload("one.txt", "text/plain", b"1"),
            upload("two.txt", "text/plain", b"2"),
        ];
        let blocks = assemble_contents(&[], "files", &uploads);
        let Content::User(parts) = &blocks[0] else {
            panic!("block must be user");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(
            parts[1],
            Part::InlineData {
                mime_type: "text/plain".into(),
                data: b"1".to_vec()
            }
        );
        assert_eq!(
            parts[2],
            Part::InlineData {
                mime_type: "text/plain".into(),
                data: b"2".to_vec()
            }
        );
    }

    #[test]
    fn test_metadata_drops_payload() {
        let up = upload("a.png", "image/png", b"payload");
        let meta = up.metadata();
        assert_eq!(meta.file_name, "a.png");
        assert_eq!(meta.mime_type, "image/png");
    }
}
