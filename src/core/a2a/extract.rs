//! Flatten message and task results into display text

use super::message::{Message, Part, SendResult, Task};

/// Concatenate the text of every textual part, in order
pub fn extract_parts_text<'a>(parts: impl IntoIterator<Item = &'a Part>) -> String {
    parts.into_iter().filter_map(Part::as_text).collect()
}

pub fn extract_message_text(message: &Message) -> String {
    extract_parts_text(&message.parts)
}

/// Inline parts first, then artifact parts
pub fn extract_task_text(task: &Task) -> String {
    let artifact_parts = task.artifacts.iter().flat_map(|artifact| &artifact.parts);
    extract_parts_text(task.parts.iter().chain(artifact_parts))
}

/// Display text for either result shape
pub fn extract_text(result: &SendResult) -> String {
    match result {
        SendResult::Message(message) => extract_message_text(message),
        SendResult::Task(task) => extract_task_text(task),
    }
}
