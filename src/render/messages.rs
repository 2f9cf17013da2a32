//! Message thread renderer

use super::{Fragment, LabelMap, Thread, NO_MESSAGES};
use crate::api::dto::MessageThread;

/// Threads of the current user; sender and recipient resolved through `users`
pub fn message_threads(messages: Option<&[MessageThread]>, users: &LabelMap) -> Fragment {
    let messages = match messages {
        Some(messages) if !messages.is_empty() => messages,
        _ => return Fragment::Placeholder(NO_MESSAGES),
    };

    Fragment::Threads(
        messages
            .iter()
            .map(|msg| Thread {
                from: users.resolve(msg.from_user_id),
                to: users.resolve(msg.to_user_id),
                entries: msg.entries().into_iter().map(str::to_string).collect(),
            })
            .collect(),
    )
}
