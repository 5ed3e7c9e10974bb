//! Simulated support chat.
//!
//! A bot answers every customer message after a short artificial delay with
//! one of a fixed set of canned responses. Both the delay and the choice of
//! response come from a [`ReplyPolicy`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::models::Account;
use crate::services::rng;

/// Display name of the support bot.
pub const BOT_NAME: &str = "TestMart Bot";

/// Sender name for customers who are not signed in.
pub const ANONYMOUS_NAME: &str = "You";

/// Shortest artificial reply delay.
pub const MIN_REPLY_DELAY: Duration = Duration::from_secs(1);

/// Longest artificial reply delay (exclusive).
pub const MAX_REPLY_DELAY: Duration = Duration::from_secs(3);

/// Everything the bot knows how to say.
pub const CANNED_RESPONSES: [&str; 10] = [
    "Hi! I'm here to help. What can I assist you with today?",
    "Thank you for contacting us! How can I help you?",
    "I understand your concern. Let me help you with that.",
    "That's a great question! Here's what I can tell you...",
    "I'm connecting you with our product specialist. Please hold on.",
    "Is there anything else I can help you with today?",
    "Thanks for using TestMart! Have a great day!",
    "I'm sorry, but I need to transfer you to a human agent for this complex issue.",
    "Your order details have been sent to your email. Anything else?",
    "Our return policy allows returns within 30 days of purchase.",
];

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One line of the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Position in the transcript, starting at 1.
    pub id: u64,
    pub sender: Sender,
    pub sender_name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// A bot reply and how long the bot pretends to type it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub delay: Duration,
    pub message: String,
}

/// Decides how the bot answers a customer message.
pub trait ReplyPolicy: Send {
    fn reply(&mut self, message: &str) -> Reply;
}

impl<F> ReplyPolicy for F
where
    F: FnMut(&str) -> Reply + Send,
{
    fn reply(&mut self, message: &str) -> Reply {
        self(message)
    }
}

/// Picks a random canned response after a random delay.
#[derive(Debug)]
pub struct RandomReplies {
    rng: StdRng,
}

impl RandomReplies {
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: rng::seeded(seed),
        }
    }
}

impl Default for RandomReplies {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ReplyPolicy for RandomReplies {
    fn reply(&mut self, _message: &str) -> Reply {
        let delay = self.rng.random_range(MIN_REPLY_DELAY..MAX_REPLY_DELAY);
        let message = CANNED_RESPONSES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or_default()
            .to_string();
        Reply { delay, message }
    }
}

/// An open chat with the support bot.
#[derive(Debug)]
pub struct ChatSession<P = RandomReplies> {
    user_name: Option<String>,
    messages: Vec<ChatMessage>,
    policy: P,
}

impl<P: ReplyPolicy> ChatSession<P> {
    /// Open a chat, greeting `user` by name when signed in.
    pub fn open(user: Option<&Account>, policy: P) -> Self {
        let user_name = user.map(|account| account.name.clone());
        let greeting = user_name.as_ref().map_or_else(
            || "Welcome to TestMart Support! How can I help you today?".to_string(),
            |name| format!("Welcome to TestMart Support! Hi {name}! How can I help you today?"),
        );

        let mut chat = Self {
            user_name,
            messages: Vec::new(),
            policy,
        };
        chat.push(Sender::Bot, BOT_NAME.to_string(), greeting);
        chat
    }

    /// Send a customer message and wait for the bot to answer.
    ///
    /// Blank messages are ignored and return `None`.
    #[instrument(skip_all)]
    pub async fn send(&mut self, text: &str) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let sender_name = self
            .user_name
            .clone()
            .unwrap_or_else(|| ANONYMOUS_NAME.to_string());
        self.push(Sender::User, sender_name, text.to_string());

        let reply = self.policy.reply(text);
        debug!(delay_ms = reply.delay.as_millis(), "Bot typing");
        tokio::time::sleep(reply.delay).await;

        self.push(Sender::Bot, BOT_NAME.to_string(), reply.message);
        self.messages.last()
    }

    /// The transcript, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, sender: Sender, sender_name: String, message: String) {
        let id = self.messages.len() as u64 + 1;
        self.messages.push(ChatMessage {
            id,
            sender,
            sender_name,
            message,
            timestamp: Utc::now(),
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use testmart_core::{AccountId, AccountRole, Email};
    use tokio::time::Instant;

    use super::*;

    fn tess() -> Account {
        Account {
            id: AccountId::new(2),
            email: Email::parse("buyer@test.com").unwrap(),
            name: "Tess".to_string(),
            role: AccountRole::Buyer,
            is_locked: false,
        }
    }

    fn fixed(delay: u64) -> impl ReplyPolicy {
        move |_: &str| Reply {
            delay: Duration::from_secs(delay),
            message: "On it.".to_string(),
        }
    }

    #[test]
    fn test_welcome_message() {
        let chat = ChatSession::open(Some(&tess()), fixed(1));
        let welcome = &chat.messages()[0];
        assert_eq!(welcome.sender, Sender::Bot);
        assert_eq!(welcome.sender_name, BOT_NAME);
        assert_eq!(
            welcome.message,
            "Welcome to TestMart Support! Hi Tess! How can I help you today?"
        );

        let anonymous = ChatSession::open(None, fixed(1));
        assert_eq!(
            anonymous.messages()[0].message,
            "Welcome to TestMart Support! How can I help you today?"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_bot_replies_after_delay() {
        let mut chat = ChatSession::open(Some(&tess()), fixed(2));
        let start = Instant::now();

        let reply = chat.send("  where is my order?  ").await.unwrap();
        assert_eq!(reply.message, "On it.");
        assert!(start.elapsed() >= Duration::from_secs(2));

        let messages = chat.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].sender, Sender::User);
        assert_eq!(messages[1].sender_name, "Tess");
        assert_eq!(messages[1].message, "where is my order?");
        assert_eq!(messages[2].id, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_message_ignored() {
        let mut chat = ChatSession::open(None, fixed(1));
        assert!(chat.send("   ").await.is_none());
        assert_eq!(chat.messages().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_anonymous_sender_name() {
        let mut chat = ChatSession::open(None, fixed(1));
        chat.send("hello").await.unwrap();
        assert_eq!(chat.messages()[1].sender_name, ANONYMOUS_NAME);
    }

    #[test]
    fn test_random_replies_stay_in_bounds() {
        let mut policy = RandomReplies::new(Some(7));
        for _ in 0..50 {
            let reply = policy.reply("hi");
            assert!(reply.delay >= MIN_REPLY_DELAY);
            assert!(reply.delay < MAX_REPLY_DELAY);
            assert!(CANNED_RESPONSES.contains(&reply.message.as_str()));
        }
    }
}
