//! Support chat.

use tokio::io::{AsyncBufReadExt, BufReader};

use testmart_storefront::Storefront;
use testmart_storefront::services::support::{ChatMessage, ChatSession, RandomReplies, ReplyPolicy};

use crate::error::CliError;
use crate::output::{Output, Render};

impl Render for ChatMessage {
    fn render(&self) -> String {
        format!(
            "[{}] {}: {}",
            self.timestamp.format("%H:%M:%S"),
            self.sender_name,
            self.message
        )
    }
}

/// Chat with the support bot. Sends each of `messages` in turn, or reads
/// lines from stdin until EOF when none are given.
pub async fn chat(
    store: &Storefront,
    messages: &[String],
    out: &Output,
) -> Result<(), CliError> {
    let policy = RandomReplies::new(store.config().rng_seed);
    let mut session = ChatSession::open(store.session().current(), policy);
    if let Some(welcome) = session.messages().first() {
        out.emit(welcome)?;
    }

    if !messages.is_empty() {
        for text in messages {
            exchange(&mut session, text, out).await?;
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.map_err(|source| CliError::File {
        path: "stdin".to_string(),
        source,
    })? {
        exchange(&mut session, &line, out).await?;
    }
    Ok(())
}

/// Send one message and print the reply. Blank lines are skipped.
async fn exchange<P: ReplyPolicy>(
    session: &mut ChatSession<P>,
    text: &str,
    out: &Output,
) -> Result<(), CliError> {
    if let Some(reply) = session.send(text).await {
        out.emit(reply)?;
    }
    Ok(())
}
