//! Interactive tutor chat on the terminal

use std::io::Write;

use application::{CHAT_GREETING, ChatService};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

const EXIT_WORDS: [&str; 3] = ["exit", "quit", "/q"];

fn is_exit(line: &str) -> bool {
    EXIT_WORDS.iter().any(|w| line.eq_ignore_ascii_case(w))
}

/// Read questions line by line and stream each reply to `out`
pub async fn run(
    chat: &ChatService,
    input: impl AsyncBufRead + Unpin,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let session = chat.create_session();
    writeln!(out, "Pearl: {CHAT_GREETING}")?;
    writeln!(out, "(type \"exit\" to leave)")?;

    let mut lines = input.lines();
    loop {
        write!(out, "\nYou: ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if is_exit(line) {
            break;
        }

        write!(out, "Pearl: ")?;
        let mut replies = chat.send(session, line)?;
        while let Some(chunk) = replies.recv().await {
            write!(out, "{}", chunk.content)?;
            out.flush()?;
            if chunk.done {
                break;
            }
        }
        writeln!(out)?;
    }

    chat.close_session(session);
    debug!(session = %session, "Chat ended");
    Ok(())
}
