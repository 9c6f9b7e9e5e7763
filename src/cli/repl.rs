//! Line-by-line command loop.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::session::{Reply, Session};

/// Message printed when the user exits
pub const FAREWELL: &str = "Ending Library process.";

/// Feed every line from `input` to the session until EXIT or end of input.
///
/// With a `prompt`, it is written before each line is read and a blank line
/// follows every reply, as an interactive terminal expects.
pub async fn run_lines<R, W>(
    session: &mut Session,
    input: R,
    output: &mut W,
    prompt: Option<&str>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    write_prompt(output, prompt).await?;
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        match session.handle_line(&line).await {
            Reply::Exit => {
                output.write_all(format!("{}\n", FAREWELL).as_bytes()).await?;
                break;
            }
            Reply::Output(text) => {
                if !text.is_empty() {
                    output.write_all(format!("{}\n", text).as_bytes()).await?;
                }
                if prompt.is_some() {
                    output.write_all(b"\n").await?;
                }
            }
        }
        write_prompt(output, prompt).await?;
    }

    output.flush().await?;
    Ok(())
}

async fn write_prompt<W>(output: &mut W, prompt: Option<&str>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    if let Some(prompt) = prompt {
        output.write_all(prompt.as_bytes()).await?;
        output.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn transcript(script: &str, prompt: Option<&str>) -> String {
        let mut session = Session::default();
        let mut output = Vec::new();

        run_lines(&mut session, script.as_bytes(), &mut output, prompt)
            .await
            .unwrap();

        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn test_script_without_prompt() {
        let out = transcript("ADD MEMBER Ada\nMEMBER 100000\n", None).await;
        assert_eq!(out, "Success.\n100000: Ada\n");
    }

    #[tokio::test]
    async fn test_exit_stops_processing() {
        let out = transcript("EXIT\nADD MEMBER Ada\n", None).await;
        assert_eq!(out, "Ending Library process.\n");
    }

    #[tokio::test]
    async fn test_interactive_prompting() {
        let out = transcript("LIST ALL\nexit\n", Some("user: ")).await;
        assert_eq!(
            out,
            "user: No books in system.\n\nuser: Ending Library process.\n"
        );
    }
}
