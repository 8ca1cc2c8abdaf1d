//! Where wallet passwords come from.
//!
//! A [`PasswordSource`] is picked once at startup. [`host_source`] chooses
//! the interactive prompt when standard input is a terminal and otherwise
//! reads the piped input to end-of-stream, so both of these work:
//!
//! ```text
//! $ golembase-wallet address
//! Enter wallet password:
//! $ echo "abc123" | golembase-wallet address
//! ```
//!
//! The terminal branch needs a real TTY and is checked by hand; tests cover
//! source selection and the stream and environment sources.

use crate::error::{WalletError, WalletResult};
use async_trait::async_trait;
use std::io::{self, IsTerminal};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;
use zeroize::Zeroizing;

/// Environment variable read by the default-wallet entry point
pub const PASSWORD_ENV_VAR: &str = "GOLEMDB_PASS";

pub const DEFAULT_PROMPT: &str = "Enter wallet password: ";

/// A password, wiped from memory on drop.
pub type Password = Zeroizing<String>;

/// Supplies one password per call. Implementations make exactly one read
/// attempt and trim surrounding whitespace; they never retry or ask for
/// confirmation.
#[async_trait]
pub trait PasswordSource: Send + Sync {
    async fn obtain(&mut self, prompt: &str) -> WalletResult<Password>;
}

/// Prompts on the terminal with echo turned off.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractiveTtySource;

#[async_trait]
impl PasswordSource for InteractiveTtySource {
    async fn obtain(&mut self, prompt: &str) -> WalletResult<Password> {
        let prompt = prompt.to_owned();
        let typed = tokio::task::spawn_blocking(move || rpassword::prompt_password(prompt))
            .await?
            .map_err(WalletError::Password)?;
        let typed = Zeroizing::new(typed);
        Ok(Zeroizing::new(typed.trim().to_owned()))
    }
}

/// Reads a whole stream, e.g. piped standard input. Prints no prompt.
#[derive(Debug)]
pub struct StreamSource<R> {
    reader: R,
}

impl<R> StreamSource<R>
where
    R: AsyncRead + Unpin + Send + Sync,
{
    pub fn new(reader: R) -> Self {
        StreamSource { reader }
    }
}

impl StreamSource<tokio::io::Stdin> {
    pub fn stdin() -> Self {
        StreamSource::new(tokio::io::stdin())
    }
}

#[async_trait]
impl<R> PasswordSource for StreamSource<R>
where
    R: AsyncRead + Unpin + Send + Sync,
{
    async fn obtain(&mut self, _prompt: &str) -> WalletResult<Password> {
        let mut buf = Zeroizing::new(Vec::new());
        self.reader
            .read_to_end(&mut buf)
            .await
            .map_err(WalletError::Password)?;

        let text = std::str::from_utf8(&buf)
            .map_err(|e| WalletError::Password(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        Ok(Zeroizing::new(text.trim().to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    Interactive,
    Stream,
}

impl SourceKind {
    fn for_stdin(is_terminal: bool) -> Self {
        if is_terminal {
            SourceKind::Interactive
        } else {
            SourceKind::Stream
        }
    }

    fn into_source(self) -> Box<dyn PasswordSource> {
        match self {
            SourceKind::Interactive => Box::new(InteractiveTtySource),
            SourceKind::Stream => Box::new(StreamSource::stdin()),
        }
    }
}

/// Picks the source matching how standard input is attached.
pub fn host_source() -> Box<dyn PasswordSource> {
    let kind = SourceKind::for_stdin(io::stdin().is_terminal());
    debug!(?kind, "selected password source");
    kind.into_source()
}

/// One-shot convenience over [`host_source`].
pub async fn obtain_password(prompt: &str) -> WalletResult<Password> {
    host_source().obtain(prompt).await
}

/// Trimmed value of `var`, or `None` when it is unset, empty or not UTF-8.
pub fn password_from_env(var: &str) -> Option<Password> {
    let value = Zeroizing::new(std::env::var(var).ok()?);
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(Zeroizing::new(trimmed.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync + ?Sized>() {}

    #[test]
    fn sources_are_send_and_sync() {
        assert_send_sync::<dyn PasswordSource>();
        assert_send_sync::<InteractiveTtySource>();
        assert_send_sync::<StreamSource<tokio::io::Stdin>>();
        assert_send_sync::<StreamSource<&'static [u8]>>();
    }

    #[test]
    fn terminal_stdin_prompts_interactively() {
        assert_eq!(SourceKind::for_stdin(true), SourceKind::Interactive);
    }

    #[test]
    fn redirected_stdin_is_read_as_a_stream() {
        assert_eq!(SourceKind::for_stdin(false), SourceKind::Stream);
    }

    #[tokio::test]
    async fn piped_input_is_trimmed() {
        let mut source = StreamSource::new(&b"  secret123\n"[..]);
        let password = source.obtain(DEFAULT_PROMPT).await.unwrap();
        assert_eq!(password.as_str(), "secret123");
    }

    #[tokio::test]
    async fn piped_input_reads_to_end_of_stream() {
        let mut source = StreamSource::new(&b"correct horse\nbattery staple\n"[..]);
        let password = source.obtain(DEFAULT_PROMPT).await.unwrap();
        assert_eq!(password.as_str(), "correct horse\nbattery staple");
    }

    #[tokio::test]
    async fn second_read_of_exhausted_stream_is_empty() {
        let mut source = StreamSource::new(&b"once"[..]);
        assert_eq!(source.obtain("").await.unwrap().as_str(), "once");
        assert_eq!(source.obtain("").await.unwrap().as_str(), "");
    }

    #[tokio::test]
    async fn invalid_utf8_is_an_error() {
        let mut source = StreamSource::new(&[0xff, 0xfe, 0x00][..]);
        let result = source.obtain(DEFAULT_PROMPT).await;
        assert!(matches!(result, Err(WalletError::Password(_))));
    }

    #[test]
    fn env_password_is_trimmed() {
        std::env::set_var("GOLEMBASE_WALLET_TEST_PASS_TRIM", " abc123 \n");
        let password = password_from_env("GOLEMBASE_WALLET_TEST_PASS_TRIM").unwrap();
        assert_eq!(password.as_str(), "abc123");
    }

    #[test]
    fn missing_or_blank_env_password_is_none() {
        assert!(password_from_env("GOLEMBASE_WALLET_TEST_PASS_UNSET").is_none());

        std::env::set_var("GOLEMBASE_WALLET_TEST_PASS_BLANK", "   ");
        assert!(password_from_env("GOLEMBASE_WALLET_TEST_PASS_BLANK").is_none());
    }
}
