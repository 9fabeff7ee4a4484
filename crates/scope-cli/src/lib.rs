//! Line-driven front end for the scope selector
//!
//! Each input line is one event:
//! - plain text is typed into the input and submitted
//! - an empty line submits whatever is pending (normally nothing)
//! - `:`-prefixed lines are commands (see [`SessionCommand`])
//!
//! After every event the session runs one render tick, so auto-validation
//! results show up on the following line of output.

#![allow(missing_docs)]

use anyhow::{Context, Result};
use scope_core::{AppendOutcome, Notification, RecordingSink, ScopeSelector};
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Type text into the input and submit it
    Submit(String),
    /// Append programmatically, bypassing the input
    Append(String),
    /// Remove by position (0-based)
    Remove(usize),
    /// Force validation
    Validate,
    /// Print the selection
    List,
    /// Print allow-list suggestions for a query
    Suggest(String),
    /// Print the selection as an OAuth2 scope parameter
    Param,
    /// Print the selection as JSON
    Json,
    /// Replace the selection with a JSON array
    Set(String),
    /// Print command help
    Help,
    /// End the session
    Quit,
}

impl FromStr for SessionCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let Some(command) = line.strip_prefix(':') else {
            return Ok(Self::Submit(line.to_string()));
        };
        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };
        let parsed = match name {
            "append" | "a" => Self::Append(arg.to_string()),
            "remove" | "rm" => Self::Remove(
                arg.parse()
                    .with_context(|| format!("invalid index: {arg:?}"))?,
            ),
            "validate" | "v" => Self::Validate,
            "list" | "ls" => Self::List,
            "suggest" | "s" => Self::Suggest(arg.to_string()),
            "param" => Self::Param,
            "json" => Self::Json,
            "set" => Self::Set(arg.to_string()),
            "help" | "h" => Self::Help,
            "quit" | "q" => Self::Quit,
            other => anyhow::bail!("unknown command: :{other}"),
        };
        Ok(parsed)
    }
}

const HELP: &str = "\
text            submit a scope
:append <s>     append programmatically
:remove <n>     remove scope at position n
:validate       force validation
:list           show selected scopes
:suggest [q]    show allow-list suggestions
:param          show the scope parameter
:json           show the selection as JSON
:set <json>     replace the selection
:quit           exit";

/// Interactive session over one selector
#[derive(Debug)]
pub struct Session {
    selector: ScopeSelector,
    events: RecordingSink,
}

impl Session {
    /// Wrap a selector, recording its notifications
    #[must_use]
    pub fn new(mut selector: ScopeSelector) -> Self {
        let events = RecordingSink::new();
        selector.subscribe(Arc::new(events.clone()));
        Self { selector, events }
    }

    /// Borrow the selector
    #[inline]
    #[must_use]
    pub fn selector(&self) -> &ScopeSelector {
        &self.selector
    }

    /// Handle one command, returning the lines to print
    ///
    /// Command errors are reported as output, not returned: a bad line
    /// should not end the session.
    pub async fn handle(&mut self, command: SessionCommand) -> Vec<String> {
        let mut out = Vec::new();
        match command {
            SessionCommand::Submit(text) => {
                // an empty line resubmits the pending text as is
                if !text.is_empty() {
                    self.selector.set_current_value(text);
                }
                let outcome = self.selector.commit();
                out.push(describe_outcome(outcome).to_string());
            }
            SessionCommand::Append(text) => {
                let outcome = self.selector.append(&text);
                out.push(describe_outcome(outcome).to_string());
            }
            SessionCommand::Remove(index) => match self.selector.remove(index) {
                Some(scope) => out.push(format!("removed {scope}")),
                None => out.push(format!("nothing removed at {index}")),
            },
            SessionCommand::Validate => {
                let valid = self.selector.validate();
                out.push(if valid { "valid" } else { "invalid" }.to_string());
            }
            SessionCommand::List => {
                out.extend(
                    self.selector
                        .scopes()
                        .iter()
                        .enumerate()
                        .map(|(i, scope)| match self.selector.description_for(scope.as_str()) {
                            Some(desc) => format!("{i}: {scope} ({desc})"),
                            None => format!("{i}: {scope}"),
                        }),
                );
            }
            SessionCommand::Suggest(query) => {
                out.extend(
                    self.selector
                        .suggestions(&query)
                        .into_iter()
                        .map(|entry| entry.label().to_string()),
                );
            }
            SessionCommand::Param => out.push(self.selector.scope_param()),
            SessionCommand::Json => match serde_json::to_string(&self.selector.value()) {
                Ok(json) => out.push(json),
                Err(e) => out.push(format!("error: {e}")),
            },
            SessionCommand::Set(raw) => {
                let result = serde_json::from_str::<serde_json::Value>(&raw)
                    .context("parsing value")
                    .and_then(|value| self.selector.set_value_json(&value).map_err(Into::into));
                match result {
                    Ok(()) => out.push(format!("{} scope(s)", self.selector.scopes().len())),
                    Err(e) => out.push(format!("error: {e:#}")),
                }
            }
            SessionCommand::Help => out.push(HELP.to_string()),
            SessionCommand::Quit => {}
        }

        if let Some(state) = self.selector.next_frame().await {
            tracing::debug!("Render tick produced {:?}", state);
        }
        out.extend(self.events.take().iter().filter_map(describe_notification));
        out
    }

    /// Run until end of input or `:quit`
    ///
    /// Returns whether the final selection is valid.
    pub async fn run<R, W>(&mut self, reader: R, mut writer: W) -> Result<bool>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await.context("reading input")? {
            let output = match line.parse::<SessionCommand>() {
                Ok(SessionCommand::Quit) => break,
                Ok(command) => self.handle(command).await,
                Err(e) => vec![format!("error: {e:#}")],
            };
            for line in output {
                writer
                    .write_all(format!("{line}\n").as_bytes())
                    .await
                    .context("writing output")?;
            }
        }
        writer.flush().await.context("flushing output")?;
        Ok(!self.selector.invalid())
    }
}

fn describe_outcome(outcome: AppendOutcome) -> &'static str {
    match outcome {
        AppendOutcome::Added => "added",
        AppendOutcome::AlreadyPresent => "already selected",
        AppendOutcome::Disallowed => "not allowed",
        AppendOutcome::Missing => "nothing to add",
        AppendOutcome::Ignored => "selector is locked",
    }
}

fn describe_notification(notification: &Notification) -> Option<String> {
    match notification {
        Notification::DisallowedScope => Some("! this scope is not allowed".to_string()),
        Notification::MissingScope => Some("! enter a scope value".to_string()),
        Notification::InvalidChanged(true) => Some("! select at least one scope".to_string()),
        Notification::InvalidChanged(false) | Notification::ValueChanged(_) => None,
    }
}
