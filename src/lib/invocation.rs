//! Command invocations and plans
//!
//! A `CommandInvocation` is the exact token list handed to the process
//! runner: the resolved executable first, then its arguments in order.
//! Tokens are never re-split, so a token such as `"-e 2012-08-18"` reaches
//! the process as a single argument.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One external command call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandInvocation {
    tokens: Vec<String>,
}

impl CommandInvocation {
    /// Start an invocation for the given executable
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            tokens: vec![program.into()],
        }
    }

    /// Append a single token
    pub fn arg(mut self, token: impl Into<String>) -> Self {
        self.tokens.push(token.into());
        self
    }

    /// Append every token in order
    pub fn args<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tokens.extend(tokens.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        self.tokens.first().map(String::as_str).unwrap_or_default()
    }

    /// Arguments after the executable
    pub fn arguments(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or_default()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn contains(&self, token: &str) -> bool {
        self.arguments().iter().any(|t| t == token)
    }

    /// Position of `token` among the arguments, if present
    pub fn position(&self, token: &str) -> Option<usize> {
        self.arguments().iter().position(|t| t == token)
    }

    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }
}

impl fmt::Display for CommandInvocation {
    /// Shell-style rendering; tokens containing whitespace are single-quoted
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.tokens.iter().map(|t| quote_token(t)).collect();
        write!(f, "{}", rendered.join(" "))
    }
}

impl PartialEq<[&str]> for CommandInvocation {
    fn eq(&self, other: &[&str]) -> bool {
        self.tokens.len() == other.len() && self.tokens.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<const N: usize> PartialEq<[&str; N]> for CommandInvocation {
    fn eq(&self, other: &[&str; N]) -> bool {
        self == &other[..]
    }
}

fn quote_token(token: &str) -> String {
    if token.is_empty() {
        return "''".to_string();
    }
    if token.chars().any(|c| c.is_whitespace() || c == '\'' || c == '"') {
        format!("'{}'", token.replace('\'', "'\\''"))
    } else {
        token.to_string()
    }
}

/// Ordered invocations realizing one lifecycle transition.
/// An empty plan means there is nothing to do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandPlan {
    invocations: Vec<CommandInvocation>,
}

impl CommandPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, invocation: CommandInvocation) {
        self.invocations.push(invocation);
    }

    pub fn is_empty(&self) -> bool {
        self.invocations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.invocations.len()
    }

    pub fn invocations(&self) -> &[CommandInvocation] {
        &self.invocations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CommandInvocation> {
        self.invocations.iter()
    }
}

impl From<Vec<CommandInvocation>> for CommandPlan {
    fn from(invocations: Vec<CommandInvocation>) -> Self {
        Self { invocations }
    }
}

impl Extend<CommandInvocation> for CommandPlan {
    fn extend<T: IntoIterator<Item = CommandInvocation>>(&mut self, iter: T) {
        self.invocations.extend(iter);
    }
}

impl IntoIterator for CommandPlan {
    type Item = CommandInvocation;
    type IntoIter = std::vec::IntoIter<CommandInvocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.invocations.into_iter()
    }
}

impl<'a> IntoIterator for &'a CommandPlan {
    type Item = &'a CommandInvocation;
    type IntoIter = std::slice::Iter<'a, CommandInvocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.invocations.iter()
    }
}
