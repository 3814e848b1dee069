//! Conversation history.

/// One user message and the model reply it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    user_message: String,
    reply: String,
}

impl Exchange {
    /// Creates an exchange.
    pub fn new(user_message: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            reply: reply.into(),
        }
    }

    /// The message the user sent.
    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    /// The reply returned by the text generator.
    pub fn reply(&self) -> &str {
        &self.reply
    }
}

/// Append-only sequence of exchanges, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    exchanges: Vec<Exchange>,
}

impl History {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this history with `exchange` appended.
    #[must_use]
    pub fn with_exchange(mut self, exchange: Exchange) -> Self {
        self.exchanges.push(exchange);
        self
    }

    /// Number of exchanges.
    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    /// True when no exchange has been recorded.
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Most recent exchange.
    pub fn last(&self) -> Option<&Exchange> {
        self.exchanges.last()
    }

    /// All exchanges, oldest first.
    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    /// Iterates exchanges, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, Exchange> {
        self.exchanges.iter()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Exchange;
    type IntoIter = std::slice::Iter<'a, Exchange>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Exchange> for History {
    fn from_iter<I: IntoIterator<Item = Exchange>>(iter: I) -> Self {
        Self {
            exchanges: iter.into_iter().collect(),
        }
    }
}
