use std::fmt;

/// Which of the two configured lists a lookup was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListRole {
    Recurring,
    Done,
}

impl fmt::Display for ListRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListRole::Recurring => f.write_str("recurring"),
            ListRole::Done => f.write_str("done"),
        }
    }
}

/// Fatal errors raised while talking to Trello or ticking a card.
///
/// Skipped cards are not errors; see [`crate::recur::SkipReason`].
#[derive(Debug, thiserror::Error)]
pub enum TrelloError {
    /// The API answered with a non-success status.
    #[error("Trello returned {status} for {url}: {body}")]
    Remote {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Trello request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The body of `resource` did not have the expected JSON shape.
    #[error("Unexpected response for {resource}: {source}")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("card |{card}| has an unparseable due date {due:?}")]
    InvalidDueDate { card: String, due: String },

    #[error("card |{card}| cannot recur past {due}: date out of range")]
    DueDateOutOfRange { card: String, due: String },

    /// Recurring and done lists must be different lists.
    #[error("The recurring and done lists are both named {name:?}")]
    SameListName { name: String },

    #[error("No {role} list named {name:?} on the board")]
    ListNotFound { role: ListRole, name: String },
}

impl TrelloError {
    /// HTTP status of a remote failure, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            TrelloError::Remote { status, .. } => Some(*status),
            TrelloError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
