/// Quick reaction the user can attach to a refinement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Love,
    NotQuite,
}

impl Sentiment {
    pub fn label(self) -> &'static str {
        match self {
            Sentiment::Love => "Positive",
            Sentiment::NotQuite => "Negative",
        }
    }
}

/// Folds an optional sentiment tag into the feedback text sent to the
/// backend. Without a sentiment the text is passed through untouched.
pub fn compose_feedback(text: &str, sentiment: Option<Sentiment>) -> String {
    match sentiment {
        Some(sentiment) => format!("Sentiment: {}. Feedback: {}", sentiment.label(), text),
        None => text.to_string(),
    }
}
