use std::fmt;
use std::io::{self, BufRead, Write};

const KEY_PROMPT: &str = "Enter your Gemini API key: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationChoice {
    Yes,
    No,
}

#[derive(Debug, Clone)]
pub struct UiError {
    message: String,
}

impl UiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UiError {}

impl From<io::Error> for UiError {
    fn from(err: io::Error) -> Self {
        UiError::new(format!("Failed to read input: {err}"))
    }
}

fn read_line(prompt: &str) -> Result<String, UiError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input)
}

pub fn prompt_api_key() -> Result<String, UiError> {
    println!("🔐 ISpace Authentication");
    println!("Create a key at https://aistudio.google.com/apikey");
    println!();
    let key = parse_api_key(&read_line(KEY_PROMPT)?)?;
    Ok(key)
}

pub fn prompt_confirmation(question: &str) -> Result<ConfirmationChoice, UiError> {
    parse_confirmation(&read_line(&format!("{question} [y/N]: "))?)
}

pub fn parse_api_key(input: &str) -> Result<String, UiError> {
    let key = input.trim();
    if key.is_empty() {
        return Err(UiError::new("API key cannot be empty"));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(UiError::new("API key cannot contain whitespace"));
    }
    Ok(key.to_string())
}

pub fn parse_confirmation(input: &str) -> Result<ConfirmationChoice, UiError> {
    match input.trim().to_lowercase().as_str() {
        "" | "n" | "no" => Ok(ConfirmationChoice::No),
        "y" | "yes" => Ok(ConfirmationChoice::Yes),
        _ => Err(UiError::new("Invalid confirmation response")),
    }
}
