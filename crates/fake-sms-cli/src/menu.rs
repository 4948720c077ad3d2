//! Line-based prompts for the interactive menu.

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

/// Source of operator input. `None` means the operator closed the input
/// (Ctrl+D) or interrupted it (Ctrl+C).
pub trait Prompt {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>>;
}

/// Terminal prompt backed by rustyline.
pub struct LinePrompt {
    editor: Editor<(), DefaultHistory>,
}

impl LinePrompt {
    pub fn new() -> anyhow::Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(false)
            .build();
        let editor = Editor::with_config(config)?;
        Ok(Self { editor })
    }
}

impl Prompt for LinePrompt {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Top-level menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainChoice {
    Register,
    List,
    Remove,
    CheckMessages,
    Exit,
}

impl MainChoice {
    pub const ALL: [MainChoice; 5] = [
        MainChoice::Register,
        MainChoice::List,
        MainChoice::Remove,
        MainChoice::CheckMessages,
        MainChoice::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MainChoice::Register => "Add a new number",
            MainChoice::List => "List my numbers",
            MainChoice::Remove => "Remove a number",
            MainChoice::CheckMessages => "Get my messages",
            MainChoice::Exit => "Exit",
        }
    }
}

/// Ask for the next top-level action. Closing the input counts as `Exit`.
pub fn main_menu(prompt: &mut dyn Prompt) -> anyhow::Result<MainChoice> {
    let labels: Vec<String> = MainChoice::ALL.iter().map(|c| c.label().to_string()).collect();
    loop {
        match select(prompt, "What do you want to do?", &labels)? {
            Selection::Chosen(index) => return Ok(MainChoice::ALL[index]),
            Selection::Closed => return Ok(MainChoice::Exit),
            Selection::Cancelled => continue,
        }
    }
}

/// Outcome of a list selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Zero-based index into the offered items.
    Chosen(usize),
    /// Blank answer or `q`.
    Cancelled,
    /// Input closed.
    Closed,
}

impl Selection {
    pub fn index(self) -> Option<usize> {
        match self {
            Selection::Chosen(i) => Some(i),
            _ => None,
        }
    }
}

/// Show `items` numbered from 1 and read a choice, re-asking until the
/// answer is a valid number, blank, or `q`.
pub fn select(
    prompt: &mut dyn Prompt,
    label: &str,
    items: &[String],
) -> anyhow::Result<Selection> {
    println!();
    println!("{label}");
    for (i, item) in items.iter().enumerate() {
        println!("  {:>2}) {item}", i + 1);
    }

    let question = format!("Choose 1-{} (q to cancel): ", items.len());
    loop {
        let Some(answer) = prompt.read_line(&question)? else {
            return Ok(Selection::Closed);
        };
        match parse_selection(&answer, items.len()) {
            Some(selection) => return Ok(selection),
            None => println!("  '{}' is not one of the options.", answer.trim()),
        }
    }
}

/// Parse a 1-based answer into a [`Selection`]; `None` if invalid.
pub fn parse_selection(answer: &str, len: usize) -> Option<Selection> {
    let answer = answer.trim();
    if answer.is_empty() || answer.eq_ignore_ascii_case("q") {
        return Some(Selection::Cancelled);
    }
    match answer.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Some(Selection::Chosen(n - 1)),
        _ => None,
    }
}

/// Ask a yes/no question; anything but `y`/`yes` is no.
pub fn confirm(prompt: &mut dyn Prompt, question: &str) -> anyhow::Result<bool> {
    let answer = prompt.read_line(&format!("{question} (y/N): "))?;
    Ok(answer.is_some_and(|a| matches!(a.trim().to_ascii_lowercase().as_str(), "y" | "yes")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<&'static str>);

    impl Prompt for Scripted {
        fn read_line(&mut self, _prompt: &str) -> anyhow::Result<Option<String>> {
            Ok(self.0.pop_front().map(str::to_string))
        }
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("1", 3), Some(Selection::Chosen(0)));
        assert_eq!(parse_selection(" 3 ", 3), Some(Selection::Chosen(2)));
        assert_eq!(parse_selection("", 3), Some(Selection::Cancelled));
        assert_eq!(parse_selection("Q", 3), Some(Selection::Cancelled));
        assert_eq!(parse_selection("0", 3), None);
        assert_eq!(parse_selection("4", 3), None);
        assert_eq!(parse_selection("two", 3), None);
    }

    #[test]
    fn test_select_reasks_until_valid() {
        let mut prompt = Scripted(VecDeque::from(["9", "abc", "2"]));
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(select(&mut prompt, "Pick", &items).unwrap(), Selection::Chosen(1));
    }

    #[test]
    fn test_main_menu_closed_input_exits() {
        let mut prompt = Scripted(VecDeque::new());
        assert_eq!(main_menu(&mut prompt).unwrap(), MainChoice::Exit);
    }

    #[test]
    fn test_main_menu_order() {
        let mut prompt = Scripted(VecDeque::from(["4"]));
        assert_eq!(main_menu(&mut prompt).unwrap(), MainChoice::CheckMessages);
    }

    #[test]
    fn test_confirm() {
        let mut prompt = Scripted(VecDeque::from(["Y", "no", ""]));
        assert!(confirm(&mut prompt, "Filter?").unwrap());
        assert!(!confirm(&mut prompt, "Filter?").unwrap());
        assert!(!confirm(&mut prompt, "Filter?").unwrap());
        assert!(!confirm(&mut prompt, "Filter?").unwrap());
    }
}
