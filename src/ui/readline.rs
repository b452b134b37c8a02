//! Readline wrapper with command and field-name completion.

use std::path::PathBuf;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Config, Context, Editor, Helper};

/// Pattern token that matches whatever the user typed and is never suggested
pub const PLACEHOLDER: &str = "<id>";

pub struct CommandHelper {
    patterns: Vec<Vec<String>>,
    hinter: HistoryHinter,
}

impl CommandHelper {
    pub fn new(patterns: Vec<Vec<String>>) -> Self {
        Self {
            patterns,
            hinter: HistoryHinter::default(),
        }
    }

    fn candidates(&self, typed: &[String], prefix: &str) -> Vec<String> {
        let mut matches: Vec<String> = self
            .patterns
            .iter()
            .filter(|pattern| pattern.len() > typed.len())
            .filter(|pattern| {
                typed.iter().zip(pattern.iter()).all(|(word, expected)| {
                    expected == PLACEHOLDER || expected.eq_ignore_ascii_case(word)
                })
            })
            .map(|pattern| &pattern[typed.len()])
            .filter(|candidate| candidate.as_str() != PLACEHOLDER)
            .filter(|candidate| candidate.to_lowercase().starts_with(prefix))
            .cloned()
            .collect();

        matches.sort();
        matches.dedup();
        matches
    }
}

impl Helper for CommandHelper {}
impl Validator for CommandHelper {}
impl Highlighter for CommandHelper {}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];
        let mut tokens: Vec<&str> = before.split_whitespace().collect();

        // Trailing space starts a new token
        if before.chars().last().is_some_and(char::is_whitespace) {
            tokens.push("");
        }

        let prefix = tokens.pop().unwrap_or("");
        let start = pos.saturating_sub(prefix.len());
        let slash = tokens.is_empty() && prefix.starts_with('/');

        let typed: Vec<String> = tokens
            .iter()
            .map(|t| t.trim_start_matches('/').to_lowercase())
            .collect();
        let prefix_lower = prefix.trim_start_matches('/').to_lowercase();

        let pairs = self
            .candidates(&typed, &prefix_lower)
            .into_iter()
            .map(|candidate| {
                let replacement = if slash {
                    format!("/{} ", candidate)
                } else {
                    format!("{} ", candidate)
                };
                Pair {
                    display: replacement.clone(),
                    replacement,
                }
            })
            .collect();

        Ok((start, pairs))
    }
}

/// Thin wrapper over `rustyline::Editor` with preset commands and history path.
pub struct Readline {
    editor: Editor<CommandHelper, DefaultHistory>,
    history_path: PathBuf,
}

/// History file under the platform data directory, or the home directory
fn default_history_path() -> PathBuf {
    dir_spec::data_home()
        .map(|dir| dir.join("propcalc").join("history"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".propcalc_history")
        })
}

impl Readline {
    pub fn new(patterns: Vec<Vec<String>>, history_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let config = Config::builder()
            .history_ignore_dups(true)?
            .history_ignore_space(true)
            .build();
        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(CommandHelper::new(patterns)));

        let history_path = history_path.unwrap_or_else(default_history_path);
        if let Some(parent) = history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = editor.load_history(&history_path);

        Ok(Self {
            editor,
            history_path,
        })
    }

    pub fn readline(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        let line = self.editor.readline(prompt)?;
        if !line.trim().is_empty() {
            let _ = self.editor.add_history_entry(line.as_str());
            let _ = self.editor.append_history(&self.history_path);
        }
        Ok(line)
    }

    /// Completions with their replacement start, without terminal input
    #[cfg(test)]
    pub fn completions_with_start(&self, line: &str) -> Vec<(usize, String)> {
        let Some(helper) = self.editor.helper() else {
            return Vec::new();
        };
        let history = self.editor.history();
        match helper.complete(line, line.len(), &Context::new(history)) {
            Ok((start, pairs)) => pairs.into_iter().map(|p| (start, p.replacement)).collect(),
            Err(_) => Vec::new(),
        }
    }
}
