//! Interactive prompts.

use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

use crate::error::Result;

/// Checks an answer, returning the message to show when it is rejected.
pub type Validator = fn(&str) -> std::result::Result<(), &'static str>;

/// Accepts anything, including an empty answer.
pub fn any(_: &str) -> std::result::Result<(), &'static str> {
    Ok(())
}

/// Rejects blank answers.
pub fn not_empty(input: &str) -> std::result::Result<(), &'static str> {
    if input.trim().is_empty() {
        Err("This field cannot be empty")
    } else {
        Ok(())
    }
}

/// Rejects blank answers and anything but ASCII digits.
pub fn numbers_only(input: &str) -> std::result::Result<(), &'static str> {
    not_empty(input)?;
    if input.trim().chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err("This field should only contain numeric characters")
    }
}

/// Source of interactive answers.
pub trait Prompter {
    /// Asks until `validator` accepts the answer. An empty answer is replaced
    /// by `default` when one is given.
    ///
    /// # Returns
    ///
    /// The accepted answer with surrounding whitespace removed.
    fn ask_text(
        &mut self,
        prompt: &str,
        default: Option<&str>,
        validator: Validator,
    ) -> Result<String>;

    /// Asks a yes/no question; an empty answer picks `default`.
    fn ask_confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;

    /// Offers `choices`; `None` when the menu was cancelled or is empty.
    fn ask_select(&mut self, prompt: &str, choices: &[String]) -> Result<Option<String>>;
}

/// [`Prompter`] on the controlling terminal.
#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompter for TerminalPrompter {
    fn ask_text(
        &mut self,
        prompt: &str,
        default: Option<&str>,
        validator: Validator,
    ) -> Result<String> {
        // Emptiness is left to the validator so `any` can accept it.
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .validate_with(move |answer: &String| validator(answer.trim()));
        if let Some(default) = default {
            input = input.default(default.to_string());
        }

        Ok(input.interact_text()?.trim().to_string())
    }

    fn ask_confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    fn ask_select(&mut self, prompt: &str, choices: &[String]) -> Result<Option<String>> {
        if choices.is_empty() {
            return Ok(None);
        }

        // Esc or q cancels the menu.
        let picked = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(choices)
            .default(0)
            .interact_opt()?;

        Ok(picked.and_then(|index| choices.get(index).cloned()))
    }
}
