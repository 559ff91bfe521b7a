//! Prompts for the `set` command.
//!
//! Asks for a value when none was given and confirms overwriting an
//! existing key. Uses dialoguer for terminal UI prompts.

use std::io::{self, Write};

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};

use studio_core::config::{ConfigMeta, find_meta, suggest_keys};
use studio_core::types::ConfigEntry;

use crate::messages::Messages;

/// Interactive questions asked while adding a key.
pub struct SetPrompt<W: Write = io::Stdout> {
    messages: Messages,
    /// Skip all confirmations
    yes: bool,
    /// Output writer (for testing)
    writer: W,
    theme: ColorfulTheme,
}

impl SetPrompt<io::Stdout> {
    pub fn new(messages: Messages, yes: bool) -> Self {
        Self {
            messages,
            yes,
            writer: io::stdout(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl<W: Write> SetPrompt<W> {
    #[cfg(test)]
    pub fn with_writer(messages: Messages, yes: bool, writer: W) -> Self {
        Self {
            messages,
            yes,
            writer,
            theme: ColorfulTheme::default(),
        }
    }

    /// Value for `key` when none was passed on the command line.
    ///
    /// Returns `None` with `-y` so the schema default is used.
    pub fn value(&mut self, schema: &[ConfigMeta], key: &str) -> Result<Option<String>> {
        let meta = find_meta(schema, key);
        if meta.is_none() {
            self.print_suggestions(schema, key)?;
        }
        if self.yes {
            return Ok(None);
        }

        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(format!("{} ({key})", self.messages.value_prompt))
            .allow_empty(true);
        if let Some(meta) = meta {
            input = input.default(meta.fallback_value().to_string());
            if !meta.enum_values.is_empty() {
                writeln!(
                    self.writer,
                    "  {}",
                    style(meta.enum_values.join(" | ")).dim()
                )?;
            }
        }
        Ok(Some(input.interact_text()?))
    }

    fn print_suggestions(&mut self, schema: &[ConfigMeta], key: &str) -> Result<()> {
        let suggestions = suggest_keys(schema, key);
        if suggestions.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "{}", style(self.messages.suggestions).bold())?;
        for meta in suggestions {
            writeln!(self.writer, "  {}  {}", style(meta.key).green(), meta.label)?;
        }
        Ok(())
    }

    /// Ask before replacing an existing value.
    pub fn confirm_overwrite(&mut self, existing: &ConfigEntry) -> Result<bool> {
        writeln!(
            self.writer,
            "  {} = {} ({})",
            style(&existing.key).bold(),
            style(display_value(&self.messages, &existing.value)).yellow(),
            self.messages.scope_name(existing.scope)
        )?;

        if self.yes {
            return Ok(true);
        }

        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt(self.messages.overwrite_confirm)
            .default(false)
            .interact()?;

        Ok(confirmed)
    }
}

/// Value as shown to the user; empty strings get a marker.
pub fn display_value<'a>(messages: &Messages, value: &'a str) -> &'a str {
    if value.is_empty() {
        messages.empty
    } else {
        value
    }
}
