//! Path templates with `{year}` and `{month}` placeholders.
//!
//! The placeholder syntax is the one used by the trip data URLs, including
//! zero-padded forms such as `{year:04d}` and `{month:02d}`. Literal braces
//! are written `{{` and `}}`.

use std::fmt;

use crate::config::Period;
use crate::error::{RideDurationError, Result};

/// A validated location template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    pattern: String,
}

impl PathTemplate {
    /// Parse and validate a template
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let template = Self {
            pattern: pattern.into(),
        };
        // Rendering once catches unknown placeholders and stray braces early
        template.render(Period::new(2000, 1)?)?;
        Ok(template)
    }

    /// The raw template text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Substitute the period into the template
    pub fn render(&self, period: Period) -> Result<String> {
        let mut output = String::with_capacity(self.pattern.len() + 8);
        let mut chars = self.pattern.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    output.push('{');
                }
                '{' => {
                    let mut placeholder = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) => placeholder.push(ch),
                            None => {
                                return Err(RideDurationError::config(format!(
                                    "Unterminated placeholder in template: {}",
                                    self.pattern
                                )));
                            }
                        }
                    }
                    output.push_str(&self.expand(&placeholder, period)?);
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    output.push('}');
                }
                '}' => {
                    return Err(RideDurationError::config(format!(
                        "Single '}}' in template: {}",
                        self.pattern
                    )));
                }
                _ => output.push(c),
            }
        }

        Ok(output)
    }

    fn expand(&self, placeholder: &str, period: Period) -> Result<String> {
        let (name, spec) = placeholder.split_once(':').unwrap_or((placeholder, ""));

        let value = match name.trim() {
            "year" => i64::from(period.year()),
            "month" => i64::from(period.month()),
            other => {
                return Err(RideDurationError::config(format!(
                    "Unknown placeholder '{{{other}}}' in template: {}",
                    self.pattern
                )));
            }
        };

        let spec = spec.strip_suffix('d').unwrap_or(spec);
        if spec.is_empty() {
            return Ok(value.to_string());
        }

        let (zero_pad, width) = match spec.strip_prefix('0') {
            Some(rest) => (true, rest),
            None => (false, spec),
        };
        let width = width.parse::<usize>().map_err(|_| {
            RideDurationError::config(format!(
                "Unsupported format spec '{placeholder}' in template: {}",
                self.pattern
            ))
        })?;

        Ok(if zero_pad {
            format!("{value:0width$}")
        } else {
            format!("{value:width$}")
        })
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
