// config_file.rs
// Format-preserving view of the solver's `KEY= value` config file

use std::fmt;
use std::fs;
use std::path::Path;

use crate::config::{
    KEY_EXTRACTION_COORDINATE, KEY_OUTPUT_PATH, KEY_PA_FILE_NAME, KEY_PA_PATH,
    PA_EXTENSION_PREFIX, REQUIRED_KEYS,
};
use crate::error::SweepError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// Anything that is not a `KEY=value` assignment, kept verbatim
    Raw(String),
    /// `prefix` holds the key, `=` and the whitespace after it; `suffix`
    /// everything after the value token including the line ending.
    Assignment {
        key: String,
        prefix: String,
        value: String,
        suffix: String,
    },
}

impl Line {
    fn parse(text: &str) -> Line {
        let Some(eq) = text.find('=') else {
            return Line::Raw(text.to_string());
        };
        let key = text[..eq].trim();
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Line::Raw(text.to_string());
        }

        let after_eq = &text[eq + 1..];
        let ws_len = after_eq.len()
            - after_eq
                .trim_start_matches(|c: char| c == ' ' || c == '\t')
                .len();
        let value_start = eq + 1 + ws_len;
        let value_len = text[value_start..]
            .find(char::is_whitespace)
            .unwrap_or(text.len() - value_start);
        let value_end = value_start + value_len;

        Line::Assignment {
            key: key.to_string(),
            prefix: text[..value_start].to_string(),
            value: text[value_start..value_end].to_string(),
            suffix: text[value_end..].to_string(),
        }
    }
}

/// The solver config, parsed once and mutated in memory. Every byte outside
/// the value tokens that get rewritten survives `render` unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    lines: Vec<Line>,
}

impl SolverConfig {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(Line::parse).collect(),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SweepError> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SweepError> {
        fs::write(path, self.render())?;
        Ok(())
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Value of the first assignment to `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            Line::Assignment { key: k, value, .. } if k.as_str() == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Replace the value token of every assignment to `key`. The value must be
    /// a single token, otherwise the next parse would split it.
    pub fn set(&mut self, key: &str, new_value: &str) -> Result<(), SweepError> {
        check_token(key, new_value)?;
        let mut found = false;
        for line in &mut self.lines {
            if let Line::Assignment { key: k, value, .. } = line {
                if k.as_str() == key {
                    *value = new_value.to_string();
                    found = true;
                }
            }
        }
        if found {
            Ok(())
        } else {
            Err(SweepError::ConfigKeyNotFound {
                key: key.to_string(),
            })
        }
    }

    /// Point the solver at the output and array directories for the whole sweep.
    pub fn set_paths(&mut self, output_dir: &str, pa_dir: &str) -> Result<(), SweepError> {
        check_token(KEY_OUTPUT_PATH, output_dir)?;
        check_token(KEY_PA_PATH, pa_dir)?;
        self.set(KEY_OUTPUT_PATH, output_dir)?;
        self.set(KEY_PA_PATH, pa_dir)
    }

    pub fn set_layer(&mut self, layer: i32) -> Result<(), SweepError> {
        self.set(KEY_EXTRACTION_COORDINATE, &layer.to_string())
    }

    /// Select the electrode array file; `name` must look like `<stem>.pa<digits>`.
    pub fn set_electrode_file(&mut self, name: &str) -> Result<(), SweepError> {
        if !is_electrode_file_name(name) {
            return Err(SweepError::format(
                name,
                "not an electrode array file name (<stem>.pa<digits>)",
            ));
        }
        self.set(KEY_PA_FILE_NAME, name)
    }

    /// Required keys absent from the file, in declaration order.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| self.get(key).is_none())
            .collect()
    }
}

impl fmt::Display for SolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            match line {
                Line::Raw(text) => f.write_str(text)?,
                Line::Assignment {
                    prefix,
                    value,
                    suffix,
                    ..
                } => {
                    f.write_str(prefix)?;
                    f.write_str(value)?;
                    f.write_str(suffix)?;
                }
            }
        }
        Ok(())
    }
}

fn check_token(key: &str, value: &str) -> Result<(), SweepError> {
    if value.contains(char::is_whitespace) {
        return Err(SweepError::ConfigValue {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

fn is_electrode_file_name(name: &str) -> bool {
    let marker = format!(".{}", PA_EXTENSION_PREFIX);
    match name.rsplit_once(marker.as_str()) {
        Some((stem, digits)) => {
            !stem.is_empty() && !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}
