use std::collections::HashMap;

use super::CliError;

/// Positional arguments plus `--flag value` pairs.
#[derive(Debug, Default)]
pub struct Args {
    positional: Vec<String>,
    flags: HashMap<String, String>,
}

impl Args {
    pub fn parse(raw: impl IntoIterator<Item = String>) -> Result<Self, CliError> {
        let mut args = Args::default();
        let mut iter = raw.into_iter();
        while let Some(token) = iter.next() {
            match token.strip_prefix("--") {
                Some(name) if !name.is_empty() => {
                    let value = iter
                        .next()
                        .ok_or_else(|| CliError::Usage(format!("--{name} needs a value")))?;
                    args.flags.insert(name.to_string(), value);
                }
                _ => args.positional.push(token),
            }
        }
        Ok(args)
    }

    pub fn positional(&self, index: usize, name: &str) -> Result<&str, CliError> {
        self.positional
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| CliError::Usage(format!("missing <{name}>")))
    }

    pub fn flag(&self, name: &str) -> Option<&str> {
        self.flags.get(name).map(String::as_str)
    }

    pub fn number(&self, index: usize, name: &str) -> Result<f64, CliError> {
        parse_number(self.positional(index, name)?, name)
    }
}

pub fn parse_number(raw: &str, name: &str) -> Result<f64, CliError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CliError::Usage(format!("<{name}> must be a number, got `{raw}`")))
}
