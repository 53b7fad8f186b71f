use std::fmt::{self, Display, Formatter};

use super::{Error, Result};

/// The contents of a repository's `config` file.
///
/// Only the `[core]` keys written by `init` are interpreted; anything else
/// is kept so it can be written back unchanged. Section and key names are
/// matched case-insensitively, as git does.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    sections: Vec<Section>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Config {
    /// Create a config with no sections at all.
    pub fn empty() -> Config {
        Config {
            sections: Vec::new(),
        }
    }

    /// Parse INI-style config text.
    pub fn parse(text: &str) -> Result<Config> {
        let mut config = Config::empty();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            let err = |reason| Error::ConfigError {
                line: index + 1,
                reason,
            };

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = header
                    .strip_suffix(']')
                    .ok_or_else(|| err("unterminated section header"))?
                    .trim();
                if name.is_empty() {
                    return Err(err("empty section name"));
                }
                config.sections.push(Section {
                    name: name.to_owned(),
                    entries: Vec::new(),
                });
                continue;
            }

            let section = config
                .sections
                .last_mut()
                .ok_or_else(|| err("key outside of any section"))?;

            // A bare key is shorthand for `key = true`.
            let (key, value) = match line.find('=') {
                Some(n) => (line[..n].trim(), line[n + 1..].trim()),
                None => (line, "true"),
            };
            if key.is_empty() {
                return Err(err("empty key"));
            }

            section.entries.push((key.to_owned(), value.to_owned()));
        }

        Ok(config)
    }

    /// Look up the last value of `key` in `section`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .filter(|s| s.name.eq_ignore_ascii_case(section))
            .flat_map(|s| s.entries.iter())
            .filter(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
            .last()
    }

    /// Look up a boolean value using git's spellings of true and false.
    pub fn get_bool(&self, section: &str, key: &str) -> Option<bool> {
        match self.get(section, key)?.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" | "" => Some(false),
            _ => None,
        }
    }

    /// Set `key` in `section`, replacing an existing value or appending a
    /// new one (creating the section if necessary).
    pub fn set<V: Into<String>>(&mut self, section: &str, key: &str, value: V) {
        let value = value.into();

        let existing = self
            .sections
            .iter_mut()
            .filter(|s| s.name.eq_ignore_ascii_case(section))
            .flat_map(|s| s.entries.iter_mut())
            .filter(|(k, _)| k.eq_ignore_ascii_case(key))
            .last();

        if let Some((_, v)) = existing {
            *v = value;
            return;
        }

        match self
            .sections
            .iter_mut()
            .rev()
            .find(|s| s.name.eq_ignore_ascii_case(section))
        {
            Some(s) => s.entries.push((key.to_owned(), value)),
            None => self.sections.push(Section {
                name: section.to_owned(),
                entries: vec![(key.to_owned(), value)],
            }),
        }
    }

    /// Check that `core.repositoryformatversion` is present and is `0`.
    pub(crate) fn check_format_version(&self) -> Result<()> {
        match self.get("core", "repositoryformatversion") {
            Some(v) if v.parse::<u32>() == Ok(0) => Ok(()),
            Some(v) => Err(Error::UnsupportedFormatVersion(v.to_owned())),
            None => Err(Error::UnsupportedFormatVersion(String::new())),
        }
    }
}

impl Default for Config {
    /// The configuration written into a freshly initialized repository.
    fn default() -> Config {
        let mut config = Config::empty();
        config.set("core", "repositoryformatversion", "0");
        config.set("core", "filemode", "false");
        config.set("core", "bare", "false");
        config
    }
}

impl Display for Config {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in &section.entries {
                writeln!(f, "\t{} = {}", key, value)?;
            }
        }
        Ok(())
    }
}
