//! INI-style section codec.
//!
//! Both files handled by this tool share one format:
//!
//! ```ini
//! [acme-prod]
//! project_name = acme
//! role_arn = arn:aws:iam::123456789012:role/Admin
//!
//! [session-acme-prod]
//! aws_access_key_id = ASIA...
//! expiration = 2026-10-19 18:00:00
//! ```
//!
//! Parsing goes through `configparser` in case-sensitive mode with `=` as the
//! only delimiter. Lines starting with `#` or `;` are comments, but those
//! characters are literal anywhere inside a value, so a value such as
//! `dev#ops` or `a:b;c` survives a round trip. Encoding is the inverse of
//! [`decode`]: one `[name]` header, then `key = value` lines, blocks separated
//! by a blank line.
//!
//! A value cannot hold a newline or surrounding whitespace. A key cannot
//! contain `=` or start with `#`, `;` or `[`.

use std::{collections::BTreeMap, fmt::Write, path::Path};

use configparser::ini::{Ini, IniDefault};
use log::debug;
use tokio::fs;

use crate::error::{Result, SwitcherError};

/// Fields of one section.
pub type Section = BTreeMap<String, String>;

/// Sections keyed by name.
pub type Sections = BTreeMap<String, Section>;

// Keys appearing before any header land here.
const ORPHAN_SECTION: &str = "\u{0}orphan";

fn parser() -> Ini {
    // IniDefault is non-exhaustive, so start from its defaults.
    let mut defaults = IniDefault::default();
    defaults.default_section = ORPHAN_SECTION.to_string();
    defaults.case_sensitive = true;
    defaults.delimiters = vec!['='];
    defaults.enable_inline_comments = false;
    defaults.multiline = false;
    Ini::new_from_defaults(defaults)
}

/// Decodes `text` into sections.
///
/// Empty input yields an empty mapping. A key repeated within one section
/// keeps the last value; a key line before any `[section]` header is an error.
pub fn decode(text: &str) -> std::result::Result<Sections, String> {
    let parsed = parser().read(text.to_owned())?;

    let mut sections = Sections::new();
    for (name, fields) in parsed {
        if name == ORPHAN_SECTION {
            if let Some(key) = fields.keys().next() {
                return Err(format!("key \"{key}\" appears before any [section] header"));
            }
            continue;
        }

        let section = fields
            .into_iter()
            .map(|(key, value)| (key, value.unwrap_or_default()))
            .collect();
        sections.insert(name, section);
    }

    Ok(sections)
}

/// Encodes sections back to text.
pub fn encode(sections: &Sections) -> String {
    let mut out = String::new();
    for (i, (name, fields)) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "[{name}]");
        for (key, value) in fields {
            let _ = writeln!(out, "{key} = {value}");
        }
    }
    out
}

/// Reads and decodes `path`. A missing file reads as empty.
pub async fn read_sections(path: &Path) -> Result<Sections> {
    let text = match fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("{} does not exist, treating as empty", path.display());
            return Ok(Sections::new());
        }
        Err(e) => return Err(SwitcherError::file(path, e)),
    };

    decode(&text).map_err(|reason| SwitcherError::malformed(path, reason))
}

/// Encodes `sections` and replaces the whole of `path` with them.
///
/// Parent directories are created as needed; on Unix the file is restricted
/// to its owner since it holds secrets.
pub async fn write_sections(path: &Path, sections: &Sections) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| SwitcherError::file(parent, e))?;
    }

    fs::write(path, encode(sections))
        .await
        .map_err(|e| SwitcherError::file(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .await
            .map_err(|e| SwitcherError::file(path, e))?;
    }

    debug!("Wrote {} section(s) to {}", sections.len(), path.display());
    Ok(())
}
