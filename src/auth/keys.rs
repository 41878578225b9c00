use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::SecurityConfig;

pub const PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";
pub const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";

const PRIVATE_KEY_FILE: &str = "private.key";
const PUBLIC_KEY_FILE: &str = "public.key";

#[derive(Error, Debug)]
pub enum KeyError {
    #[error("failed to read key file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {kind} key: {source}")]
    Invalid {
        kind: &'static str,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
}

/// PEM-encoded RSA key pair
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    pub private_pem: String,
    pub public_pem: String,
}

impl KeyMaterial {
    /// Inline values win; otherwise `private.key` / `public.key` under the keys dir.
    pub fn load(security: &SecurityConfig) -> Result<Self, KeyError> {
        let private_pem = match &security.private_key {
            Some(value) => normalize_pem(value, PRIVATE_KEY_LABEL),
            None => read_key_file(&security.keys_dir.join(PRIVATE_KEY_FILE))?,
        };
        let public_pem = match &security.public_key {
            Some(value) => normalize_pem(value, PUBLIC_KEY_LABEL),
            None => read_key_file(&security.keys_dir.join(PUBLIC_KEY_FILE))?,
        };

        Ok(Self { private_pem, public_pem })
    }
}

fn read_key_file(path: &Path) -> Result<String, KeyError> {
    tracing::debug!(path = %path.display(), "reading key file");
    std::fs::read_to_string(path).map_err(|source| KeyError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Rebuild a PEM document from a value squeezed onto one line.
///
/// Environment values often arrive with the line breaks replaced by spaces
/// or by a literal `\n`. The base64 body is collected, rewrapped at 64
/// columns and framed again with BEGIN/END lines. A label found in the
/// value is kept, otherwise `default_label` is used.
pub fn normalize_pem(value: &str, default_label: &str) -> String {
    let value = value.replace("\\n", "\n");
    let label = pem_label(&value).unwrap_or(default_label).to_string();

    let body: String = strip_markers(&value)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let mut pem = format!("-----BEGIN {}-----\n", label);
    for line in body.as_bytes().chunks(64) {
        // base64 is ASCII
        pem.push_str(&String::from_utf8_lossy(line));
        pem.push('\n');
    }
    pem.push_str(&format!("-----END {}-----\n", label));
    pem
}

fn pem_label(value: &str) -> Option<&str> {
    let start = value.find("-----BEGIN ")? + "-----BEGIN ".len();
    let rest = &value[start..];
    let end = rest.find("-----")?;
    Some(rest[..end].trim())
}

fn strip_markers(value: &str) -> String {
    let mut body = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(open) = rest.find("-----") {
        body.push_str(&rest[..open]);
        let after = &rest[open + 5..];
        match after.find("-----") {
            Some(close) => rest = &after[close + 5..],
            None => {
                rest = "";
                break;
            }
        }
    }
    body.push_str(rest);
    body
}
