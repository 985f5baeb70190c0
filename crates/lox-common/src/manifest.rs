use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

pub const MANIFEST_FILE: &str = "Lox.toml";

/// How the driver prints a token list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One `KIND lexeme literal` line per token.
    #[default]
    Text,
    /// A pretty-printed JSON array.
    Json,
    /// `line:column KIND "lexeme"`, aligned for eyeballing.
    Debug,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "debug" => Some(OutputFormat::Debug),
            _ => None,
        }
    }
}

/// The parsed Lox.toml manifest, with defaults filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct LoxManifest {
    pub output: OutputSection,
    pub prompt: PromptSection,
    /// The file this manifest was loaded from, if any.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputSection {
    pub format: OutputFormat,
    pub trivia: bool,
    pub eof: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            trivia: true,
            eof: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptSection {
    pub prompt: String,
}

impl Default for PromptSection {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
        }
    }
}

impl Default for LoxManifest {
    fn default() -> Self {
        Self {
            output: OutputSection::default(),
            prompt: PromptSection::default(),
            path: None,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_prompt() -> String {
    "> ".to_string()
}

/// Raw TOML structure for deserialization.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default)]
    output: RawOutput,
    #[serde(default)]
    prompt: RawPrompt,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOutput {
    #[serde(default)]
    format: Option<String>,
    #[serde(default = "default_true")]
    trivia: bool,
    #[serde(default)]
    eof: bool,
}

impl Default for RawOutput {
    fn default() -> Self {
        Self {
            format: None,
            trivia: true,
            eof: false,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPrompt {
    #[serde(default = "default_prompt")]
    prompt: String,
}

impl Default for RawPrompt {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
        }
    }
}

/// Errors that can occur when loading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read Lox.toml: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("invalid Lox.toml: {0}")]
    ParseError(String),
    #[error("invalid Lox.toml: [output] unknown format '{0}' (expected 'text', 'json' or 'debug')")]
    UnknownFormat(String),
}

/// Walk up from `start_dir` looking for `Lox.toml`.
pub fn find_manifest(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let candidate = current.join(MANIFEST_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load and validate a Lox.toml manifest from a file path.
pub fn load_manifest(path: &Path) -> Result<LoxManifest, ManifestError> {
    let content = std::fs::read_to_string(path)?;
    let mut manifest = parse_manifest(&content)?;
    manifest.path = Some(path.to_path_buf());
    Ok(manifest)
}

/// Parse and validate a Lox.toml manifest from a string.
pub fn parse_manifest(content: &str) -> Result<LoxManifest, ManifestError> {
    let raw: RawManifest =
        toml::from_str(content).map_err(|e| ManifestError::ParseError(e.to_string()))?;

    let format = match raw.output.format {
        Some(name) => {
            OutputFormat::from_name(&name).ok_or(ManifestError::UnknownFormat(name))?
        }
        None => OutputFormat::default(),
    };

    Ok(LoxManifest {
        output: OutputSection {
            format,
            trivia: raw.output.trivia,
            eof: raw.output.eof,
        },
        prompt: PromptSection {
            prompt: raw.prompt.prompt,
        },
        path: None,
    })
}

/// Find and load the manifest governing `start_dir`, falling back to defaults
/// when none exists.
pub fn discover_manifest(start_dir: &Path) -> Result<LoxManifest, ManifestError> {
    match find_manifest(start_dir) {
        Some(path) => {
            debug!("using manifest {}", path.display());
            load_manifest(&path)
        }
        None => {
            debug!(
                "no {} found above {}, using defaults",
                MANIFEST_FILE,
                start_dir.display()
            );
            Ok(LoxManifest::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_manifest_uses_defaults() {
        let m = parse_manifest("").unwrap();
        assert_eq!(m, LoxManifest::default());
        assert_eq!(m.output.format, OutputFormat::Text);
        assert!(m.output.trivia);
        assert!(!m.output.eof);
        assert_eq!(m.prompt.prompt, "> ");
    }

    #[test]
    fn parse_full_manifest() {
        let toml = r#"
[output]
format = "json"
trivia = false
eof = true

[prompt]
prompt = "lox> "
"#;
        let m = parse_manifest(toml).unwrap();
        assert_eq!(m.output.format, OutputFormat::Json);
        assert!(!m.output.trivia);
        assert!(m.output.eof);
        assert_eq!(m.prompt.prompt, "lox> ");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let m = parse_manifest("[output]\neof = true\n").unwrap();
        assert!(m.output.eof);
        assert!(m.output.trivia);
        assert_eq!(m.output.format, OutputFormat::Text);
    }

    #[test]
    fn unknown_format_fails() {
        let err = parse_manifest("[output]\nformat = \"yaml\"\n").unwrap_err();
        assert!(matches!(err, ManifestError::UnknownFormat(ref f) if f == "yaml"));
        assert!(err.to_string().contains("unknown format 'yaml'"));
    }

    #[test]
    fn unknown_key_fails() {
        let err = parse_manifest("[output]\ncolour = true\n").unwrap_err();
        assert!(matches!(err, ManifestError::ParseError(_)));
    }

    #[test]
    fn malformed_toml_fails() {
        let err = parse_manifest("[output\n").unwrap_err();
        assert!(matches!(err, ManifestError::ParseError(_)));
    }

    #[test]
    fn find_manifest_walks_up() {
        let tmp = std::env::temp_dir().join("lox_test_manifest");
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(tmp.join("src/nested")).unwrap();
        std::fs::write(tmp.join("Lox.toml"), "[output]\nformat = \"debug\"\n").unwrap();

        let found = find_manifest(&tmp.join("src/nested"));
        assert_eq!(found, Some(tmp.join("Lox.toml")));

        let m = discover_manifest(&tmp.join("src/nested")).unwrap();
        assert_eq!(m.output.format, OutputFormat::Debug);
        assert_eq!(m.path, Some(tmp.join("Lox.toml")));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_file_is_read_error() {
        let path = std::env::temp_dir().join("lox_test_manifest_missing/Lox.toml");
        let err = load_manifest(&path).unwrap_err();
        assert!(matches!(err, ManifestError::ReadError(_)));
    }
}
