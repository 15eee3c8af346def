//! Static language registry
//!
//! Keys and ids must match Judge0 CE exactly; they are sent verbatim as
//! `language_id` in every submission.

use crate::error::JudgeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages accepted by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    Python,
    Cpp,
    C,
    Java,
    CSharp,
    Go,
    Rust,
    Php,
    Ruby,
    Swift,
    Kotlin,
    TypeScript,
}

impl Language {
    /// Registry order, also used for the "supported languages" listing
    pub const ALL: [Language; 13] = [
        Language::JavaScript,
        Language::Python,
        Language::Cpp,
        Language::C,
        Language::Java,
        Language::CSharp,
        Language::Go,
        Language::Rust,
        Language::Php,
        Language::Ruby,
        Language::Swift,
        Language::Kotlin,
        Language::TypeScript,
    ];

    /// Registry key
    pub const fn key(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Java => "java",
            Language::CSharp => "csharp",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Php => "php",
            Language::Ruby => "ruby",
            Language::Swift => "swift",
            Language::Kotlin => "kotlin",
            Language::TypeScript => "typescript",
        }
    }

    /// Judge0 CE `language_id`
    pub const fn judge0_id(&self) -> u32 {
        match self {
            Language::JavaScript => 63, // Node.js
            Language::Python => 71,     // Python 3
            Language::Cpp => 54,        // GCC 9.2.0
            Language::C => 50,          // GCC 9.2.0
            Language::Java => 62,       // OpenJDK 13.0.1
            Language::CSharp => 51,     // Mono 6.6.0.161
            Language::Go => 60,
            Language::Rust => 73,
            Language::Php => 68,
            Language::Ruby => 72,
            Language::Swift => 83,
            Language::Kotlin => 78,
            Language::TypeScript => 74,
        }
    }

    /// All registry keys in registry order
    pub fn supported_keys() -> Vec<&'static str> {
        Self::ALL.iter().map(Language::key).collect()
    }

    /// Case-insensitive lookup
    pub fn lookup(key: &str) -> Option<Language> {
        let key = key.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|language| language.key().eq_ignore_ascii_case(key))
    }
}

impl FromStr for Language {
    type Err = JudgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::lookup(s).ok_or_else(|| JudgeError::UnsupportedLanguage {
            language: s.to_string(),
            supported: Language::supported_keys(),
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_judge0_table() {
        let expected = [
            ("javascript", 63),
            ("python", 71),
            ("cpp", 54),
            ("c", 50),
            ("java", 62),
            ("csharp", 51),
            ("go", 60),
            ("rust", 73),
            ("php", 68),
            ("ruby", 72),
            ("swift", 83),
            ("kotlin", 78),
            ("typescript", 74),
        ];

        assert_eq!(Language::ALL.len(), expected.len());
        for (key, id) in expected {
            let language: Language = key.parse().unwrap();
            assert_eq!(language.judge0_id(), id, "id for {}", key);
            assert_eq!(language.key(), key);
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Language::lookup("Python"), Some(Language::Python));
        assert_eq!(Language::lookup("RUST"), Some(Language::Rust));
        assert_eq!(Language::lookup(" cpp "), Some(Language::Cpp));
    }

    #[test]
    fn unknown_key_reports_supported_list() {
        let err = "brainfuck".parse::<Language>().unwrap_err();
        match err {
            JudgeError::UnsupportedLanguage {
                language,
                supported,
            } => {
                assert_eq!(language, "brainfuck");
                assert_eq!(supported.len(), 13);
                assert_eq!(supported[0], "javascript");
                assert_eq!(supported[12], "typescript");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn near_misses_are_rejected() {
        for key in ["", "c++", "node", "py", "golang", "ts"] {
            assert!(Language::lookup(key).is_none(), "{} should not resolve", key);
        }
    }
}
