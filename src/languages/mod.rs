//! Static language registry: maps a language id to display metadata and the
//! runtime name/version pair the execution service expects.

/// Runtime identifier/version pair understood by the execution service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Runtime {
    pub name: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Language {
    pub id: &'static str,
    pub display_name: &'static str,
    /// `None` means the language is known to the UI but has no configured
    /// runtime; running it is a configuration error, not a transport one.
    pub runtime: Option<Runtime>,
}

pub const LANGUAGES: &[Language] = &[
    Language {
        id: "javascript",
        display_name: "JavaScript",
        runtime: Some(Runtime { name: "javascript", version: "18.15.0" }),
    },
    Language {
        id: "typescript",
        display_name: "TypeScript",
        runtime: Some(Runtime { name: "typescript", version: "5.0.3" }),
    },
    Language {
        id: "python",
        display_name: "Python",
        runtime: Some(Runtime { name: "python", version: "3.10.0" }),
    },
    Language {
        id: "java",
        display_name: "Java",
        runtime: Some(Runtime { name: "java", version: "15.0.2" }),
    },
    Language {
        id: "go",
        display_name: "Go",
        runtime: Some(Runtime { name: "go", version: "1.16.2" }),
    },
    Language {
        id: "rust",
        display_name: "Rust",
        runtime: Some(Runtime { name: "rust", version: "1.68.2" }),
    },
    Language {
        id: "cpp",
        display_name: "C++",
        runtime: Some(Runtime { name: "c++", version: "10.2.0" }),
    },
    Language {
        id: "csharp",
        display_name: "C#",
        runtime: Some(Runtime { name: "csharp", version: "6.12.0" }),
    },
    Language {
        id: "ruby",
        display_name: "Ruby",
        runtime: Some(Runtime { name: "ruby", version: "3.0.1" }),
    },
    Language {
        id: "swift",
        display_name: "Swift",
        runtime: Some(Runtime { name: "swift", version: "5.3.3" }),
    },
];

/// Editor color themes the front end may offer. Free-form strings are still
/// accepted; this is display metadata only.
pub const THEMES: &[&str] = &["vs-dark", "vs-light", "github-dark", "monokai", "solarized-dark"];

pub fn resolve(id: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_known_language() {
        let lang = resolve("python").unwrap();
        assert_eq!(lang.display_name, "Python");
        let rt = lang.runtime.unwrap();
        assert_eq!(rt.name, "python");
        assert_eq!(rt.version, "3.10.0");
    }

    #[test]
    fn resolve_unknown_language() {
        assert!(resolve("cobol").is_none());
    }

    #[test]
    fn every_entry_has_a_distinct_id() {
        for (i, a) in LANGUAGES.iter().enumerate() {
            for b in &LANGUAGES[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }
}
