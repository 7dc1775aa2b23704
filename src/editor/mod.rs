//! Thin accessor over the live editing widget. The session manager only ever
//! needs to read and replace the full text, so the contract is the
//! `getValue`/`setValue` pair every embeddable editor exposes.

pub trait EditorHandle: Send {
    fn value(&self) -> String;
    fn set_value(&mut self, text: &str);
}

/// In-memory editor used by the CLI (which has no live widget) and by tests.
#[derive(Debug, Default)]
pub struct BufferEditor {
    text: String,
}

impl BufferEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl EditorHandle for BufferEditor {
    fn value(&self) -> String {
        self.text.clone()
    }

    fn set_value(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_editor_set_then_get() {
        let mut ed = BufferEditor::new();
        assert_eq!(ed.value(), "");
        ed.set_value("print(1)");
        assert_eq!(ed.value(), "print(1)");
    }
}
