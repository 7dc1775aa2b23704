//! Execution session manager: owns all mutable session state and the
//! request/response lifecycle of a remote execution call.
//!
//! State machine: {Idle, Running}. `run()` moves Idle -> Running only when
//! the editor holds non-empty code, and every exit path (success, any
//! failure class, transport error) lands back in Idle. The manager is
//! reusable indefinitely; nothing here is terminal.

use anyhow::{anyhow, Result};

use crate::{
    editor::EditorHandle,
    languages,
    piston::{ExecuteRequest, ExecuteResponse, ExecutionService},
    prefs::{self, PrefStore},
};

pub const DEFAULT_LANGUAGE: &str = "javascript";
pub const DEFAULT_THEME: &str = "vs-dark";
pub const DEFAULT_FONT_SIZE: u32 = 16;

const EMPTY_CODE_MSG: &str = "Please enter some code";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub language: String,
    pub theme: String,
    pub font_size: u32,
    pub is_running: bool,
    /// Last successful stdout, trimmed.
    pub output: String,
    /// Last user-facing error message, if any.
    pub error: Option<String>,
    pub execution_result: Option<ExecutionRecord>,
}

/// Full record of the last execution, retained for display after
/// `is_running` resets. `code` is the exact source text that was run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRecord {
    pub code: String,
    pub output: String,
    pub error: Option<String>,
}

pub type Observer = Box<dyn Fn(&SessionState)>;

pub struct SessionManager<S: ExecutionService> {
    state: SessionState,
    service: S,
    prefs: Box<dyn PrefStore>,
    editor: Option<Box<dyn EditorHandle>>,
    observers: Vec<Observer>,
}

impl<S: ExecutionService> SessionManager<S> {
    /// Initializes session state from persisted preferences, falling back to
    /// defaults when a key is absent or unreadable.
    pub fn new(service: S, prefs: Box<dyn PrefStore>) -> Self {
        let language = prefs
            .get(prefs::KEY_LANGUAGE)
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let theme = prefs
            .get(prefs::KEY_THEME)
            .unwrap_or_else(|| DEFAULT_THEME.to_string());
        let font_size = prefs
            .get(prefs::KEY_FONT_SIZE)
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_FONT_SIZE);

        Self {
            state: SessionState {
                language,
                theme,
                font_size,
                is_running: false,
                output: String::new(),
                error: None,
                execution_result: None,
            },
            service,
            prefs,
            editor: None,
            observers: Vec::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn subscribe(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    fn notify(&self) {
        for obs in &self.observers {
            obs(&self.state);
        }
    }

    /// Attaches the live editor. If a code blob was saved for the currently
    /// selected language it is loaded into the editor first; this happens
    /// once per attach, not on every render.
    pub fn attach_editor(&mut self, mut editor: Box<dyn EditorHandle>) {
        if let Some(saved) = self.prefs.get(&prefs::code_key(&self.state.language)) {
            editor.set_value(&saved);
        }
        self.editor = Some(editor);
        self.notify();
    }

    /// Current editor text, or empty if no editor is attached yet.
    pub fn current_code(&self) -> String {
        self.editor.as_ref().map(|e| e.value()).unwrap_or_default()
    }

    pub fn set_code(&mut self, text: &str) {
        if let Some(editor) = self.editor.as_mut() {
            editor.set_value(text);
        }
    }

    /// Switches language. The in-progress edit is saved under the outgoing
    /// language's key first, so nothing is silently lost, and stale
    /// output/error from the previous language is cleared. The last
    /// execution record is kept.
    pub fn set_language(&mut self, language: &str) {
        let current_code = self.current_code();
        if !current_code.is_empty() {
            self.prefs
                .set(&prefs::code_key(&self.state.language), &current_code);
        }
        self.prefs.set(prefs::KEY_LANGUAGE, language);

        self.state.language = language.to_string();
        self.state.output.clear();
        self.state.error = None;
        self.notify();
    }

    pub fn set_theme(&mut self, theme: &str) {
        self.prefs.set(prefs::KEY_THEME, theme);
        self.state.theme = theme.to_string();
        self.notify();
    }

    pub fn set_font_size(&mut self, size: u32) {
        self.prefs.set(prefs::KEY_FONT_SIZE, &size.to_string());
        self.state.font_size = size;
        self.notify();
    }

    /// Runs the current editor text against the execution service and
    /// classifies the response into session state. Never raises: every
    /// failure class ends up as a user-facing message in `error`.
    pub async fn run(&mut self) {
        if self.state.is_running {
            return;
        }

        let code = self.current_code();
        if code.is_empty() {
            self.state.error = Some(EMPTY_CODE_MSG.to_string());
            self.notify();
            return;
        }

        self.state.is_running = true;
        self.state.error = None;
        self.state.output.clear();
        self.notify();

        let outcome = self.execute(&code).await;
        // Back to Idle before anything else, whatever happened above.
        self.state.is_running = false;

        match classify(outcome) {
            RunOutcome::Success(output) => {
                self.state.output = output.clone();
                self.state.error = None;
                self.state.execution_result = Some(ExecutionRecord { code, output, error: None });
            }
            RunOutcome::Failure(message) => {
                tracing::debug!(%message, "execution failed");
                self.state.error = Some(message.clone());
                self.state.execution_result = Some(ExecutionRecord {
                    code,
                    output: String::new(),
                    error: Some(message),
                });
            }
        }
        self.notify();
    }

    async fn execute(&self, code: &str) -> Result<ExecuteResponse> {
        let runtime = languages::resolve(&self.state.language)
            .and_then(|l| l.runtime)
            .ok_or_else(|| {
                anyhow!("No runtime configuration found for language: {}", self.state.language)
            })?;
        let req = ExecuteRequest::new(runtime.name, runtime.version, code);
        self.service.execute(&req).await
    }

    /// Last full execution record, usable by observers without reaching into
    /// the manager's internals.
    pub fn execution_result(&self) -> Option<&ExecutionRecord> {
        self.state.execution_result.as_ref()
    }
}

enum RunOutcome {
    Success(String),
    Failure(String),
}

/// Classifies a settled execution call, highest-priority match first:
/// transport failure, service-level `message`, compile stage failure, run
/// stage failure, then success.
fn classify(outcome: Result<ExecuteResponse>) -> RunOutcome {
    let resp = match outcome {
        Ok(resp) => resp,
        Err(e) => return RunOutcome::Failure(e.to_string()),
    };

    if let Some(message) = resp.message.as_deref().filter(|m| !m.is_empty()) {
        return RunOutcome::Failure(message.to_string());
    }

    if let Some(compile) = resp.compile.as_ref().filter(|c| c.failed()) {
        return RunOutcome::Failure(stage_message(compile, "Compilation failed"));
    }

    if let Some(run) = resp.run.as_ref().filter(|r| r.failed()) {
        return RunOutcome::Failure(stage_message(run, "Runtime error"));
    }

    let output = resp.run.map(|r| r.output).unwrap_or_default();
    RunOutcome::Success(output.trim().to_string())
}

fn stage_message(stage: &crate::piston::StageResult, fallback: &str) -> String {
    if !stage.stderr.is_empty() {
        stage.stderr.clone()
    } else if !stage.output.is_empty() {
        stage.output.clone()
    } else {
        fallback.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piston::StageResult;

    fn resp(json: &str) -> ExecuteResponse {
        serde_json::from_str(json).unwrap()
    }

    fn failure(outcome: Result<ExecuteResponse>) -> String {
        match classify(outcome) {
            RunOutcome::Failure(m) => m,
            RunOutcome::Success(out) => panic!("expected failure, got success: {out:?}"),
        }
    }

    #[test]
    fn classify_transport_error() {
        let msg = failure(Err(anyhow!("HTTP error! status: 503")));
        assert_eq!(msg, "HTTP error! status: 503");
    }

    #[test]
    fn classify_service_message_wins_over_run_fields() {
        let r = resp(r#"{"message": "rate limited", "run": {"code": 1, "stderr": "boom"}}"#);
        assert_eq!(failure(Ok(r)), "rate limited");
    }

    #[test]
    fn classify_empty_service_message_is_ignored() {
        let r = resp(r#"{"message": "", "run": {"code": 0, "output": "ok\n"}}"#);
        match classify(Ok(r)) {
            RunOutcome::Success(out) => assert_eq!(out, "ok"),
            RunOutcome::Failure(m) => panic!("unexpected failure: {m}"),
        }
    }

    #[test]
    fn classify_compile_failure_prefers_stderr() {
        let r = resp(r#"{"compile": {"code": 1, "stderr": "undefined symbol", "output": "noise"}}"#);
        assert_eq!(failure(Ok(r)), "undefined symbol");
    }

    #[test]
    fn classify_compile_failure_falls_back_to_output_then_default() {
        let r = resp(r#"{"compile": {"code": 1, "output": "ld exited"}}"#);
        assert_eq!(failure(Ok(r)), "ld exited");
        let r = resp(r#"{"compile": {"code": 2}}"#);
        assert_eq!(failure(Ok(r)), "Compilation failed");
    }

    #[test]
    fn classify_runtime_failure() {
        let r = resp(r#"{"run": {"code": 1, "stderr": "SyntaxError: x"}}"#);
        assert_eq!(failure(Ok(r)), "SyntaxError: x");
        let r = resp(r#"{"run": {"code": 1}}"#);
        assert_eq!(failure(Ok(r)), "Runtime error");
    }

    #[test]
    fn classify_success_trims_output() {
        let r = resp(r#"{"run": {"code": 0, "output": "7\n"}}"#);
        match classify(Ok(r)) {
            RunOutcome::Success(out) => assert_eq!(out, "7"),
            RunOutcome::Failure(m) => panic!("unexpected failure: {m}"),
        }
    }

    #[test]
    fn classify_success_without_run_stage_yields_empty_output() {
        match classify(Ok(ExecuteResponse::default())) {
            RunOutcome::Success(out) => assert_eq!(out, ""),
            RunOutcome::Failure(m) => panic!("unexpected failure: {m}"),
        }
    }

    #[test]
    fn classify_signal_killed_run_counts_as_runtime_failure() {
        let r = ExecuteResponse {
            run: Some(StageResult { code: None, stderr: "killed".into(), ..Default::default() }),
            ..Default::default()
        };
        assert_eq!(failure(Ok(r)), "killed");
    }
}
