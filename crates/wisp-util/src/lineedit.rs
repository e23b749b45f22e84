//! The one piece of global mutable state besides the root environment: a
//! single line-editor buffer, lifetime-scoped `init`/`fini`, shared by the
//! `readline` primitive (`wisp-eval`) and the interactive REPL loop
//! (`wisp-repl`) so both read through the same history buffer rather than
//! each opening a competing handle on the terminal.
//!
//! `rustyline::DefaultEditor` isn't `Send`, and there is exactly one of it
//! per process, so a thread-local is simpler than threading a handle through
//! every call site that might eventually want a line of input.

use std::cell::RefCell;
use std::io::Write as _;

use rustyline::DefaultEditor;

thread_local! {
    static EDITOR: RefCell<Option<DefaultEditor>> = RefCell::new(None);
}

/// Opens the editor. Safe to call more than once; only the first call in a
/// process does anything. `progname` is accepted for parity with the
/// reference's `console_input_init(progname)` but isn't otherwise used —
/// `rustyline` doesn't key its history file on it.
pub fn init(_progname: &str) {
    EDITOR.with(|cell| {
        if cell.borrow().is_some() {
            return;
        }
        if let Ok(editor) = DefaultEditor::new() {
            *cell.borrow_mut() = Some(editor);
        }
    });
}

/// Prints `prompt` and reads one line. Returns `None` on EOF (Ctrl-D) or an
/// interrupt (Ctrl-C), matching the reference's "empty read means stop"
/// contract. Falls back to a plain stdin read if `init` was never called or
/// the terminal couldn't be opened (e.g. stdin isn't a tty), so piped input
/// (`echo '(+ 1 2)' | wisp`) still works.
pub fn prompt(prompt: &str) -> Option<String> {
    EDITOR.with(|cell| {
        let mut slot = cell.borrow_mut();
        match slot.as_mut() {
            Some(editor) => match editor.readline(prompt) {
                Ok(line) => Some(line),
                Err(_) => None,
            },
            None => plain_stdin_prompt(prompt),
        }
    })
}

fn plain_stdin_prompt(prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    match std::io::stdin().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => {
            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }
            Some(line)
        }
        Err(_) => None,
    }
}

/// Appends `line` to the editor's in-memory history. A no-op if the editor
/// was never successfully opened.
pub fn history_add(line: &str) {
    EDITOR.with(|cell| {
        if let Some(editor) = cell.borrow_mut().as_mut() {
            let _ = editor.add_history_entry(line);
        }
    });
}

/// Closes the editor, dropping its history. After this, `prompt` falls back
/// to plain stdin until `init` is called again.
pub fn fini() {
    EDITOR.with(|cell| {
        *cell.borrow_mut() = None;
    });
}
