use std::fmt;

use tracing::{debug, warn};

use crate::error::OperationError;
use crate::keypad::{Action, Key};
use crate::ops::{self, Function};

/// The front end a session draws on.
pub trait Surface {
    /// Show the current expression buffer. Called after every mutation.
    fn refresh(&mut self, display: &str);

    /// Report a failed operation. Returns once the user has dismissed the
    /// message; the session clears its buffer right after.
    fn alert(&mut self, message: &str);
}

/// A successful `=`: the text that was evaluated and what it evaluated to.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub expression: String,
    pub result: String,
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.expression, self.result)
    }
}

/// One calculator: the expression buffer, the history of evaluations and
/// the surface that displays them.
pub struct Session<S> {
    buffer: String,
    history: Vec<HistoryEntry>,
    surface: S,
}

impl<S: Surface> Session<S> {
    pub fn new(mut surface: S) -> Self {
        surface.refresh("");
        Session {
            buffer: String::new(),
            history: Vec::new(),
            surface,
        }
    }

    pub fn current(&self) -> &str {
        &self.buffer
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn append(&mut self, token: &str) {
        self.buffer.push_str(token);
        self.refresh();
    }

    pub fn delete_last(&mut self) {
        self.buffer.pop();
        self.refresh();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.refresh();
    }

    pub fn flip_sign(&mut self) {
        if !self.buffer.is_empty() {
            self.buffer = ops::flip_sign(&self.buffer);
            self.refresh();
        }
    }

    /// Run a function handler over the whole buffer.
    pub fn apply(&mut self, function: Function) {
        match function.apply(&self.buffer) {
            Ok(text) => {
                debug!("{}({}) = {}", function, self.buffer, text);
                self.replace(text);
            }
            Err(err) => self.fail(err),
        }
    }

    /// Evaluate the buffer, recording it in the history on success. An empty
    /// buffer is left alone.
    pub fn equals(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        match crate::eval(&self.buffer) {
            Ok(value) => {
                let result = value.to_string();
                debug!("{} = {}", self.buffer, result);
                self.history.push(HistoryEntry {
                    expression: self.buffer.clone(),
                    result: result.clone(),
                });
                self.replace(result);
            }
            Err(err) => self.fail(OperationError::from(err)),
        }
    }

    pub fn perform(&mut self, action: Action) {
        match action {
            Action::Append(text) => self.append(text),
            Action::Type(c) => self.append(c.encode_utf8(&mut [0; 4])),
            Action::Apply(function) => self.apply(function),
            Action::FlipSign => self.flip_sign(),
            Action::Delete => self.delete_last(),
            Action::Clear => self.clear(),
            Action::Equals => self.equals(),
        }
    }

    /// Dispatch a key press. Returns false for keys the keyboard table
    /// ignores.
    pub fn press_key(&mut self, key: Key) -> bool {
        match key.action() {
            Some(action) => {
                self.perform(action);
                true
            }
            None => false,
        }
    }

    fn replace(&mut self, text: String) {
        self.buffer = text;
        self.refresh();
    }

    fn fail(&mut self, err: OperationError) {
        warn!("discarding '{}': {}", self.buffer, err);
        self.surface.alert(&err.to_string());
        self.clear();
    }

    fn refresh(&mut self) {
        self.surface.refresh(&self.buffer);
    }
}
