use std::sync::{Mutex, PoisonError};

/// A single-line text input the handler reads from and clears.
pub trait InputField: Send + Sync {
    fn value(&self) -> String;

    fn set_value(&self, value: &str);

    fn clear(&self) {
        self.set_value("");
    }
}

/// An in-memory input field shared between the prompt and the handler.
#[derive(Debug, Default)]
pub struct LineBuffer {
    value: Mutex<String>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(value.into()),
        }
    }
}

impl InputField for LineBuffer {
    fn value(&self) -> String {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_value(&self, value: &str) {
        let mut current = self.value.lock().unwrap_or_else(PoisonError::into_inner);
        current.clear();
        current.push_str(value);
    }
}
