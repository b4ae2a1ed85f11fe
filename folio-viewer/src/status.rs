use crate::surface::StatusSink;

/// Status line model: file name, page position and the last message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBar {
    file_name: Option<String>,
    page_count: usize,
    current_page: usize,
    message: Option<String>,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn last_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Text shown at the bottom of the window. Pages are numbered from 1.
    pub fn summary(&self) -> String {
        let position = match &self.file_name {
            Some(name) => format!(
                "{} | Page {} of {}",
                name,
                self.current_page + 1,
                self.page_count
            ),
            None => "No document".to_string(),
        };
        match &self.message {
            Some(message) => format!("{position} | {message}"),
            None => position,
        }
    }
}

impl StatusSink for StatusBar {
    fn set_file_name(&mut self, name: &str) {
        self.file_name = Some(name.to_string());
        self.message = None;
    }

    fn set_page_count(&mut self, count: usize) {
        self.page_count = count;
    }

    fn set_current_page(&mut self, index: usize) {
        self.current_page = index;
    }

    fn message(&mut self, text: &str) {
        self.message = Some(text.to_string());
    }

    fn clear(&mut self) {
        self.file_name = None;
        self.page_count = 0;
        self.current_page = 0;
    }
}
