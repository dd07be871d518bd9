//! TUI view state: focus, file selection, transcript scrolling and messages.

/// Which panel currently has keyboard focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FocusedPanel {
    /// The file set on the left.
    #[default]
    Files,
    /// The transcript on the right.
    Transcript,
}

impl FocusedPanel {
    /// Returns the other panel.
    pub fn toggle(self) -> Self {
        match self {
            Self::Files => Self::Transcript,
            Self::Transcript => Self::Files,
        }
    }
}

/// Full TUI view state. Session state lives in the session itself.
#[derive(Clone, Debug, Default)]
pub struct TuiState {
    /// Which panel has focus.
    pub focused: FocusedPanel,
    /// Index of the selected file in the file set.
    pub selected_file: usize,
    /// Lines scrolled back from the end of the transcript. Zero tails.
    pub transcript_scroll: usize,
    /// Message shown in the status bar.
    pub status_message: String,
    /// Whether the help popup is visible.
    pub show_help: bool,
}

impl TuiState {
    /// Creates the initial state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the file selection down, stopping at the last file.
    pub fn select_next_file(&mut self, file_count: usize) {
        if self.selected_file + 1 < file_count {
            self.selected_file += 1;
        }
    }

    /// Moves the file selection up, stopping at the first file.
    pub fn select_prev_file(&mut self) {
        self.selected_file = self.selected_file.saturating_sub(1);
    }

    /// Keeps the selection inside a file set that may have shrunk.
    pub fn clamp_selection(&mut self, file_count: usize) {
        self.selected_file = self.selected_file.min(file_count.saturating_sub(1));
    }

    /// Scrolls one line further back, up to `transcript_len`.
    pub fn scroll_back(&mut self, transcript_len: usize) {
        if self.transcript_scroll < transcript_len {
            self.transcript_scroll += 1;
        }
    }

    /// Scrolls one line toward the end; reaching zero resumes tailing.
    pub fn scroll_forward(&mut self) {
        self.transcript_scroll = self.transcript_scroll.saturating_sub(1);
    }

    /// Returns `true` if the transcript follows new output.
    pub fn is_tailing(&self) -> bool {
        self.transcript_scroll == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_selection_is_bounded() {
        let mut s = TuiState::new();
        s.select_prev_file();
        assert_eq!(s.selected_file, 0);
        s.select_next_file(2);
        s.select_next_file(2);
        assert_eq!(s.selected_file, 1);
    }

    #[test]
    fn clamp_after_file_set_shrinks() {
        let mut s = TuiState::new();
        s.selected_file = 5;
        s.clamp_selection(3);
        assert_eq!(s.selected_file, 2);
        s.clamp_selection(0);
        assert_eq!(s.selected_file, 0);
    }

    #[test]
    fn scrolling_back_stops_tailing() {
        let mut s = TuiState::new();
        assert!(s.is_tailing());
        s.scroll_back(2);
        s.scroll_back(2);
        s.scroll_back(2);
        assert_eq!(s.transcript_scroll, 2);
        assert!(!s.is_tailing());
        s.scroll_forward();
        s.scroll_forward();
        s.scroll_forward();
        assert!(s.is_tailing());
    }

    #[test]
    fn focus_toggles() {
        assert_eq!(FocusedPanel::Files.toggle(), FocusedPanel::Transcript);
        assert_eq!(FocusedPanel::Transcript.toggle(), FocusedPanel::Files);
    }
}
