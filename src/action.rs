use crate::chat::NavKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Tick,
    Render,

    /// Tab: move focus between the composer and the quick-prompt row
    FocusNext,

    // Transcript scrolling
    ScrollUp(u16),
    ScrollDown(u16),
    ScrollPageUp,
    ScrollPageDown,
    ScrollToTop,
    ScrollToBottom,

    // Composer
    InputChanged(String),
    Nav(NavKey),

    // Quick prompts
    ChipPrev,
    ChipNext,
    /// Submit a predefined question directly
    Submit(String),

    ToggleLanguage,
    DismissNotice,

    /// Event consumed, nothing to dispatch
    None,
}
