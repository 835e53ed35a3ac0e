// App module
// - mod.rs: App struct, constructors, terminal lifecycle
// - event_loop.rs: async run() loop
// - rendering.rs: screen layout and drawing
// - handlers.rs: key routing and action dispatch

mod event_loop;
mod handlers;
mod rendering;

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::chat::{ChatSession, Language};
use crate::components::chat_input::ChatInput;
use crate::components::conversation_viewer::ConversationViewer;
use crate::components::notification::ToastManager;
use crate::components::prompt_chips::PromptChips;
use crate::components::spinner::{Spinner, SpinnerStyle};
use crate::config::{AppConfig, Theme};
use crate::error::{ChatError, Result};

const MIN_TICK_INTERVAL_MS: u64 = 16;

/// Which widget receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusArea {
    Input,
    Chips,
}

impl FocusArea {
    pub fn next(self) -> Self {
        match self {
            FocusArea::Input => FocusArea::Chips,
            FocusArea::Chips => FocusArea::Input,
        }
    }
}

pub struct App<B: Backend> {
    terminal: Terminal<B>,
    /// Restore raw mode and the alternate screen on drop
    owns_terminal: bool,

    session: ChatSession,
    theme: Theme,
    tick_interval: Duration,
    show_timestamps: bool,

    chat_input: ChatInput,
    viewer: ConversationViewer,
    chips: PromptChips,
    toasts: ToastManager,

    focus: FocusArea,
    /// Language the chips and placeholder were last built for
    shown_language: Language,
    should_quit: bool,
    needs_redraw: bool,
}

impl App<CrosstermBackend<Stdout>> {
    /// Take over the terminal: raw mode, alternate screen, mouse and paste capture
    pub fn new(session: ChatSession, config: &AppConfig, theme: Theme) -> Result<Self> {
        enable_raw_mode().map_err(|e| ChatError::Terminal(e.to_string()))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)
            .map_err(|e| ChatError::Terminal(e.to_string()))?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).map_err(|e| ChatError::Terminal(e.to_string()))?;

        let mut app = Self::with_terminal(terminal, session, config, theme);
        app.owns_terminal = true;
        Ok(app)
    }
}

impl<B: Backend> App<B> {
    /// Build around an already prepared terminal. Nothing is restored on drop.
    pub fn with_terminal(terminal: Terminal<B>, session: ChatSession, config: &AppConfig, theme: Theme) -> Self {
        let language = session.language();
        let copy = language.copy();
        let chips = PromptChips::new(copy.try_asking, session.quick_prompts());

        let mut chat_input = ChatInput::new();
        chat_input.set_placeholder(copy.placeholder);

        let spinner_style = SpinnerStyle::from_name(&theme.spinner.default_style).unwrap_or_default();
        let spinner = Spinner::new(spinner_style).with_color(theme.spinner.color.to_color());

        Self {
            terminal,
            owns_terminal: false,
            session,
            tick_interval: Duration::from_millis(config.general.tick_interval_ms.max(MIN_TICK_INTERVAL_MS)),
            show_timestamps: config.chat.show_timestamps,
            chat_input,
            viewer: ConversationViewer::new().with_spinner(spinner),
            chips,
            toasts: ToastManager::new(Duration::from_millis(config.chat.notification_duration_ms)),
            theme,
            focus: FocusArea::Input,
            shown_language: language,
            should_quit: false,
            needs_redraw: true,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    /// Pull session side effects into the widgets: notices, scroll requests,
    /// the composer buffer and language-dependent copy.
    fn sync_from_session(&mut self) {
        let notices = self.session.drain_notices();
        if !notices.is_empty() {
            self.toasts.extend(notices);
            self.mark_dirty();
        }

        if self.session.take_scroll_request() {
            self.viewer.request_scroll_to_bottom();
            self.mark_dirty();
        }

        if self.chat_input.text() != self.session.input() {
            self.chat_input.set_text(self.session.input());
        }
        self.chat_input.set_locked(self.session.is_locked());

        let language = self.session.language();
        if language != self.shown_language {
            let copy = language.copy();
            self.chips.set_prompts(copy.try_asking, self.session.quick_prompts());
            self.chat_input.set_placeholder(copy.placeholder);
            self.shown_language = language;
            self.mark_dirty();
        }
    }
}

impl<B: Backend> Drop for App<B> {
    fn drop(&mut self) {
        self.session.unmount();
        if self.owns_terminal {
            restore_terminal();
        }
    }
}

/// Leave raw mode and the alternate screen. Safe to call more than once.
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, DisableBracketedPaste);
}
