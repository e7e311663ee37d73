use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Which text field, if any, is receiving keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Url,
    Search,
    Token,
    ConfirmDelete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    MoveUp,
    MoveDown,
    MoveToTop,
    MoveToBottom,
    EditUrl,
    Submit,
    UseDemoUrl(usize),
    StartSearch,
    ClearSearch,
    DeleteSelected,
    ConfirmDelete,
    CancelDelete,
    SignIn,
    SignOut,
    OpenInBrowser,
    Refresh,
    ShowHelp,
    HideHelp,
    // Text input actions (url, search, token)
    InputChar(char),
    InputBackspace,
    InputConfirm,
    InputCancel,
}

pub fn handle_key_event(key: KeyEvent, mode: InputMode, show_help: bool) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    match mode {
        InputMode::Url | InputMode::Search | InputMode::Token => {
            return match key.code {
                KeyCode::Enter => Some(AppAction::InputConfirm),
                KeyCode::Esc => Some(AppAction::InputCancel),
                KeyCode::Backspace => Some(AppAction::InputBackspace),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(AppAction::InputCancel)
                }
                KeyCode::Char(c) => Some(AppAction::InputChar(c)),
                _ => None,
            };
        }
        InputMode::ConfirmDelete => {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => Some(AppAction::ConfirmDelete),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    Some(AppAction::CancelDelete)
                }
                _ => None,
            };
        }
        InputMode::Normal => {}
    }

    // Normal mode
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),
        (KeyCode::Char('<'), _) => Some(AppAction::MoveToTop),
        (KeyCode::Char('>'), _) => Some(AppAction::MoveToBottom),

        (KeyCode::Char('i'), _) => Some(AppAction::EditUrl),
        (KeyCode::Enter, _) => Some(AppAction::Submit),
        (KeyCode::Char('1'), _) => Some(AppAction::UseDemoUrl(0)),
        (KeyCode::Char('2'), _) => Some(AppAction::UseDemoUrl(1)),

        (KeyCode::Char('/'), _) => Some(AppAction::StartSearch),
        (KeyCode::Esc, _) => Some(AppAction::ClearSearch),

        (KeyCode::Char('d'), _) => Some(AppAction::DeleteSelected),
        (KeyCode::Char('o'), _) => Some(AppAction::OpenInBrowser),
        (KeyCode::Char('r'), _) => Some(AppAction::Refresh),

        (KeyCode::Char('l'), _) => Some(AppAction::SignIn),
        (KeyCode::Char('x'), _) => Some(AppAction::SignOut),

        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn help_swallows_any_key() {
        let action = handle_key_event(key(KeyCode::Char('q')), InputMode::Normal, true);
        assert_eq!(action, Some(AppAction::HideHelp));
    }

    #[test]
    fn text_modes_capture_characters() {
        for mode in [InputMode::Url, InputMode::Search, InputMode::Token] {
            assert_eq!(
                handle_key_event(key(KeyCode::Char('q')), mode, false),
                Some(AppAction::InputChar('q'))
            );
            assert_eq!(
                handle_key_event(key(KeyCode::Enter), mode, false),
                Some(AppAction::InputConfirm)
            );
            assert_eq!(
                handle_key_event(key(KeyCode::Esc), mode, false),
                Some(AppAction::InputCancel)
            );
        }
    }

    #[test]
    fn delete_confirmation_only_accepts_yes_or_no() {
        let mode = InputMode::ConfirmDelete;
        assert_eq!(
            handle_key_event(key(KeyCode::Char('y')), mode, false),
            Some(AppAction::ConfirmDelete)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Esc), mode, false),
            Some(AppAction::CancelDelete)
        );
        assert_eq!(handle_key_event(key(KeyCode::Char('d')), mode, false), None);
    }

    #[test]
    fn normal_mode_bindings() {
        let mode = InputMode::Normal;
        assert_eq!(
            handle_key_event(key(KeyCode::Char('2')), mode, false),
            Some(AppAction::UseDemoUrl(1))
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('/')), mode, false),
            Some(AppAction::StartSearch)
        );
        assert_eq!(
            handle_key_event(
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                mode,
                false
            ),
            Some(AppAction::Quit)
        );
    }
}
