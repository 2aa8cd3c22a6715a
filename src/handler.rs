use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Mode};

/// Key handler for one mode.
type ModeHandler = fn(&mut App, KeyEvent);

fn handler_for(mode: Mode) -> ModeHandler {
    match mode {
        Mode::CommandEntry => handle_command_key,
        Mode::TreeNavigation => handle_tree_key,
    }
}

/// Handle a key event: global bindings first, then the active mode's handler.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if handle_global_key(app, key) {
        return;
    }
    handler_for(app.mode)(app, key);
}

/// Bindings available in every mode. Returns `true` if the key was consumed.
fn handle_global_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::Home => app.output.scroll_to_top(),
        KeyCode::End => app.output.scroll_to_bottom(),
        _ => return false,
    }
    true
}

fn handle_command_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Esc => app.set_mode(Mode::TreeNavigation),
        KeyCode::Enter => app.submit_command(),
        KeyCode::Backspace => app.command_line.backspace(),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_line.clear()
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_line.push(c)
        }
        _ => {}
    }
}

fn handle_tree_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Right {
        app.set_mode(Mode::CommandEntry);
        return;
    }
    let outcome = app.navigator.handle_key(key);
    app.handle_nav_outcome(outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::setup_app;

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_edits_command_buffer() {
        let (_dir, mut app, _rx) = setup_app();
        type_str(&mut app, "lss");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.command_line.as_str(), "ls");
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
        );
        assert!(app.command_line.as_str().is_empty());
    }

    #[test]
    fn left_switches_to_tree_keeping_buffer() {
        let (_dir, mut app, _rx) = setup_app();
        type_str(&mut app, "pwd");
        press(&mut app, KeyCode::Left);
        assert_eq!(app.mode, Mode::TreeNavigation);
        assert_eq!(app.command_line.as_str(), "pwd");
        press(&mut app, KeyCode::Right);
        assert_eq!(app.mode, Mode::CommandEntry);
        assert_eq!(app.command_line.as_str(), "pwd");
    }

    #[test]
    fn tree_keys_reach_navigator() {
        let (_dir, mut app, _rx) = setup_app();
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.navigator.cursor(), 1);
        // Typed characters are not captured while navigating.
        press(&mut app, KeyCode::Char('x'));
        assert!(app.command_line.as_str().is_empty());
    }

    #[test]
    fn descend_and_ascend_with_keys() {
        let (_dir, mut app, _rx) = setup_app();
        let root = app.navigator.current_id();
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Enter);
        assert_ne!(app.navigator.current_id(), root);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.navigator.current_id(), root);
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_in_both_modes() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        let (_dir, mut app, _rx) = setup_app();
        handle_key_event(&mut app, ctrl_c);
        assert!(app.should_quit);

        let (_dir, mut app, _rx) = setup_app();
        app.set_mode(Mode::TreeNavigation);
        handle_key_event(&mut app, ctrl_c);
        assert!(app.should_quit);
    }

    #[test]
    fn home_end_scroll_output_in_any_mode() {
        let (_dir, mut app, _rx) = setup_app();
        app.output.resize(3, 40);
        app.output.set_content("1\n2\n3\n4\n5\n6");
        app.set_mode(Mode::TreeNavigation);
        press(&mut app, KeyCode::End);
        assert_eq!(app.output.scroll_offset(), 3);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.output.scroll_offset(), 0);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.output.scroll_offset(), 3);
        assert_eq!(app.navigator.cursor(), 0);
    }
}
