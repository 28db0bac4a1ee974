// treegen/src/tui.rs
//
// The only module that knows about ratatui, crossterm, and the clipboard.
// Translates terminal events into session Commands and executes the Effects
// the session hands back.

use anyhow::{
    anyhow,
    Context,
    Result,
};
use clipboard::{
    ClipboardContext,
    ClipboardProvider,
};
use crossterm::{
    event::{
        self,
        DisableMouseCapture,
        EnableMouseCapture,
        Event,
        KeyCode,
        KeyEvent,
        KeyEventKind,
        KeyModifiers,
        MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{
        disable_raw_mode,
        enable_raw_mode,
        EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use log::error;
use ratatui::{
    backend::CrosstermBackend,
    layout::{
        Constraint,
        Layout,
    },
    style::{
        Color,
        Modifier,
        Style,
    },
    text::{
        Line,
        Span,
        Text,
    },
    widgets::{
        Paragraph,
        Scrollbar,
        ScrollbarOrientation,
        ScrollbarState,
    },
    Frame,
    Terminal,
};
use std::{
    io,
    time::{
        Duration,
        Instant,
    },
};
use crate::session::{
    Command,
    Effect,
    ScrollStep,
    Session,
    View,
};

const HELP_TEXT: &str = "^Q: quit, ^C: copy tree to clipboard, ^V: toggle tree view";
const COPIED_NOTICE: &str = "Content copied to clipboard.";
const COPIED_NOTICE_FOR: Duration = Duration::from_secs(2);
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Restores the terminal on drop, including the early-return paths.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("enabling raw mode")?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)
            .context("entering alternate screen")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        let _ = disable_raw_mode();
    }
}

/// Run the interactive loop until the session asks to quit. One event is
/// fully processed before the next is read; the clipboard write completes
/// synchronously inside its Effect.
pub fn run(mut session: Session) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("initializing terminal")?;
    terminal.clear().context("clearing terminal")?;

    let mut scroll: u16 = 0;
    let mut copied_until: Option<Instant> = None;

    loop {
        if copied_until.is_some_and(|t| Instant::now() >= t) {
            copied_until = None;
        }
        terminal.draw(|f| draw(f, &session, scroll, copied_until.is_some()))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let cmd = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key_command(&key),
            Event::Mouse(ev) => mouse_command(&ev),
            _ => None,
        };
        let Some(cmd) = cmd else { continue };

        match session.apply(cmd) {
            Effect::Quit => break,
            Effect::Redraw => scroll = 0,
            Effect::Copy(payload) => match copy_to_clipboard(&payload) {
                Ok(()) => copied_until = Some(Instant::now() + COPIED_NOTICE_FOR),
                // Logged only; the session keeps running and the status bar
                // simply never shows the confirmation.
                Err(e) => error!("clipboard copy failed: {e:#}"),
            },
            Effect::Scroll(step) => {
                let view_height = terminal.size()?.height.saturating_sub(2);
                scroll = apply_scroll(step, scroll, view_height.max(1), max_scroll(&session, view_height));
            }
        }
    }
    Ok(())
}

fn draw(f: &mut Frame, session: &Session, scroll: u16, copied: bool) {
    let [path_area, content_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(f.area());

    let path_bar = Line::from(vec![
        Span::styled(
            format!("treegen @{} | Path: ", session.version()),
            Style::new().fg(Color::Cyan),
        ),
        Span::raw(session.root_path()),
    ]);
    f.render_widget(
        Paragraph::new(path_bar).style(Style::new().fg(Color::White).bg(Color::Black)),
        path_area,
    );

    let content = match session.current_view() {
        View::Tree => Text::from(
            session
                .lines()
                .iter()
                .map(|l| {
                    let name_style = match l.kind {
                        crate::tree::EntryKind::Directory => Style::new().fg(Color::Blue),
                        crate::tree::EntryKind::File => Style::new().fg(Color::Green),
                    };
                    Line::from(vec![
                        Span::styled(
                            format!("{}{}", l.indent, l.glyph()),
                            Style::new().add_modifier(Modifier::DIM),
                        ),
                        Span::styled(l.name.clone(), name_style),
                    ])
                })
                .collect::<Vec<Line>>(),
        ),
        View::Structured => Text::raw(session.json()),
    };
    f.render_widget(Paragraph::new(content).scroll((scroll, 0)), content_area);

    let total = session.content_height();
    if total > content_area.height as usize {
        let mut state = ScrollbarState::new(total).position(scroll as usize);
        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            content_area,
            &mut state,
        );
    }

    let status = if copied { COPIED_NOTICE } else { HELP_TEXT };
    f.render_widget(
        Paragraph::new(status).style(Style::new().fg(Color::White).bg(Color::Blue)),
        status_area,
    );
}

fn key_command(key: &KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Char('c') => Some(Command::CopyToClipboard),
            KeyCode::Char('v') => Some(Command::ToggleView),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Up => Some(Command::Scroll(ScrollStep::LineUp)),
        KeyCode::Down => Some(Command::Scroll(ScrollStep::LineDown)),
        KeyCode::PageUp => Some(Command::Scroll(ScrollStep::PageUp)),
        KeyCode::PageDown => Some(Command::Scroll(ScrollStep::PageDown)),
        KeyCode::Home => Some(Command::Scroll(ScrollStep::Top)),
        KeyCode::End => Some(Command::Scroll(ScrollStep::Bottom)),
        _ => None,
    }
}

fn mouse_command(ev: &MouseEvent) -> Option<Command> {
    match ev.kind {
        MouseEventKind::ScrollUp => Some(Command::Scroll(ScrollStep::LineUp)),
        MouseEventKind::ScrollDown => Some(Command::Scroll(ScrollStep::LineDown)),
        _ => None,
    }
}

fn max_scroll(session: &Session, view_height: u16) -> u16 {
    session
        .content_height()
        .saturating_sub(view_height as usize)
        .min(u16::MAX as usize) as u16
}

fn apply_scroll(step: ScrollStep, current: u16, page: u16, max: u16) -> u16 {
    match step {
        ScrollStep::LineUp => current.saturating_sub(1),
        ScrollStep::LineDown => current.saturating_add(1).min(max),
        ScrollStep::PageUp => current.saturating_sub(page),
        ScrollStep::PageDown => current.saturating_add(page).min(max),
        ScrollStep::Top => 0,
        ScrollStep::Bottom => max,
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut ctx: ClipboardContext =
        ClipboardProvider::new().map_err(|e| anyhow!("opening clipboard: {e}"))?;
    ctx.set_contents(text.to_owned())
        .map_err(|e| anyhow!("writing clipboard: {e}"))?;
    Ok(())
}

/* ================================== Tests ================================== */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{DirNode, DirTreeRoot, EntryKind, RenderedTrees, TreeLine};
    use ratatui::backend::TestBackend;

    fn sample_session() -> Session {
        let trees = RenderedTrees {
            lines: vec![
                TreeLine {
                    indent: String::new(),
                    last: false,
                    name: "a.txt".into(),
                    kind: EntryKind::File,
                },
                TreeLine {
                    indent: String::new(),
                    last: true,
                    name: "b".into(),
                    kind: EntryKind::Directory,
                },
            ],
            root: DirTreeRoot {
                path: "/r".into(),
                kind: "directory",
                children: vec![
                    DirNode { name: "a.txt".into(), children: None },
                    DirNode { name: "b".into(), children: Some(vec![]) },
                ],
            },
        };
        Session::new(trees, "0.3.0").unwrap()
    }

    fn row(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buf = terminal.backend().buffer();
        (0..buf.area.width)
            .map(|x| buf.cell((x, y)).unwrap().symbol())
            .collect()
    }

    #[test]
    fn control_keys_map_to_session_commands() {
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);
        assert_eq!(key_command(&ctrl('q')), Some(Command::Quit));
        assert_eq!(key_command(&ctrl('c')), Some(Command::CopyToClipboard));
        assert_eq!(key_command(&ctrl('v')), Some(Command::ToggleView));
        assert_eq!(key_command(&ctrl('x')), None);
        // Plain letters are not bound.
        let plain = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(key_command(&plain), None);
    }

    #[test]
    fn navigation_keys_map_to_scroll_steps() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(
            key_command(&key(KeyCode::Up)),
            Some(Command::Scroll(ScrollStep::LineUp))
        );
        assert_eq!(
            key_command(&key(KeyCode::PageDown)),
            Some(Command::Scroll(ScrollStep::PageDown))
        );
        assert_eq!(
            key_command(&key(KeyCode::Home)),
            Some(Command::Scroll(ScrollStep::Top))
        );
        assert_eq!(
            key_command(&key(KeyCode::End)),
            Some(Command::Scroll(ScrollStep::Bottom))
        );
    }

    #[test]
    fn scroll_steps_clamp_to_bounds() {
        assert_eq!(apply_scroll(ScrollStep::LineUp, 0, 10, 50), 0);
        assert_eq!(apply_scroll(ScrollStep::LineDown, 50, 10, 50), 50);
        assert_eq!(apply_scroll(ScrollStep::LineDown, 3, 10, 50), 4);
        assert_eq!(apply_scroll(ScrollStep::PageUp, 5, 10, 50), 0);
        assert_eq!(apply_scroll(ScrollStep::PageDown, 45, 10, 50), 50);
        assert_eq!(apply_scroll(ScrollStep::Top, 33, 10, 50), 0);
        assert_eq!(apply_scroll(ScrollStep::Bottom, 0, 10, 50), 50);
    }

    #[test]
    fn draw_renders_path_bar_tree_and_help() {
        let mut terminal = Terminal::new(TestBackend::new(60, 6)).unwrap();
        let session = sample_session();
        terminal.draw(|f| draw(f, &session, 0, false)).unwrap();
        assert!(row(&terminal, 0).contains("treegen @0.3.0 | Path: /r"));
        assert!(row(&terminal, 1).contains("├── a.txt"));
        assert!(row(&terminal, 2).contains("└── b"));
        assert!(row(&terminal, 5).contains(HELP_TEXT));
    }

    #[test]
    fn draw_shows_copied_notice_and_structured_view() {
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        let mut session = sample_session();
        session.apply(Command::ToggleView);
        terminal.draw(|f| draw(f, &session, 0, true)).unwrap();
        assert!(row(&terminal, 1).contains('{'));
        assert!(row(&terminal, 2).contains("\"path\": \"/r\""));
        assert!(row(&terminal, 9).contains(COPIED_NOTICE));
    }
}
