mod palette;

use std::io::{Stdout, stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{App, InputMode};
use crate::domain::todo::Todo;
use crate::repo::KeyValueStore;
use palette::Palette;

pub fn run<S: KeyValueStore>(mut app: App<S>, tick_rate: Duration) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut last_tick = Instant::now();
    let res = loop {
        if let Err(err) = terminal.draw(|f| draw(f, &app)) {
            break Err(err.into());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        match poll_key(timeout) {
            Ok(Some(code)) if handle_key(&mut app, code) => break Ok(()),
            Ok(_) => {}
            Err(err) => break Err(err),
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    };

    cleanup_terminal(&mut terminal)?;
    res
}

fn poll_key(timeout: Duration) -> Result<Option<KeyCode>> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
        && key.kind == KeyEventKind::Press
    {
        return Ok(Some(key.code));
    }
    Ok(None)
}

/// Returns `true` when the user asked to quit.
fn handle_key<S: KeyValueStore>(app: &mut App<S>, code: KeyCode) -> bool {
    match app.mode {
        InputMode::Normal => match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('j') | KeyCode::Down => app.select_next(),
            KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
            KeyCode::Char('a') | KeyCode::Char('n') => {
                app.mode = InputMode::Editing;
                app.input.clear();
                app.set_status("Type new task and press Enter");
            }
            KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
            KeyCode::Char('t') => app.toggle_theme(),
            KeyCode::Char('r') => app.reload(),
            _ => {}
        },
        InputMode::Editing => match code {
            KeyCode::Esc => {
                app.mode = InputMode::Normal;
                app.input.clear();
                app.set_status("Canceled");
            }
            KeyCode::Enter => app.add_todo(),
            KeyCode::Backspace => {
                app.input.pop();
            }
            KeyCode::Char(c) => app.input.push(c),
            _ => {}
        },
    }

    false
}

fn draw<S: KeyValueStore>(f: &mut ratatui::Frame, app: &App<S>) {
    let palette = Palette::for_theme(app.theme);
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(size);

    f.render_widget(render_header(app, palette), chunks[0]);

    if app.todos().is_empty() {
        f.render_widget(render_empty(palette), chunks[1]);
    } else {
        let mut list_state = ListState::default();
        list_state.select(Some(app.selected));
        let list = render_list(app.todos(), app.selected, palette);
        f.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    f.render_widget(render_footer(app, palette), chunks[2]);
}

fn render_header<S: KeyValueStore>(app: &App<S>, palette: Palette) -> Paragraph<'static> {
    let (open, total) = app.counts();
    let mode = if app.theme.is_dark() { "☾ dark" } else { "☀ light" };
    let line = Line::from(vec![
        Span::styled(
            "TODO",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Open: {open} / All: {total}"),
            Style::default().fg(palette.text),
        ),
        Span::raw("  |  "),
        Span::styled(mode, Style::default().fg(palette.muted)),
    ]);
    Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(palette.accent)))
        .wrap(Wrap { trim: true })
}

fn render_empty(palette: Palette) -> Paragraph<'static> {
    Paragraph::new("No tasks. Create one!")
        .style(Style::default().fg(palette.muted))
        .centered()
        .block(list_block(palette))
}

fn list_block(palette: Palette) -> Block<'static> {
    Block::default()
        .title("Tasks (j/k move ; a/n add ; Space/Enter toggle ; d delete ; t theme)")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent))
}

fn render_list(todos: &[Todo], selected: usize, palette: Palette) -> List<'_> {
    let items: Vec<ListItem> = todos
        .iter()
        .enumerate()
        .map(|(idx, todo)| {
            let symbol = if todo.completed { "●" } else { "○" };
            let mark = Style::default().fg(if todo.completed {
                palette.accent
            } else {
                palette.muted
            });
            let mut line = vec![
                Span::styled(format!(" {symbol} "), mark),
                Span::raw(todo.text.as_str()),
            ];
            if idx == selected {
                line.push(Span::styled("  [d]", Style::default().fg(palette.danger)));
            }

            let style = if idx == selected {
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else if todo.completed {
                Style::default()
                    .fg(palette.done)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(palette.text)
            };

            ListItem::new(Line::from(line)).style(style)
        })
        .collect();

    List::new(items)
        .block(list_block(palette))
        .highlight_symbol("➤ ")
}

fn render_footer<S: KeyValueStore>(app: &App<S>, palette: Palette) -> Paragraph<'_> {
    match app.mode {
        InputMode::Normal => {
            let msg = app
                .status
                .as_deref()
                .unwrap_or("q quit ; a add ; t theme ; r reload");
            Paragraph::new(msg).block(Block::default().title("Normal").borders(Borders::ALL))
        }
        InputMode::Editing => {
            let line = Line::from(vec![
                Span::raw("New task: "),
                Span::styled(&app.input, Style::default().fg(palette.accent)),
                Span::raw("█"),
            ]);
            Paragraph::new(line).block(
                Block::default()
                    .title("Input (Enter to add / Esc to cancel)")
                    .borders(Borders::ALL),
            )
        }
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
