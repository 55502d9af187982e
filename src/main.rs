mod app;
mod components;
mod config;
mod event;
mod logging;
mod reminder;
mod theme;
mod tui;

use std::time::Duration;

use app::{App, InputMode, Tab};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::Frame;
use reminder::{FileStorage, Storage};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let settings = config::Settings::load()?;
    let _log_guard = logging::init(&settings.log_dir(), &settings.log_level)?;
    theme::init(settings.theme.clone());

    let storage = FileStorage::new(&settings.data_dir);
    tracing::info!(data_dir = %storage.dir().display(), "opening reminder storage");
    let mut app = App::new(storage, &settings, reminder::time::device_timezone());

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore()?;
    result
}

async fn run<S: Storage>(terminal: &mut tui::Tui, app: &mut App<S>) -> Result<()> {
    while app.running {
        app.tick();
        terminal.draw(|frame| draw(frame, app))?;

        if let Some(key) = event::next_key_event(Duration::from_millis(100))? {
            // Clear status message on any key
            app.status_message = None;

            if app.show_help {
                if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
                    app.show_help = false;
                }
            } else if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
                app.quit();
            } else {
                match app.input_mode {
                    InputMode::Normal => handle_normal_input(app, key.code),
                    InputMode::Form => handle_form_input(app, key.code),
                    InputMode::CategoryPrompt => handle_prompt_input(app, key.code),
                }
            }
        }

        // Let pending-delete timers run.
        tokio::task::yield_now().await;
    }

    Ok(())
}

fn handle_normal_input<S: Storage>(app: &mut App<S>, code: KeyCode) {
    match code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Tab => app.next_tab(),
        KeyCode::Char('n') => app.switch_tab(Tab::Create),
        KeyCode::Char('1') => app.switch_tab(Tab::Create),
        KeyCode::Char('2') => app.switch_tab(Tab::Calendar),
        KeyCode::Char('3') => app.switch_tab(Tab::List),
        KeyCode::Char('t') => app.go_to_today(),
        KeyCode::Char('f') => app.cycle_filter(),
        KeyCode::Char('e') | KeyCode::Enter => app.edit_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.toggle_delete_selected(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_day(),
        KeyCode::Right | KeyCode::Char('l') => app.next_day(),
        KeyCode::Char('H') => app.prev_week(),
        KeyCode::Char('L') => app.next_week(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Char('[') => app.prev_month(),
        KeyCode::Char(']') => app.next_month(),
        KeyCode::Char('?') => app.show_help = true,
        _ => {}
    }
}

fn handle_form_input<S: Storage>(app: &mut App<S>, code: KeyCode) {
    match code {
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Tab | KeyCode::Down => app.form_next_field(),
        KeyCode::BackTab | KeyCode::Up => app.form_prev_field(),
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Char(' ') => app.form_space(),
        KeyCode::Char(c) => app.form_input_char(c),
        _ => {}
    }
}

fn handle_prompt_input<S: Storage>(app: &mut App<S>, code: KeyCode) {
    match code {
        KeyCode::Esc => app.prompt_cancel(),
        KeyCode::Enter => app.prompt_submit(),
        KeyCode::Backspace => app.prompt_backspace(),
        KeyCode::Char(c) => app.prompt_input_char(c),
        _ => {}
    }
}

fn draw<S: Storage>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();
    let layout = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_tab_bar(frame, layout[0], app.tab);

    match app.tab {
        Tab::Create => render_form_layout(frame, layout[1], app),
        Tab::Calendar => render_calendar_layout(frame, layout[1], app),
        Tab::List => components::ReminderList::render(
            frame,
            layout[1],
            "All reminders",
            &app.visible,
            &app.pending,
            app.selected_index,
        ),
    }

    if app.input_mode == InputMode::CategoryPrompt {
        components::reminder_form::render_category_prompt(frame, area, &app.category_input);
    }

    if app.show_help {
        render_help(frame, area);
    }

    render_status_bar(frame, layout[2], app);
}

fn render_tab_bar(frame: &mut Frame, area: Rect, active: Tab) {
    let theme = theme::current();
    let spans: Vec<Span> = [Tab::Create, Tab::Calendar, Tab::List]
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let label = format!(" {}:{} ", i + 1, tab.title());
            if *tab == active {
                Span::styled(label, theme.highlight)
            } else {
                Span::styled(label, theme.dim)
            }
        })
        .collect();
    frame.render_widget(ratatui::widgets::Paragraph::new(Line::from(spans)), area);
}

fn render_form_layout<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let form_w = area.width.min(64);
    let form_h = area.height.min(20);
    let x = area.x + area.width.saturating_sub(form_w) / 2;
    let form_area = Rect::new(x, area.y, form_w, form_h);
    components::ReminderFormView::render(
        frame,
        form_area,
        &app.session.form,
        app.active_field,
        app.is_editing(),
        app.form_error.as_deref(),
    );
}

fn render_calendar_layout<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let title = app.calendar.selected.format("%A, %d %B %Y").to_string();
    if area.width < 70 {
        let rows = Layout::vertical([Constraint::Length(10), Constraint::Min(3)]).split(area);
        render_month(frame, rows[0], app);
        components::ReminderList::render(
            frame,
            rows[1],
            &title,
            &app.visible,
            &app.pending,
            app.selected_index,
        );
    } else {
        let cols = Layout::horizontal([Constraint::Length(38), Constraint::Min(20)]).split(area);
        render_month(frame, cols[0], app);
        components::ReminderList::render(
            frame,
            cols[1],
            &title,
            &app.visible,
            &app.pending,
            app.selected_index,
        );
    }
}

fn render_month<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    components::MonthView::render(
        frame,
        area,
        app.calendar.selected,
        app.today,
        &app.marked_days,
        &app.calendar.filter,
    );
}

fn render_status_bar<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    use ratatui::widgets::Paragraph;

    let theme = theme::current();
    let w = area.width as usize;

    let mode = match (app.tab, app.is_editing()) {
        (Tab::Create, true) => " [Editing]",
        (Tab::Create, false) => " [New]",
        _ => "",
    };

    // Show status message if present, otherwise show context-aware hints
    let right_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        match app.tab {
            Tab::Create => " Tab:Field Space:Cycle Enter:Save Esc:Back ".to_string(),
            _ if w >= 90 => {
                " hl:Day jk:Select [/]:Month t:Today f:Filter e:Edit d:Del/Undo n:New ?:Help q:Quit "
                    .to_string()
            }
            _ if w >= 50 => " jk:Select e:Edit d:Del f:Filter ?:Help q:Quit ".to_string(),
            _ => " ?:Help q:Quit ".to_string(),
        }
    };

    let left = format!(" {} reminders{} ", app.reminders().len(), mode);
    let padding = " ".repeat(w.saturating_sub(left.chars().count() + right_text.chars().count()));

    let line = Line::from(vec![
        Span::styled(left, theme.status),
        Span::styled(padding, theme.status),
        Span::styled(right_text, theme.status),
    ]);
    frame.render_widget(Paragraph::new(line).style(theme.status), area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    use ratatui::style::{Modifier, Style};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let theme = theme::current();
    let popup_w = area.width.clamp(30, 54);
    let popup_h = area.height.clamp(12, 24);
    let x = area.x + area.width.saturating_sub(popup_w) / 2;
    let y = area.y + area.height.saturating_sub(popup_h) / 2;
    let popup_area = Rect::new(x, y, popup_w.min(area.width), popup_h.min(area.height));

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(theme.focus.add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(theme.focus);

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let entry = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", keys), key_style),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Calendar & list", section_style)),
        entry("h/l", "Previous/next day"),
        entry("H/L", "Previous/next week"),
        entry("[/]", "Previous/next month"),
        entry("j/k", "Select reminder"),
        entry("t", "Jump to today"),
        entry("f", "Cycle category filter"),
        entry("e, Enter", "Edit selected reminder"),
        entry("d", "Delete selected (again to undo)"),
        Line::from(""),
        Line::from(Span::styled("Form", section_style)),
        entry("Tab", "Next field"),
        entry("Space", "Cycle repeat/priority/lead/category"),
        entry("+", "Add category (on category)"),
        entry("Enter", "Save reminder"),
        entry("Esc", "Cancel edit / back"),
        Line::from(""),
        entry("1/2/3", "Create / Calendar / List"),
        entry("q, C-c", "Quit"),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
