use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::reminder::time::month_name;
use crate::reminder::MonthGrid;
use crate::theme;

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub struct MonthView;

impl MonthView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        selected_date: NaiveDate,
        today: NaiveDate,
        marked_days: &BTreeSet<u32>,
        filter: &str,
    ) {
        let theme = theme::current();
        let Some(grid) = MonthGrid::new(selected_date.year(), selected_date.month()) else {
            return;
        };

        let title = format!(" {} {} ", month_name(grid.month), grid.year);
        let filter_label = match filter {
            "" => " All categories ".to_string(),
            f => format!(" {} ", f),
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(filter_label, theme.badge)))
            .borders(Borders::ALL)
            .border_style(theme.border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header = Line::from(
            DAY_NAMES
                .iter()
                .map(|d| Span::styled(format!("{:^5}", d), theme.header))
                .collect::<Vec<_>>(),
        );

        let weeks: Vec<Line> = grid
            .weeks()
            .iter()
            .map(|week| {
                let cells: Vec<Span> = week
                    .iter()
                    .map(|cell| match cell {
                        None => Span::styled("  ·  ", theme.dim),
                        Some(day) => day_cell(&grid, *day, selected_date, today, marked_days),
                    })
                    .collect();
                Line::from(cells)
            })
            .collect();

        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend(weeks.iter().map(|_| Constraint::Length(1)));
        constraints.push(Constraint::Min(0));
        let rows = Layout::vertical(constraints).split(inner);

        frame.render_widget(Paragraph::new(header), rows[0]);
        for (i, week) in weeks.into_iter().enumerate() {
            frame.render_widget(Paragraph::new(week), rows[i + 1]);
        }
    }
}

fn day_cell(
    grid: &MonthGrid,
    day: u32,
    selected_date: NaiveDate,
    today: NaiveDate,
    marked_days: &BTreeSet<u32>,
) -> Span<'static> {
    let theme = theme::current();
    let date = NaiveDate::from_ymd_opt(grid.year, grid.month, day);
    let marker = if marked_days.contains(&day) { "•" } else { " " };
    let text = format!(" {:>2}{} ", day, marker);

    let style = if date == Some(selected_date) && date == Some(today) {
        theme.today.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else if date == Some(selected_date) {
        theme.selected
    } else if date == Some(today) {
        theme.today
    } else if marked_days.contains(&day) {
        theme.marker
    } else {
        Style::default()
    };
    Span::styled(text, style)
}
