use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::reminder::preview::lead_label;
use crate::reminder::soft_delete::PendingDeletes;
use crate::reminder::time::format_relative;
use crate::reminder::Reminder;
use crate::theme;

pub struct ReminderList;

impl ReminderList {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        title: &str,
        reminders: &[Reminder],
        pending: &PendingDeletes,
        selected_index: usize,
    ) {
        let theme = theme::current();
        let w = area.width as usize;

        let title = if w >= 25 {
            format!(" {} ({}) ", title, reminders.len())
        } else {
            format!(" {} ", title)
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        if reminders.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No reminders").style(theme.dim);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;
        let now = Local::now();

        let items: Vec<ListItem> = reminders
            .iter()
            .enumerate()
            .map(|(i, reminder)| {
                let is_pending = pending.is_pending(&reminder.id);
                let is_selected = i == selected_index;

                let title_style = match (is_selected, is_pending) {
                    (true, _) => theme.selected,
                    (false, true) => theme.pending,
                    (false, false) => Style::default().add_modifier(Modifier::BOLD),
                };

                let mut head = vec![Span::styled(
                    format!(" {}", truncate(&reminder.title, inner_w.saturating_sub(16))),
                    title_style,
                )];
                if reminder.has_category() {
                    head.push(Span::styled(format!("  {}", reminder.category), theme.badge));
                }
                if is_pending {
                    head.push(Span::styled("  deleting, d to undo", theme.error));
                }

                let when = format_relative(&reminder.datetime.with_timezone(&Local), &now);
                let meta = format!(
                    "   {} · {} · {} · {}",
                    when,
                    reminder.repeat.label(),
                    lead_label(reminder.remind_before_minutes),
                    reminder.priority.label()
                );
                let mut lines = vec![Line::from(head), Line::from(Span::styled(meta, theme.dim))];
                if let Some(note) = &reminder.note {
                    lines.push(Line::from(Span::styled(
                        format!("   {}", truncate(note, inner_w.saturating_sub(3))),
                        theme.dim.add_modifier(Modifier::ITALIC),
                    )));
                }
                ListItem::new(lines)
            })
            .collect();

        let list = List::new(items).block(block).highlight_style(theme.highlight);
        let mut state = ListState::default().with_selected(Some(selected_index));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Geburtstag Jürgen", 10), "Geburts...");
        assert_eq!(truncate("äöü", 2), "äö");
    }
}
