use chrono::{DateTime, Local};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::reminder::preview::{lead_label, preview};
use crate::reminder::validate::{LeadChoice, ReminderForm};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Date,
    Time,
    Repeat,
    Priority,
    Lead,
    Category,
    Note,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Title => FormField::Date,
            FormField::Date => FormField::Time,
            FormField::Time => FormField::Repeat,
            FormField::Repeat => FormField::Priority,
            FormField::Priority => FormField::Lead,
            FormField::Lead => FormField::Category,
            FormField::Category => FormField::Note,
            FormField::Note => FormField::Title,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormField::Title => FormField::Note,
            FormField::Date => FormField::Title,
            FormField::Time => FormField::Date,
            FormField::Repeat => FormField::Time,
            FormField::Priority => FormField::Repeat,
            FormField::Lead => FormField::Priority,
            FormField::Category => FormField::Lead,
            FormField::Note => FormField::Category,
        }
    }

    /// Type a character into this field. Chip fields only take digits for
    /// custom lead minutes.
    pub fn push(&self, form: &mut ReminderForm, c: char) {
        match self {
            FormField::Title => form.title.push(c),
            FormField::Date => form.date.push(c),
            FormField::Time => form.time.push(c),
            FormField::Note => form.note.push(c),
            FormField::Lead => {
                if let LeadChoice::Custom(raw) = &mut form.lead {
                    if c.is_ascii_digit() {
                        raw.push(c);
                    }
                }
            }
            FormField::Repeat | FormField::Priority | FormField::Category => {}
        }
    }

    pub fn pop(&self, form: &mut ReminderForm) {
        match self {
            FormField::Title => {
                form.title.pop();
            }
            FormField::Date => {
                form.date.pop();
            }
            FormField::Time => {
                form.time.pop();
            }
            FormField::Note => {
                form.note.pop();
            }
            FormField::Lead => {
                if let LeadChoice::Custom(raw) = &mut form.lead {
                    raw.pop();
                }
            }
            FormField::Repeat | FormField::Priority => {}
            FormField::Category => form.category.clear(),
        }
    }
}

pub struct ReminderFormView;

impl ReminderFormView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        form: &ReminderForm,
        active: FormField,
        editing: bool,
        error: Option<&str>,
    ) {
        let theme = theme::current();
        let title = if editing { " Edit reminder " } else { " New reminder " };
        let block = Block::default()
            .title(title)
            .title_style(theme.focus.add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(theme.focus);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1), // date
            Constraint::Length(1), // time
            Constraint::Length(1), // repeat
            Constraint::Length(1), // priority
            Constraint::Length(1), // lead
            Constraint::Length(1), // category
            Constraint::Length(1), // note
            Constraint::Length(1), // spacer
            Constraint::Length(1), // error
            Constraint::Length(1), // spacer
            Constraint::Length(4), // preview
            Constraint::Min(0),
            Constraint::Length(1), // help
        ])
        .split(inner);

        render_field(frame, rows[0], "Title:", &form.title, active == FormField::Title);
        render_field(frame, rows[1], "Date:", &form.date, active == FormField::Date);
        render_field(frame, rows[2], "Time:", &form.time, active == FormField::Time);
        render_chip(frame, rows[3], "Repeat:", form.repeat.label(), active == FormField::Repeat);
        render_chip(
            frame,
            rows[4],
            "Prio:",
            form.priority.label(),
            active == FormField::Priority,
        );

        let lead = match &form.lead {
            LeadChoice::Preset(m) => lead_label(*m),
            LeadChoice::Custom(raw) => format!("Custom: {} min", raw),
        };
        render_chip(frame, rows[5], "Lead:", &lead, active == FormField::Lead);

        let category = if form.category.is_empty() { "None" } else { form.category.as_str() };
        render_chip(frame, rows[6], "Cat:", category, active == FormField::Category);
        render_field(frame, rows[7], "Note:", &form.note, active == FormField::Note);

        if let Some(msg) = error {
            frame.render_widget(Paragraph::new(msg).style(theme.error), rows[9]);
        }

        render_preview(frame, rows[11], form, &Local::now());

        let help = Line::from(vec![
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Next ", theme.dim),
            Span::styled("Space", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cycle ", theme.dim),
            Span::styled("+", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":New cat ", theme.dim),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Save ", theme.dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(if editing { ":Cancel edit" } else { ":Calendar" }, theme.dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[13]);
    }
}

fn render_preview(frame: &mut Frame, area: Rect, form: &ReminderForm, now: &DateTime<Local>) {
    let theme = theme::current();
    let p = preview(form, now);
    let block = Block::default()
        .title(" Preview ")
        .title_style(theme.dim)
        .borders(Borders::TOP)
        .border_style(theme.border);
    let lines = vec![
        Line::from(Span::styled(p.headline, theme.header)),
        Line::from(Span::styled(p.meta, theme.dim)),
        Line::from(vec![
            Span::styled("Category: ", theme.dim),
            Span::styled(p.category, theme.badge),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
    let cursor = if active { "_" } else { "" };
    let style = if active { theme::current().selected } else { Style::default() };
    let spans = vec![
        Span::styled(format!("{:<8}", label), theme::current().dim),
        Span::styled(format!("{}{}", value, cursor), style),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_chip(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
    let style = if active { theme::current().selected } else { theme::current().badge };
    let spans = vec![
        Span::styled(format!("{:<8}", label), theme::current().dim),
        Span::styled(format!("[ {} ]", value), style),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_category_prompt(frame: &mut Frame, area: Rect, input: &str) {
    let theme = theme::current();
    let w = area.width.clamp(24, 40);
    let h = 5;
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    let popup = Rect::new(x, y, w, h.min(area.height));

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .title(" New category ")
        .title_style(theme.focus.add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(theme.focus);
    let lines = vec![
        Line::from(Span::styled(format!("{}_", input), theme.selected)),
        Line::from(""),
        Line::from(Span::styled("Enter:Add  Esc:Cancel", theme.dim)),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_order_wraps_both_ways() {
        let mut f = FormField::Title;
        for _ in 0..8 {
            assert_eq!(f.next().prev(), f);
            f = f.next();
        }
        assert_eq!(f, FormField::Title);
    }

    #[test]
    fn lead_field_only_accepts_digits_in_custom_mode() {
        let mut form = ReminderForm::default();
        FormField::Lead.push(&mut form, '5');
        assert_eq!(form.lead, LeadChoice::Preset(0));

        form.lead = LeadChoice::Custom(String::new());
        for c in "4x5".chars() {
            FormField::Lead.push(&mut form, c);
        }
        assert_eq!(form.lead, LeadChoice::Custom("45".into()));
        FormField::Lead.pop(&mut form);
        assert_eq!(form.lead, LeadChoice::Custom("4".into()));
    }

    #[test]
    fn priority_sits_between_repeat_and_lead() {
        assert_eq!(FormField::Repeat.next(), FormField::Priority);
        assert_eq!(FormField::Lead.prev(), FormField::Priority);
        let mut form = ReminderForm::default();
        FormField::Priority.push(&mut form, 'x');
        FormField::Priority.pop(&mut form);
        assert_eq!(form, ReminderForm::default());
    }

    #[test]
    fn backspace_on_category_clears_it() {
        let mut form = ReminderForm {
            category: "Work".into(),
            ..ReminderForm::default()
        };
        FormField::Category.pop(&mut form);
        assert!(form.category.is_empty());
    }
}
