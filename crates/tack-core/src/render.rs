use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use chrono::Local;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::task::{Category, Task};
use crate::theme::ThemeMode;
use crate::view::{Stats, StatusFilter};

const PROGRESS_BAR_WIDTH: usize = 40;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    theme: ThemeMode,
}

impl Renderer {
    pub fn new(cfg: &Config, theme: ThemeMode) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color, theme })
    }

    #[tracing::instrument(skip(self, tasks))]
    pub fn print_task_list(&mut self, tasks: &[&Task], filter: StatusFilter) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        if tasks.is_empty() {
            writeln!(out, "{}", empty_placeholder(filter))?;
            return Ok(());
        }

        let headers = vec![
            "ID".to_string(),
            "".to_string(),
            "Description".to_string(),
            "Category".to_string(),
            "Created".to_string(),
        ];

        let mut rows = Vec::with_capacity(tasks.len());

        for task in tasks {
            let id = self.paint(&task.short_id(), self.id_code());
            let mark = if task.completed { "[x]" } else { "[ ]" }.to_string();
            let text = if task.completed {
                // Strike through and dim completed rows.
                self.paint(&task.text, "9;2")
            } else {
                task.text.clone()
            };
            let badge = self.category_badge(task.category);
            let created = task
                .created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d")
                .to_string();

            rows.push(vec![id, mark, text, badge, created]);
        }

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub fn print_progress(&mut self, stats: Stats) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        writeln!(
            out,
            "Progress {} {}%",
            progress_bar(stats.percentage, PROGRESS_BAR_WIDTH),
            stats.percentage
        )?;
        writeln!(out, "{}/{} tasks completed", stats.completed, stats.total)?;
        Ok(())
    }

    fn category_badge(&self, category: Category) -> String {
        if category == Category::None {
            return String::new();
        }
        self.paint(category.label(), self.category_code(category))
    }

    fn id_code(&self) -> &'static str {
        match self.theme {
            ThemeMode::Light => "33",
            ThemeMode::Dark => "93",
        }
    }

    fn category_code(&self, category: Category) -> &'static str {
        match (self.theme, category) {
            (_, Category::None) => "0",
            (ThemeMode::Light, Category::Work) => "34",
            (ThemeMode::Light, Category::Personal) => "32",
            (ThemeMode::Light, Category::Urgent) => "31",
            (ThemeMode::Dark, Category::Work) => "94",
            (ThemeMode::Dark, Category::Personal) => "92",
            (ThemeMode::Dark, Category::Urgent) => "91",
        }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn empty_placeholder(filter: StatusFilter) -> &'static str {
    match filter {
        StatusFilter::All => "No tasks yet.",
        StatusFilter::Active => "No active tasks.",
        StatusFilter::Completed => "No completed tasks.",
    }
}

fn progress_bar(percentage: u32, width: usize) -> String {
    let filled = (percentage as usize).min(100) * width / 100;
    format!(
        "[{}{}]",
        "=".repeat(filled),
        " ".repeat(width.saturating_sub(filled))
    )
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{progress_bar, strip_ansi};

    #[test]
    fn progress_bar_fills_by_percentage() {
        assert_eq!(progress_bar(0, 10), "[          ]");
        assert_eq!(progress_bar(50, 10), "[=====     ]");
        assert_eq!(progress_bar(100, 10), "[==========]");
    }

    #[test]
    fn strip_ansi_removes_escape_sequences() {
        assert_eq!(strip_ansi("\x1b[9;2mdone\x1b[0m"), "done");
        assert_eq!(strip_ansi("plain"), "plain");
    }
}
