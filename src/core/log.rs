use crate::db::log::{LogEntry, load_log};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::formatting::{pad_right, strip_ansi, visible_len};
use ansi_term::Colour;

const MAX_OP_WIDTH: usize = 60;

/// ANSI colour for an audit operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" => Colour::Green,
        "site" => Colour::Cyan,
        "del" | "del_site" => Colour::Red,
        "clear" => Colour::RGB(255, 153, 51),
        "migration_applied" => Colour::Purple,
        "init" => Colour::Blue,
        _ => Colour::White,
    }
}

/// "op (target)", cut to `max` visible characters, op coloured.
fn render_op(entry: &LogEntry, max: usize) -> String {
    let plain = if entry.target.is_empty() {
        entry.operation.clone()
    } else {
        format!("{} ({})", entry.operation, entry.target)
    };

    let visible = if plain.chars().count() > max {
        let mut s: String = plain.chars().take(max.saturating_sub(3)).collect();
        s.push_str("...");
        s
    } else {
        plain
    };

    let color = color_for_operation(&entry.operation);
    match visible.split_once(' ') {
        Some((op, rest)) => format!("{} {}", color.paint(op), rest),
        None => color.paint(visible.as_str()).to_string(),
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &mut DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let op_w = entries
            .iter()
            .map(|e| visible_len(&render_op(e, MAX_OP_WIDTH)))
            .max()
            .unwrap_or(10);
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for e in &entries {
            let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or_else(|_| e.date.clone());
            let op = render_op(e, MAX_OP_WIDTH);

            println!(
                "{:>id_w$}: {:<date_w$} | {} => {}",
                e.id,
                date,
                pad_right(&op, op_w),
                strip_ansi(&e.message),
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(op: &str, target: &str) -> LogEntry {
        LogEntry {
            id: 1,
            date: String::new(),
            operation: op.to_string(),
            target: target.to_string(),
            message: String::new(),
        }
    }

    #[test]
    fn long_targets_are_truncated() {
        let long = "x".repeat(100);
        let out = strip_ansi(&render_op(&entry("add", &long), 20));
        assert_eq!(out.chars().count(), 20);
        assert!(out.starts_with("add ("));
        assert!(out.ends_with("..."));
    }

    #[test]
    fn short_ops_are_kept() {
        assert_eq!(strip_ansi(&render_op(&entry("clear", ""), 20)), "clear");
        assert_eq!(
            strip_ansi(&render_op(&entry("del", "ab12cd34"), 60)),
            "del (ab12cd34)"
        );
    }
}
