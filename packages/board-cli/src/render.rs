//! Text rendering for the display board and the admin list.

use board_core::{DisplayEntry, StoreSnapshot};
use chrono::{DateTime, Local};
use colored::Colorize;

/// Render the public display board: visible providers only, wait time
/// shown per each provider's preference, plus the wall clock.
pub fn render_display(entries: &[DisplayEntry], now: DateTime<Local>) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Provider Status Board".bold()));
    out.push_str("Current provider availability\n\n");

    if entries.is_empty() {
        out.push_str("No providers available\n");
        out.push_str("Please check back later\n");
    } else {
        let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
        for entry in entries {
            let wait = match entry.wait_time {
                Some(minutes) => format!("{} min wait", minutes),
                None => String::new(),
            };
            out.push_str(&format!(
                "  {:<width$}  {}\n",
                entry.name.green(),
                wait,
                width = width
            ));
        }
    }

    out.push_str(&format!("\nCurrent time: {}\n", now.format("%H:%M:%S")));
    out
}

/// Render the admin list: every record with its flags, open edit gestures,
/// and the current-error slot.
pub fn render_admin(snapshot: &StoreSnapshot, now: DateTime<Local>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} ({})\n\n",
        "Current Providers".bold(),
        snapshot.providers.len()
    ));

    if snapshot.providers.is_empty() {
        out.push_str("No providers available\n");
    } else {
        for provider in &snapshot.providers {
            let visibility = if provider.visible { "shown" } else { "hidden" };
            let wait = if provider.show_wait_time {
                format!("{} min", provider.wait_time)
            } else {
                format!("{} min (not displayed)", provider.wait_time)
            };
            let editing = match snapshot.edits.get(&provider.id) {
                Some(pending) => format!("  [editing: \"{}\"]", pending),
                None => String::new(),
            };
            out.push_str(&format!(
                "  {:>4}  {}  {}  {}{}\n",
                provider.id,
                provider.name,
                wait,
                visibility,
                editing
            ));
        }
    }

    if let Some(error) = &snapshot.last_error {
        out.push_str(&format!("\n{}\n", format!("Error: {}", error).red()));
    }

    out.push_str(&format!("\nCurrent time: {}\n", now.format("%H:%M:%S")));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::{Provider, ProviderId};
    use chrono::TimeZone;

    fn at_noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn display_masks_hidden_wait_times() {
        colored::control::set_override(false);
        let entries = vec![
            DisplayEntry {
                name: "Dr. Johnson".to_string(),
                wait_time: Some(5),
            },
            DisplayEntry {
                name: "Dr. Chen".to_string(),
                wait_time: None,
            },
        ];

        let rendered = render_display(&entries, at_noon());
        assert!(rendered.contains("Dr. Johnson"));
        assert!(rendered.contains("5 min wait"));
        let chen_line = rendered
            .lines()
            .find(|line| line.contains("Dr. Chen"))
            .unwrap();
        assert!(!chen_line.contains("min wait"));
        assert!(rendered.contains("Current time: 12:00:00"));
    }

    #[test]
    fn display_has_empty_state() {
        colored::control::set_override(false);
        let rendered = render_display(&[], at_noon());
        assert!(rendered.contains("No providers available"));
        assert!(rendered.contains("Please check back later"));
    }

    #[test]
    fn admin_list_shows_flags_edits_and_error() {
        colored::control::set_override(false);
        let mut snapshot = StoreSnapshot {
            providers: vec![Provider {
                id: ProviderId(1),
                name: "Dr. Johnson".to_string(),
                wait_time: 5,
                visible: false,
                show_wait_time: true,
            }],
            last_error: Some("network error: connection refused".to_string()),
            edits: Default::default(),
        };
        snapshot.edits.insert(ProviderId(1), "7".to_string());

        let rendered = render_admin(&snapshot, at_noon());
        assert!(rendered.contains("Current Providers (1)"));
        assert!(rendered.contains("hidden"));
        assert!(rendered.contains("[editing: \"7\"]"));
        assert!(rendered.contains("Error: network error: connection refused"));
    }
}
