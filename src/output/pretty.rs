use colored::Colorize;

use crate::features::records::{BestRun, MapRecord, SessionRecord};

fn best_attempt_str(best: Option<&BestRun>) -> String {
    best.map_or_else(
        || "none yet".dimmed().to_string(),
        |b| format!("{}s (attempt #{})", b.seconds, b.attempt),
    )
}

fn best_completion_str(best: Option<&BestRun>) -> String {
    best.map_or_else(
        || "none yet".dimmed().to_string(),
        |b| format!("{}s (attempt #{})", b.seconds, b.attempt),
    )
}

/// Format a list of maps as a pretty table
#[must_use]
pub fn format_maps_pretty(maps: &[MapRecord]) -> String {
    if maps.is_empty() {
        return "Maps (0)\n  No maps yet. Add one with `floodwatch maps add <name>`.".to_string();
    }

    let mut output = format!("Maps ({})\n", maps.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for map in maps {
        let mut line = format!(
            "{}  {}/{}",
            map.name.bold(),
            map.total_completions.to_string().green(),
            map.total_attempts
        );

        if let Some(song) = &map.song {
            line.push_str(&format!("  {}", song.dimmed()));
        }

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format a single map with full statistics
#[must_use]
pub fn format_map_pretty(map: &MapRecord) -> String {
    let mut output = format!("{}\n", map.name.bold());
    output.push_str(&format!(
        "  {}: {}\n",
        "Attempts".dimmed(),
        map.total_attempts
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Completions".dimmed(),
        map.total_completions
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Best attempt".dimmed(),
        best_attempt_str(map.best_attempt.as_ref())
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Best completion".dimmed(),
        best_completion_str(map.best_completion.as_ref())
    ));

    if let Some(song) = &map.song {
        output.push_str(&format!("  {}: {}\n", "Song".dimmed(), song));
    }

    output
}

/// Format a list of sessions as pretty output
#[must_use]
pub fn format_sessions_pretty(sessions: &[SessionRecord]) -> String {
    if sessions.is_empty() {
        return "Sessions (0)\n  No sessions recorded".to_string();
    }

    let mut output = format!("Sessions ({})\n", sessions.len());
    output.push_str(&"─".repeat(60));
    output.push('\n');

    for session in sessions {
        let id = session.id.map_or_else(|| "?".to_string(), |id| id.to_string());
        let when = session.started_at.format("%Y-%m-%d %H:%M");
        let status = if session.is_open() {
            "open".yellow().to_string()
        } else {
            format!("{}s", session.duration_secs())
        };

        output.push_str(&format!(
            "#{}  {}  {}  {}/{}  {}\n",
            id,
            session.map.bold(),
            when.to_string().dimmed(),
            session.completions.to_string().green(),
            session.attempts,
            status
        ));
    }

    output
}

/// Format the end-of-session summary shown when a watch ends
#[must_use]
pub fn format_session_summary(session: &SessionRecord) -> String {
    let mut output = format!("{}\n", "Session summary".bold());
    output.push_str(&format!("  {}: {}\n", "Map".dimmed(), session.map));
    output.push_str(&format!(
        "  {}: {}s\n",
        "Duration".dimmed(),
        session.duration_secs()
    ));
    output.push_str(&format!("  {}: {}\n", "Attempts".dimmed(), session.attempts));
    output.push_str(&format!(
        "  {}: {}\n",
        "Completions".dimmed(),
        session.completions
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Best attempt".dimmed(),
        best_attempt_str(session.best_attempt.as_ref())
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Best completion".dimmed(),
        best_completion_str(session.best_completion.as_ref())
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> MapRecord {
        MapRecord {
            name: "Lost Woods".to_string(),
            song: Some("forest.ogg".to_string()),
            total_attempts: 10,
            total_completions: 3,
            best_attempt: Some(BestRun {
                attempt: 7,
                seconds: 61.5,
            }),
            best_completion: None,
        }
    }

    #[test]
    fn test_format_maps_empty() {
        let out = format_maps_pretty(&[]);
        assert!(out.contains("No maps yet"));
    }

    #[test]
    fn test_format_maps_lists_names() {
        let out = format_maps_pretty(&[sample_map()]);
        assert!(out.contains("Lost Woods"));
        assert!(out.contains("forest.ogg"));
    }

    #[test]
    fn test_format_map_shows_bests() {
        let out = format_map_pretty(&sample_map());
        assert!(out.contains("61.5s (attempt #7)"));
        assert!(out.contains("none yet"));
    }

    #[test]
    fn test_format_sessions_empty() {
        let out = format_sessions_pretty(&[]);
        assert!(out.contains("No sessions recorded"));
    }

    #[test]
    fn test_format_session_summary() {
        let mut session = SessionRecord::open("Lost Woods");
        session.attempts = 4;
        session.completions = 1;
        session.close();

        let out = format_session_summary(&session);
        assert!(out.contains("Lost Woods"));
        assert!(out.contains("Attempts"));
    }
}
