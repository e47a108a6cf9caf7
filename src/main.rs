use note_history::config::Config;
use note_history::history::{
    Baseline, CurrentComparison, DiffPresentation, EditKind, EditOp, FieldDiff, NoteDiff,
    ValueChange,
};
use note_history::{FileRevisionSource, HttpRevisionSource, NoteId, RevisionHistory, RevisionSource};
use std::sync::Arc;
use tracing::Level;

const USAGE: &str = "usage: note-history <note-id> [--local] [--current] [--save-config]";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let level = if config.settings.debug_logging {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let mut args = std::env::args().skip(1);
    let Some(note_id) = args.next().and_then(|arg| arg.parse::<NoteId>().ok()) else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };
    let flags: Vec<String> = args.collect();

    if flags.iter().any(|f| f == "--save-config") {
        // writes back a complete file, filling in settings the user left out
        if let Err(e) = config.save() {
            tracing::warn!("Failed to save config: {}", e);
        }
    }

    let source: Arc<dyn RevisionSource> = if flags.iter().any(|f| f == "--local") {
        Arc::new(FileRevisionSource::new(&config)?)
    } else {
        Arc::new(HttpRevisionSource::from_settings(&config.settings)?)
    };

    let mut history = RevisionHistory::new(source, config.settings.page_size);
    history.open_history(note_id);
    history.load_all(config.settings.fetch_timeout())?;

    if history.cache().is_empty() {
        println!("No history available for note {}", note_id);
        return Ok(());
    }

    if flags.iter().any(|f| f == "--current") {
        let current = history.fetch_current_state()?;
        print_current(&history.present_current(&current)?);
    }

    for index in 0..history.cache().len() {
        let presentation = history.present_diff(index)?;
        print_presentation(&history, &presentation);
    }

    history.close_history();
    Ok(())
}

fn print_presentation(history: &RevisionHistory, presentation: &DiffPresentation) {
    let Some(snapshot) = history.cache().get(presentation.index) else {
        return;
    };

    let baseline = match presentation.baseline {
        Baseline::Predecessor { local_number, .. } => format!("against #{}", local_number),
        Baseline::Initial => "initial revision".to_string(),
        Baseline::NotLoaded => "against unknown baseline".to_string(),
    };

    println!(
        "#{} {:?} {} by {} ({}) +{} -{}",
        presentation.local_number,
        snapshot.revision_type,
        snapshot.revision_date.format("%Y-%m-%d %H:%M:%S"),
        snapshot.auditor.as_deref().unwrap_or("unknown"),
        baseline,
        presentation.stats.added_count,
        presentation.stats.removed_count,
    );
    print_note_diff(&presentation.diff);
    if presentation.blank_lines_only {
        println!("  content: blank lines only");
    }
    println!();
}

fn print_current(comparison: &CurrentComparison) {
    match comparison.baseline_number {
        Some(number) => println!("Current note against #{}", number),
        None => println!("Current note"),
    }
    if comparison.diff.has_changes() {
        print_note_diff(&comparison.diff);
    } else if comparison.blank_lines_only {
        println!("  content: blank lines only");
    } else {
        println!("  no unsaved changes");
    }
    println!();
}

fn print_note_diff(diff: &NoteDiff) {
    if let FieldDiff::Changed(ops) = &diff.title {
        println!("  title:   {}", render_words(ops));
    }
    if let FieldDiff::Changed(ops) = &diff.content {
        println!("  content: {}", render_words(ops));
    }
    if let FieldDiff::Changed(change) = &diff.color {
        let show = |color: &Option<String>| color.clone().unwrap_or_else(|| "none".to_string());
        match change {
            ValueChange::Added { new } => println!("  color:   {}", show(new)),
            ValueChange::Replaced { old, new } => {
                println!("  color:   {} -> {}", show(old), show(new))
            }
        }
    }
    if let FieldDiff::Changed(change) = &diff.pinned {
        match change {
            ValueChange::Added { new } => println!("  pinned:  {}", new),
            ValueChange::Replaced { old, new } => println!("  pinned:  {} -> {}", old, new),
        }
    }
    if let FieldDiff::Changed(tags) = &diff.tags {
        let added: Vec<_> = tags.added.iter().map(|t| format!("+{}", t)).collect();
        let removed: Vec<_> = tags.removed.iter().map(|t| format!("-{}", t)).collect();
        println!("  tags:    {}", [added, removed].concat().join(" "));
    }
}

fn render_words(ops: &[EditOp]) -> String {
    ops.iter()
        .map(|op| match op.kind {
            EditKind::Equal => op.token.clone(),
            EditKind::Insert => format!("{{+{}+}}", op.token),
            EditKind::Delete => format!("[-{}-]", op.token),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
