//! Training-progress export
//!
//! Writes per-episode scores with a moving average to CSV so the learning
//! curve can be plotted with any external tool.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Moving-average window for a run of `episodes` episodes
///
/// A tenth of the run, capped at 100 and never below 2.
pub fn progress_window(episodes: usize) -> usize {
    (episodes / 10).clamp(2, 100)
}

/// Trailing moving average; `None` until `window` scores are available
pub fn moving_average(scores: &[usize], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    let mut running = 0usize;

    scores
        .iter()
        .enumerate()
        .map(|(i, &score)| {
            running += score;
            if i >= window {
                running -= scores[i - window];
            }
            (i + 1 >= window).then(|| running as f64 / window as f64)
        })
        .collect()
}

/// Write `episode,score,moving_average` rows for `scores`
pub fn write_progress_csv(path: &Path, scores: &[usize]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let file =
        File::create(path).with_context(|| format!("Failed to create progress file {:?}", path))?;
    let mut writer = BufWriter::new(file);

    let window = progress_window(scores.len());
    writeln!(writer, "episode,score,moving_average")?;

    for (episode, (score, avg)) in scores
        .iter()
        .zip(moving_average(scores, window))
        .enumerate()
    {
        match avg {
            Some(avg) => writeln!(writer, "{episode},{score},{avg:.3}")?,
            None => writeln!(writer, "{episode},{score},")?,
        }
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write progress file {:?}", path))?;

    Ok(())
}
