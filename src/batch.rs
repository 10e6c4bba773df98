//! Parallel analysis of a directory of charts.
//!
//! Chart paths are queued on a channel and drained by a pool of named worker
//! threads. Each worker runs the full pipeline on its own; only the
//! configuration is shared, read-only.

use crate::chart::{is_chart_file, load_chart};
use crate::config::AnalysisConfig;
use crate::difficulty::{ChartReport, calculate_difficulty};
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

/// Summary file written next to the analysis dumps.
pub const SUMMARY_FILE: &str = "difficulties_data.txt";
/// Directory receiving one moving-average dump per chart.
pub const ANALYSIS_DIR: &str = "analysis";

/// Outcome of one chart.
#[derive(Debug)]
pub struct ChartResult {
    pub name: String,
    pub path: PathBuf,
    pub outcome: Result<ChartReport, String>,
}

/// Number of workers to use when none is configured.
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Chart files directly inside `dir`, sorted by path.
pub fn collect_chart_paths(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_chart_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Loads and scores a single chart file.
pub fn analyze_file(path: &Path, config: &AnalysisConfig) -> Result<ChartReport, String> {
    let chart = load_chart(path)?;
    log::info!(
        "Analyzing {} ({} notes, {:.2}s, {:.2} nps)",
        chart.title,
        chart.notes.len(),
        chart.duration_secs(),
        chart.nps()
    );
    calculate_difficulty(&chart, config).map_err(|e| format!("{}: {}", chart.title, e))
}

fn chart_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn run_jobs(jobs: &Receiver<PathBuf>, results: &Sender<ChartResult>, config: &AnalysisConfig) {
    for path in jobs.iter() {
        let outcome = analyze_file(&path, config);
        let result = ChartResult {
            name: chart_name(&path),
            path,
            outcome,
        };
        if results.send(result).is_err() {
            log::error!("BATCH: Result channel closed, stopping worker");
            break;
        }
    }
}

/// Scores `paths` on `workers` threads. Results are sorted by chart name.
pub fn analyze_paths(
    paths: Vec<PathBuf>,
    config: Arc<AnalysisConfig>,
    workers: usize,
) -> Vec<ChartResult> {
    let (job_tx, job_rx) = unbounded();
    let (result_tx, result_rx) = unbounded();

    let total = paths.len();
    for path in paths {
        if let Err(e) = job_tx.send(path) {
            log::error!("BATCH: Failed to queue {:?}: {}", e.0, e);
        }
    }
    drop(job_tx);

    let mut handles = Vec::new();
    for i in 0..workers.clamp(1, total.max(1)) {
        let jobs = job_rx.clone();
        let results = result_tx.clone();
        let config = Arc::clone(&config);
        let spawned = thread::Builder::new()
            .name(format!("Analysis Worker {}", i))
            .spawn(move || run_jobs(&jobs, &results, &config));
        match spawned {
            Ok(handle) => handles.push(handle),
            Err(e) => log::error!("BATCH: Failed to spawn worker {}: {}", i, e),
        }
    }

    if handles.is_empty() {
        log::warn!("BATCH: No worker threads, analyzing on the current thread");
        run_jobs(&job_rx, &result_tx, &config);
    }
    drop(result_tx);

    let mut results: Vec<ChartResult> = result_rx.iter().collect();
    for handle in handles {
        if handle.join().is_err() {
            log::error!("BATCH: A worker panicked");
        }
    }

    if results.len() != total {
        log::warn!("BATCH: {} of {} charts produced a result", results.len(), total);
    }
    results.sort_by(|a, b| a.name.cmp(&b.name));
    results
}

/// Scores every chart in `dir`.
pub fn analyze_directory(
    dir: &Path,
    config: Arc<AnalysisConfig>,
    workers: usize,
) -> io::Result<Vec<ChartResult>> {
    let paths = collect_chart_paths(dir)?;
    log::info!("BATCH: {} charts found in {:?}", paths.len(), dir);
    Ok(analyze_paths(paths, config, workers))
}

/// Writes `name||weighted||weighting||difficulty` for every scored chart.
/// Failed charts are skipped.
pub fn write_summary<W: Write>(results: &[ChartResult], out: &mut W) -> io::Result<()> {
    for result in results {
        if let Ok(report) = &result.outcome {
            let score = &report.score;
            writeln!(
                out,
                "{}||{}||{}||{}",
                result.name, score.weighted_difficulty, score.weighting, score.difficulty
            )?;
        }
    }
    Ok(())
}

/// Writes the summary file and one moving-average dump per chart into `out_dir`.
pub fn write_outputs(results: &[ChartResult], out_dir: &Path) -> io::Result<()> {
    let analysis_dir = out_dir.join(ANALYSIS_DIR);
    fs::create_dir_all(&analysis_dir)?;

    let mut summary = fs::File::create(out_dir.join(SUMMARY_FILE))?;
    write_summary(results, &mut summary)?;

    for result in results {
        if let Ok(report) = &result.outcome {
            let mut dump = fs::File::create(analysis_dir.join(format!("{}.txt", result.name)))?;
            report.write_moving_average(&mut dump)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn koreography(title: &str, lane_events: &[(u8, u64)]) -> String {
        let tracks: Vec<String> = [0u8, 1]
            .iter()
            .map(|&lane| {
                let events: Vec<String> = lane_events
                    .iter()
                    .filter(|(l, _)| *l == lane)
                    .map(|(_, t)| format!(r#"{{"mStartSample":{t},"mEndSample":{t}}}"#))
                    .collect();
                format!(
                    r#"{{"mEventID":"{}","mEventList":[{}]}}"#,
                    lane,
                    events.join(",")
                )
            })
            .collect();
        format!(
            r#"{{"{}":{{"value":{{"mSampleRate":44100,"mTracks":[{}]}}}}}}"#,
            title,
            tracks.join(",")
        )
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mapalyzr-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_analyze_directory_in_parallel() {
        let dir = scratch_dir("batch");
        let circles = [(0, 0), (0, 4410), (1, 8820), (1, 13230)];
        fs::write(dir.join("b_circles.json"), koreography("Circles", &circles)).unwrap();
        fs::write(dir.join("a_single.json"), koreography("Single", &[(0, 0)])).unwrap();
        fs::write(dir.join("notes.txt"), "not a chart").unwrap();

        let results =
            analyze_directory(&dir, Arc::new(AnalysisConfig::default()), 4).unwrap();
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a_single", "b_circles"]);
        assert!(results[0].outcome.is_err());
        assert!(results[1].outcome.is_ok());

        write_outputs(&results, &dir).unwrap();
        let summary = fs::read_to_string(dir.join(SUMMARY_FILE)).unwrap();
        assert_eq!(summary.lines().count(), 1);
        assert!(summary.starts_with("b_circles||"));
        assert!(dir.join(ANALYSIS_DIR).join("b_circles.txt").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_no_charts_no_results() {
        let results = analyze_paths(Vec::new(), Arc::new(AnalysisConfig::default()), 2);
        assert!(results.is_empty());
    }
}
