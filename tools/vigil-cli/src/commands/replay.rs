//! Replay a recorded frame stream through the attention engine.

use std::path::{Path, PathBuf};

use serde::Serialize;
use vigil_common::clock::format_timestamp_ms;
use vigil_common::config::AppConfig;
use vigil_fusion_core::pipeline::replay_frames;
use vigil_signal_model::frame::{parse_frames, FrameSignals};
use vigil_signal_model::score::{AttentionLevel, AttentionScore};
use vigil_signal_model::violation::{Severity, ViolationEvent, ViolationKind};

/// One line of `--json` output.
#[derive(Serialize)]
struct FrameReport<'a> {
    t: u64,
    score: &'a AttentionScore,
    violations: &'a [ViolationEvent],
}

pub fn run(
    config: &AppConfig,
    path: PathBuf,
    json: bool,
    limit: usize,
    violations_only: bool,
) -> anyhow::Result<()> {
    let frames = read_frames(&path)?;

    if frames.is_empty() {
        println!("No frames to replay.");
        return Ok(());
    }

    let report = replay_frames(config, &frames)
        .map_err(|e| anyhow::anyhow!("Failed to start session: {e}"))?;

    if json {
        for (frame, assessment) in frames.iter().zip(&report.assessments) {
            if violations_only && assessment.violations.is_empty() {
                continue;
            }
            let line = FrameReport {
                t: frame.t,
                score: &assessment.score,
                violations: &assessment.violations,
            };
            println!("{}", serde_json::to_string(&line)?);
        }
        return Ok(());
    }

    println!("Replaying {} frames from: {}", frames.len(), path.display());
    println!();
    println!(
        "{:>8}  {:>7}  {:>4} {:>4} {:>4} {:>4}  {}",
        "t (ms)", "overall", "gaze", "head", "face", "objs", "level"
    );
    for (frame, assessment) in frames.iter().zip(&report.assessments) {
        if violations_only && assessment.violations.is_empty() {
            continue;
        }
        let s = &assessment.score;
        println!(
            "{:>8}  {:>7}  {:>4} {:>4} {:>4} {:>4}  {}",
            frame.t, s.overall, s.gaze, s.head_pose, s.face_presence, s.objects, s.level
        );
        for v in &assessment.violations {
            println!("          ! [{}] {}: {}", v.severity, v.kind, v.description);
        }
    }

    let summary = &report.summary;
    println!();
    println!("Session summary:");
    println!("  Frames: {}", summary.frames);
    if let Some(mean) = summary.mean() {
        println!(
            "  Mean overall: {:.1} (gaze {:.1}, head {:.1}, face {:.1}, objects {:.1})",
            mean.overall, mean.gaze, mean.head_pose, mean.face_presence, mean.objects
        );
    }
    if let (Some(min), Some(max)) = (summary.min_overall, summary.max_overall) {
        println!("  Range: {min}..={max}");
    }
    for level in AttentionLevel::ALL {
        println!("  {:<10} {}", level.as_str(), summary.level_count(level));
    }

    println!();
    println!("Violations: {}", report.stats.total);
    for kind in ViolationKind::ALL {
        println!("  {:<22} {}", kind.as_str(), report.stats.kind_count(kind));
    }
    for severity in Severity::ALL {
        println!(
            "  {:<22} {}",
            severity.as_str(),
            report.stats.severity_count(severity)
        );
    }

    if limit > 0 && !report.violations.is_empty() {
        println!();
        println!("Most recent violations:");
        for v in report.violations.iter().take(limit) {
            println!(
                "  {}  {:<22} {:<6} {}",
                format_timestamp_ms(v.timestamp_ms),
                v.kind.as_str(),
                v.severity.as_str(),
                v.description
            );
        }
    }

    Ok(())
}

fn read_frames(path: &Path) -> anyhow::Result<Vec<FrameSignals>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read frames {}: {e}", path.display()))?;
    parse_frames(&content).map_err(|e| anyhow::anyhow!("Failed to parse frames: {e}"))
}
