//! Classify a single head pose.

use vigil_common::config::AppConfig;
use vigil_fusion_core::classifier::SignalClassifier;

pub fn run(
    config: &AppConfig,
    pitch: f64,
    yaw: f64,
    roll: f64,
    eye_openness: f64,
) -> anyhow::Result<()> {
    let classifier = SignalClassifier::new(config.classifier.clone())
        .map_err(|e| anyhow::anyhow!("Invalid classifier configuration: {e}"))?;

    let sample = classifier.classify(pitch, yaw, roll, eye_openness);

    println!("Category: {}", sample.category);
    println!("  Looking at screen: {}", sample.looking_at_screen);
    println!(
        "  Pose (clamped): pitch {:.1}°, yaw {:.1}°, roll {:.1}°",
        sample.pitch, sample.yaw, sample.roll
    );
    println!("  Eye openness: {:.3}", sample.eye_openness);

    Ok(())
}
