//! Application configuration.
//!
//! Every threshold the classifier and fusion engine use lives here as a
//! named, overridable field. Defaults reproduce the reference tuning.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{VigilError, VigilResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Per-frame pose classification thresholds.
    pub classifier: ClassifierConfig,

    /// Fusion engine tuning.
    pub engine: EngineConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Thresholds for turning pose angles and eye openness into a focus category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Pitch is clamped to `[-pitch_limit_deg, pitch_limit_deg]`.
    pub pitch_limit_deg: f64,
    /// Yaw is clamped to `[-yaw_limit_deg, yaw_limit_deg]`.
    pub yaw_limit_deg: f64,
    /// Roll is clamped to `[-roll_limit_deg, roll_limit_deg]`.
    pub roll_limit_deg: f64,

    /// `|yaw|` must be strictly below this to count as looking at the screen.
    pub screen_yaw_deg: f64,
    /// `|pitch|` must be strictly below this to count as looking at the screen.
    pub screen_pitch_deg: f64,

    /// `|yaw|` strictly above this classifies the frame as away.
    pub away_yaw_deg: f64,
    /// `|pitch|` strictly above this classifies the frame as away.
    pub away_pitch_deg: f64,

    /// Minimum eye openness (EAR) to count as looking at the screen.
    pub min_eye_openness: f64,
    /// Minimum eye openness (EAR) for a focused frame.
    pub focused_eye_openness: f64,
}

/// Fusion engine tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Capacity of the focus history FIFO (frames).
    pub history_capacity: usize,

    /// Number of most recent history entries the gaze score averages.
    pub gaze_window: usize,

    /// Consecutive non-focused frames before a prolonged distraction is raised.
    pub streak_threshold: u32,

    /// Reset the distraction streak after raising a prolonged distraction.
    ///
    /// Off by default: a sustained distraction keeps re-raising and the
    /// dedup window alone throttles the cadence.
    pub reset_streak_on_violation: bool,

    /// Same-kind violations closer than this are suppressed (milliseconds).
    pub dedup_window_ms: u64,

    /// How many of the newest log entries the dedup check scans.
    pub dedup_lookback: usize,

    /// Component weights for the overall score.
    pub weights: ScoreWeights,

    /// Lower bounds of the qualitative score bands.
    pub bands: LevelBands,

    /// Per-degree penalties for the head-pose component.
    pub head_pose_penalty: HeadPosePenalty,

    /// Face-presence score when more than one face is visible.
    pub multiple_faces_score: u8,

    /// Objects-score deduction per prohibited detection.
    pub object_penalty: u8,

    /// Labels (case-insensitive substrings) that mark a detection as prohibited.
    pub prohibited_items: Vec<String>,
}

/// Component weights for the overall attention score. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub gaze: f64,
    pub head_pose: f64,
    pub face_presence: f64,
    pub objects: f64,
}

/// Inclusive lower bounds of each attention level band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelBands {
    pub excellent: u8,
    pub good: u8,
    pub fair: u8,
    pub poor: u8,
}

/// Score lost per degree of deviation on each head-pose axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadPosePenalty {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "vigil_fusion_core=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            pitch_limit_deg: 30.0,
            yaw_limit_deg: 45.0,
            roll_limit_deg: 20.0,
            screen_yaw_deg: 20.0,
            screen_pitch_deg: 15.0,
            away_yaw_deg: 35.0,
            away_pitch_deg: 25.0,
            min_eye_openness: 0.15,
            focused_eye_openness: 0.20,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: 30,
            gaze_window: 10,
            streak_threshold: 10,
            reset_streak_on_violation: false,
            dedup_window_ms: 2000,
            dedup_lookback: 5,
            weights: ScoreWeights::default(),
            bands: LevelBands::default(),
            head_pose_penalty: HeadPosePenalty::default(),
            multiple_faces_score: 30,
            object_penalty: 30,
            prohibited_items: default_prohibited_items(),
        }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            gaze: 0.35,
            head_pose: 0.25,
            face_presence: 0.25,
            objects: 0.15,
        }
    }
}

impl Default for LevelBands {
    fn default() -> Self {
        Self {
            excellent: 90,
            good: 75,
            fair: 60,
            poor: 40,
        }
    }
}

impl Default for HeadPosePenalty {
    fn default() -> Self {
        Self {
            yaw: 2.5,
            pitch: 3.33,
            roll: 5.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

fn default_prohibited_items() -> Vec<String> {
    [
        "cell phone",
        "phone",
        "book",
        "laptop",
        "tablet",
        "remote",
        "headphones",
        "earphones",
        "calculator",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl ClassifierConfig {
    /// Reject thresholds that would make classification meaningless.
    pub fn validate(&self) -> VigilResult<()> {
        let angles = [
            ("pitch_limit_deg", self.pitch_limit_deg),
            ("yaw_limit_deg", self.yaw_limit_deg),
            ("roll_limit_deg", self.roll_limit_deg),
            ("screen_yaw_deg", self.screen_yaw_deg),
            ("screen_pitch_deg", self.screen_pitch_deg),
            ("away_yaw_deg", self.away_yaw_deg),
            ("away_pitch_deg", self.away_pitch_deg),
            ("min_eye_openness", self.min_eye_openness),
            ("focused_eye_openness", self.focused_eye_openness),
        ];
        for (name, value) in angles {
            if !value.is_finite() || value < 0.0 {
                return Err(VigilError::config(format!(
                    "classifier.{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }
        Ok(())
    }
}

impl EngineConfig {
    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> VigilResult<()> {
        if self.history_capacity == 0 {
            return Err(VigilError::config(
                "engine.history_capacity must be at least 1",
            ));
        }
        if self.gaze_window == 0 {
            return Err(VigilError::config("engine.gaze_window must be at least 1"));
        }
        if self.gaze_window > self.history_capacity {
            return Err(VigilError::config(format!(
                "engine.gaze_window ({}) cannot exceed engine.history_capacity ({})",
                self.gaze_window, self.history_capacity
            )));
        }
        if self.streak_threshold == 0 {
            return Err(VigilError::config(
                "engine.streak_threshold must be at least 1",
            ));
        }
        if self.dedup_lookback == 0 {
            return Err(VigilError::config(
                "engine.dedup_lookback must be at least 1",
            ));
        }
        if self.multiple_faces_score > 100 {
            return Err(VigilError::config(
                "engine.multiple_faces_score must be within [0, 100]",
            ));
        }
        if self.object_penalty > 100 {
            return Err(VigilError::config(
                "engine.object_penalty must be within [0, 100]",
            ));
        }
        if self.prohibited_items.iter().any(|item| item.trim().is_empty()) {
            return Err(VigilError::config(
                "engine.prohibited_items cannot contain empty labels",
            ));
        }
        self.weights.validate()?;
        self.bands.validate()?;
        self.head_pose_penalty.validate()
    }
}

impl ScoreWeights {
    /// Sum of all four weights.
    pub fn total(&self) -> f64 {
        self.gaze + self.head_pose + self.face_presence + self.objects
    }

    pub fn validate(&self) -> VigilResult<()> {
        let weights = [
            ("gaze", self.gaze),
            ("head_pose", self.head_pose),
            ("face_presence", self.face_presence),
            ("objects", self.objects),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(VigilError::config(format!(
                    "engine.weights.{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }
        let total = self.total();
        if (total - 1.0).abs() > 1e-6 {
            return Err(VigilError::config(format!(
                "engine.weights must sum to 1.0 (got {total})"
            )));
        }
        Ok(())
    }
}

impl LevelBands {
    pub fn validate(&self) -> VigilResult<()> {
        if self.excellent > 100 {
            return Err(VigilError::config(
                "engine.bands.excellent must be at most 100",
            ));
        }
        if !(self.excellent > self.good && self.good > self.fair && self.fair > self.poor) {
            return Err(VigilError::config(format!(
                "engine.bands must be strictly descending (got {}/{}/{}/{})",
                self.excellent, self.good, self.fair, self.poor
            )));
        }
        Ok(())
    }
}

impl HeadPosePenalty {
    pub fn validate(&self) -> VigilResult<()> {
        let penalties = [
            ("yaw", self.yaw),
            ("pitch", self.pitch),
            ("roll", self.roll),
        ];
        for (name, value) in penalties {
            if !value.is_finite() || value < 0.0 {
                return Err(VigilError::config(format!(
                    "engine.head_pose_penalty.{name} must be finite and non-negative (got {value})"
                )));
            }
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> VigilResult<Self> {
        if !path.exists() {
            return Err(VigilError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> VigilResult<()> {
        self.classifier.validate()?;
        self.engine.validate()
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> VigilResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("vigil").join("config.json")
}
