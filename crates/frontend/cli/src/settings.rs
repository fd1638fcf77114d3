use bbg_earthbound::SceneConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default = "default_frames")]
    pub frames: usize,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

fn default_frames() -> usize {
    1
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("frames")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scene: SceneConfig::default(),
            frames: default_frames(),
            out_dir: default_out_dir(),
        }
    }
}

impl Settings {
    /// Get the config file path relative to the executable
    pub fn config_path() -> PathBuf {
        let mut path = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));
        path.push("battlebg.json");
        path
    }

    /// Load settings from `path`, falling back to defaults on error
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                log::warn!(
                    "Failed to parse {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }),
            // File doesn't exist or can't be read, use defaults
            Err(_) => Self::default(),
        }
    }

    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbg_earthbound::AspectRatio;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.scene.layer1, 219);
        assert_eq!(settings.scene.layer2, 218);
        assert_eq!(settings.frames, 1);
        assert_eq!(settings.out_dir, PathBuf::from("frames"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings = Settings::parse(
            r#"{"scene": {"layer1": 10, "layer2": 0, "aspect_ratio": "narrow"}, "frames": 30}"#,
        )
        .expect("valid settings");
        assert_eq!(settings.scene.layer1, 10);
        assert_eq!(settings.scene.aspect_ratio, AspectRatio::Narrow);
        assert_eq!(settings.scene.frame_skip, 1);
        assert_eq!(settings.frames, 30);
        assert_eq!(settings.out_dir, PathBuf::from("frames"));
    }

    #[test]
    fn test_missing_or_malformed_file_uses_defaults() {
        let dir = std::env::temp_dir().join(format!("battlebg-settings-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir");

        assert_eq!(Settings::load(&dir.join("absent.json")), Settings::default());

        let broken = dir.join("broken.json");
        fs::write(&broken, "{ not json").expect("write");
        assert_eq!(Settings::load(&broken), Settings::default());

        let saved = dir.join("saved.json");
        let mut settings = Settings::default();
        settings.frames = 12;
        settings.save(&saved).expect("save");
        assert_eq!(Settings::load(&saved), settings);

        let _ = fs::remove_dir_all(&dir);
    }
}
