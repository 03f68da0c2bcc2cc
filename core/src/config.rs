use camino::{Utf8Path as Path, Utf8PathBuf as PathBuf};
use eyre::{Context, Result};
use serde::Deserialize;

use crate::model::Size;

/// Default dimensions for miniatures shown in listings.
pub const THUMBNAILS_SIZE: Size = Size {
    width: 223,
    height: 122,
};

/// Default dimensions for the large preview on a video's detail page.
pub const PREVIEWS_SIZE: Size = Size {
    width: 850,
    height: 480,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlStorage {
    pub thumbnails_dir: String,
    pub previews_dir: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlAssets {
    pub default_audio_background: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlBinPaths {
    pub ffmpeg: Option<String>,
    pub ffprobe: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlConfig {
    #[serde(rename = "Storage")]
    pub storage: TomlStorage,
    #[serde(rename = "Assets")]
    pub assets: TomlAssets,
    #[serde(rename = "BinPaths")]
    pub bin_paths: Option<TomlBinPaths>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Storage {
    pub thumbnails_dir: PathBuf,
    pub previews_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assets {
    pub default_audio_background: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BinPaths {
    pub ffmpeg: Option<PathBuf>,
    pub ffprobe: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub storage: Storage,
    pub assets: Assets,
    pub bin_paths: BinPaths,
}

pub async fn read_config(path: &Path) -> Result<Config> {
    let toml_str = tokio::fs::read_to_string(path)
        .await
        .context(format!("Error reading config file {}", path))?;
    let toml_config: TomlConfig = toml::from_str(&toml_str).context("Error parsing config file")?;
    let storage = Storage {
        thumbnails_dir: toml_config.storage.thumbnails_dir.into(),
        previews_dir: toml_config.storage.previews_dir.into(),
    };
    let assets = Assets {
        default_audio_background: toml_config.assets.default_audio_background.into(),
    };
    let bin_paths = toml_config
        .bin_paths
        .map(|bin_paths| BinPaths {
            ffmpeg: bin_paths.ffmpeg.map(PathBuf::from),
            ffprobe: bin_paths.ffprobe.map(PathBuf::from),
        })
        .unwrap_or_default();
    Ok(Config {
        storage,
        assets,
        bin_paths,
    })
}

#[test]
fn config_parsed_correctly() {
    use claims::assert_ok;
    use pretty_assertions::assert_eq;

    let toml_str = r#"
[Storage]
thumbnails_dir = "/data/thumbnails"
previews_dir = "/data/previews"

[Assets]
default_audio_background = "/opt/assets/audio-background.jpg"

[BinPaths]
ffmpeg = "/usr/bin/ffmpeg"
"#;
    let parsed: TomlConfig = assert_ok!(toml::from_str(toml_str));
    assert_eq!(
        parsed,
        TomlConfig {
            storage: TomlStorage {
                thumbnails_dir: "/data/thumbnails".into(),
                previews_dir: "/data/previews".into(),
            },
            assets: TomlAssets {
                default_audio_background: "/opt/assets/audio-background.jpg".into(),
            },
            bin_paths: Some(TomlBinPaths {
                ffmpeg: Some("/usr/bin/ffmpeg".into()),
                ffprobe: None,
            }),
        }
    );
}
