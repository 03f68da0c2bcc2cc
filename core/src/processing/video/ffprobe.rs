use std::process::Stdio;

use camino::Utf8Path as Path;
use serde::Deserialize;
use tokio::process::Command;
use tracing::instrument;

use super::MediaProcessingError;
use crate::model::VideoFile;

/// Inspect a media file and build a `VideoFile` for it, with resolution 0
/// for audio-only files.
#[instrument]
pub async fn probe_video_file(
    path: &Path,
    ffprobe_bin_path: Option<&Path>,
) -> Result<VideoFile, MediaProcessingError> {
    let ffprobe_result = Command::new(ffprobe_bin_path.unwrap_or(Path::new("ffprobe")))
        .args(["-v", "error", "-show_streams", "-of", "json=compact=1"])
        .arg(path)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| MediaProcessingError::ErrorStarting {
            bin: "ffprobe",
            source,
        })?
        .wait_with_output()
        .await?;
    match ffprobe_result.status.code() {
        Some(0) => {}
        Some(_) => return Err(MediaProcessingError::ExitedWithError { bin: "ffprobe" }),
        None => return Err(MediaProcessingError::TerminatedBySignal { bin: "ffprobe" }),
    }
    let resolution = parse_stream_resolution(&ffprobe_result.stdout)?;
    Ok(VideoFile {
        path: path.to_path_buf(),
        resolution,
    })
}

fn parse_stream_resolution(json: &[u8]) -> Result<i32, MediaProcessingError> {
    #[derive(Debug, Clone, Deserialize)]
    struct FFProbeStream {
        pub codec_type: String,
        pub height: Option<i64>,
    }
    #[derive(Debug, Clone, Deserialize)]
    struct FFProbeOutput {
        pub streams: Vec<FFProbeStream>,
    }

    let parsed: FFProbeOutput = serde_json::from_slice(json)?;
    let resolution = parsed
        .streams
        .iter()
        .find(|stream| stream.codec_type == "video")
        .and_then(|stream| stream.height)
        .unwrap_or(0);
    Ok(resolution as i32)
}

#[test]
fn ffprobe_output_parsed_correctly() {
    use claims::assert_ok;
    use pretty_assertions::assert_eq;

    let output_video_audio = r#"
{
    "streams": [
        { "index": 0, "codec_type": "video", "codec_name": "h264", "width": 1920, "height": 1080 },
        { "index": 1, "codec_type": "audio", "codec_name": "aac", "channels": 2 }
    ]
}
"#;
    let resolution = assert_ok!(parse_stream_resolution(output_video_audio.as_bytes()));
    assert_eq!(resolution, 1080);

    let output_audio_only = r#"
{
    "streams": [
        { "index": 0, "codec_type": "audio", "codec_name": "mp3", "channels": 2 }
    ]
}
"#;
    let resolution = assert_ok!(parse_stream_resolution(output_audio_only.as_bytes()));
    assert_eq!(resolution, 0);
}
