pub mod ffmpeg_snapshot;
pub mod ffprobe;

#[derive(thiserror::Error, Debug)]
pub enum MediaProcessingError {
    #[error("failed to call {bin}")]
    ErrorStarting {
        bin: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{bin} exited with non-zero code, media corrupt or unreadable")]
    ExitedWithError { bin: &'static str },
    #[error("{bin} exited by signal")]
    TerminatedBySignal { bin: &'static str },
    #[error("could not parse ffprobe output")]
    InvalidProbeOutput(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
