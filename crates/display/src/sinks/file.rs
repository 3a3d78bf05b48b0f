//! FileSink - writes view frames to disk as PNG, one folder per stream

use contracts::{FrameSink, ImageFormat, ViewFrame, ViewerError};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Configuration for FileSink
#[derive(Debug, Clone)]
pub struct FileSinkConfig {
    /// Base output directory
    pub base_path: PathBuf,
}

impl FileSinkConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let base_path = params
            .get("base_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./output"));

        Self { base_path }
    }
}

/// Sink that writes each view frame as `<base>/<stream>/<frame_id>.png`
pub struct FileSink {
    name: String,
    config: FileSinkConfig,
    created_dirs: HashSet<PathBuf>,
    frames_written: u64,
}

impl FileSink {
    /// Create a new FileSink
    pub fn new(name: impl Into<String>, config: FileSinkConfig) -> Result<Self, ViewerError> {
        // Create base directory if it doesn't exist
        fs::create_dir_all(&config.base_path)?;

        Ok(Self {
            name: name.into(),
            config,
            created_dirs: HashSet::new(),
            frames_written: 0,
        })
    }

    /// Create from params map (for router construction)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, ViewerError> {
        let config = FileSinkConfig::from_params(params);
        Self::new(name, config)
    }

    fn write_png(&mut self, frame: &ViewFrame) -> Result<(), ViewerError> {
        let stream_dir = self.config.base_path.join(&frame.stream);
        if !self.created_dirs.contains(&stream_dir) {
            fs::create_dir_all(&stream_dir)?;
            self.created_dirs.insert(stream_dir.clone());
        }

        let path = stream_dir.join(format!("{}.png", frame.frame_id));
        let color = match frame.image.format {
            ImageFormat::Gray8 => image::ExtendedColorType::L8,
            ImageFormat::Rgb8 => image::ExtendedColorType::Rgb8,
        };
        image::save_buffer(
            &path,
            &frame.image.data,
            frame.image.width,
            frame.image.height,
            color,
        )
        .map_err(|e| ViewerError::sink_write(&self.name, format!("png encode: {e}")))?;

        self.frames_written += 1;
        Ok(())
    }
}

impl FrameSink for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_sink_write",
        skip(self, frame),
        fields(sink = %self.name, stream = %frame.stream, frame_id = frame.frame_id)
    )]
    async fn write(&mut self, frame: &ViewFrame) -> Result<(), ViewerError> {
        self.write_png(frame)
    }

    #[instrument(name = "file_sink_flush", skip(self))]
    async fn flush(&mut self) -> Result<(), ViewerError> {
        // save_buffer writes complete files; nothing buffered here
        Ok(())
    }

    #[instrument(name = "file_sink_close", skip(self))]
    async fn close(&mut self) -> Result<(), ViewerError> {
        debug!(
            sink = %self.name,
            frames = self.frames_written,
            base = %self.config.base_path.display(),
            "FileSink closed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use contracts::ImageData;

    fn gray_frame(stream: &str, frame_id: u64) -> ViewFrame {
        ViewFrame {
            stream: stream.to_string(),
            frame_id,
            timestamp: 0.0,
            image: ImageData {
                width: 2,
                height: 2,
                format: ImageFormat::Gray8,
                data: Bytes::from_static(&[0, 64, 128, 255]),
            },
        }
    }

    #[tokio::test]
    async fn test_writes_png_per_stream() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::new(
            "frames",
            FileSinkConfig {
                base_path: dir.path().to_path_buf(),
            },
        )
        .unwrap();

        sink.write(&gray_frame("depth", 1)).await.unwrap();
        sink.write(&gray_frame("segmented", 1)).await.unwrap();
        sink.write(&gray_frame("depth", 2)).await.unwrap();
        sink.close().await.unwrap();

        assert!(dir.path().join("depth/1.png").exists());
        assert!(dir.path().join("depth/2.png").exists());
        assert!(dir.path().join("segmented/1.png").exists());
    }

    #[tokio::test]
    async fn test_rgb_frame_roundtrips_through_png() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::new(
            "frames",
            FileSinkConfig {
                base_path: dir.path().to_path_buf(),
            },
        )
        .unwrap();

        let frame = ViewFrame {
            stream: "depth".to_string(),
            frame_id: 7,
            timestamp: 0.0,
            image: ImageData {
                width: 1,
                height: 1,
                format: ImageFormat::Rgb8,
                data: Bytes::from_static(&[10, 200, 30]),
            },
        };
        sink.write(&frame).await.unwrap();

        let img = image::open(dir.path().join("depth/7.png")).unwrap().to_rgb8();
        assert_eq!(img.get_pixel(0, 0).0, [10, 200, 30]);
    }

    #[test]
    fn test_from_params_default_path() {
        let config = FileSinkConfig::from_params(&HashMap::new());
        assert_eq!(config.base_path, PathBuf::from("./output"));
    }
}
