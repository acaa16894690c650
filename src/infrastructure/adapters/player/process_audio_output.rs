//! Process Audio Output - 通过外部播放器进程播放音频
//!
//! prepare 时用 symphonia 探测音频格式并写入临时文件，
//! play 时启动播放器进程（默认 mpv），取消时结束进程。

use async_trait::async_trait;
use dashmap::DashMap;
use std::io::Cursor;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::application::ports::{AudioOutputPort, ClipId, PlaybackEnd, PlaybackError};

/// 播放器配置
#[derive(Debug, Clone)]
pub struct ProcessAudioOutputConfig {
    /// 播放器可执行文件
    pub command: String,
    /// 参数模板，`{rate}` 替换为倍速，`{file}` 替换为音频路径（缺省时追加在末尾）
    pub args: Vec<String>,
    /// 临时音频文件目录
    pub temp_dir: PathBuf,
}

impl Default for ProcessAudioOutputConfig {
    fn default() -> Self {
        Self {
            command: "mpv".to_string(),
            args: vec![
                "--no-video".to_string(),
                "--really-quiet".to_string(),
                "--speed={rate}".to_string(),
                "{file}".to_string(),
            ],
            temp_dir: std::env::temp_dir(),
        }
    }
}

/// 已准备的音频
#[derive(Debug, Clone)]
struct PreparedClip {
    path: PathBuf,
    duration_ms: Option<u64>,
}

/// 外部进程音频输出
pub struct ProcessAudioOutput {
    config: ProcessAudioOutputConfig,
    clips: DashMap<u64, PreparedClip>,
    next_id: AtomicU64,
}

impl ProcessAudioOutput {
    pub fn new(config: ProcessAudioOutputConfig) -> Self {
        Self {
            config,
            clips: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// 当前未释放的音频数
    pub fn prepared_count(&self) -> usize {
        self.clips.len()
    }

    fn render_args(&self, rate: f32, file: &str) -> Vec<String> {
        let rate = format!("{:.2}", rate);
        let mut has_file = false;
        let mut args: Vec<String> = self
            .config
            .args
            .iter()
            .map(|arg| {
                has_file |= arg.contains("{file}");
                arg.replace("{rate}", &rate).replace("{file}", file)
            })
            .collect();
        if !has_file {
            args.push(file.to_string());
        }
        args
    }
}

/// 探测音频格式，返回时长（毫秒，若可知）
fn probe_audio(data: Vec<u8>, mime_type: &str) -> Result<Option<u64>, PlaybackError> {
    let cursor = Cursor::new(data);
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    hint.mime_type(mime_type);
    if mime_type == "audio/mpeg" {
        hint.with_extension("mp3");
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| PlaybackError::DecodeError(format!("Probe failed: {}", e)))?;

    let track = probed
        .format
        .default_track()
        .ok_or_else(|| PlaybackError::DecodeError("No audio track found".to_string()))?;

    let params = &track.codec_params;
    let duration_ms = match (params.n_frames, params.sample_rate) {
        (Some(frames), Some(rate)) if rate > 0 => Some(frames * 1000 / rate as u64),
        _ => None,
    };
    Ok(duration_ms)
}

#[async_trait]
impl AudioOutputPort for ProcessAudioOutput {
    async fn prepare(&self, audio: &[u8], mime_type: &str) -> Result<ClipId, PlaybackError> {
        if audio.is_empty() {
            return Err(PlaybackError::EmptyAudio);
        }

        let data = audio.to_vec();
        let mime = mime_type.to_string();
        let duration_ms = tokio::task::spawn_blocking(move || probe_audio(data, &mime))
            .await
            .map_err(|e| PlaybackError::DecodeError(e.to_string()))??;

        let path = self
            .config
            .temp_dir
            .join(format!("outloud-{}.mp3", Uuid::new_v4()));
        tokio::fs::write(&path, audio)
            .await
            .map_err(|e| PlaybackError::StartFailed(format!("Failed to write audio: {}", e)))?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.clips.insert(id, PreparedClip { path, duration_ms });

        tracing::debug!(clip = %ClipId(id), size = audio.len(), duration_ms = ?duration_ms, "Audio prepared");
        Ok(ClipId(id))
    }

    async fn play(
        &self,
        clip: ClipId,
        rate: f32,
        cancel: CancellationToken,
    ) -> Result<PlaybackEnd, PlaybackError> {
        let prepared = self
            .clips
            .get(&clip.0)
            .map(|entry| entry.value().clone())
            .ok_or(PlaybackError::UnknownClip(clip.0))?;

        let args = self.render_args(rate, &prepared.path.to_string_lossy());
        let mut child = Command::new(&self.config.command)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                PlaybackError::StartFailed(format!("{}: {}", self.config.command, e))
            })?;

        tracing::debug!(
            clip = %clip,
            rate,
            duration_ms = ?prepared.duration_ms,
            "Playback started"
        );

        let outcome = tokio::select! {
            status = child.wait() => Some(status),
            _ = cancel.cancelled() => None,
        };

        match outcome {
            Some(Ok(status)) if status.success() => Ok(PlaybackEnd::Completed),
            Some(Ok(status)) => Err(PlaybackError::PlaybackFailed(format!(
                "player exited with {}",
                status
            ))),
            Some(Err(e)) => Err(PlaybackError::PlaybackFailed(e.to_string())),
            None => {
                if let Err(e) = child.kill().await {
                    tracing::warn!(clip = %clip, error = %e, "Failed to stop player process");
                }
                tracing::debug!(clip = %clip, "Playback stopped");
                Ok(PlaybackEnd::Stopped)
            }
        }
    }

    async fn release(&self, clip: ClipId) {
        if let Some((_, prepared)) = self.clips.remove(&clip.0) {
            if let Err(e) = tokio::fs::remove_file(&prepared.path).await {
                tracing::debug!(clip = %clip, error = %e, "Failed to remove audio file");
            }
        }
    }
}
