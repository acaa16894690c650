//! 播放序列器
//!
//! 依次播放"增量音频"和"完整音频"，同一时刻最多只有一个活动序列。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::application::messages::AUDIO_MPEG;
use crate::application::ports::{AudioOutputPort, ClipId, PlaybackEnd, PlaybackError};

/// 默认播放倍速（放慢以便理解）
pub const DEFAULT_PLAYBACK_RATE: f32 = 0.75;

/// 正在进行的播放序列
struct ActiveSequence {
    id: u64,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// 播放序列器
pub struct PlaybackSequencer {
    output: Arc<dyn AudioOutputPort>,
    rate: f32,
    active: Mutex<Option<ActiveSequence>>,
    next_id: AtomicU64,
}

impl PlaybackSequencer {
    pub fn new(output: Arc<dyn AudioOutputPort>, rate: f32) -> Self {
        Self {
            output,
            rate,
            active: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// 播放增量音频，结束后若内容不同再播放完整音频
    ///
    /// 先停止并清理上一个序列；完整音频在开始播放前就已准备好。
    pub async fn play_sequence(
        &self,
        delta_audio: &[u8],
        full_audio: &[u8],
        same_content: bool,
    ) -> Result<(), PlaybackError> {
        let mut active = self.active.lock().await;
        Self::stop_active(&mut active).await;

        let delta_clip = self.output.prepare(delta_audio, AUDIO_MPEG).await?;
        let full_clip = if same_content {
            None
        } else {
            match self.output.prepare(full_audio, AUDIO_MPEG).await {
                Ok(clip) => Some(clip),
                Err(e) => {
                    self.output.release(delta_clip).await;
                    return Err(e);
                }
            }
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();

        tracing::debug!(
            sequence_id = id,
            delta_clip = %delta_clip,
            full_clip = ?full_clip.map(|c| c.to_string()),
            same_content = same_content,
            rate = self.rate,
            "Starting playback sequence"
        );

        let task = tokio::spawn(run_sequence(
            self.output.clone(),
            id,
            delta_clip,
            full_clip,
            self.rate,
            cancel.clone(),
        ));

        *active = Some(ActiveSequence { id, cancel, task });
        Ok(())
    }

    /// 停止播放并释放所有音频资源，没有活动序列时为空操作
    pub async fn stop(&self) {
        let mut active = self.active.lock().await;
        Self::stop_active(&mut active).await;
    }

    /// 是否有正在播放的序列
    pub async fn is_playing(&self) -> bool {
        self.active
            .lock()
            .await
            .as_ref()
            .map(|seq| !seq.task.is_finished())
            .unwrap_or(false)
    }

    async fn stop_active(slot: &mut Option<ActiveSequence>) {
        let Some(sequence) = slot.take() else {
            return;
        };

        let finished = sequence.task.is_finished();
        sequence.cancel.cancel();
        if let Err(e) = sequence.task.await {
            tracing::error!(sequence_id = sequence.id, error = %e, "Playback task panicked");
        }
        if !finished {
            tracing::info!(sequence_id = sequence.id, "Playback stopped");
        }
    }
}

/// 执行一次播放序列，结束时（无论成功、失败还是取消）释放所有资源
async fn run_sequence(
    output: Arc<dyn AudioOutputPort>,
    id: u64,
    delta_clip: ClipId,
    full_clip: Option<ClipId>,
    rate: f32,
    cancel: CancellationToken,
) {
    let delta_end = play_segment(output.as_ref(), id, delta_clip, rate, &cancel, "delta").await;

    if delta_end == Some(PlaybackEnd::Completed) {
        if let Some(full_clip) = full_clip {
            play_segment(output.as_ref(), id, full_clip, rate, &cancel, "full").await;
        }
    }

    output.release(delta_clip).await;
    if let Some(full_clip) = full_clip {
        output.release(full_clip).await;
    }

    tracing::debug!(sequence_id = id, "Playback sequence resources released");
}

/// 播放单个片段；失败只记录日志，不重试
async fn play_segment(
    output: &dyn AudioOutputPort,
    id: u64,
    clip: ClipId,
    rate: f32,
    cancel: &CancellationToken,
    segment: &'static str,
) -> Option<PlaybackEnd> {
    if cancel.is_cancelled() {
        return Some(PlaybackEnd::Stopped);
    }

    match output.play(clip, rate, cancel.clone()).await {
        Ok(end) => {
            tracing::debug!(sequence_id = id, segment = segment, end = ?end, "Segment finished");
            Some(end)
        }
        Err(e) => {
            tracing::error!(sequence_id = id, segment = segment, error = %e, "Failed to play audio");
            None
        }
    }
}
