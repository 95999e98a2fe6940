use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::animation::preset::progress_fraction;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::export::cancel::CancelToken;
use crate::export::progress::{ProgressEvent, ProgressKind, ProgressSink, percent_after_frame};
use crate::export::settings::ExportSettings;
use crate::export::state::{ExportJob, ExportState, frame_timestamp, total_frames};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{StippleError, StippleResult};
use crate::render::layout::{Placement, export_size};
use crate::render::pipeline::render_stipple_frame;
use crate::render::surface::CpuSurface;
use crate::source::FrameSource;
use crate::stipple::params::StippleParams;

/// Drives a [`FrameSource`] through the stipple pipeline into a [`FrameSink`], one frame at a
/// time.
///
/// Each frame is seeked to its exact timestamp, rendered once the source reports it decoded (or
/// after a bounded wait), handed to the sink and then paced to the output frame rate. The render
/// surface is kept between exports and only reallocated when the output size changes.
#[derive(Debug, Default)]
pub struct FrameExporter {
    surface: Option<CpuSurface>,
    last_job: Option<ExportJob>,
}

impl FrameExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The job from the most recent [`FrameExporter::export`] call, in its final state.
    pub fn last_job(&self) -> Option<&ExportJob> {
        self.last_job.as_ref()
    }

    /// Run one export to completion.
    ///
    /// Configuration problems (bad fps, duration or size) are returned before anything is
    /// emitted. After the `Start` event every outcome ends with exactly one `Complete`, `Failed`
    /// or `Cancelled` event; on failure or cancellation the sink is aborted.
    #[tracing::instrument(
        skip_all,
        fields(fps = settings.fps, preset = ?settings.preset, resolution = %settings.resolution)
    )]
    pub async fn export<S, K, P>(
        &mut self,
        source: &mut S,
        sink: &mut K,
        base: StippleParams,
        settings: &ExportSettings,
        progress: &mut P,
        cancel: &CancelToken,
    ) -> StippleResult<K::Output>
    where
        S: FrameSource,
        K: FrameSink,
        P: ProgressSink,
    {
        let fps = settings.fps()?;
        let info = source.info();
        if !info.duration_sec.is_finite() || info.duration_sec < 0.0 {
            return Err(StippleError::configuration(format!(
                "source duration {} is not usable",
                info.duration_sec
            )));
        }
        let duration = settings.duration_sec.unwrap_or(info.duration_sec);
        if !duration.is_finite() || duration < 0.0 {
            return Err(StippleError::configuration(format!(
                "export duration {duration} is not usable"
            )));
        }
        let size = export_size(info.size, settings.resolution)?;
        let total = settings
            .frame_count
            .unwrap_or_else(|| total_frames(duration, fps))
            .max(1);

        let mut surface = match self.surface.take() {
            Some(mut s) => {
                s.ensure_size(size)?;
                s
            }
            None => CpuSurface::new(size)?,
        };

        let mut job = ExportJob::new(info.duration_sec, fps, total, size);
        tracing::info!(
            frames = total,
            width = size.width,
            height = size.height,
            "export started"
        );
        progress.emit(ProgressEvent::new(ProgressKind::Start, 0));

        let result = run_frames(
            &mut job,
            &mut surface,
            source,
            sink,
            base,
            settings,
            progress,
            cancel,
        )
        .await;
        self.surface = Some(surface);

        let result = match result {
            Ok(out) => {
                progress.emit(ProgressEvent::new(ProgressKind::Complete, 100));
                tracing::info!(frames = total, "export complete");
                Ok(out)
            }
            Err(e) if e.is_cancelled() => {
                sink.abort();
                let _ = job.transition(ExportState::Cancelled);
                progress.emit(ProgressEvent::new(
                    ProgressKind::Cancelled,
                    percent_done(&job),
                ));
                tracing::info!(frame = job.current_frame, "export cancelled");
                Err(e)
            }
            Err(e) => {
                sink.abort();
                let _ = job.transition(ExportState::Failed);
                progress.emit(ProgressEvent::new(ProgressKind::Failed, percent_done(&job)));
                tracing::error!(frame = job.current_frame, error = %e, "export failed");
                Err(e)
            }
        };
        self.last_job = Some(job);
        result
    }
}

fn percent_done(job: &ExportJob) -> u8 {
    if job.current_frame == 0 {
        0
    } else {
        percent_after_frame(job.current_frame - 1, job.total_frames)
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_frames<S, K, P>(
    job: &mut ExportJob,
    surface: &mut CpuSurface,
    source: &mut S,
    sink: &mut K,
    base: StippleParams,
    settings: &ExportSettings,
    progress: &mut P,
    cancel: &CancelToken,
) -> StippleResult<K::Output>
where
    S: FrameSource,
    K: FrameSink,
    P: ProgressSink,
{
    cancel.check()?;
    sink.begin(SinkConfig {
        width: job.size.width,
        height: job.size.height,
        fps: job.fps,
    })?;

    let mut rng = StdRng::seed_from_u64(settings.seed);
    let placement = Placement::full(job.size);
    let pace = Duration::from_millis(job.fps.frame_delay_ms());

    for index in 0..job.total_frames {
        job.current_frame = index;
        let t = frame_timestamp(index, job.fps, job.source_duration_sec);

        job.transition(ExportState::Seeking)?;
        seek(source, t, settings.seek_timeout(), cancel).await?;

        job.transition(ExportState::AwaitingDecode)?;
        await_decode(source, settings, cancel).await?;

        job.transition(ExportState::Rendering)?;
        let params = settings
            .preset
            .apply(base, progress_fraction(index, job.total_frames));
        let icons = {
            let pixels = source.current_frame()?;
            render_stipple_frame(surface, &pixels, placement, params, &mut rng)?
        };
        let frame = surface.snapshot()?;
        sink.push_frame(FrameIndex(index), &frame)?;
        tracing::debug!(frame = index, t, icons, "frame rendered");

        job.transition(ExportState::Pacing)?;
        if settings.pacing {
            cancel.sleep(pace).await?;
        } else {
            cancel.check()?;
        }
        job.current_frame = index + 1;
        progress.emit(ProgressEvent::new(
            ProgressKind::Progress,
            percent_after_frame(index, job.total_frames),
        ));
    }

    job.transition(ExportState::Finalizing)?;
    cancel.sleep(settings.flush_interval()).await?;
    let out = sink.end()?;
    job.transition(ExportState::Done)?;
    Ok(out)
}

async fn seek<S: FrameSource>(
    source: &mut S,
    t: f64,
    timeout: Duration,
    cancel: &CancelToken,
) -> StippleResult<()> {
    match tokio::time::timeout(timeout, cancel.run(source.seek(t))).await {
        Ok(acked) => acked?,
        Err(_) => {
            tracing::warn!(t, ?timeout, "seek not acknowledged in time; using best-effort pixels");
            Ok(())
        }
    }
}

async fn await_decode<S: FrameSource>(
    source: &mut S,
    settings: &ExportSettings,
    cancel: &CancelToken,
) -> StippleResult<()> {
    let timeout = settings.seek_timeout();
    match tokio::time::timeout(timeout, cancel.run(source.decoded())).await {
        Ok(notified) => {
            if let Some(decoded) = notified? {
                return decoded;
            }
        }
        Err(_) => {
            tracing::warn!(?timeout, "decode notification late; using best-effort pixels");
            return Ok(());
        }
    }

    let mut tries = 0;
    while !source.is_ready() && tries < settings.decode_poll_tries {
        cancel.sleep(settings.decode_poll_interval()).await?;
        tries += 1;
    }
    if !source.is_ready() {
        tracing::warn!(tries, "source not ready after polling; using best-effort pixels");
    }
    Ok(())
}
