//! Background preview rendering on a single dedicated thread.
//!
//! Every submission supersedes the previous one: the in-flight render is
//! cancelled, queued requests that are no longer the newest are skipped, and
//! only the newest request's outcome is ever handed back to the caller.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use biomap_world::BiomeLookup;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::{
    BiomeColorTable, CancelToken, PreviewError, PreviewRaster, RegionPreviewRenderer,
    ResolutionMode, WorldRegion,
};

/// Everything one render needs, captured once when the request is made.
#[derive(Clone)]
pub struct PreviewRequest {
    pub region: WorldRegion,
    pub mode: ResolutionMode,
    pub lookup: Arc<dyn BiomeLookup>,
    pub colors: Arc<BiomeColorTable>,
}

/// The result of the newest request. Cancelled renders never produce one.
#[derive(Debug)]
pub struct PreviewOutcome {
    /// Id returned by [`PreviewWorker::submit`] for this request.
    pub request_id: u64,
    pub region: WorldRegion,
    pub mode: ResolutionMode,
    /// The raster, or the lookup/color failure that aborted the render.
    pub result: Result<PreviewRaster, PreviewError>,
    /// Wall time spent rendering.
    pub elapsed: Duration,
}

/// Internal wrapper that carries the request, its id, and its cancellation flag.
struct QueuedRequest {
    id: u64,
    request: PreviewRequest,
    cancel: CancelToken,
}

/// Owns the preview thread and the channels to and from it.
pub struct PreviewWorker {
    /// Sender for queued requests; `None` after shutdown.
    task_sender: Option<Sender<QueuedRequest>>,
    /// Receiver for outcomes, drained by the caller.
    result_receiver: Receiver<PreviewOutcome>,
    /// Id of the newest submitted request (0 before the first one).
    latest: Arc<AtomicU64>,
    /// Cancellation flag of the newest request.
    current: Option<CancelToken>,
    handle: Option<JoinHandle<()>>,
}

impl PreviewWorker {
    /// Spawns the `biome-preview` thread rendering `size` x `size` previews.
    pub fn spawn(size: u32) -> std::io::Result<Self> {
        let (task_sender, task_receiver) = crossbeam_channel::unbounded::<QueuedRequest>();
        let (result_sender, result_receiver) = crossbeam_channel::unbounded::<PreviewOutcome>();
        let latest = Arc::new(AtomicU64::new(0));
        let renderer = RegionPreviewRenderer::new(size);

        let handle = {
            let latest = Arc::clone(&latest);
            std::thread::Builder::new()
                .name("biome-preview".into())
                .spawn(move || run(renderer, task_receiver, result_sender, latest))?
        };

        Ok(Self {
            task_sender: Some(task_sender),
            result_receiver,
            latest,
            current: None,
            handle: Some(handle),
        })
    }

    /// Queues a render, cancelling whatever was requested before.
    ///
    /// Returns the request id, or `None` if the worker has been shut down.
    pub fn submit(&mut self, request: PreviewRequest) -> Option<u64> {
        let sender = self.task_sender.as_ref()?;

        if let Some(previous) = self.current.take() {
            previous.cancel();
        }
        let id = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        let cancel = CancelToken::new();
        self.current = Some(cancel.clone());

        tracing::debug!(request_id = id, region = %request.region, mode = ?request.mode, "preview requested");
        if sender.send(QueuedRequest { id, request, cancel }).is_err() {
            tracing::warn!(request_id = id, "preview thread is gone");
            return None;
        }
        Some(id)
    }

    /// Cancels the newest request without replacing it.
    pub fn cancel(&mut self) {
        if let Some(current) = self.current.take() {
            current.cancel();
            // Bump the id so an outcome racing with this call is recognized as stale.
            self.latest.fetch_add(1, Ordering::AcqRel);
        }
    }

    /// Id of the newest request, or 0 if none was submitted.
    pub fn latest_request_id(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Collects finished outcomes without blocking. Stale ones are dropped.
    pub fn drain_results(&self) -> Vec<PreviewOutcome> {
        let mut results = Vec::new();
        while let Ok(outcome) = self.result_receiver.try_recv() {
            if self.is_current(&outcome) {
                results.push(outcome);
            }
        }
        results
    }

    /// Blocks until the newest request's outcome arrives or `timeout` elapses.
    pub fn wait_result(&self, timeout: Duration) -> Option<PreviewOutcome> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.result_receiver.recv_timeout(remaining) {
                Ok(outcome) if self.is_current(&outcome) => return Some(outcome),
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    fn is_current(&self, outcome: &PreviewOutcome) -> bool {
        let current = outcome.request_id == self.latest_request_id();
        if !current {
            tracing::debug!(request_id = outcome.request_id, "dropping stale preview");
        }
        current
    }

    /// Cancels the in-flight render and joins the thread.
    pub fn shutdown(&mut self) {
        if let Some(current) = self.current.take() {
            current.cancel();
        }
        // Dropping the sender closes the channel, causing the thread to exit.
        self.task_sender.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::error!("preview thread panicked");
        }
    }
}

impl Drop for PreviewWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Body of the preview thread.
fn run(
    renderer: RegionPreviewRenderer,
    tasks: Receiver<QueuedRequest>,
    results: Sender<PreviewOutcome>,
    latest: Arc<AtomicU64>,
) {
    while let Ok(mut task) = tasks.recv() {
        // Only the newest queued request is worth starting.
        while let Ok(newer) = tasks.try_recv() {
            tracing::trace!(request_id = task.id, "skipping superseded preview");
            task = newer;
        }
        let is_stale = |task: &QueuedRequest| {
            task.cancel.is_cancelled() || latest.load(Ordering::Acquire) != task.id
        };
        if is_stale(&task) {
            continue;
        }

        let start = Instant::now();
        let request = &task.request;
        let result = renderer.render_cancellable(
            &request.region,
            request.mode,
            request.lookup.as_ref(),
            &request.colors,
            &task.cancel,
        );
        let elapsed = start.elapsed();

        if matches!(result, Err(PreviewError::Cancelled)) || is_stale(&task) {
            tracing::debug!(request_id = task.id, "discarding superseded preview");
            continue;
        }
        match &result {
            Ok(_) => tracing::debug!(request_id = task.id, ?elapsed, "preview rendered"),
            Err(err) => tracing::warn!(request_id = task.id, "preview failed: {err}"),
        }

        let outcome = PreviewOutcome {
            request_id: task.id,
            region: request.region,
            mode: request.mode,
            result,
            elapsed,
        };
        if results.send(outcome).is_err() {
            break;
        }
    }
}

/// The preview currently on display.
///
/// Keeps showing the last good raster when a newer render fails, so a
/// transient lookup error never blanks the display.
#[derive(Debug, Default)]
pub struct PreviewSlot {
    raster: Option<PreviewRaster>,
    shown_request: u64,
    last_error: Option<PreviewError>,
}

impl PreviewSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an outcome. Returns `true` if the displayed raster changed.
    ///
    /// Outcomes older than the one on display are ignored.
    pub fn apply(&mut self, outcome: PreviewOutcome) -> bool {
        if outcome.request_id < self.shown_request {
            return false;
        }
        self.shown_request = outcome.request_id;
        match outcome.result {
            Ok(raster) => {
                self.raster = Some(raster);
                self.last_error = None;
                true
            }
            Err(err) => {
                self.last_error = Some(err);
                false
            }
        }
    }

    pub fn raster(&self) -> Option<&PreviewRaster> {
        self.raster.as_ref()
    }

    /// The failure of the most recent outcome, if it failed.
    pub fn last_error(&self) -> Option<&PreviewError> {
        self.last_error.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biomap_world::{BiomeId, LookupError};
    use image::Rgba;

    const PLAINS_GREEN: Rgba<u8> = Rgba([141, 179, 96, 255]);
    const DESERT_ORANGE: Rgba<u8> = Rgba([250, 148, 24, 255]);

    fn colors() -> Arc<BiomeColorTable> {
        Arc::new(
            BiomeColorTable::new(Some(Rgba([255, 0, 255, 255])))
                .with_color(BiomeId::PLAINS, PLAINS_GREEN)
                .with_color(BiomeId::DESERT, DESERT_ORANGE),
        )
    }

    fn constant(biome: BiomeId) -> Arc<dyn BiomeLookup> {
        Arc::new(move |_x: i64, _y: i64, _coarse: bool| -> Result<BiomeId, LookupError> {
            Ok(biome)
        })
    }

    fn request(lookup: Arc<dyn BiomeLookup>) -> PreviewRequest {
        PreviewRequest {
            region: WorldRegion::from_edges(0, 0, 64, 64).unwrap(),
            mode: ResolutionMode::Full,
            lookup,
            colors: colors(),
        }
    }

    /// A lookup that signals on its first call, then blocks until released.
    fn gated(biome: BiomeId) -> (Arc<dyn BiomeLookup>, Receiver<()>, Sender<()>) {
        let (started_tx, started_rx) = crossbeam_channel::bounded::<()>(1);
        let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(0);
        let lookup = move |_x: i64, _y: i64, _coarse: bool| -> Result<BiomeId, LookupError> {
            let _ = started_tx.try_send(());
            // Returns immediately once the release sender is dropped.
            let _ = release_rx.recv_timeout(Duration::from_secs(10));
            Ok(biome)
        };
        (Arc::new(lookup), started_rx, release_tx)
    }

    #[test]
    fn test_submitted_preview_is_delivered() {
        let mut worker = PreviewWorker::spawn(16).unwrap();
        let id = worker.submit(request(constant(BiomeId::PLAINS))).unwrap();

        let outcome = worker
            .wait_result(Duration::from_secs(10))
            .expect("preview should arrive");
        assert_eq!(outcome.request_id, id);
        let raster = outcome.result.unwrap();
        assert_eq!(raster.width(), 16);
        assert_eq!(raster.pixel(8, 8), PLAINS_GREEN);
    }

    #[test]
    fn test_newer_request_supersedes_in_flight_one() {
        let mut worker = PreviewWorker::spawn(16).unwrap();

        let (slow, started, release) = gated(BiomeId::PLAINS);
        let first = worker.submit(request(slow)).unwrap();
        started
            .recv_timeout(Duration::from_secs(10))
            .expect("first render should start");

        let second = worker.submit(request(constant(BiomeId::DESERT))).unwrap();
        assert!(second > first);
        drop(release);

        let outcome = worker
            .wait_result(Duration::from_secs(10))
            .expect("newest preview should arrive");
        assert_eq!(outcome.request_id, second);
        assert_eq!(outcome.result.unwrap().pixel(0, 0), DESERT_ORANGE);

        // The superseded render must not have been sent at all.
        std::thread::sleep(Duration::from_millis(100));
        assert!(worker.result_receiver.try_recv().is_err());
    }

    #[test]
    fn test_burst_of_requests_delivers_only_the_last() {
        let mut worker = PreviewWorker::spawn(32).unwrap();
        let mut last = 0;
        for i in 0..20 {
            let biome = if i % 2 == 0 {
                BiomeId::PLAINS
            } else {
                BiomeId::DESERT
            };
            last = worker.submit(request(constant(biome))).unwrap();
        }

        let outcome = worker.wait_result(Duration::from_secs(10)).unwrap();
        assert_eq!(outcome.request_id, last);
        assert_eq!(outcome.result.unwrap().pixel(3, 3), DESERT_ORANGE);

        std::thread::sleep(Duration::from_millis(100));
        assert!(worker.drain_results().is_empty());
    }

    #[test]
    fn test_failed_render_is_delivered_as_error() {
        let mut worker = PreviewWorker::spawn(16).unwrap();
        let failing: Arc<dyn BiomeLookup> = Arc::new(
            |x: i64, y: i64, _coarse: bool| -> Result<BiomeId, LookupError> {
                Err(LookupError::Unavailable {
                    x,
                    y,
                    reason: "chunk not generated".into(),
                })
            },
        );
        worker.submit(request(failing)).unwrap();

        let outcome = worker.wait_result(Duration::from_secs(10)).unwrap();
        assert!(matches!(
            outcome.result,
            Err(PreviewError::LookupUnavailable { x: 0, y: 0, .. })
        ));
    }

    #[test]
    fn test_cancel_discards_in_flight_render() {
        let mut worker = PreviewWorker::spawn(16).unwrap();
        let (slow, started, release) = gated(BiomeId::PLAINS);
        worker.submit(request(slow)).unwrap();
        started.recv_timeout(Duration::from_secs(10)).unwrap();

        worker.cancel();
        drop(release);

        assert!(worker.wait_result(Duration::from_millis(300)).is_none());
    }

    #[test]
    fn test_submit_after_shutdown_is_rejected() {
        let mut worker = PreviewWorker::spawn(8).unwrap();
        worker.shutdown();
        assert!(worker.submit(request(constant(BiomeId::PLAINS))).is_none());
    }

    #[test]
    fn test_slot_keeps_last_good_raster_on_failure() {
        let renderer = RegionPreviewRenderer::new(8);
        let region = WorldRegion::from_edges(0, 0, 8, 8).unwrap();
        let good = renderer
            .render(&region, ResolutionMode::Full, constant(BiomeId::PLAINS).as_ref(), &colors())
            .unwrap();

        let mut slot = PreviewSlot::new();
        assert!(slot.apply(PreviewOutcome {
            request_id: 1,
            region,
            mode: ResolutionMode::Full,
            result: Ok(good.clone()),
            elapsed: Duration::ZERO,
        }));
        assert!(!slot.apply(PreviewOutcome {
            request_id: 2,
            region,
            mode: ResolutionMode::Full,
            result: Err(PreviewError::LookupUnavailable {
                x: 0,
                y: 0,
                reason: "offline".into(),
            }),
            elapsed: Duration::ZERO,
        }));

        assert_eq!(slot.raster(), Some(&good));
        assert!(slot.last_error().is_some());
    }

    #[test]
    fn test_slot_ignores_older_outcomes() {
        let mut slot = PreviewSlot::new();
        let region = WorldRegion::from_edges(0, 0, 8, 8).unwrap();
        let outcome = |id| PreviewOutcome {
            request_id: id,
            region,
            mode: ResolutionMode::Full,
            result: Ok(PreviewRaster::transparent(id as u32, id as u32)),
            elapsed: Duration::ZERO,
        };
        assert!(slot.apply(outcome(5)));
        assert!(!slot.apply(outcome(3)));
        assert_eq!(slot.raster().map(PreviewRaster::width), Some(5));
    }
}
