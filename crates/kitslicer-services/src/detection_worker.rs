//! Background slice detection for long buffers
//!
//! Jobs carry an immutable snapshot of the audio. The worker coalesces queued
//! jobs and only runs the newest; results from superseded jobs are dropped on
//! the receiving side by generation number.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use kitslicer_core::{AudioSamples, DetectionSettings, SliceSet};
use tracing::{debug, info};

use crate::error::ServiceError;

const WORKER_THREAD_NAME: &str = "kitslicer-detect";

pub struct DetectionJob {
    pub generation: u64,
    pub audio: Arc<AudioSamples>,
    pub settings: DetectionSettings,
    pub kit_prefix: String,
}

#[derive(Debug)]
pub struct DetectionResult {
    pub generation: u64,
    pub settings: DetectionSettings,
    pub slices: SliceSet,
}

pub struct DetectionWorker {
    job_tx: Option<Sender<DetectionJob>>,
    result_rx: Receiver<DetectionResult>,
    handle: Option<JoinHandle<()>>,
    latest_generation: u64,
}

impl DetectionWorker {
    /// Start the worker thread. Fails with `ServiceError::Io` if the thread
    /// cannot be created.
    pub fn spawn() -> Result<Self, ServiceError> {
        let (job_tx, job_rx) = unbounded::<DetectionJob>();
        let (result_tx, result_rx) = unbounded::<DetectionResult>();

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.into())
            .spawn(move || Self::run(job_rx, result_tx))?;
        info!("Detection worker spawned");

        Ok(Self {
            job_tx: Some(job_tx),
            result_rx,
            handle: Some(handle),
            latest_generation: 0,
        })
    }

    fn run(job_rx: Receiver<DetectionJob>, result_tx: Sender<DetectionResult>) {
        while let Ok(mut job) = job_rx.recv() {
            while let Ok(newer) = job_rx.try_recv() {
                job = newer;
            }

            let mut slices = SliceSet::new(job.kit_prefix);
            slices.detect_all(&job.audio, job.settings);
            debug!(generation = job.generation, slices = slices.len(), "Detection job finished");

            let result = DetectionResult {
                generation: job.generation,
                settings: job.settings,
                slices,
            };
            if result_tx.send(result).is_err() {
                break;
            }
        }
    }

    /// Queue a detection pass. Returns the job's generation.
    pub fn submit(
        &mut self,
        audio: Arc<AudioSamples>,
        settings: DetectionSettings,
        kit_prefix: impl Into<String>,
    ) -> Result<u64, ServiceError> {
        let tx = self.job_tx.as_ref().ok_or(ServiceError::WorkerClosed)?;
        self.latest_generation += 1;
        let job = DetectionJob {
            generation: self.latest_generation,
            audio,
            settings,
            kit_prefix: kit_prefix.into(),
        };
        tx.send(job).map_err(|_| ServiceError::WorkerClosed)?;
        Ok(self.latest_generation)
    }

    pub fn latest_generation(&self) -> u64 {
        self.latest_generation
    }

    /// Non-blocking: the result of the newest job, if it has arrived.
    pub fn try_result(&self) -> Option<DetectionResult> {
        let mut newest = None;
        while let Ok(result) = self.result_rx.try_recv() {
            if result.generation == self.latest_generation {
                newest = Some(result);
            }
        }
        newest
    }

    /// Block until the newest job's result arrives or `timeout` passes.
    pub fn wait_result(&self, timeout: Duration) -> Result<Option<DetectionResult>, ServiceError> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.result_rx.recv_timeout(remaining) {
                Ok(result) if result.generation == self.latest_generation => return Ok(Some(result)),
                Ok(stale) => debug!(generation = stale.generation, "Dropping stale detection result"),
                Err(RecvTimeoutError::Timeout) => return Ok(None),
                Err(RecvTimeoutError::Disconnected) => return Err(ServiceError::WorkerClosed),
            }
        }
    }
}

impl Drop for DetectionWorker {
    fn drop(&mut self) {
        self.job_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> Arc<AudioSamples> {
        let sr = 44100;
        let mut samples = vec![0.0_f32; sr as usize];
        for at in [0.2, 0.6] {
            let start = (at * sr as f64) as usize;
            for (n, s) in samples[start..start + 2000].iter_mut().enumerate() {
                *s = if n % 2 == 0 { 0.8 } else { -0.8 };
            }
        }
        Arc::new(AudioSamples::from_mono(samples, sr).unwrap())
    }

    #[test]
    fn test_worker_matches_inline_detection() {
        let audio = pattern();
        let settings = DetectionSettings::default();
        let mut worker = DetectionWorker::spawn().unwrap();
        let generation = worker.submit(Arc::clone(&audio), settings, "DK").unwrap();

        let result = worker.wait_result(Duration::from_secs(10)).unwrap().unwrap();
        assert_eq!(result.generation, generation);

        let mut inline = SliceSet::new("DK");
        inline.detect_all(&audio, settings);
        assert_eq!(result.slices.slices(), inline.slices());
        assert_eq!(result.slices.len(), 2);
    }

    #[test]
    fn test_spawn_reports_running_thread() {
        let worker = DetectionWorker::spawn().unwrap();
        let name = worker
            .handle
            .as_ref()
            .and_then(|h| h.thread().name().map(str::to_owned));
        assert_eq!(name.as_deref(), Some(WORKER_THREAD_NAME));
        assert_eq!(worker.latest_generation(), 0);
    }

    #[test]
    fn test_only_newest_result_is_returned() {
        let audio = pattern();
        let mut worker = DetectionWorker::spawn().unwrap();
        worker.submit(Arc::clone(&audio), DetectionSettings::new(0.1, 0.1), "A").unwrap();
        worker.submit(Arc::clone(&audio), DetectionSettings::new(0.2, 0.1), "B").unwrap();
        let last = worker.submit(Arc::clone(&audio), DetectionSettings::new(0.3, 0.1), "C").unwrap();

        let result = worker.wait_result(Duration::from_secs(10)).unwrap().unwrap();
        assert_eq!(result.generation, last);
        assert_eq!(result.slices.kit_prefix(), "C");
        assert!(worker.try_result().is_none());
    }
}
