use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc,
    },
    thread,
};

use crate::{
    export::{
        sequence::{ExportRequest, RasterSequenceExporter},
        sink::{Blob, FrameSink},
    },
    foundation::error::{TideloopError, TideloopResult},
};

/// Runs exports on a background thread, at most one at a time.
///
/// While a job is in flight the trigger is disabled and [`ExportTrigger::spawn`] fails with
/// [`TideloopError::ExportBusy`]; it re-enables itself as soon as the job finishes, whether it
/// succeeded or not.
#[derive(Clone, Debug)]
pub struct ExportTrigger {
    exporter: RasterSequenceExporter,
    busy: Arc<AtomicBool>,
}

impl ExportTrigger {
    pub fn new(exporter: RasterSequenceExporter) -> Self {
        Self {
            exporter,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn spawn<S>(&self, request: ExportRequest, mut sink: S) -> TideloopResult<ExportHandle>
    where
        S: FrameSink + Send + 'static,
    {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(TideloopError::ExportBusy);
        }

        let guard = BusyGuard(Arc::clone(&self.busy));
        let exporter = self.exporter.clone();
        let (tx, rx) = mpsc::channel();
        let join = thread::Builder::new()
            .name("tideloop-export".to_string())
            .spawn(move || {
                let result = {
                    let _guard = guard;
                    exporter.export(&request, &mut sink)
                };
                if let Err(e) = &result {
                    tracing::error!(error = %e, "export failed");
                }
                let _ = tx.send(result);
            })
            .map_err(|e| TideloopError::export(format!("failed to spawn export thread: {e}")))?;

        Ok(ExportHandle {
            rx,
            join: Some(join),
            done: None,
        })
    }
}

struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Pending result of a spawned export.
#[derive(Debug)]
pub struct ExportHandle {
    rx: mpsc::Receiver<TideloopResult<Blob>>,
    join: Option<thread::JoinHandle<()>>,
    done: Option<TideloopResult<Blob>>,
}

impl ExportHandle {
    /// Non-blocking poll. Returns the terminal result once available.
    pub fn try_result(&mut self) -> Option<&TideloopResult<Blob>> {
        if self.done.is_none() {
            match self.rx.try_recv() {
                Ok(result) => self.finish(result),
                Err(mpsc::TryRecvError::Empty) => return None,
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.finish(Err(TideloopError::export("export thread exited without a result")))
                }
            }
        }
        self.done.as_ref()
    }

    /// Block until the export finishes.
    pub fn wait(mut self) -> TideloopResult<Blob> {
        if let Some(done) = self.done.take() {
            return done;
        }
        let result = self
            .rx
            .recv()
            .unwrap_or_else(|_| Err(TideloopError::export("export thread exited without a result")));
        self.finish(result);
        self.done
            .take()
            .unwrap_or_else(|| Err(TideloopError::export("export result missing")))
    }

    fn finish(&mut self, result: TideloopResult<Blob>) {
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
        self.done = Some(result);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/job.rs"]
mod tests;
