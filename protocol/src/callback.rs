// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Serial delivery of call results.
//!
//! Calls made through one [`CallbackQueue`] run concurrently, but their
//! callbacks run one at a time, in the order the calls completed, on a
//! single worker task.

use log::debug;
use reqapi_core::{Error, Result};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A queue running callbacks one at a time.
#[derive(Clone, Debug)]
pub struct CallbackQueue {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    handle: Handle,
    tx: mpsc::UnboundedSender<Job>,
    close: Mutex<Option<oneshot::Sender<()>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl CallbackQueue {
    /// Start a queue on the current tokio runtime.
    pub fn new() -> Result<Self> {
        let handle = Handle::try_current().map_err(|e| {
            Error::config_invalid("callback queue requires a running tokio runtime").with_source(e)
        })?;

        let (tx, rx) = mpsc::unbounded_channel();
        let (close_tx, close_rx) = oneshot::channel();
        let worker = handle.spawn(run_worker(rx, close_rx));

        Ok(Self {
            inner: Arc::new(Inner {
                handle,
                tx,
                close: Mutex::new(Some(close_tx)),
                worker: Mutex::new(Some(worker)),
            }),
        })
    }

    /// Run `fut` and hand its output to `callback` on this queue.
    ///
    /// The returned handle can abort the call, in which case `callback`
    /// is never invoked.
    pub fn submit<F, C>(&self, fut: F, callback: C) -> CallHandle
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
        C: FnOnce(F::Output) + Send + 'static,
    {
        let aborted = Arc::new(AtomicBool::new(false));

        let tx = self.inner.tx.clone();
        let flag = aborted.clone();
        let task = self.inner.handle.spawn(async move {
            let output = fut.await;
            let job: Job = Box::new(move || {
                if !flag.load(Ordering::Acquire) {
                    callback(output)
                }
            });
            if tx.send(job).is_err() {
                debug!("callback queue is closed, result dropped");
            }
        });

        CallHandle { task, aborted }
    }

    /// Check if the queue stopped accepting callbacks.
    pub fn is_closed(&self) -> bool {
        self.inner.tx.is_closed()
    }

    /// Stop accepting callbacks and wait for the queued ones to run.
    ///
    /// Calls still in flight keep running, but their callbacks are dropped.
    /// Must not be awaited from inside a callback of the same queue.
    pub async fn shutdown(&self) {
        let close = self.inner.close.lock().ok().and_then(|mut v| v.take());
        if let Some(close) = close {
            let _ = close.send(());
        }

        let worker = self.inner.worker.lock().ok().and_then(|mut v| v.take());
        if let Some(worker) = worker {
            if let Err(err) = worker.await {
                debug!("callback worker stopped abnormally: {err}");
            }
        }
    }
}

async fn run_worker(mut rx: mpsc::UnboundedReceiver<Job>, mut close: oneshot::Receiver<()>) {
    loop {
        tokio::select! {
            job = rx.recv() => match job {
                Some(job) => job(),
                None => return,
            },
            // Dropping every queue handle counts as a close as well.
            _ = &mut close => break,
        }
    }

    rx.close();
    while let Some(job) = rx.recv().await {
        job();
    }
    debug!("callback queue drained");
}

/// Handle of a call submitted to a [`CallbackQueue`].
#[derive(Debug)]
pub struct CallHandle {
    task: JoinHandle<()>,
    aborted: Arc<AtomicBool>,
}

impl CallHandle {
    /// Abort the call. Its callback will not be invoked, unless it's
    /// already running.
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::Release);
        self.task.abort();
    }

    /// Check if the call completed (or was aborted).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait until the call completed and its result was queued.
    pub async fn wait(self) {
        let _ = self.task.await;
    }
}

/// A [`CallbackQueue`] created on first use, shared by every clone of a
/// client.
#[derive(Clone, Debug, Default)]
pub struct SharedQueue {
    queue: Arc<Mutex<Option<CallbackQueue>>>,
}

impl SharedQueue {
    /// Get the queue, starting a new one if there is none or the last one
    /// was shut down.
    pub fn get(&self) -> Result<CallbackQueue> {
        let mut guard = self
            .queue
            .lock()
            .map_err(|_| Error::unexpected("callback queue lock is poisoned"))?;

        match guard.as_ref() {
            Some(queue) if !queue.is_closed() => Ok(queue.clone()),
            _ => {
                let queue = CallbackQueue::new()?;
                *guard = Some(queue.clone());
                Ok(queue)
            }
        }
    }

    /// Shut the current queue down, if any.
    pub async fn close(&self) {
        let queue = self.queue.lock().ok().and_then(|mut v| v.take());
        if let Some(queue) = queue {
            queue.shutdown().await;
        }
    }
}
