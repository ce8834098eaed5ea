// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notification counter polling.
//!
//! The poller is a scheduled task owned by the view that shows the counter.
//! Dropping the poller (or calling [`NotificationPoller::shutdown`]) cancels
//! the task, including a request that is still in flight.

use crate::services::ApiClient;
use crate::session::token_store::TokenStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

pub struct NotificationPoller {
    count: watch::Receiver<u64>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl NotificationPoller {
    /// Start polling: one fetch right away, then one every `period`.
    ///
    /// Ticks without a token are skipped. A failed fetch publishes `0`.
    pub fn spawn(api: ApiClient, tokens: Arc<dyn TokenStore>, period: Duration) -> Self {
        let (tx, count) = watch::channel(0u64);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = task_cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let Some(token) = tokens.get_token() else {
                    tracing::debug!("No session token, skipping notification poll");
                    continue;
                };

                let result = tokio::select! {
                    biased;
                    _ = task_cancel.cancelled() => break,
                    result = api.notification_count(&token) => result,
                };

                match result {
                    Ok(n) => {
                        tx.send_replace(n);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Failed to fetch notification count");
                        tx.send_replace(0);
                    }
                }
            }

            tracing::debug!("Notification poller stopped");
        });

        Self {
            count,
            cancel,
            handle: Some(handle),
        }
    }

    /// Latest published count.
    pub fn count(&self) -> u64 {
        *self.count.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.count.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the task and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for NotificationPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
