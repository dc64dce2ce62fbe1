use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::materials::record::Record;
use crate::materials::source::RecordSource;

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// A key press event.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// A periodic tick for rendering.
    Tick,
    /// Terminal resize event.
    Resize(u16, u16),
    /// The module's records finished loading (or failed to).
    RecordsLoaded(Result<Vec<Record>>),
}

/// Async event handler that polls crossterm events and forwards them via a channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new EventHandler with the given tick rate.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::spawn(async move {
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    let forwarded = match event::read() {
                        Ok(CrosstermEvent::Key(key)) => Some(Event::Key(key)),
                        Ok(CrosstermEvent::Mouse(mouse)) => Some(Event::Mouse(mouse)),
                        Ok(CrosstermEvent::Resize(w, h)) => Some(Event::Resize(w, h)),
                        _ => None,
                    };
                    if let Some(ev) = forwarded {
                        if event_tx.send(ev).is_err() {
                            break;
                        }
                    }
                } else if event_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx, tx }
    }

    /// Get a sender clone for async tasks to report back to the event loop.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Receive the next event (blocks until available).
    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| crate::error::AppError::Terminal("Event channel closed".into()))
    }
}

/// Fetch a module's records on a background task and post the result.
///
/// If the receiver is gone (view torn down), the result is dropped.
pub fn spawn_fetch<S>(source: S, module: String, tx: mpsc::UnboundedSender<Event>)
where
    S: RecordSource + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let result = source.fetch_records(&module).await;
        if let Err(ref e) = result {
            tracing::warn!(module = %module, error = %e, "record fetch failed");
        }
        let _ = tx.send(Event::RecordsLoaded(result));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::materials::source::ModuleInfo;

    struct FixedSource(Vec<Record>);

    impl RecordSource for FixedSource {
        async fn modules(&self) -> Result<Vec<ModuleInfo>> {
            Ok(Vec::new())
        }

        async fn fetch_records(&self, module: &str) -> Result<Vec<Record>> {
            if module == "missing" {
                return Err(AppError::UnknownModule(module.to_string()));
            }
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn fetch_posts_records() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_fetch(
            FixedSource(vec![Record::new("1", "a.pdf")]),
            "m".into(),
            tx,
        );
        match rx.recv().await {
            Some(Event::RecordsLoaded(Ok(records))) => assert_eq!(records.len(), 1),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn fetch_posts_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_fetch(FixedSource(Vec::new()), "missing".into(), tx);
        assert!(matches!(
            rx.recv().await,
            Some(Event::RecordsLoaded(Err(AppError::UnknownModule(_))))
        ));
    }

    #[tokio::test]
    async fn fetch_with_dropped_receiver_does_not_panic() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        spawn_fetch(FixedSource(Vec::new()), "m".into(), tx);
        tokio::task::yield_now().await;
    }
}
