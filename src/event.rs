use std::time::Duration;

use tokio::sync::mpsc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Tick,
    Shutdown,
}

/// Background task turning the refresh interval and Ctrl-C into events.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();

        let task = tokio::spawn(async move {
            let mut tick_interval = tokio::time::interval(tick_rate);
            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);
            let mut signal_armed = true;

            loop {
                tokio::select! {
                    _ = tick_interval.tick() => {
                        if tx.send(Event::Tick).is_err() {
                            break;
                        }
                    }
                    result = &mut ctrl_c, if signal_armed => {
                        signal_armed = false;
                        if result.is_ok() {
                            let _ = tx.send(Event::Shutdown);
                            break;
                        }
                    }
                }
            }
        });

        Self { rx, _task: task }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_follow_the_interval() {
        let start = tokio::time::Instant::now();
        let mut events = EventHandler::new(Duration::from_secs(2));

        assert_eq!(events.next().await, Some(Event::Tick));
        assert_eq!(events.next().await, Some(Event::Tick));
        assert_eq!(events.next().await, Some(Event::Tick));
        assert!(start.elapsed() >= Duration::from_secs(4));
    }
}
