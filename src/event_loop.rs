use std::io;
use std::time::{Duration, Instant};

use crossterm::event::Event;

use crate::drivers::InputDriver;

pub enum ControlFlow {
    Continue,
    /// Keep going, and make sure the handler runs again by `Instant` even if
    /// no input arrives (a pending long-press deadline).
    WakeAt(Instant),
    Quit,
}

/// The host's single input thread.
///
/// Polls the driver, hands each event to the handler, and calls the handler
/// with `None` whenever the wait elapses so time-based state (the long-press
/// timer) can advance. Nothing else in the host reads input.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    /// How long to wait for input before the next idle call.
    pub fn wait_for(&self, wake_at: Option<Instant>, now: Instant) -> Duration {
        match wake_at {
            Some(at) => at.saturating_duration_since(now).min(self.poll_interval),
            None => self.poll_interval,
        }
    }

    /// Takes over the current thread until the handler asks to quit.
    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            let wake_at = match handler(&mut self.driver, None)? {
                ControlFlow::Quit => return Ok(()),
                ControlFlow::WakeAt(at) => Some(at),
                ControlFlow::Continue => None,
            };

            let mut next = self.driver.next_event(self.wait_for(wake_at, Instant::now()))?;
            // Drain bursts (mouse drags) before the next idle call so the
            // overlay does not lag behind the pointer.
            while let Some(event) = next {
                if let ControlFlow::Quit = handler(&mut self.driver, Some(event))? {
                    return Ok(());
                }
                next = self.driver.next_event(Duration::ZERO)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::VecDeque;

    struct ScriptedDriver {
        events: VecDeque<Event>,
        waits: Vec<Duration>,
    }

    impl InputDriver for ScriptedDriver {
        fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
            self.waits.push(timeout);
            Ok(!self.events.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.events
                .pop_front()
                .ok_or_else(|| io::Error::other("no scripted event"))
        }
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn wait_is_capped_by_deadline() {
        let lp = EventLoop::new(
            ScriptedDriver {
                events: VecDeque::new(),
                waits: Vec::new(),
            },
            Duration::from_millis(100),
        );
        let now = Instant::now();
        assert_eq!(lp.wait_for(None, now), Duration::from_millis(100));
        assert_eq!(
            lp.wait_for(Some(now + Duration::from_millis(30)), now),
            Duration::from_millis(30)
        );
        assert_eq!(
            lp.wait_for(Some(now - Duration::from_millis(30)), now),
            Duration::ZERO
        );
    }

    #[test]
    fn drains_burst_then_quits() {
        let driver = ScriptedDriver {
            events: VecDeque::from(vec![key('a'), key('b'), key('q')]),
            waits: Vec::new(),
        };
        let mut lp = EventLoop::new(driver, Duration::from_millis(16));
        let mut seen = Vec::new();
        let mut idle = 0;
        lp.run(|_, event| {
            match event {
                Some(Event::Key(k)) if k.code == KeyCode::Char('q') => return Ok(ControlFlow::Quit),
                Some(Event::Key(k)) => seen.push(k.code),
                _ => idle += 1,
            }
            Ok(ControlFlow::Continue)
        })
        .unwrap();
        assert_eq!(seen, vec![KeyCode::Char('a'), KeyCode::Char('b')]);
        assert_eq!(idle, 1);
        assert_eq!(lp.driver().waits[0], Duration::from_millis(16));
        // Everything after the first event is only peeked at.
        assert!(lp.driver().waits[1..].iter().all(|w| w.is_zero()));
    }

    #[test]
    fn next_event_returns_none_when_idle() {
        let mut driver = ScriptedDriver {
            events: VecDeque::from(vec![key('x')]),
            waits: Vec::new(),
        };
        assert!(matches!(
            driver.next_event(Duration::from_millis(5)).unwrap(),
            Some(Event::Key(_))
        ));
        assert!(driver.next_event(Duration::ZERO).unwrap().is_none());
        assert_eq!(driver.waits, vec![Duration::from_millis(5), Duration::ZERO]);
    }
}
