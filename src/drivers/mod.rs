//! Where the overlay host gets its input from. The console driver reads the
//! real terminal; tests script events through the same trait.

pub mod console;
pub mod mouse;

use std::io;
use std::time::Duration;

use crossterm::event::Event;

pub trait InputDriver {
    /// Waits up to `timeout` for input. A zero timeout only peeks.
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;

    /// Mouse capture is what turns clicks into pointer events, so hosts let
    /// the user switch it off to select text in the terminal.
    fn set_mouse_capture(&mut self, _enabled: bool) -> io::Result<()> {
        Ok(())
    }

    /// The next event if one shows up before `timeout`, else `None`.
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if self.poll(timeout)? {
            self.read().map(Some)
        } else {
            Ok(None)
        }
    }
}

impl<T: InputDriver + ?Sized> InputDriver for &mut T {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        (**self).read()
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        (**self).set_mouse_capture(enabled)
    }
}
