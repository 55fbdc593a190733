use crate::rotation::InterruptHandle;
use crossterm::event::{self, Event, KeyEventKind};
use std::io;

/// Any key press or pointer activity on the terminal ends the rotation
///
/// Single keys and mouse movement only arrive while [super::display::TerminalDisplay] holds the
/// terminal in raw mode with mouse capture on.
pub fn spawn_input_watcher(handle: InterruptHandle) {
    let spawned = std::thread::Builder::new()
        .name("input-watcher".to_string())
        .spawn(move || watch(event::read, &handle));

    if let Err(err) = spawned {
        tracing::error!("Could not watch the terminal for user activity: {}", err);
    }
}

fn is_user_activity(event: &Event) -> bool {
    match event {
        // Release and repeat reports follow a press that already counted
        Event::Key(key) => key.kind == KeyEventKind::Press,
        Event::Mouse(_) => true,
        Event::Paste(_) => true,
        Event::Resize(..) | Event::FocusGained | Event::FocusLost => false,
    }
}

fn watch(mut next_event: impl FnMut() -> io::Result<Event>, handle: &InterruptHandle) {
    loop {
        match next_event() {
            Ok(event) if is_user_activity(&event) => {
                tracing::debug!("User activity: {:?}", event);
                handle.interrupt();
                return;
            }
            Ok(_) => continue,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                tracing::warn!("Stopped watching the terminal for activity: {}", err);
                return;
            }
        }
    }
}
