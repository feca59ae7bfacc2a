//! `PlayerCmd`: the small command set the server process turns external
//! intent into, grounded on termusic's `player_loop` match over
//! `PlayerCmd` (`server/src/server.rs`). Unlike termusic, commands here
//! arrive as dispatch-queue closures rather than over an mpsc channel —
//! `ctrlc` and the ticker thread both just call `DispatchHandle::post`
//! directly instead of adding a second queue on top of the one the
//! playloop already drains.

use playctl_core::{PlayerContext, SeekFlags, SeekType, StopPlay};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerCmd {
    TogglePause,
    SeekRelative(f64),
    Quit,
}

pub fn apply(pc: &mut PlayerContext, cmd: PlayerCmd) {
    let mut events = playctl_core::NullEventSink;
    match cmd {
        PlayerCmd::TogglePause => {
            let next = !pc.user_pause;
            pc.set_pause_state(next, &mut events);
        }
        PlayerCmd::SeekRelative(secs) => {
            pc.queue_seek(
                SeekType::Relative,
                secs,
                playctl_core::Precision::Default,
                SeekFlags::default(),
            );
        }
        PlayerCmd::Quit => {
            pc.stop_play = StopPlay::Quit;
            pc.wakeup();
        }
    }
}
