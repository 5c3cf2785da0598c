pub mod clock;
pub mod console;
pub mod stopwatch;

pub use clock::{Clock, ManualClock, SystemClock};
pub use console::Console;
pub use stopwatch::{ClockFault, Event, State, Stopwatch};
