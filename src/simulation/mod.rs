pub mod behavior;
pub mod route;
pub mod sound;
pub mod tick;

pub use behavior::{emitter_signal, receive_signal, run_emitters};
pub use route::{route_signals, RoutedSignal};
pub use sound::{InstrumentSounds, SoundEventBatch};
pub use tick::{run_simulation_tick, Simulation, TickOutput};
