pub(crate) mod command;
pub(crate) mod elevation;
mod events;
pub(crate) mod supervisor;
mod target;

pub(crate) use command::RecordCommand;

pub use {events::RecorderEvent, supervisor::PerfRecorder, target::RecordTarget};
