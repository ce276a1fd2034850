mod command;
mod elevation;
mod target;
