pub mod consts;
pub mod derotate;
pub mod ephemeris;
pub mod error;
pub mod frame;
pub mod integrate;
pub mod io;
pub mod observer;
pub mod pipeline;
pub mod rotation;
pub mod session;
pub mod timestamp;
