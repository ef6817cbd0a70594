//! Tax computation

pub mod gst;
