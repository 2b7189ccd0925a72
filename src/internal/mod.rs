//! Internal implementation details.

pub(crate) mod circular;
pub(crate) mod init_tracker;

pub(crate) use circular::ResolutionFrame;
pub(crate) use init_tracker::InitTracker;
