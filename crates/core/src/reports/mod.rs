//! Daily labor reports and the allocation board

pub mod board;
pub mod ports;
pub mod service;

pub use board::{AllocatorBoard, DropTarget, SiteCard, SiteNote, WorkerItem};
pub use ports::DailyReportRepository;
pub use service::{Assignment, DailyReportService, SaveAssignments};
