pub mod action;
pub mod event;
pub mod format;
pub mod notice;

pub use action::Action;
pub use event::Event;
pub use format::humanize_size;
pub use notice::Notice;
pub use shelf_client::FileRecord;
