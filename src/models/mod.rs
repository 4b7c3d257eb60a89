pub mod channel;
pub mod selection;
pub mod user;
pub mod video;

pub use channel::Channel;
pub use selection::ChannelSelection;
pub use test::{AbTest, NewTest, TestMetrics, TestStatus, Variant, VariantMetrics};
pub use user::User;
pub use video::Video;
