pub mod lead;
pub mod call;
pub mod meeting;
pub mod broker;
pub mod analytics;
pub mod reminder;

pub use lead::*;
pub use call::*;
pub use meeting::*;
pub use broker::*;
pub use analytics::*;
pub use reminder::*;
