pub mod feedback;
pub mod session;

pub use feedback::Feedback;
pub use session::{QuestionAnswer, SessionRecord, SessionStatus};
