mod question;
mod score;
mod syllabus;

pub use question::Question;
pub use score::{NewScore, ScoreRecord, ANONYMOUS_NAME};
pub use syllabus::{Difficulty, Grade, InvalidGrade, Topic};
