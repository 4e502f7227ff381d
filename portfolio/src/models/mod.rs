pub mod like;
pub mod like_counter;
pub mod message;
