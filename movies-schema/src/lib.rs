pub mod message;
pub mod movie;
pub mod request;

pub use message::MessageBody;
pub use movie::{Movie, MovieId};
pub use request::{MovieCreateRequest, NewMovie};
