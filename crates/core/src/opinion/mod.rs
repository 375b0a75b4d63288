mod id;
mod requests;
mod types;

pub use id::{IdGenerator, UuidGenerator};
pub use requests::{
    CreateCommentRequest, CreateOpinionRequest, CreatedComment, CreatedOpinion,
    ReactionInfoQuery, SaveReactionRequest,
};
pub use types::{Comment, Coordinate, Opinion, Reaction, ReactionInfo};
