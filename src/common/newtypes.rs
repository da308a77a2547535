use diesel_derive_newtype::DieselNewType;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Hash, Eq, PartialEq, Default, Serialize, Deserialize, DieselNewType)]
pub struct UserId(pub String);

#[derive(Debug, Clone, Hash, Eq, PartialEq, Default, Serialize, Deserialize, DieselNewType)]
pub struct ThreadId(pub String);

#[derive(Debug, Clone, Hash, Eq, PartialEq, Default, Serialize, Deserialize, DieselNewType)]
pub struct CommentId(pub String);

#[derive(Debug, Clone, Hash, Eq, PartialEq, Default, Serialize, Deserialize, DieselNewType)]
pub struct LikeId(pub String);

impl Display for ThreadId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Display for CommentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
