mod bid;
mod cart;
mod comment;
mod order;
mod product;
mod report;
mod reservation;
mod user;

pub use bid::*;
pub use cart::*;
pub use comment::*;
pub use order::*;
pub use product::*;
pub use report::*;
pub use reservation::*;
pub use user::*;
