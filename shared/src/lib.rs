pub mod payment;
pub mod pricing;
pub mod square;
pub mod user;

pub use payment::*;
pub use pricing::square_price;
pub use square::*;
pub use user::*;
