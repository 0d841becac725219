pub mod robot;
pub mod trajectory;
pub mod world;
