pub mod outline;
pub mod split;
pub mod titles;
