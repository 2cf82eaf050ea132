pub mod insight;
pub mod product;
