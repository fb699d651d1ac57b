pub mod rejuvenate;
pub mod wither;
