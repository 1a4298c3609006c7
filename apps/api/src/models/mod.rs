pub mod sow;
