pub mod oft;
