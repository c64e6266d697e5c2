pub mod client;

pub use client::ZarinpalClient;
