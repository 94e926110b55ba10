//! Browser binding of the page host

pub mod browser;

pub use browser::{BrowserHost, mount};
